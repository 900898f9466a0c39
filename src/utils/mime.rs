//! MIME type detection utilities.
//!
//! A built-in extension table plus [`MimeTable`], which layers registered
//! overrides on top of it. The dev server registers its overrides once at
//! startup via [`MimeTable::dev_server`].

use rustc_hash::FxHashMap;

/// Common MIME type constants.
pub mod types {
    // Text
    pub const HTML: &str = "text/html; charset=utf-8";
    pub const PLAIN: &str = "text/plain; charset=utf-8";
    pub const CSS: &str = "text/css; charset=utf-8";
    pub const JAVASCRIPT: &str = "text/javascript; charset=utf-8";
    pub const TYPESCRIPT: &str = "text/typescript; charset=utf-8";
    pub const JSON: &str = "application/json";
    pub const XML: &str = "application/xml";
    pub const MARKDOWN: &str = "text/markdown; charset=utf-8";
    pub const YAML: &str = "text/yaml; charset=utf-8";
    pub const TOML: &str = "text/toml; charset=utf-8";
    pub const CSV: &str = "text/csv; charset=utf-8";

    // Web feeds
    pub const RSS: &str = "application/rss+xml";
    pub const ATOM: &str = "application/atom+xml";

    // Documents
    pub const PDF: &str = "application/pdf";

    // Binary
    pub const OCTET_STREAM: &str = "application/octet-stream";
    pub const WASM: &str = "application/wasm";
    pub const ZIP: &str = "application/zip";
    pub const GZIP: &str = "application/gzip";

    // Images
    pub const PNG: &str = "image/png";
    pub const JPEG: &str = "image/jpeg";
    pub const GIF: &str = "image/gif";
    pub const WEBP: &str = "image/webp";
    pub const AVIF: &str = "image/avif";
    pub const SVG: &str = "image/svg+xml";
    pub const ICO: &str = "image/x-icon";
    pub const BMP: &str = "image/bmp";
    pub const TIFF: &str = "image/tiff";

    // Audio
    pub const MP3: &str = "audio/mpeg";
    pub const WAV: &str = "audio/wav";
    pub const OGG_AUDIO: &str = "audio/ogg";
    pub const FLAC: &str = "audio/flac";
    pub const AAC: &str = "audio/aac";
    pub const WEBM_AUDIO: &str = "audio/webm";

    // Video
    pub const MP4: &str = "video/mp4";
    pub const WEBM: &str = "video/webm";
    pub const OGG_VIDEO: &str = "video/ogg";
    pub const AVI: &str = "video/x-msvideo";
    pub const MOV: &str = "video/quicktime";

    // Fonts
    pub const WOFF: &str = "font/woff";
    pub const WOFF2: &str = "font/woff2";
    pub const TTF: &str = "font/ttf";
    pub const OTF: &str = "font/otf";
    pub const EOT: &str = "application/vnd.ms-fontobject";

    // Legacy IE behaviors
    pub const COMPONENT: &str = "text/x-component";
}

/// Guess MIME type from a lowercase extension string (without the dot).
///
/// Returns `None` for unknown extensions.
pub fn guess(ext: &str) -> Option<&'static str> {
    let mime = match ext {
        // Web / Text
        "html" | "htm" => types::HTML,
        "css" => types::CSS,
        "js" | "mjs" | "cjs" => types::JAVASCRIPT,
        "ts" | "tsx" | "mts" | "cts" => types::TYPESCRIPT,
        "json" => types::JSON,
        "xml" => types::XML,
        "yaml" | "yml" => types::YAML,
        "toml" => types::TOML,
        "csv" => types::CSV,

        // Web feeds
        "rss" => types::RSS,
        "atom" => types::ATOM,

        // Images
        "svg" | "svgz" => types::SVG,
        "png" => types::PNG,
        "jpg" | "jpeg" => types::JPEG,
        "gif" => types::GIF,
        "webp" => types::WEBP,
        "avif" => types::AVIF,
        "ico" => types::ICO,
        "bmp" => types::BMP,
        "tif" | "tiff" => types::TIFF,

        // Audio
        "mp3" => types::MP3,
        "wav" => types::WAV,
        "ogg" | "oga" => types::OGG_AUDIO,
        "flac" => types::FLAC,
        "aac" | "m4a" => types::AAC,

        // Video
        "mp4" | "m4v" => types::MP4,
        "webm" => types::WEBM,
        "ogv" => types::OGG_VIDEO,
        "avi" => types::AVI,
        "mov" => types::MOV,

        // Fonts
        "woff" => types::WOFF,
        "woff2" => types::WOFF2,
        "ttf" => types::TTF,
        "otf" => types::OTF,
        "eot" => types::EOT,

        // Documents / Binary
        "pdf" => types::PDF,
        "txt" => types::PLAIN,
        "md" | "markdown" => types::MARKDOWN,
        "wasm" => types::WASM,
        "zip" => types::ZIP,
        "gz" | "gzip" => types::GZIP,

        _ => return None,
    };
    Some(mime)
}

/// Extension -> content-type table with registered overrides.
///
/// Overrides always win over the built-in table.
#[derive(Debug, Clone, Default)]
pub struct MimeTable {
    overrides: FxHashMap<String, String>,
}

impl MimeTable {
    /// Table with no overrides (built-in entries only).
    pub fn new() -> Self {
        Self::default()
    }

    /// Table seeded with the overrides the dev server needs.
    pub fn dev_server() -> Self {
        let mut table = Self::new();
        table.register("htc", types::COMPONENT);
        table.register("html", types::HTML);
        table.register("htm", types::HTML);
        table
    }

    /// Register (or replace) the content type for an extension.
    ///
    /// Leading dots and case are ignored: `.HTC` and `htc` are the same key.
    pub fn register(&mut self, ext: &str, mime: impl Into<String>) {
        let ext = ext.trim_start_matches('.').to_ascii_lowercase();
        self.overrides.insert(ext, mime.into());
    }

    /// Look up the content type for an extension.
    pub fn lookup(&self, ext: &str) -> Option<&str> {
        let ext = ext.trim_start_matches('.').to_ascii_lowercase();
        self.overrides
            .get(&ext)
            .map(String::as_str)
            .or_else(|| guess(&ext))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guess() {
        assert_eq!(guess("html"), Some(types::HTML));
        assert_eq!(guess("css"), Some(types::CSS));
        assert_eq!(guess("png"), Some(types::PNG));
        assert_eq!(guess("svgz"), Some(types::SVG));
        assert_eq!(guess("mp4"), Some(types::MP4));
        assert_eq!(guess("xyz"), None);
    }

    #[test]
    fn test_dev_server_overrides() {
        let table = MimeTable::dev_server();
        assert_eq!(table.lookup("htc"), Some("text/x-component"));
        assert_eq!(table.lookup("html"), Some("text/html; charset=utf-8"));
        assert_eq!(table.lookup(".HTM"), Some("text/html; charset=utf-8"));
        assert_eq!(table.lookup("png"), Some(types::PNG));
    }

    #[test]
    fn test_register_replaces_builtin() {
        let mut table = MimeTable::new();
        assert_eq!(table.lookup("htc"), None);

        table.register(".json", "application/vnd.custom+json");
        assert_eq!(table.lookup("json"), Some("application/vnd.custom+json"));
    }
}
