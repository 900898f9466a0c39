//! Source directory scan.
//!
//! Produces the base resource list the sitemap is built from. Pure: reads
//! the filesystem, returns data.

use std::path::Path;

use jwalk::WalkDir;

use crate::core::UrlPath;
use crate::utils::mime::MimeTable;

use super::Resource;

/// Extensions whose destination is rendered HTML.
const MARKDOWN_EXTENSIONS: &[&str] = &["md", "markdown"];

/// Scan `source_dir` for resources.
///
/// Skips dot-files and anything under a `_`-prefixed name (partials,
/// layouts). Markdown sources are served at `.html`. Sorted by path.
pub fn scan_source(source_dir: &Path, mime: &MimeTable) -> Vec<Resource> {
    let mut resources: Vec<Resource> = WalkDir::new(source_dir)
        .sort(true)
        .process_read_dir(|_, _, _, children| {
            children.retain(|entry| {
                // The root itself is kept whatever its name
                entry
                    .as_ref()
                    .map(|e| {
                        e.depth == 0 || !is_hidden(e.file_name().to_str().unwrap_or_default())
                    })
                    .unwrap_or(false)
            });
        })
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| {
            let source = e.path();
            let rel = source.strip_prefix(source_dir).ok()?;
            let path = UrlPath::from_file_path(&rel.to_string_lossy());
            let destination = destination_for(&path);
            Some(Resource::file(path, destination, source, mime))
        })
        .collect();

    resources.sort_by(|a, b| a.path().cmp(b.path()));
    resources
}

/// Destination path for a scanned source path.
pub fn destination_for(path: &UrlPath) -> UrlPath {
    match path.extension() {
        Some(ext) if MARKDOWN_EXTENSIONS.contains(&ext.as_str()) => path.with_extension("html"),
        _ => path.clone(),
    }
}

fn is_hidden(name: &str) -> bool {
    name.starts_with('.') || name.starts_with('_')
}
