//! URL path type for type-safe site addressing.
//!
//! - Internal representation: Always decoded (human-readable)
//! - Browser boundary: Decode on input, encode on output

use std::borrow::Borrow;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Normalized, decoded site path.
///
/// Invariants:
/// - Always decoded (no percent-encoding)
/// - Always starts with exactly one `/`
/// - No empty, `.` or `..` segments
/// - Directory form (trailing `/`) is preserved for non-root paths
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UrlPath(Arc<str>);

impl UrlPath {
    /// Normalize a decoded path.
    ///
    /// ```ignore
    /// assert_eq!(UrlPath::new("about//us/../team/"), "/about/team/");
    /// assert_eq!(UrlPath::new("/a/./b.html?x=1"), "/a/b.html");
    /// ```
    pub fn new(decoded: &str) -> Self {
        let trimmed = decoded.trim();
        Self::from_segments(trimmed.split(['?', '#']).next().unwrap_or(trimmed))
    }

    /// Normalize separators and segments, keeping `?` and `#` as literal characters.
    fn from_segments(path: &str) -> Self {
        let path = path.replace('\\', "/");

        let mut segments: Vec<&str> = Vec::new();
        for segment in path.split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    segments.pop();
                }
                s => segments.push(s),
            }
        }

        if segments.is_empty() {
            return Self::root();
        }

        let mut normalized = String::with_capacity(path.len() + 1);
        for segment in &segments {
            normalized.push('/');
            normalized.push_str(segment);
        }
        if path.ends_with('/') {
            normalized.push('/');
        }

        Self(Arc::from(normalized))
    }

    /// Create from a path relative to the source directory.
    ///
    /// File names are taken literally: `?` and `#` are part of the name.
    pub fn from_file_path(relative: &str) -> Self {
        Self::from_segments(relative)
    }

    /// Create from browser URL (strip query string, decode percent-encoding).
    pub fn from_browser(encoded: &str) -> Self {
        use percent_encoding::percent_decode_str;
        // Strip query string before decoding so an encoded `?` survives
        let path = encoded.split(['?', '#']).next().unwrap_or(encoded);
        let decoded = percent_decode_str(path)
            .decode_utf8()
            .map(|s| s.into_owned())
            .unwrap_or_else(|_| path.to_string());
        Self::from_segments(decoded.trim())
    }

    /// Extract the path component from an absolute URL (`http://host/a/b`).
    ///
    /// Returns `None` if `url` is not an absolute URL.
    pub fn from_absolute_url(url: &str) -> Option<Self> {
        let parsed = url::Url::parse(url).ok()?;
        Some(Self::from_browser(parsed.path()))
    }

    /// The site root `/`.
    pub fn root() -> Self {
        Self(Arc::from("/"))
    }

    /// Get the decoded URL path as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check if this path is in directory form (ends with `/`).
    #[inline]
    pub fn is_dir(&self) -> bool {
        self.0.ends_with('/')
    }

    /// Lowercased extension of the last segment, without the dot.
    pub fn extension(&self) -> Option<String> {
        if self.is_dir() {
            return None;
        }
        let name = self.file_name();
        let (stem, ext) = name.rsplit_once('.')?;
        (!stem.is_empty() && !ext.is_empty()).then(|| ext.to_ascii_lowercase())
    }

    /// Last path segment (empty for directory paths).
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or_default()
    }

    /// Append an index file: `/about/` and `/about` both become `/about/index.html`.
    pub fn join_index(&self, index_file: &str) -> Self {
        let separator = if self.is_dir() { "" } else { "/" };
        Self::from_segments(&format!("{}{}{}", self.0, separator, index_file))
    }

    /// Replace the extension of a file path: `/a.md` -> `/a.html`.
    pub fn with_extension(&self, ext: &str) -> Self {
        if self.extension().is_none() {
            return self.clone();
        }
        let name = self.file_name();
        let Some((stem, _)) = name.rsplit_once('.') else {
            return self.clone();
        };
        let parent = &self.0[..self.0.len() - name.len()];
        Self(Arc::from(format!("{parent}{stem}.{ext}")))
    }
}

impl std::fmt::Display for UrlPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Default for UrlPath {
    fn default() -> Self {
        Self::root()
    }
}

impl AsRef<str> for UrlPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for UrlPath {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<String> for UrlPath {
    fn from(s: String) -> Self {
        Self::new(&s)
    }
}

impl From<&str> for UrlPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl PartialEq<str> for UrlPath {
    fn eq(&self, other: &str) -> bool {
        self.0.as_ref() == other
    }
}

impl PartialEq<&str> for UrlPath {
    fn eq(&self, other: &&str) -> bool {
        self.0.as_ref() == *other
    }
}

impl Serialize for UrlPath {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for UrlPath {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Self::new(&s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_collapses_separators() {
        assert_eq!(UrlPath::new("//about///us.html"), "/about/us.html");
        assert_eq!(UrlPath::new("about/us.html"), "/about/us.html");
        assert_eq!(UrlPath::new("\\posts\\a.html"), "/posts/a.html");
    }

    #[test]
    fn test_new_resolves_relative_segments() {
        assert_eq!(UrlPath::new("/a/./b/../c.html"), "/a/c.html");
        assert_eq!(UrlPath::new("/../../etc/passwd"), "/etc/passwd");
        assert_eq!(UrlPath::new("/a/.."), "/");
    }

    #[test]
    fn test_new_keeps_directory_form() {
        assert_eq!(UrlPath::new("/about/"), "/about/");
        assert_eq!(UrlPath::new("/about"), "/about");
        assert_eq!(UrlPath::new(""), "/");
        assert_eq!(UrlPath::new("/"), "/");
        assert!(UrlPath::root().is_dir());
    }

    #[test]
    fn test_new_strips_query_and_fragment() {
        assert_eq!(UrlPath::new("/a.html?x=1"), "/a.html");
        assert_eq!(UrlPath::new("/a/#top"), "/a/");
    }

    #[test]
    fn test_from_browser_space() {
        let url = UrlPath::from_browser("/posts/hello%20world.html");
        assert_eq!(url.as_str(), "/posts/hello world.html");
        assert_eq!(url, UrlPath::new("/posts/hello world.html"));
    }

    #[test]
    fn test_from_browser_chinese() {
        let url = UrlPath::from_browser("/posts/%E4%B8%AD%E6%96%87/");
        assert_eq!(url.as_str(), "/posts/中文/");
    }

    #[test]
    fn test_from_browser_encoded_query_char() {
        let url = UrlPath::from_browser("/a%3Fb.html?real=query");
        assert_eq!(url.as_str(), "/a?b.html");
    }

    #[test]
    fn test_from_absolute_url() {
        let url = UrlPath::from_absolute_url("http://localhost:4567/a//b.html?q").unwrap();
        assert_eq!(url, "/a/b.html");
        assert!(UrlPath::from_absolute_url("not a url").is_none());
    }

    #[test]
    fn test_from_file_path_keeps_metacharacters() {
        assert_eq!(UrlPath::from_file_path("c#1.html"), "/c#1.html");
        assert_eq!(UrlPath::from_file_path("docs\\q?.md"), "/docs/q?.md");
        assert_eq!(
            UrlPath::from_file_path("c#1.html"),
            UrlPath::from_browser("/c%231.html")
        );
    }

    #[test]
    fn test_extension() {
        assert_eq!(UrlPath::new("/logo.SVGZ").extension().as_deref(), Some("svgz"));
        assert_eq!(UrlPath::new("/a.tar.gz").extension().as_deref(), Some("gz"));
        assert_eq!(UrlPath::new("/about/").extension(), None);
        assert_eq!(UrlPath::new("/.htaccess").extension(), None);
        assert_eq!(UrlPath::new("/README").extension(), None);
    }

    #[test]
    fn test_join_index() {
        assert_eq!(UrlPath::new("/about/").join_index("index.html"), "/about/index.html");
        assert_eq!(UrlPath::root().join_index("index.html"), "/index.html");
        assert_eq!(UrlPath::new("/about").join_index("index.html"), "/about/index.html");
        assert_eq!(UrlPath::from_browser("/c%23").join_index("index.html"), "/c#/index.html");
    }

    #[test]
    fn test_with_extension() {
        assert_eq!(UrlPath::new("/posts/a.md").with_extension("html"), "/posts/a.html");
        assert_eq!(UrlPath::new("/posts/a").with_extension("html"), "/posts/a");
        assert_eq!(UrlPath::new("/v1.0/a").with_extension("html"), "/v1.0/a");
        assert_eq!(UrlPath::new("/.env").with_extension("html"), "/.env");
    }

    #[test]
    fn test_deserialize_normalizes() {
        let url: UrlPath = serde_json::from_str("\"about//us/\"").unwrap();
        assert_eq!(url, "/about/us/");
    }
}
