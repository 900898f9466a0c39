//! Ignored paths.
//!
//! An ignored resource stays in the sitemap lookups (so proxies can still
//! target it) but is never served directly and is skipped by live enumeration.

use rustc_hash::FxHashSet;

use crate::core::UrlPath;

use super::Resource;

#[derive(Debug, Clone, Default)]
pub struct IgnoreList {
    paths: FxHashSet<UrlPath>,
}

impl IgnoreList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ignore a path. Returns `false` if it was already ignored.
    pub fn ignore(&mut self, path: UrlPath) -> bool {
        self.paths.insert(path)
    }

    pub fn contains(&self, path: &UrlPath) -> bool {
        self.paths.contains(path)
    }

    /// A resource is ignored if either its source or destination path is.
    pub fn matches(&self, resource: &Resource) -> bool {
        self.contains(resource.path()) || self.contains(resource.destination())
    }
}

impl FromIterator<UrlPath> for IgnoreList {
    fn from_iter<I: IntoIterator<Item = UrlPath>>(iter: I) -> Self {
        Self {
            paths: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::utils::mime::MimeTable;

    #[test]
    fn test_matches_source_or_destination() {
        let mime = MimeTable::new();
        let post = Resource::file(
            UrlPath::new("/posts/a.md"),
            UrlPath::new("/posts/a.html"),
            PathBuf::from("source/posts/a.md"),
            &mime,
        );

        let mut ignores = IgnoreList::new();
        assert!(!ignores.matches(&post));

        assert!(ignores.ignore(UrlPath::new("posts/a.html")));
        assert!(!ignores.ignore(UrlPath::new("/posts/a.html")));
        assert!(ignores.matches(&post));

        let by_source: IgnoreList = [UrlPath::new("/posts/a.md")].into_iter().collect();
        assert!(by_source.matches(&post));
        assert!(!by_source.contains(post.destination()));
    }
}
