//! Resource types for the sitemap.
//!
//! A resource is either backed by a file on disk or is a proxy that serves
//! another resource's content under its own address. The distinction is a
//! closed enum ([`ResourceKind`]); everything both variants share lives on
//! [`Resource`].

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::core::UrlPath;
use crate::utils::mime::MimeTable;

use super::{ProxyError, ResourceGraph};

/// Arbitrary option/local values (from config or extension code).
pub type Options = Map<String, Value>;

/// Option key that sets a resource's content type explicitly.
pub const CONTENT_TYPE_KEY: &str = "content_type";

/// Render metadata attached to a resource.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    /// Resource-level settings (e.g. `content_type`).
    pub options: Options,
    /// Values exposed to the renderer.
    pub locals: Options,
}

impl Metadata {
    /// Overlay `other` on top of `self`; keys in `other` win.
    pub fn merge(&mut self, other: &Metadata) {
        for (key, value) in &other.options {
            self.options.insert(key.clone(), value.clone());
        }
        for (key, value) in &other.locals {
            self.locals.insert(key.clone(), value.clone());
        }
    }
}

/// What backs a resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceKind {
    /// A file found by the source scan.
    File { source: PathBuf },
    /// An alias of another resource, addressed by its source path.
    Proxy { target: UrlPath },
}

/// A single addressable resource in the sitemap.
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    path: UrlPath,
    destination: UrlPath,
    kind: ResourceKind,
    content_type: Option<String>,
    pub(super) ignored: bool,
    metadata: Metadata,
}

impl Resource {
    /// Create a file-backed resource.
    pub fn file(path: UrlPath, destination: UrlPath, source: PathBuf, mime: &MimeTable) -> Self {
        let content_type = detect_content_type(&destination, mime);
        Self {
            path,
            destination,
            kind: ResourceKind::File { source },
            content_type,
            ignored: false,
            metadata: Metadata::default(),
        }
    }

    /// Create a proxy resource served at `path` with `target`'s content.
    pub fn proxy(path: UrlPath, target: UrlPath, mime: &MimeTable) -> Result<Self, ProxyError> {
        let content_type = detect_content_type(&path, mime);
        let mut resource = Self {
            destination: path.clone(),
            path: path.clone(),
            // Placeholder, replaced by `mark_proxy_to` below
            kind: ResourceKind::Proxy { target: path },
            content_type,
            ignored: false,
            metadata: Metadata::default(),
        };
        resource.mark_proxy_to(target)?;
        Ok(resource)
    }

    /// Turn this resource into a proxy of `target`.
    ///
    /// Fails with [`ProxyError::SelfProxy`] if `target` is this resource's own path.
    pub fn mark_proxy_to(&mut self, target: UrlPath) -> Result<(), ProxyError> {
        if target == self.path {
            return Err(ProxyError::SelfProxy {
                path: self.path.clone(),
            });
        }
        self.kind = ResourceKind::Proxy { target };
        Ok(())
    }

    /// Apply a metadata overlay: options and locals are merged (overlay wins),
    /// an explicit `content_type` option replaces the detected one.
    pub fn apply_metadata(&mut self, overlay: &Metadata) {
        if let Some(Value::String(content_type)) = overlay.options.get(CONTENT_TYPE_KEY) {
            self.content_type = Some(content_type.clone());
        }
        self.metadata.merge(overlay);
    }

    /// Source (virtual) path.
    pub fn path(&self) -> &UrlPath {
        &self.path
    }

    /// Path the resource is served at.
    pub fn destination(&self) -> &UrlPath {
        &self.destination
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Whether the resource is excluded from serving and live enumeration.
    pub fn is_ignored(&self) -> bool {
        self.ignored
    }

    pub const fn is_proxy(&self) -> bool {
        matches!(self.kind, ResourceKind::Proxy { .. })
    }

    pub fn proxy_target(&self) -> Option<&UrlPath> {
        match &self.kind {
            ResourceKind::Proxy { target } => Some(target),
            ResourceKind::File { .. } => None,
        }
    }

    /// Local source file (`None` for proxies).
    pub fn source_file(&self) -> Option<&Path> {
        match &self.kind {
            ResourceKind::File { source } => Some(source),
            ResourceKind::Proxy { .. } => None,
        }
    }

    /// Local content type: explicit option, else detected from the extension.
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Look up this proxy's target in `graph`.
    ///
    /// The target is matched by source path first, then by destination, so
    /// `/a/index.html` reaches a page scanned from `/a/index.md`. Returns
    /// `Ok(None)` for file resources. The target must exist and must not
    /// itself be a proxy.
    pub fn resolve_proxy_target<'g>(
        &self,
        graph: &'g ResourceGraph,
    ) -> Result<Option<&'g Resource>, ProxyError> {
        let Some(target) = self.proxy_target() else {
            return Ok(None);
        };

        let resource = graph
            .find_by_path(target)
            .or_else(|| graph.find_by_destination(target))
            .ok_or_else(|| ProxyError::UnknownTarget {
                path: self.path.clone(),
                target: target.clone(),
            })?;

        if resource.is_proxy() {
            return Err(ProxyError::ChainedProxy {
                path: self.path.clone(),
                target: target.clone(),
            });
        }

        Ok(Some(resource))
    }

    /// Source file to read, following the proxy link if needed.
    pub fn effective_source_file<'a>(
        &'a self,
        graph: &'a ResourceGraph,
    ) -> Result<&'a Path, ProxyError> {
        if let Some(source) = self.source_file() {
            return Ok(source);
        }
        let target = self.resolve_proxy_target(graph)?;
        // A resolved target is never a proxy, so it always has a source file
        target
            .and_then(Resource::source_file)
            .ok_or_else(|| ProxyError::ChainedProxy {
                path: self.path.clone(),
                target: self.proxy_target().cloned().unwrap_or_default(),
            })
    }

    /// Content type to serve: the local one if known, else the proxy target's.
    pub fn effective_content_type<'a>(
        &'a self,
        graph: &'a ResourceGraph,
    ) -> Result<Option<&'a str>, ProxyError> {
        if let Some(content_type) = self.content_type() {
            return Ok(Some(content_type));
        }
        Ok(self
            .resolve_proxy_target(graph)?
            .and_then(Resource::content_type))
    }

    /// Metadata the renderer sees: the target's, overlaid by this resource's own.
    pub fn effective_metadata(&self, graph: &ResourceGraph) -> Result<Metadata, ProxyError> {
        let mut metadata = match self.resolve_proxy_target(graph)? {
            Some(target) => target.metadata.clone(),
            None => Metadata::default(),
        };
        metadata.merge(&self.metadata);
        Ok(metadata)
    }
}

fn detect_content_type(path: &UrlPath, mime: &MimeTable) -> Option<String> {
    path.extension()
        .and_then(|ext| mime.lookup(&ext).map(str::to_string))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    impl Metadata {
        fn is_empty(&self) -> bool {
            self.options.is_empty() && self.locals.is_empty()
        }
    }

    fn mime() -> MimeTable {
        MimeTable::dev_server()
    }

    fn page(path: &str, source: &str) -> Resource {
        Resource::file(
            UrlPath::new(path),
            UrlPath::new(path),
            PathBuf::from(source),
            &mime(),
        )
    }

    fn overlay(options: Value, locals: Value) -> Metadata {
        Metadata {
            options: options.as_object().cloned().unwrap_or_default(),
            locals: locals.as_object().cloned().unwrap_or_default(),
        }
    }

    #[test]
    fn test_file_resource() {
        let resource = page("/about-us/index.html", "source/about-us/index.html");

        assert!(!resource.is_proxy());
        assert_eq!(resource.proxy_target(), None);
        assert_eq!(
            resource.source_file(),
            Some(Path::new("source/about-us/index.html"))
        );
        assert_eq!(resource.content_type(), Some("text/html; charset=utf-8"));
    }

    #[test]
    fn test_proxy_resource() {
        let resource =
            Resource::proxy(UrlPath::new("/about/"), UrlPath::new("/about-us/index.html"), &mime())
                .unwrap();

        assert!(resource.is_proxy());
        assert_eq!(resource.proxy_target().unwrap(), "/about-us/index.html");
        assert_eq!(resource.destination(), "/about/");
        assert_eq!(resource.source_file(), None);
        // Directory path carries no extension, so no local content type
        assert_eq!(resource.content_type(), None);
    }

    #[test]
    fn test_proxy_to_self_rejected() {
        let err = Resource::proxy(UrlPath::new("/a.html"), UrlPath::new("a.html"), &mime())
            .unwrap_err();
        assert_eq!(
            err,
            ProxyError::SelfProxy {
                path: UrlPath::new("/a.html")
            }
        );
    }

    #[test]
    fn test_mark_proxy_to() {
        let mut resource = page("/old.html", "source/old.html");
        resource
            .mark_proxy_to(UrlPath::new("/new.html"))
            .unwrap();
        assert!(resource.is_proxy());
        assert_eq!(resource.source_file(), None);

        let err = resource.mark_proxy_to(UrlPath::new("/old.html")).unwrap_err();
        assert!(matches!(err, ProxyError::SelfProxy { .. }));
        // Failed mark keeps the previous target
        assert_eq!(resource.proxy_target().unwrap(), "/new.html");
    }

    #[test]
    fn test_explicit_content_type_option() {
        let mut resource =
            Resource::proxy(UrlPath::new("/feed/"), UrlPath::new("/feed.xml"), &mime()).unwrap();
        resource.apply_metadata(&overlay(
            json!({ "content_type": "application/rss+xml" }),
            json!({}),
        ));

        assert_eq!(resource.content_type(), Some("application/rss+xml"));
        assert_eq!(
            resource.metadata().options["content_type"],
            json!("application/rss+xml")
        );
    }

    #[test]
    fn test_metadata_merge_overlay_wins() {
        let mut base = overlay(json!({ "layout": "post" }), json!({ "title": "A", "n": 1 }));
        base.merge(&overlay(json!({}), json!({ "title": "B" })));

        assert_eq!(base.options["layout"], json!("post"));
        assert_eq!(base.locals["title"], json!("B"));
        assert_eq!(base.locals["n"], json!(1));
        assert!(!base.is_empty());
        assert!(Metadata::default().is_empty());
    }
}
