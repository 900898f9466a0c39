//! ResourceGraph - the rebuilt-from-scratch sitemap.
//!
//! Built in one pass from the scanned resources followed by the synthesized
//! proxies. A later resource with the same source path replaces the earlier
//! one in place, so a proxy shadows a scanned file at its address and the
//! registry's last declaration wins.

use rustc_hash::FxHashMap;

use crate::core::UrlPath;

use super::{IgnoreList, Resource};

#[derive(Debug, Default)]
pub struct ResourceGraph {
    resources: Vec<Resource>,
    /// Source path -> index into `resources`
    by_path: FxHashMap<UrlPath, usize>,
    /// Destination path -> index into `resources`
    by_destination: FxHashMap<UrlPath, usize>,
}

impl ResourceGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from `base` followed by `proxies`, marking ignored entries.
    pub fn build(
        base: impl IntoIterator<Item = Resource>,
        proxies: impl IntoIterator<Item = Resource>,
        ignores: &IgnoreList,
    ) -> Self {
        let mut resources: Vec<Resource> = Vec::new();
        let mut by_path = FxHashMap::default();

        for mut resource in base.into_iter().chain(proxies) {
            resource.ignored = ignores.matches(&resource);
            match by_path.get(resource.path()) {
                Some(&index) => resources[index] = resource,
                None => {
                    by_path.insert(resource.path().clone(), resources.len());
                    resources.push(resource);
                }
            }
        }

        // Two sources can still share a destination (`a.md` and `a.html`);
        // the later one owns it.
        let by_destination = resources
            .iter()
            .enumerate()
            .map(|(index, resource)| (resource.destination().clone(), index))
            .collect();

        Self {
            resources,
            by_path,
            by_destination,
        }
    }

    pub fn find_by_path(&self, path: &UrlPath) -> Option<&Resource> {
        self.by_path.get(path).map(|&index| &self.resources[index])
    }

    pub fn find_by_destination(&self, path: &UrlPath) -> Option<&Resource> {
        self.by_destination
            .get(path)
            .map(|&index| &self.resources[index])
    }

    /// All resources in build order, ignored ones included.
    pub fn iter(&self) -> impl Iterator<Item = &Resource> {
        self.resources.iter()
    }

    /// Resources that are not ignored.
    pub fn live(&self) -> impl Iterator<Item = &Resource> {
        self.resources.iter().filter(|r| !r.is_ignored())
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    pub fn proxy_count(&self) -> usize {
        self.resources.iter().filter(|r| r.is_proxy()).count()
    }

    /// Dump the sitemap for debugging.
    pub fn dump(&self) -> String {
        use std::fmt::Write;
        let mut output = String::new();

        let mut sorted: Vec<_> = self.resources.iter().collect();
        sorted.sort_by_key(|r| r.destination());

        writeln!(output, "=== Resources ({}) ===", self.len()).ok();
        for resource in sorted {
            let origin = match (resource.source_file(), resource.proxy_target()) {
                (Some(source), _) => source.display().to_string(),
                (None, Some(target)) => format!("proxy → {target}"),
                (None, None) => String::new(),
            };
            let flag = if resource.is_ignored() { " (ignored)" } else { "" };
            writeln!(output, "  {} ← {}{}", resource.destination(), origin, flag).ok();
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use serde_json::json;

    use super::*;
    use crate::address::{Metadata, ProxyConfiguration, ProxyError};
    use crate::utils::mime::MimeTable;

    fn file(path: &str) -> Resource {
        let mime = MimeTable::dev_server();
        let url = UrlPath::new(path);
        let destination = match url.extension().as_deref() {
            Some("md") => url.with_extension("html"),
            _ => url.clone(),
        };
        Resource::file(url, destination, PathBuf::from(format!("source{path}")), &mime)
    }

    fn proxy(path: &str, target: &str) -> Resource {
        Resource::proxy(UrlPath::new(path), UrlPath::new(target), &MimeTable::dev_server())
            .unwrap()
    }

    #[test]
    fn test_lookup_by_path_and_destination() {
        let graph = ResourceGraph::build(
            [file("/index.html"), file("/posts/a.md")],
            [],
            &IgnoreList::new(),
        );

        assert_eq!(graph.len(), 2);
        let post = graph.find_by_destination(&UrlPath::new("/posts/a.html")).unwrap();
        assert_eq!(post.path(), "/posts/a.md");
        assert!(graph.find_by_path(&UrlPath::new("/posts/a.md")).is_some());
        assert!(graph.find_by_path(&UrlPath::new("/posts/a.html")).is_none());
        assert!(graph.find_by_destination(&UrlPath::new("/missing.html")).is_none());
    }

    #[test]
    fn test_proxy_shadows_scanned_file() {
        let graph = ResourceGraph::build(
            [file("/old.html"), file("/new.html")],
            [proxy("/old.html", "/new.html")],
            &IgnoreList::new(),
        );

        assert_eq!(graph.len(), 2);
        let old = graph.find_by_destination(&UrlPath::new("/old.html")).unwrap();
        assert!(old.is_proxy());
        // Replacement keeps the original position
        assert_eq!(graph.iter().next().unwrap().path(), "/old.html");
    }

    #[test]
    fn test_ignored_resources_stay_indexed() {
        let ignores: IgnoreList = [UrlPath::new("/about-us/index.html")].into_iter().collect();
        let graph = ResourceGraph::build(
            [file("/about-us/index.html"), file("/index.html")],
            [proxy("/about/", "/about-us/index.html")],
            &ignores,
        );

        let target = graph.find_by_path(&UrlPath::new("/about-us/index.html")).unwrap();
        assert!(target.is_ignored());
        assert_eq!(graph.live().count(), 2);
        assert_eq!(graph.proxy_count(), 1);
    }

    #[test]
    fn test_resolve_proxy_target() {
        let graph = ResourceGraph::build(
            [file("/about-us/index.html")],
            [
                proxy("/about/", "/about-us/index.html"),
                proxy("/team/", "/about/"),
                proxy("/gone/", "/nowhere.html"),
            ],
            &IgnoreList::new(),
        );

        let about = graph.find_by_path(&UrlPath::new("/about/")).unwrap();
        let target = about.resolve_proxy_target(&graph).unwrap().unwrap();
        assert_eq!(target.path(), "/about-us/index.html");
        assert_eq!(
            about.effective_source_file(&graph).unwrap(),
            PathBuf::from("source/about-us/index.html")
        );

        let team = graph.find_by_path(&UrlPath::new("/team/")).unwrap();
        assert_eq!(
            team.resolve_proxy_target(&graph).unwrap_err(),
            ProxyError::ChainedProxy {
                path: UrlPath::new("/team/"),
                target: UrlPath::new("/about/"),
            }
        );
        assert!(team.effective_source_file(&graph).is_err());

        let gone = graph.find_by_path(&UrlPath::new("/gone/")).unwrap();
        assert!(matches!(
            gone.resolve_proxy_target(&graph),
            Err(ProxyError::UnknownTarget { .. })
        ));

        let plain = graph.find_by_path(&UrlPath::new("/about-us/index.html")).unwrap();
        assert!(plain.resolve_proxy_target(&graph).unwrap().is_none());
    }

    #[test]
    fn test_proxy_target_by_destination() {
        let graph = ResourceGraph::build(
            [file("/about-us/index.md")],
            [
                proxy("/about/", "/about-us/index.html"),
                proxy("/raw/", "/about-us/index.md"),
            ],
            &IgnoreList::new(),
        );

        let about = graph.find_by_path(&UrlPath::new("/about/")).unwrap();
        assert_eq!(
            about.effective_source_file(&graph).unwrap(),
            PathBuf::from("source/about-us/index.md")
        );

        let raw = graph.find_by_path(&UrlPath::new("/raw/")).unwrap();
        let target = raw.resolve_proxy_target(&graph).unwrap().unwrap();
        assert_eq!(target.path(), "/about-us/index.md");
    }

    #[test]
    fn test_effective_content_type() {
        let mime = MimeTable::dev_server();
        let inherits = ProxyConfiguration::new("/about/", "/about-us/index.html", Metadata::default());
        let (explicit, _) = ProxyConfiguration::from_options(
            "/about.txt",
            "/about-us/index.html",
            json!({ "content_type": "text/markdown" }).as_object().cloned().unwrap(),
        );
        let by_extension = ProxyConfiguration::new("/about.txt", "/about-us/index.html", Metadata::default());

        let graph = ResourceGraph::build(
            [file("/about-us/index.html"), file("/LICENSE")],
            [
                inherits.to_resource(&mime).unwrap(),
                explicit.to_resource(&mime).unwrap(),
            ],
            &IgnoreList::new(),
        );

        let about = graph.find_by_path(&inherits.path).unwrap();
        assert_eq!(
            about.effective_content_type(&graph).unwrap(),
            Some("text/html; charset=utf-8")
        );

        let own = graph.find_by_path(&explicit.path).unwrap();
        assert_eq!(own.effective_content_type(&graph).unwrap(), Some("text/markdown"));

        // Extension wins over the target too
        let resource = by_extension.to_resource(&mime).unwrap();
        assert_eq!(
            resource.effective_content_type(&graph).unwrap(),
            Some("text/plain; charset=utf-8")
        );

        let license = graph.find_by_path(&UrlPath::new("/LICENSE")).unwrap();
        assert_eq!(license.effective_content_type(&graph).unwrap(), None);
    }

    #[test]
    fn test_effective_metadata_overlays_target() {
        let mime = MimeTable::dev_server();
        let mut target = file("/about-us/index.html");
        target.apply_metadata(&Metadata {
            options: Default::default(),
            locals: json!({ "title": "About us", "lang": "en" }).as_object().cloned().unwrap(),
        });
        let (config, _) = ProxyConfiguration::from_options(
            "/about/",
            "/about-us/index.html",
            json!({ "locals": { "title": "About" } }).as_object().cloned().unwrap(),
        );

        let graph = ResourceGraph::build(
            [target],
            [config.to_resource(&mime).unwrap()],
            &IgnoreList::new(),
        );
        let about = graph.find_by_path(&config.path).unwrap();
        let metadata = about.effective_metadata(&graph).unwrap();
        assert_eq!(metadata.locals["title"], json!("About"));
        assert_eq!(metadata.locals["lang"], json!("en"));
    }

    #[test]
    fn test_dump() {
        let ignores: IgnoreList = [UrlPath::new("/secret.html")].into_iter().collect();
        let graph = ResourceGraph::build(
            [file("/index.html"), file("/secret.html")],
            [proxy("/s/", "/secret.html")],
            &ignores,
        );

        let dump = graph.dump();
        assert!(dump.contains("Resources (3)"));
        assert!(dump.contains("/s/ ← proxy → /secret.html"));
        assert!(dump.contains("/secret.html ← source/secret.html (ignored)"));
    }
}
