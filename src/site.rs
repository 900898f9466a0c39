//! The shared application instance.
//!
//! [`Site`] owns the mutable inputs of the sitemap (proxy registry, ignore
//! list, scanned resources) and the published [`ResourceGraph`]. Every
//! mutation rebuilds the graph from scratch and swaps it in atomically:
//!
//! ```text
//! declare_proxy / ignore / rescan
//!         │
//!         ▼
//!   state.lock() ──▶ ResourceGraph::build(base, synthesize(registry)) ──▶ graph.store()
//!
//! request thread: graph() ──▶ Arc<ResourceGraph> (one complete snapshot)
//! ```

use std::fmt;
use std::sync::Arc;

use anyhow::{Context, Result};
use arc_swap::ArcSwap;
use parking_lot::Mutex;

use crate::address::{
    IgnoreList, Options, ProxyConfiguration, ProxyError, ProxyRegistry, Resource, ResourceGraph,
    scan, synthesize,
};
use crate::config::SiteConfig;
use crate::core::UrlPath;
use crate::debug;
use crate::utils::mime::MimeTable;

/// Why the sitemap was rebuilt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RebuildReason {
    AddedProxy,
    Ignored,
    FileScan,
}

impl fmt::Display for RebuildReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::AddedProxy => "added_proxy",
            Self::Ignored => "ignored",
            Self::FileScan => "file_scan",
        };
        f.write_str(name)
    }
}

/// Inputs the graph is derived from.
#[derive(Debug, Default)]
struct SiteState {
    registry: ProxyRegistry,
    ignores: IgnoreList,
    base: Vec<Resource>,
}

pub struct Site {
    config: SiteConfig,
    mime: MimeTable,
    /// Serializes writers; held for the whole rebuild.
    state: Mutex<SiteState>,
    graph: ArcSwap<ResourceGraph>,
}

impl Site {
    /// Create an independent site for `config`, with an empty sitemap.
    ///
    /// Paths listed in `[build] ignore` are registered up front.
    pub fn new(config: SiteConfig) -> Self {
        let mut ignores = IgnoreList::new();
        for path in &config.build.ignore {
            ignores.ignore(UrlPath::new(path));
        }

        Self {
            config,
            mime: MimeTable::dev_server(),
            state: Mutex::new(SiteState {
                registry: ProxyRegistry::new(),
                ignores,
                base: Vec::new(),
            }),
            graph: ArcSwap::from_pointee(ResourceGraph::new()),
        }
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn mime(&self) -> &MimeTable {
        &self.mime
    }

    /// Declare `path` as a proxy of `target`.
    ///
    /// `opts.locals` becomes the render locals, a truthy `opts.ignore` hides
    /// the target from direct serving, every other key is a resource option.
    /// The target does not need to exist yet. Redeclaring a path replaces the
    /// previous declaration.
    ///
    /// Fails with [`ProxyError::SelfProxy`] when `path` and `target`
    /// normalize to the same path; the registry is left untouched.
    pub fn declare_proxy(&self, path: &str, target: &str, opts: Options) -> Result<(), ProxyError> {
        let (config, ignore_target) = ProxyConfiguration::from_options(path, target, opts);
        config.to_resource(&self.mime)?;

        let mut state = self.state.lock();
        if ignore_target {
            state.ignores.ignore(config.target.clone());
        }
        debug!("proxy"; "{} → {}", config.path, config.target);
        if state.registry.insert(config).is_some() {
            debug!("proxy"; "replaced previous declaration");
        }
        self.rebuild(&state, RebuildReason::AddedProxy)
    }

    /// Hide `path` from direct serving and live enumeration.
    pub fn ignore(&self, path: &str) -> Result<(), ProxyError> {
        let mut state = self.state.lock();
        if !state.ignores.ignore(UrlPath::new(path)) {
            return Ok(());
        }
        self.rebuild(&state, RebuildReason::Ignored)
    }

    /// Replace the scanned resources and rebuild.
    pub fn set_base_resources(&self, resources: Vec<Resource>) -> Result<(), ProxyError> {
        let mut state = self.state.lock();
        state.base = resources;
        self.rebuild(&state, RebuildReason::FileScan)
    }

    /// Scan the source directory and rebuild.
    pub fn rescan(&self) -> Result<(), ProxyError> {
        let resources = scan::scan_source(&self.config.source_dir(), &self.mime);
        self.set_base_resources(resources)
    }

    /// Declare every `[[proxy]]` entry of the configuration, in file order.
    pub fn apply_config_proxies(&self) -> Result<()> {
        for entry in &self.config.proxies {
            self.declare_proxy(&entry.path, &entry.target, entry.options.clone())
                .with_context(|| format!("invalid [[proxy]] `{}`", entry.path))?;
        }
        Ok(())
    }

    /// Current sitemap snapshot.
    pub fn graph(&self) -> Arc<ResourceGraph> {
        self.graph.load_full()
    }

    pub fn find_resource_by_destination_path(&self, path: &str) -> Option<Resource> {
        self.graph().find_by_destination(&UrlPath::new(path)).cloned()
    }

    pub fn find_resource_by_source_path(&self, path: &str) -> Option<Resource> {
        self.graph().find_by_path(&UrlPath::new(path)).cloned()
    }

    /// Rebuild from `state` and publish. Caller holds the state lock.
    fn rebuild(&self, state: &SiteState, reason: RebuildReason) -> Result<(), ProxyError> {
        let proxies = synthesize(state.registry.iter(), &self.mime)?;
        let graph = ResourceGraph::build(state.base.iter().cloned(), proxies, &state.ignores);

        debug!(
            "sitemap";
            "rebuilt ({}): {} resources, {} proxies, {} ignored",
            reason,
            graph.len(),
            graph.proxy_count(),
            graph.len() - graph.live().count()
        );

        self.graph.store(Arc::new(graph));
        Ok(())
    }
}
