//! Proxy declarations.
//!
//! A proxy serves an existing resource's content at a second address, with
//! its own metadata overlay:
//!
//! ```text
//! declare_proxy("/about/", "/about-us/index.html", { locals: { title: "About" } })
//!
//! /about/  ──proxy──▶  /about-us/index.html  ◀── source/about-us/index.html
//! ```
//!
//! [`ProxyRegistry`] only stores declarations. Whether a target exists is
//! checked when the sitemap is queried, since proxies may be declared before
//! the source scan has run.

use std::hash::{Hash, Hasher};

use serde_json::Value;

use crate::core::UrlPath;
use crate::utils::mime::MimeTable;

use super::{Metadata, Options, ProxyError, Resource};

/// Option key holding render locals.
const LOCALS_KEY: &str = "locals";
/// Option key asking for the target to be ignored.
const IGNORE_KEY: &str = "ignore";

/// One proxy declaration. Identity is the proxy's `path` alone.
#[derive(Debug, Clone)]
pub struct ProxyConfiguration {
    pub path: UrlPath,
    pub target: UrlPath,
    pub metadata: Metadata,
}

impl ProxyConfiguration {
    pub fn new(path: &str, target: &str, metadata: Metadata) -> Self {
        Self {
            path: UrlPath::new(path),
            target: UrlPath::new(target),
            metadata,
        }
    }

    /// Build a configuration from a raw option table.
    ///
    /// `locals` (a table) becomes the render locals, `ignore` is removed and
    /// returned as the second element, every other key is kept as an option.
    pub fn from_options(path: &str, target: &str, mut opts: Options) -> (Self, bool) {
        let ignore = opts.remove(IGNORE_KEY).is_some_and(|v| is_truthy(&v));
        let locals = match opts.remove(LOCALS_KEY) {
            Some(Value::Object(locals)) => locals,
            Some(Value::Null) | None => Options::new(),
            Some(other) => {
                crate::debug!("proxy"; "ignoring non-table locals for `{}`: {}", path, other);
                Options::new()
            }
        };
        let metadata = Metadata {
            options: opts,
            locals,
        };
        (Self::new(path, target, metadata), ignore)
    }

    /// Build the proxy resource this configuration describes.
    pub fn to_resource(&self, mime: &MimeTable) -> Result<Resource, ProxyError> {
        let mut resource = Resource::proxy(self.path.clone(), self.target.clone(), mime)?;
        resource.apply_metadata(&self.metadata);
        Ok(resource)
    }
}

impl PartialEq for ProxyConfiguration {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Eq for ProxyConfiguration {}

impl Hash for ProxyConfiguration {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.path.hash(state);
    }
}

/// Anything but `null` and `false` counts as set.
fn is_truthy(value: &Value) -> bool {
    !matches!(value, Value::Null | Value::Bool(false))
}

/// Ordered set of proxy declarations keyed by path.
#[derive(Debug, Clone, Default)]
pub struct ProxyRegistry {
    entries: Vec<ProxyConfiguration>,
}

impl ProxyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a declaration, replacing any declaration with the same path.
    ///
    /// The newest declaration always takes the last position. Returns the
    /// replaced declaration, if any.
    pub fn insert(&mut self, config: ProxyConfiguration) -> Option<ProxyConfiguration> {
        let replaced = self
            .entries
            .iter()
            .position(|existing| *existing == config)
            .map(|index| self.entries.remove(index));
        self.entries.push(config);
        replaced
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProxyConfiguration> {
        self.entries.iter()
    }
}

/// Create one proxy resource per configuration, in iteration order.
pub fn synthesize<'a>(
    configs: impl IntoIterator<Item = &'a ProxyConfiguration>,
    mime: &MimeTable,
) -> Result<Vec<Resource>, ProxyError> {
    configs
        .into_iter()
        .map(|config| config.to_resource(mime))
        .collect()
}
