//! Proxy configuration errors.
//!
//! All variants are configuration mistakes: they abort the operation that
//! triggered them and are never downgraded to a missing page.

use thiserror::Error;

use crate::core::UrlPath;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProxyError {
    #[error("proxy `{path}` cannot point at itself")]
    SelfProxy { path: UrlPath },

    #[error("proxy `{path}` points at `{target}`, which does not exist in the sitemap")]
    UnknownTarget { path: UrlPath, target: UrlPath },

    #[error("proxy `{path}` points at `{target}`, which is itself a proxy")]
    ChainedProxy { path: UrlPath, target: UrlPath },
}
