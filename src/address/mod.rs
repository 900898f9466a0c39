//! Site address space - the sitemap of every addressable resource.
//!
//! # Architecture
//!
//! ```text
//! source/ scan ──▶ base resources ─┐
//!                                  ├──▶ ResourceGraph (rebuilt on every change)
//! ProxyRegistry ──▶ synthesize() ──┘
//! ```
//!
//! # Module Structure
//!
//! - [`resource`]: [`Resource`] and its file/proxy variants
//! - [`proxy`]: [`ProxyConfiguration`], [`ProxyRegistry`], [`synthesize`]
//! - [`graph`]: [`ResourceGraph`] lookups by source and destination path
//! - [`ignore`]: [`IgnoreList`]
//! - [`scan`]: source directory scan

mod error;
mod graph;
mod ignore;
mod proxy;
mod resource;
pub mod scan;

pub use error::ProxyError;
pub use graph::ResourceGraph;
pub use ignore::IgnoreList;
pub use proxy::{ProxyConfiguration, ProxyRegistry, synthesize};
pub use resource::{Metadata, Options, Resource};
