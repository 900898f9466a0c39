//! Request path → resource classification.
//!
//! ```text
//! decode ──▶ lookup by destination ──▶ classify
//!                 │                       ├── NotFound   (absent or ignored)
//!                 └── dir/ + index_file   ├── Binary     (streamed as-is)
//!                                         └── Render     (renderer output)
//! ```

use crate::address::{ProxyError, Resource, ResourceGraph};
use crate::core::UrlPath;
use crate::render::Renderer;

/// Terminal classification of one request.
#[derive(Debug)]
pub enum Resolution<'g> {
    NotFound(UrlPath),
    Binary(&'g Resource),
    Render(&'g Resource),
}

pub struct RequestResolver<'a> {
    graph: &'a ResourceGraph,
    renderer: &'a dyn Renderer,
    index_file: &'a str,
}

impl<'a> RequestResolver<'a> {
    pub fn new(graph: &'a ResourceGraph, renderer: &'a dyn Renderer, index_file: &'a str) -> Self {
        Self {
            graph,
            renderer,
            index_file,
        }
    }

    /// Classify the resource served at `path`.
    ///
    /// Broken proxies (dangling or chained targets) are errors, not misses.
    pub fn resolve(&self, path: &UrlPath) -> Result<Resolution<'a>, ProxyError> {
        let Some(resource) = self.lookup(path) else {
            return Ok(Resolution::NotFound(path.clone()));
        };
        if resource.is_ignored() {
            return Ok(Resolution::NotFound(path.clone()));
        }

        let source = resource.effective_source_file(self.graph)?;
        if self.renderer.is_renderable(source) {
            Ok(Resolution::Render(resource))
        } else {
            Ok(Resolution::Binary(resource))
        }
    }

    /// Exact destination match, then the index file below `path`.
    fn lookup(&self, path: &UrlPath) -> Option<&'a Resource> {
        self.graph
            .find_by_destination(path)
            .or_else(|| self.graph.find_by_destination(&path.join_index(self.index_file)))
    }
}
