//! Rendering collaborator.
//!
//! The request pipeline only needs to know two things from a renderer:
//! whether a source file is a template, and how to turn it into bytes.
//! [`TemplateRenderer`] is the built-in implementation.

mod template;

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::address::{Metadata, Options, Resource};

pub use template::TemplateRenderer;

/// Everything a renderer gets for one page.
#[derive(Debug)]
pub struct RenderContext<'a> {
    /// The requested resource (a proxy when served through one).
    pub resource: &'a Resource,
    /// Source file to render, after following any proxy link.
    pub source: &'a Path,
    /// Target metadata overlaid by the requested resource's own.
    pub metadata: Metadata,
}

impl RenderContext<'_> {
    pub fn locals(&self) -> &Options {
        &self.metadata.locals
    }
}

#[derive(Debug, Error)]
pub enum RenderError {
    /// The template file could not be located. Reported to the client as a 500.
    #[error("{0}")]
    TemplateNotFound(String),

    #[error("undefined local `{name}` in {}", path.display())]
    UndefinedLocal { name: String, path: PathBuf },

    #[error("failed to read template {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub trait Renderer: Send + Sync {
    /// Whether `source` is rendered (as opposed to streamed as-is).
    fn is_renderable(&self, source: &Path) -> bool;

    fn render(&self, ctx: &RenderContext<'_>) -> Result<Vec<u8>, RenderError>;
}
