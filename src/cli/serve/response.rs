//! Response construction.
//!
//! Every request ends in exactly one [`Response`] value, produced by the
//! first terminal branch of [`Handler::handle`]:
//!
//! | Resolution | Response                                             |
//! |------------|------------------------------------------------------|
//! | NotFound   | 404, HTML body naming the path                       |
//! | Binary     | transport status, gzip for `.svgz`/`.gz`, file body  |
//! | Render     | 200 with rendered bytes, or 500 if template missing  |

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::files::StaticFiles;
use super::request::RequestContext;
use super::resolve::{RequestResolver, Resolution};
use crate::address::{Resource, ResourceGraph};
use crate::core::UrlPath;
use crate::render::{RenderContext, RenderError, Renderer};
use crate::utils::html::escape;
use crate::utils::mime::types::{HTML, OCTET_STREAM, PLAIN};

/// Extensions served pre-compressed.
const GZIP_EXTENSIONS: &[&str] = &["svgz", "gz"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    Empty,
    Bytes(Vec<u8>),
    /// `len` bytes of `path` starting at `offset`.
    File { path: PathBuf, offset: u64, len: u64 },
}

#[derive(Debug, Clone)]
pub struct Response {
    pub status: u16,
    headers: Vec<(String, String)>,
    pub body: Body,
}

impl Response {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Body::Empty,
        }
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_header(name, value);
        self
    }

    pub fn with_body(mut self, body: Body) -> Self {
        self.body = body;
        self
    }

    /// Set a header, replacing any existing value (names are case-insensitive).
    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        self.remove_header(name);
        self.headers.push((name.to_string(), value.into()));
    }

    pub fn remove_header(&mut self, name: &str) {
        self.headers.retain(|(key, _)| !key.eq_ignore_ascii_case(name));
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Whether this status may carry a `Content-Type` header.
    pub fn allows_content_type(&self) -> bool {
        !matches!(self.status, 100..=199 | 204 | 205 | 304)
    }
}

/// 404 for `path`.
pub fn not_found(path: &UrlPath) -> Response {
    let body = format!(
        "<html><body><h1>File Not Found</h1><p>{}</p></body></html>",
        escape(path.as_str())
    );
    Response::new(404)
        .with_header("Content-Type", HTML)
        .with_body(Body::Bytes(body.into_bytes()))
}

/// Builds responses for classified resources.
pub struct ResponseBuilder<'a> {
    graph: &'a ResourceGraph,
    renderer: &'a dyn Renderer,
    files: &'a dyn StaticFiles,
}

impl<'a> ResponseBuilder<'a> {
    pub fn new(
        graph: &'a ResourceGraph,
        renderer: &'a dyn Renderer,
        files: &'a dyn StaticFiles,
    ) -> Self {
        Self {
            graph,
            renderer,
            files,
        }
    }

    /// Stream the resource's source file through the transport.
    pub fn binary(&self, resource: &Resource, request: &RequestContext) -> Result<Response> {
        let source = resource.effective_source_file(self.graph)?;
        let mut response = self.files.serve(source, request)?;

        if is_precompressed(resource, source) {
            response.set_header("Content-Encoding", "gzip");
        }

        if response.allows_content_type() {
            let content_type = resource
                .effective_content_type(self.graph)?
                .unwrap_or(OCTET_STREAM);
            response.set_header("Content-Type", content_type);
        } else {
            response.remove_header("Content-Type");
        }

        Ok(response)
    }

    /// Render the resource. A missing template becomes a 500; other
    /// renderer failures are returned as errors.
    pub fn render(&self, resource: &Resource) -> Result<Response> {
        let content_type = resource
            .effective_content_type(self.graph)?
            .unwrap_or(PLAIN)
            .to_string();
        let source = resource.effective_source_file(self.graph)?;
        let ctx = RenderContext {
            resource,
            source,
            metadata: resource.effective_metadata(self.graph)?,
        };

        match self.renderer.render(&ctx) {
            Ok(body) => Ok(Response::new(200)
                .with_header("Content-Type", content_type)
                .with_body(Body::Bytes(body))),
            Err(RenderError::TemplateNotFound(message)) => {
                crate::log!("error"; "{}", message);
                Ok(Response::new(500)
                    .with_header("Content-Type", PLAIN)
                    .with_body(Body::Bytes(message.into_bytes())))
            }
            Err(e) => Err(e).with_context(|| format!("failed to render {}", resource.path())),
        }
    }
}

fn is_precompressed(resource: &Resource, source: &Path) -> bool {
    let ext = resource.destination().extension().or_else(|| {
        source
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
    });
    ext.is_some_and(|ext| GZIP_EXTENSIONS.contains(&ext.as_str()))
}

/// Request entry point: one request in, one response out.
pub struct Handler<'a> {
    renderer: &'a dyn Renderer,
    files: &'a dyn StaticFiles,
    index_file: &'a str,
}

impl<'a> Handler<'a> {
    pub fn new(renderer: &'a dyn Renderer, files: &'a dyn StaticFiles, index_file: &'a str) -> Self {
        Self {
            renderer,
            files,
            index_file,
        }
    }

    pub fn handle(&self, graph: &ResourceGraph, request: &RequestContext) -> Result<Response> {
        let path = request.path();
        let resolver = RequestResolver::new(graph, self.renderer, self.index_file);
        let builder = ResponseBuilder::new(graph, self.renderer, self.files);

        match resolver.resolve(&path)? {
            Resolution::NotFound(path) => Ok(not_found(&path)),
            Resolution::Binary(resource) => builder.binary(resource, request),
            Resolution::Render(resource) => builder.render(resource),
        }
    }
}
