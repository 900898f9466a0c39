//! Static file transport.
//!
//! Decides status and transport headers for a file on disk. The body is
//! left as a [`Body::File`] span, streamed by the server loop.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use anyhow::{Context, Result};

use super::request::RequestContext;
use super::response::{Body, Response};

pub trait StaticFiles: Send + Sync {
    fn serve(&self, path: &Path, request: &RequestContext) -> Result<Response>;
}

/// Serves files straight from the local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiskFiles;

impl StaticFiles for DiskFiles {
    fn serve(&self, path: &Path, request: &RequestContext) -> Result<Response> {
        let file_size = match fs::metadata(path) {
            Ok(meta) if meta.is_file() => meta.len(),
            Ok(_) => return Ok(Response::new(404)),
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Response::new(404)),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to stat {}", path.display()));
            }
        };

        // Check for Range header (video/audio seeking)
        if let Some(range) = request.range.as_deref() {
            return Ok(respond_range(path, file_size, range, request.is_head()));
        }

        let response = Response::new(200)
            .with_header("Accept-Ranges", "bytes")
            .with_header("Content-Length", file_size.to_string());

        if request.is_head() {
            return Ok(response);
        }
        Ok(response.with_body(Body::File {
            path: path.to_path_buf(),
            offset: 0,
            len: file_size,
        }))
    }
}

/// Build a 206 (or 416 when unsatisfiable) response for `range`.
fn respond_range(path: &Path, file_size: u64, range: &str, head: bool) -> Response {
    let Some((start, end)) = parse_range(range, file_size) else {
        return Response::new(416).with_header("Content-Range", format!("bytes */{file_size}"));
    };

    let length = end - start + 1;
    let response = Response::new(206)
        .with_header("Content-Range", format!("bytes {start}-{end}/{file_size}"))
        .with_header("Accept-Ranges", "bytes")
        .with_header("Content-Length", length.to_string());

    if head {
        return response;
    }
    response.with_body(Body::File {
        path: path.to_path_buf(),
        offset: start,
        len: length,
    })
}

/// Parse a `bytes=start-end` header value into an inclusive byte span.
///
/// Malformed values cover the whole file; spans outside the file are `None`.
fn parse_range(range: &str, file_size: u64) -> Option<(u64, u64)> {
    if file_size == 0 {
        return None;
    }
    let last = file_size - 1;

    let range = range.trim();
    let range = range.strip_prefix("bytes=").unwrap_or(range);
    // Only the first span of a multi-range request is served
    let range = range.split(',').next().unwrap_or_default().trim();
    let parts: Vec<&str> = range.split('-').collect();

    let (start, end) = match parts.as_slice() {
        // "0-499" - specific range
        [s, e] if !s.is_empty() && !e.is_empty() => {
            let start: u64 = s.trim().parse().unwrap_or(0);
            let end: u64 = e.trim().parse().unwrap_or(last);
            (start, end.min(last))
        }
        // "0-" - from start to end
        [s, ""] if !s.is_empty() => {
            let start: u64 = s.trim().parse().unwrap_or(0);
            (start, last)
        }
        // "-500" - last 500 bytes
        ["", e] if !e.is_empty() => {
            let suffix: u64 = e.trim().parse().unwrap_or(0);
            if suffix == 0 {
                return None;
            }
            (file_size.saturating_sub(suffix), last)
        }
        _ => (0, last),
    };

    (start <= end).then_some((start, end))
}
