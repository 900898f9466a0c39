//! Development server.
//!
//! ```text
//! tiny_http ──▶ rayon pool ──▶ RequestContext + graph snapshot ──▶ Handler ──▶ Response
//!                                                                     │
//!                         resolve.rs (classify) ◀─────────────────────┤
//!                         files.rs   (transport) ◀────────────────────┤
//!                         render     (templates) ◀────────────────────┘
//! ```

mod files;
mod lifecycle;
mod request;
mod resolve;
mod response;
mod watch;

use std::fs::File;
use std::io::{self, Cursor, Read, Seek, SeekFrom};
use std::sync::Arc;

use anyhow::{Context, Result};
use crossbeam::channel;
use tiny_http::{Header, Request, Server, StatusCode};

use files::DiskFiles;
use request::RequestContext;
use response::{Body, Handler, Response};

use crate::render::TemplateRenderer;
use crate::site::Site;
use crate::{debug, log};

/// Number of request worker threads.
const WORKER_THREADS: usize = 4;

/// Bind, serve until Ctrl+C, then stop the watcher.
pub fn serve_site(site: Arc<Site>) -> Result<()> {
    let serve = &site.config().serve;
    let (server, addr) = lifecycle::bind_with_retry(serve.interface, serve.port)?;
    let server = Arc::new(server);

    let (shutdown_tx, shutdown_rx) = channel::unbounded::<()>();
    lifecycle::register_shutdown(Arc::clone(&server), shutdown_tx)?;

    let watcher = if serve.watch {
        Some(watch::spawn(Arc::clone(&site), shutdown_rx)?)
    } else {
        None
    };

    log!("serve"; "http://{}", addr);
    run_request_loop(&server, &site)?;

    if let Some(handle) = watcher {
        let _ = handle.join();
    }
    Ok(())
}

fn run_request_loop(server: &Server, site: &Arc<Site>) -> Result<()> {
    // Use thread pool to handle requests concurrently
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(WORKER_THREADS)
        .build()
        .context("failed to create thread pool")?;

    for request in server.incoming_requests() {
        let site = Arc::clone(site);
        pool.spawn(move || {
            if let Err(e) = handle_request(request, &site) {
                log!("error"; "request error: {e:#}");
            }
        });
    }
    Ok(())
}

/// Handle a single HTTP request.
///
/// On error the request is dropped unanswered, which makes tiny_http reply 500.
fn handle_request(request: Request, site: &Site) -> Result<()> {
    let ctx = RequestContext::from_request(&request);
    let graph = site.graph();
    let handler = Handler::new(&TemplateRenderer, &DiskFiles, &site.config().build.index_file);

    let response = handler
        .handle(&graph, &ctx)
        .with_context(|| format!("{} {}", ctx.method, ctx.url))?;
    debug!("serve"; "{} {} -> {}", ctx.method, ctx.url, response.status);

    send(request, response)
}

/// Convert and send a [`Response`].
fn send(request: Request, response: Response) -> Result<()> {
    let status = StatusCode(response.status);
    let headers: Vec<Header> = response
        .headers()
        .iter()
        .filter_map(|(name, value)| Header::from_bytes(name.as_bytes(), value.as_bytes()).ok())
        .collect();

    match response.body {
        Body::Empty => {
            request.respond(tiny_http::Response::new(status, headers, io::empty(), Some(0), None))?;
        }
        Body::Bytes(bytes) => {
            let len = bytes.len();
            request.respond(tiny_http::Response::new(
                status,
                headers,
                Cursor::new(bytes),
                Some(len),
                None,
            ))?;
        }
        Body::File { path, offset, len } => {
            // Stream the requested span - no memory allocation for large files
            let mut file = File::open(&path)
                .with_context(|| format!("Failed to open {}", path.display()))?;
            file.seek(SeekFrom::Start(offset))?;
            request.respond(tiny_http::Response::new(
                status,
                headers,
                file.take(len),
                Some(len as usize),
                None,
            ))?;
        }
    }
    Ok(())
}
