//! Source directory watcher.
//!
//! ```text
//! notify ──▶ channel ──▶ debounce (quiet for DEBOUNCE_MS) ──▶ Site::rescan()
//! ```

use std::path::Path;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::{Context, Result};
use crossbeam::channel::{self, Receiver, RecvTimeoutError};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};

use crate::site::Site;
use crate::{debug, log, logger};

/// Quiet period before a batch of changes triggers a rescan.
const DEBOUNCE_MS: u64 = 300;

/// Check if path is a temp/backup file (editor artifacts)
fn is_temp_file(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    matches!(ext, "bck" | "bak" | "backup" | "swp" | "swo" | "tmp")
        || name.ends_with('~')
        || name.starts_with('.')
}

/// Whether an event can change the set of scanned resources.
fn is_relevant(event: &notify::Event) -> bool {
    use notify::EventKind;

    let structural = match event.kind {
        EventKind::Create(_) | EventKind::Remove(_) => true,
        // Renames move resources; content edits are picked up at render time
        EventKind::Modify(notify::event::ModifyKind::Name(_)) => true,
        _ => false,
    };
    structural && event.paths.iter().any(|p| !is_temp_file(p))
}

/// Watch the source directory and rescan `site` after each burst of changes.
///
/// The watcher stops when `shutdown` receives a message or disconnects.
pub fn spawn(site: Arc<Site>, shutdown: Receiver<()>) -> Result<JoinHandle<()>> {
    let source_dir = site.config().source_dir();
    let (event_tx, event_rx) = channel::unbounded();

    let mut watcher = notify::recommended_watcher(move |res| {
        let _ = event_tx.send(res);
    })
    .context("failed to create file watcher")?;
    watcher
        .watch(&source_dir, RecursiveMode::Recursive)
        .with_context(|| format!("failed to watch {}", source_dir.display()))?;

    debug!("watch"; "watching {}", source_dir.display());

    Ok(thread::spawn(move || run(watcher, &site, &event_rx, &shutdown)))
}

fn run(
    _watcher: RecommendedWatcher,
    site: &Site,
    events: &Receiver<notify::Result<notify::Event>>,
    shutdown: &Receiver<()>,
) {
    loop {
        crossbeam::select! {
            recv(shutdown) -> _ => return,
            recv(events) -> msg => match msg {
                Ok(Ok(event)) if is_relevant(&event) => {
                    debug!("watch"; "event {:?}: {:?}", event.kind, event.paths);
                    if !drain_until_quiet(events) {
                        return;
                    }
                    rescan(site);
                }
                Ok(Ok(_)) => {}
                Ok(Err(e)) => log!("watch"; "notify error: {}", e),
                Err(_) => return,
            },
        }
    }
}

/// Swallow events until none arrive for `DEBOUNCE_MS`.
///
/// Returns `false` if the event channel disconnected.
fn drain_until_quiet(events: &Receiver<notify::Result<notify::Event>>) -> bool {
    loop {
        match events.recv_timeout(Duration::from_millis(DEBOUNCE_MS)) {
            Ok(_) => continue,
            Err(RecvTimeoutError::Timeout) => return true,
            Err(RecvTimeoutError::Disconnected) => return false,
        }
    }
}

fn rescan(site: &Site) {
    match site.rescan() {
        Ok(()) => {
            let graph = site.graph();
            logger::status_success(&format!("rescanned: {} resources", graph.len()));
        }
        Err(e) => logger::status_error("rescan failed", &e.to_string()),
    }
}
