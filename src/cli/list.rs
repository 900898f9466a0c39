//! `list` command: print the sitemap.

use std::io::{Write, stdout};

use anyhow::Result;

use crate::log;
use crate::site::Site;

pub fn list_resources(site: &Site) -> Result<()> {
    let graph = site.graph();
    if graph.is_empty() {
        log!("list"; "no resources under {}", site.config().source_dir().display());
    }
    let dump = graph.dump();
    let mut stdout = stdout().lock();
    stdout.write_all(dump.as_bytes())?;
    stdout.flush()?;
    Ok(())
}
