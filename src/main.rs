//! sitegraph - resource graph and development server for static sites.

mod address;
mod cli;
mod config;
mod core;
mod logger;
mod render;
mod site;
mod utils;

use std::sync::Arc;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::SiteConfig;
use site::Site;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = SiteConfig::load(&cli)?;
    let site = Arc::new(Site::new(config));

    // Proxies first: declarations may name targets the scan has not produced yet
    site.apply_config_proxies()?;
    site.rescan()?;

    match &cli.command {
        Commands::Serve { .. } => cli::serve::serve_site(site),
        Commands::List => cli::list::list_resources(&site),
    }
}
