//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Resource graph and development server for static sites
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: sitegraph.toml)
    #[arg(short = 'C', long, global = true, default_value = "sitegraph.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the development server
    #[command(visible_alias = "s")]
    Serve {
        /// Network interface to bind (e.g., 127.0.0.1, 0.0.0.0)
        #[arg(short, long)]
        interface: Option<std::net::IpAddr>,

        /// Port number to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Rescan the source directory on file changes
        #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
        watch: Option<bool>,
    },

    /// Print every resource in the sitemap
    #[command(visible_alias = "l")]
    List,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_version_flag_is_separate_from_verbose() {
        let err = Cli::try_parse_from(["sitegraph", "-V"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);

        let cli = Cli::parse_from(["sitegraph", "list", "--verbose"]);
        assert!(cli.verbose);
    }

    #[test]
    fn test_parse_serve() {
        let cli = Cli::parse_from(["sitegraph", "-v", "serve", "--port", "8080", "--watch", "false"]);
        assert!(cli.verbose);
        assert_eq!(cli.config, PathBuf::from("sitegraph.toml"));
        match cli.command {
            Commands::Serve {
                interface,
                port,
                watch,
            } => {
                assert_eq!(interface, None);
                assert_eq!(port, Some(8080));
                assert_eq!(watch, Some(false));
            }
            Commands::List => panic!("expected serve"),
        }
    }

    #[test]
    fn test_parse_list_with_config() {
        let cli = Cli::parse_from(["sitegraph", "list", "-C", "site/custom.toml"]);
        assert!(matches!(cli.command, Commands::List));
        assert_eq!(cli.config, PathBuf::from("site/custom.toml"));
    }

    #[test]
    fn test_watch_flag_without_value() {
        let cli = Cli::parse_from(["sitegraph", "serve", "-w"]);
        assert!(matches!(cli.command, Commands::Serve { watch: Some(true), .. }));
    }
}
