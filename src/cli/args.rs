//! CLI argument definitions using clap
//!
//! Commands:
//! - dakia init --config <path>
//! - dakia serve --config <path> [--port <port>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// DAKIA Academy - course catalog and training API
#[derive(Parser, Debug)]
#[command(name = "dakia")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Create the data directory layout
    Init {
        /// Path to configuration file
        #[arg(long, default_value = "./dakia.json")]
        config: PathBuf,
    },

    /// Open the store and serve the HTTP API
    Serve {
        /// Path to configuration file
        #[arg(long, default_value = "./dakia.json")]
        config: PathBuf,

        /// Overrides the configured port
        #[arg(long)]
        port: Option<u16>,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serve_defaults() {
        let cli = Cli::try_parse_from(["dakia", "serve"]).unwrap();
        assert_eq!(
            cli.command,
            Command::Serve {
                config: PathBuf::from("./dakia.json"),
                port: None
            }
        );
    }

    #[test]
    fn test_serve_port_override() {
        let cli = Cli::try_parse_from(["dakia", "serve", "--port", "8080", "--config", "/etc/dakia.json"])
            .unwrap();
        assert_eq!(
            cli.command,
            Command::Serve {
                config: PathBuf::from("/etc/dakia.json"),
                port: Some(8080)
            }
        );
    }

    #[test]
    fn test_unknown_command_rejected() {
        assert!(Cli::try_parse_from(["dakia", "query"]).is_err());
    }
}
