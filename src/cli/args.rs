//! CLI argument definitions using clap
//!
//! Commands:
//! - tesoql-axum serve --config <path> [--port <port>]
//! - tesoql-axum check --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Serve a TesoQL query endpoint over HTTP
#[derive(Parser, Debug)]
#[command(name = "tesoql-axum")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP server
    Serve {
        /// Path to configuration file
        #[arg(long, default_value = "./tesoql.json")]
        config: PathBuf,

        /// Override the configured port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Validate a configuration file and exit
    Check {
        /// Path to configuration file
        #[arg(long, default_value = "./tesoql.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve_with_port() {
        let cli = Cli::try_parse_from([
            "tesoql-axum",
            "serve",
            "--config",
            "x.json",
            "--port",
            "9000",
        ])
        .unwrap();
        match cli.command {
            Command::Serve { config, port } => {
                assert_eq!(config, PathBuf::from("x.json"));
                assert_eq!(port, Some(9000));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_check_default_config_path() {
        let cli = Cli::try_parse_from(["tesoql-axum", "check"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Check { config } if config == PathBuf::from("./tesoql.json")
        ));
    }
}
