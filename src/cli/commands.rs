//! CLI command implementations

use std::path::Path;

use crate::config::ServerConfig;
use crate::server::HttpServer;

use super::args::Command;
use super::errors::{CliError, CliResult};

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve { config, port } => serve(&config, port),
        Command::Check { config } => check(&config),
    }
}

/// Load the config and serve it until the process is stopped
pub fn serve(config_path: &Path, port: Option<u16>) -> CliResult<()> {
    let mut config = ServerConfig::load(config_path)?;
    if let Some(port) = port {
        config.port = port;
    }

    let server = HttpServer::new(config);

    let rt = tokio::runtime::Runtime::new().map_err(CliError::Runtime)?;
    rt.block_on(server.start())?;

    Ok(())
}

/// Load and validate the config, then print a short summary
pub fn check(config_path: &Path) -> CliResult<()> {
    let config = ServerConfig::load(config_path)?;

    println!("config ok: {}", config_path.display());
    println!("  listen:  {}", config.socket_addr());
    println!("  path:    POST {}", config.path);
    println!("  rows:    {}", config.engine.rows.len());
    println!(
        "  limits:  default {}, max {}",
        config.engine.default_limit, config.engine.max_limit
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_check_valid_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tesoql.json");
        fs::write(&path, r#"{"path": "/query", "engine": {"rows": []}}"#).unwrap();

        assert!(check(&path).is_ok());
    }

    #[test]
    fn test_check_invalid_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tesoql.json");
        fs::write(&path, r#"{"path": "query"}"#).unwrap();

        assert!(matches!(check(&path), Err(CliError::Config(_))));
    }
}
