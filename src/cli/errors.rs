//! CLI-specific error types

use thiserror::Error;

use crate::config::ConfigError;
use crate::server::ServerError;

/// Result type for CLI commands
pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to create tokio runtime: {0}")]
    Runtime(#[source] std::io::Error),

    #[error(transparent)]
    Server(#[from] ServerError),
}
