//! CLI module for the demo server
//!
//! Provides command-line interface for:
//! - serve: Load a config file and serve the query endpoint
//! - check: Validate a config file

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command};
pub use commands::{check, run, run_command, serve};
pub use errors::{CliError, CliResult};
