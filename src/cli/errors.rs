//! CLI error types

use thiserror::Error;

use crate::store::StartupError;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Errors surfaced by the CLI entry point
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Startup(#[from] StartupError),

    #[error("runtime error: {0}")]
    Runtime(String),

    #[error("server error: {0}")]
    Server(String),
}
