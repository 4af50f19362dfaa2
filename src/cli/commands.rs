//! CLI command execution
//!
//! `run` is the whole program: parse flags, initialize logging, wire the
//! backends, serve. A startup failure aborts before the listener binds.

use tracing_subscriber::EnvFilter;

use super::args::Cli;
use super::errors::{CliError, CliResult};
use crate::http_server::HttpServer;

/// Parse flags and run the server until shutdown.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    init_tracing();

    let config = cli.server_config();
    let runtime =
        tokio::runtime::Runtime::new().map_err(|e| CliError::Runtime(e.to_string()))?;
    runtime.block_on(async move {
        let server = HttpServer::with_config(config)?;
        server
            .start()
            .await
            .map_err(|e| CliError::Server(e.to_string()))
    })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
