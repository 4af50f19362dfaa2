//! CLI argument definitions using clap
//!
//! The flags mirror the process configuration: an optional embedded-store
//! path, an optional time-series server URL, and the develop flag. All
//! configuration is read here, exactly once.

use clap::Parser;
use std::path::PathBuf;

use crate::http_server::ServerConfig;

/// fluxdash - dashboard backend for time-series databases
#[derive(Parser, Debug)]
#[command(name = "fluxdash")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Full path to the embedded store file (e.g. /var/lib/fluxdash/dash.db)
    #[arg(short = 'b', long = "store-path", env = "STORE_PATH")]
    pub store_path: Option<PathBuf>,

    /// Full URL of the time-series server (e.g. http://localhost:8086)
    #[arg(short = 's', long = "server", env = "TIME_SERIES_URL")]
    pub server: Option<String>,

    /// Run the server in develop mode
    #[arg(short = 'd', long)]
    pub develop: bool,

    /// Host to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Port to bind to
    #[arg(short = 'p', long, default_value_t = 8888)]
    pub port: u16,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    /// Fold the flags into a server configuration.
    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            host: self.host.clone(),
            port: self.port,
            store_path: self.store_path.clone(),
            server_url: self.server.clone(),
            develop: self.develop,
            cors_origins: Vec::new(),
        }
    }
}
