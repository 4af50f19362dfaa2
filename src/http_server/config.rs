//! Server Configuration
//!
//! Read exactly once at process start. The two optional backend settings
//! drive dispatch: a persistence path selects the embedded store, a
//! time-series server URL selects the remote proxy; absence of either falls
//! back to the in-memory backend.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Dashboard server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to (default: "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to (default: 8888)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Path to the embedded store file; absence selects the in-memory store
    #[serde(default)]
    pub store_path: Option<PathBuf>,

    /// Full URL of the time-series server; absence selects the mock proxy
    #[serde(default)]
    pub server_url: Option<String>,

    /// Development mode; affects only asset serving, outside this layer
    #[serde(default)]
    pub develop: bool,

    /// CORS allowed origins (empty: permissive, for development)
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8888
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            store_path: None,
            server_url: None,
            develop: false,
            cors_origins: Vec::new(),
        }
    }
}

impl ServerConfig {
    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
