//! # HTTP Server
//!
//! Assembles the bound capabilities and all route groups into one axum
//! router. Wiring happens exactly once, inside the constructor; a wiring
//! failure aborts before any handler is registered.

use std::net::SocketAddr;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::config::ServerConfig;
use super::explorations_routes::explorations_routes;
use super::proxy_routes::proxy_routes;
use super::sources_routes::sources_routes;
use super::status_routes::status_routes;
use super::stub_routes::stub_routes;
use super::wiring::Backends;
use crate::store::StartupError;

/// HTTP server for the dashboard API
pub struct HttpServer {
    config: ServerConfig,
    router: Router,
}

impl HttpServer {
    /// Wire the backends from `config` and build the server.
    pub fn with_config(config: ServerConfig) -> Result<Self, StartupError> {
        let backends = Backends::wire(&config)?;
        Ok(Self::with_backends(config, backends))
    }

    /// Build the server around already-wired backends (used by tests to
    /// inject a specific wiring).
    pub fn with_backends(config: ServerConfig, backends: Backends) -> Self {
        let router = Self::build_router(&config, backends);
        Self { config, router }
    }

    fn build_router(config: &ServerConfig, backends: Backends) -> Router {
        let cors = if config.cors_origins.is_empty() {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            use tower_http::cors::AllowOrigin;
            let origins: Vec<_> = config
                .cors_origins
                .iter()
                .filter_map(|s| s.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        let api = Router::new()
            .merge(sources_routes(backends.clone()))
            .merge(explorations_routes(backends.clone()))
            .merge(proxy_routes(backends.clone()))
            .merge(stub_routes());

        Router::new()
            .merge(status_routes(backends))
            .nest("/api", api)
            .layer(cors)
            .layer(TraceLayer::new_for_http())
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Start the HTTP server (async)
    pub async fn start(self) -> Result<(), std::io::Error> {
        let addr: SocketAddr = self
            .config
            .socket_addr()
            .parse()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, format!("{e}")))?;

        tracing::info!(%addr, "starting dashboard server");
        let listener = TcpListener::bind(addr).await?;
        axum::serve(listener, self.router).await?;

        Ok(())
    }
}
