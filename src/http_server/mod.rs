//! # HTTP Server Module
//!
//! The request-dispatch layer: configuration, the one-time capability
//! wiring, and the thin route adapters that expose each bound capability to
//! the router.
//!
//! # Endpoints
//!
//! - `/health`, `/status` - liveness and bound-backend report
//! - `/api/sources/*` - source CRUD and the mock-backed monitored report
//! - `/api/sources/:id/users/:user_id/explorations/*` - exploration CRUD
//! - `/api/sources/:id/proxy` - raw time-series query pass-through
//! - `/api/dashboards/*`, roles/permissions/users - NotImplemented stubs

pub mod config;
pub mod explorations_routes;
pub mod proxy_routes;
pub mod response;
pub mod server;
pub mod sources_routes;
pub mod status_routes;
pub mod stub_routes;
pub mod wiring;

pub use config::ServerConfig;
pub use server::HttpServer;
pub use wiring::Backends;
