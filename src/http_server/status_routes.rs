//! Status HTTP Routes
//!
//! Health check plus a report of which backend each capability was bound to
//! at startup. The wiring is immutable, so the report never changes for the
//! process lifetime.

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;

use super::wiring::Backends;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Bound-backend report
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub sources: &'static str,
    pub explorations: &'static str,
    pub proxy: &'static str,
}

/// Create status routes
pub fn status_routes(backends: Backends) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/status", get(status_handler))
        .with_state(backends)
}

async fn health_handler() -> impl IntoResponse {
    let response = HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };
    (StatusCode::OK, Json(response))
}

async fn status_handler(State(backends): State<Backends>) -> impl IntoResponse {
    let response = StatusResponse {
        sources: backends.sources.backend(),
        explorations: backends.explorations.backend(),
        proxy: backends.proxy.backend(),
    };
    (StatusCode::OK, Json(response))
}
