//! Proxy HTTP Route
//!
//! Forwards a raw time-series query to the bound [`TimeSeriesProxy`] and
//! returns the backend's payload untouched.

use axum::{
    extract::{Path, State},
    routing::post,
    Json, Router,
};
use serde_json::Value;

use super::response::{proxy_error, ApiError};
use super::wiring::Backends;
use crate::store::TimeSeriesQuery;

/// Create proxy routes
pub fn proxy_routes(backends: Backends) -> Router {
    Router::new()
        .route("/sources/:id/proxy", post(proxy_handler))
        .with_state(backends)
}

async fn proxy_handler(
    State(backends): State<Backends>,
    Path(source_id): Path<u64>,
    Json(query): Json<TimeSeriesQuery>,
) -> Result<Json<Value>, ApiError> {
    let result = backends
        .proxy
        .query(source_id, query)
        .await
        .map_err(proxy_error)?;
    Ok(Json(result))
}
