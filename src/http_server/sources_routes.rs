//! Sources HTTP Routes
//!
//! Thin adapters from the router to the bound [`SourcesStore`]; all real
//! behavior lives behind the capability interface.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Serialize;

use super::response::{store_error, ApiError};
use super::wiring::Backends;
use crate::store::{Source, SourceUpdate};

#[derive(Debug, Serialize)]
pub struct SourcesListResponse {
    pub sources: Vec<Source>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct MonitoredService {
    pub cluster_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub service_type: String,
}

#[derive(Debug, Serialize)]
pub struct MonitoredServicesResponse {
    pub monitored: Vec<MonitoredService>,
    pub total: usize,
}

/// Create sources routes
pub fn sources_routes(backends: Backends) -> Router {
    Router::new()
        .route(
            "/sources",
            get(all_sources_handler).post(create_source_handler),
        )
        .route(
            "/sources/:id",
            get(source_handler)
                .patch(update_source_handler)
                .delete(delete_source_handler),
        )
        .route("/sources/:id/monitored", get(monitored_services_handler))
        .with_state(backends)
}

async fn all_sources_handler(
    State(backends): State<Backends>,
) -> Result<Json<SourcesListResponse>, ApiError> {
    let sources = backends.sources.all_sources().await.map_err(store_error)?;
    Ok(Json(SourcesListResponse {
        total: sources.len(),
        sources,
    }))
}

async fn source_handler(
    State(backends): State<Backends>,
    Path(id): Path<u64>,
) -> Result<Json<Source>, ApiError> {
    let source = backends.sources.source(id).await.map_err(store_error)?;
    Ok(Json(source))
}

async fn create_source_handler(
    State(backends): State<Backends>,
    Json(source): Json<Source>,
) -> Result<(StatusCode, Json<Source>), ApiError> {
    let created = backends
        .sources
        .add_source(source)
        .await
        .map_err(store_error)?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_source_handler(
    State(backends): State<Backends>,
    Path(id): Path<u64>,
    Json(update): Json<SourceUpdate>,
) -> Result<Json<Source>, ApiError> {
    let updated = backends
        .sources
        .update_source(id, update)
        .await
        .map_err(store_error)?;
    Ok(Json(updated))
}

async fn delete_source_handler(
    State(backends): State<Backends>,
    Path(id): Path<u64>,
) -> Result<StatusCode, ApiError> {
    backends
        .sources
        .delete_source(id)
        .await
        .map_err(store_error)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Monitored services have no backend variant; the in-process mock answers
/// regardless of configuration, with a deterministic empty set.
async fn monitored_services_handler(
    Path(_id): Path<u64>,
) -> Result<Json<MonitoredServicesResponse>, ApiError> {
    Ok(Json(MonitoredServicesResponse {
        monitored: Vec::new(),
        total: 0,
    }))
}
