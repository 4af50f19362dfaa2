//! Explorations HTTP Routes
//!
//! Saved queries scoped to a (source, user) pair, served by the bound
//! [`ExplorationStore`].

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::response::{store_error, ApiError};
use super::wiring::Backends;
use crate::store::{Exploration, ExplorationUpdate};

#[derive(Debug, Serialize)]
pub struct ExplorationsListResponse {
    pub explorations: Vec<Exploration>,
    pub total: usize,
}

#[derive(Debug, Deserialize)]
pub struct CreateExplorationRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub data: Value,
}

/// Create explorations routes
pub fn explorations_routes(backends: Backends) -> Router {
    Router::new()
        .route(
            "/sources/:id/users/:user_id/explorations",
            get(all_explorations_handler).post(create_exploration_handler),
        )
        .route(
            "/sources/:id/users/:user_id/explorations/:exploration_id",
            get(exploration_handler)
                .patch(update_exploration_handler)
                .delete(delete_exploration_handler),
        )
        .with_state(backends)
}

async fn all_explorations_handler(
    State(backends): State<Backends>,
    Path((source_id, user_id)): Path<(u64, u64)>,
) -> Result<Json<ExplorationsListResponse>, ApiError> {
    let explorations = backends
        .explorations
        .explorations(source_id, user_id)
        .await
        .map_err(store_error)?;
    Ok(Json(ExplorationsListResponse {
        total: explorations.len(),
        explorations,
    }))
}

async fn exploration_handler(
    State(backends): State<Backends>,
    Path((source_id, user_id, id)): Path<(u64, u64, u64)>,
) -> Result<Json<Exploration>, ApiError> {
    let exploration = backends
        .explorations
        .exploration(source_id, user_id, id)
        .await
        .map_err(store_error)?;
    Ok(Json(exploration))
}

async fn create_exploration_handler(
    State(backends): State<Backends>,
    Path((source_id, user_id)): Path<(u64, u64)>,
    Json(request): Json<CreateExplorationRequest>,
) -> Result<(StatusCode, Json<Exploration>), ApiError> {
    let exploration = Exploration {
        id: 0,
        source_id,
        user_id,
        name: request.name,
        data: request.data,
        created_at: chrono::Utc::now(),
        updated_at: chrono::Utc::now(),
    };
    let created = backends
        .explorations
        .add_exploration(exploration)
        .await
        .map_err(store_error)?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_exploration_handler(
    State(backends): State<Backends>,
    Path((source_id, user_id, id)): Path<(u64, u64, u64)>,
    Json(update): Json<ExplorationUpdate>,
) -> Result<Json<Exploration>, ApiError> {
    let updated = backends
        .explorations
        .update_exploration(source_id, user_id, id, update)
        .await
        .map_err(store_error)?;
    Ok(Json(updated))
}

async fn delete_exploration_handler(
    State(backends): State<Backends>,
    Path((source_id, user_id, id)): Path<(u64, u64, u64)>,
) -> Result<StatusCode, ApiError> {
    backends
        .explorations
        .delete_exploration(source_id, user_id, id)
        .await
        .map_err(store_error)?;
    Ok(StatusCode::NO_CONTENT)
}
