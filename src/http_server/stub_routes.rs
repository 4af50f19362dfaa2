//! Not-Implemented Placeholders
//!
//! Capabilities with no backend variant (users, roles, permissions,
//! dashboards) share one stub responder. They answer 501 regardless of
//! configuration; the operation itself is unsupported, which is distinct
//! from a 404 where the operation exists but the entity does not.

use axum::{
    extract::OriginalUri,
    http::{Method, StatusCode},
    routing::get,
    Router,
};

use super::response::{ApiError, ErrorResponse};

/// Create routes for every capability without a backend variant.
pub fn stub_routes() -> Router {
    Router::new()
        .route(
            "/dashboards",
            get(not_implemented).post(not_implemented),
        )
        .route(
            "/dashboards/:id",
            get(not_implemented)
                .put(not_implemented)
                .delete(not_implemented),
        )
        .route("/sources/:id/permissions", get(not_implemented))
        .route(
            "/sources/:id/roles",
            get(not_implemented).post(not_implemented),
        )
        .route(
            "/sources/:id/roles/:role_id",
            get(not_implemented)
                .patch(not_implemented)
                .delete(not_implemented),
        )
        .route(
            "/sources/:id/users",
            get(not_implemented).post(not_implemented),
        )
        .route(
            "/sources/:id/users/:user_id",
            get(not_implemented)
                .patch(not_implemented)
                .delete(not_implemented),
        )
}

/// The single shared responder behind every placeholder route.
async fn not_implemented(method: Method, OriginalUri(uri): OriginalUri) -> ApiError {
    ErrorResponse::new(
        StatusCode::NOT_IMPLEMENTED,
        format!("operation {} {} has not yet been implemented", method, uri.path()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stub_router_builds() {
        let _router = stub_routes();
    }
}
