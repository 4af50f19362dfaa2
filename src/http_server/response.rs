//! Wire-level error mapping.
//!
//! Capability errors cross the request boundary as structured, typed JSON,
//! never as panics or opaque 500s. Validation errors keep their aggregated
//! field list; rejected proxy queries pass the upstream status through.

use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::store::{ProxyError, StoreError};
use crate::validation::FieldError;

/// Error body shared by every handler.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldError>,
}

impl ErrorResponse {
    pub fn new(status: StatusCode, error: impl Into<String>) -> (StatusCode, Json<Self>) {
        (
            status,
            Json(Self {
                error: error.into(),
                code: status.as_u16(),
                fields: Vec::new(),
            }),
        )
    }
}

/// Handler error type: a status plus a JSON body.
pub type ApiError = (StatusCode, Json<ErrorResponse>);

/// Map a store error to its wire representation.
pub fn store_error(err: StoreError) -> ApiError {
    match err {
        StoreError::NotFound(entity) => {
            ErrorResponse::new(StatusCode::NOT_FOUND, format!("{entity} not found"))
        }
        StoreError::Validation(errs) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorResponse {
                error: errs.to_string(),
                code: StatusCode::UNPROCESSABLE_ENTITY.as_u16(),
                fields: errs.errors,
            }),
        ),
        StoreError::Internal(msg) => ErrorResponse::new(StatusCode::INTERNAL_SERVER_ERROR, msg),
    }
}

/// Map a proxy error to its wire representation. A rejected query keeps the
/// upstream status so the caller can tell "unreachable" from "rejected".
pub fn proxy_error(err: ProxyError) -> ApiError {
    match err {
        ProxyError::Unreachable(msg) => ErrorResponse::new(StatusCode::BAD_GATEWAY, msg),
        ProxyError::Rejected { status, body } => {
            let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
            ErrorResponse::new(status, body)
        }
    }
}
