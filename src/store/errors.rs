//! # Store and Proxy Errors
//!
//! The error taxonomy for the capability layer. Validation and not-found
//! errors are recoverable and propagate unchanged to the request boundary;
//! startup errors are fatal and abort wiring before any handler exists.

use std::path::PathBuf;

use thiserror::Error;

use crate::validation::ValidationErrors;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors produced by SourcesStore / ExplorationStore implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    #[error("store error: {0}")]
    Internal(String),
}

/// Errors produced by the time-series proxy.
///
/// `Unreachable` and `Rejected` are kept distinct so callers can tell a
/// dead backend from a backend that refused the query.
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("time-series backend unreachable: {0}")]
    Unreachable(String),

    #[error("time-series backend rejected query (status {status})")]
    Rejected { status: u16, body: String },
}

/// Fatal wiring-time failures. The process must not start serving traffic
/// in a partially-wired state.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("cannot open store at {path}: {reason}")]
    StoreOpen { path: PathBuf, reason: String },

    #[error("invalid time-series server url {url}: {reason}")]
    InvalidServerUrl { url: String, reason: String },
}
