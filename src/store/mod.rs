//! # Capability Interfaces
//!
//! The three abstract contracts a backend can satisfy:
//!
//! - [`SourcesStore`] — CRUD over source connection descriptors
//! - [`ExplorationStore`] — CRUD over saved explorations, scoped to a
//!   (source, user) pair
//! - [`TimeSeriesProxy`] — opaque pass-through of a raw query to a
//!   time-series backend
//!
//! Multiple backend variants implement each contract (in-memory, embedded
//! persistent store, remote client). Exactly one variant per capability is
//! bound at startup by `http_server::wiring` and never re-bound.

mod errors;
mod models;

use async_trait::async_trait;
use serde_json::Value;

pub use errors::{ProxyError, StartupError, StoreError, StoreResult};
pub use models::{
    Exploration, ExplorationUpdate, Kapacitor, Kapacitors, Source, SourceUpdate, TimeSeriesQuery,
};

/// CRUD over source connection descriptors.
#[async_trait]
pub trait SourcesStore: Send + Sync {
    /// Short name of the bound backend, surfaced on the status endpoint.
    fn backend(&self) -> &'static str;

    async fn all_sources(&self) -> StoreResult<Vec<Source>>;

    async fn source(&self, id: u64) -> StoreResult<Source>;

    /// Validates, assigns an ID, and stores the source. Any ID supplied by
    /// the caller is overwritten.
    async fn add_source(&self, source: Source) -> StoreResult<Source>;

    /// Applies a partial update; absent fields retain their prior values.
    async fn update_source(&self, id: u64, update: SourceUpdate) -> StoreResult<Source>;

    /// Deletes the source and, with it, every exploration it owns.
    async fn delete_source(&self, id: u64) -> StoreResult<()>;
}

/// CRUD over saved explorations scoped to a (source, user) pair.
#[async_trait]
pub trait ExplorationStore: Send + Sync {
    fn backend(&self) -> &'static str;

    async fn explorations(&self, source_id: u64, user_id: u64) -> StoreResult<Vec<Exploration>>;

    async fn exploration(&self, source_id: u64, user_id: u64, id: u64)
        -> StoreResult<Exploration>;

    async fn add_exploration(&self, exploration: Exploration) -> StoreResult<Exploration>;

    async fn update_exploration(
        &self,
        source_id: u64,
        user_id: u64,
        id: u64,
        update: ExplorationUpdate,
    ) -> StoreResult<Exploration>;

    async fn delete_exploration(&self, source_id: u64, user_id: u64, id: u64) -> StoreResult<()>;
}

/// Opaque pass-through to a time-series backend.
///
/// The proxy never interprets the query payload; it forwards it and returns
/// whatever the backend answered, mapped to [`ProxyError`] on failure.
#[async_trait]
pub trait TimeSeriesProxy: Send + Sync {
    fn backend(&self) -> &'static str;

    async fn query(&self, source_id: u64, query: TimeSeriesQuery) -> Result<Value, ProxyError>;
}
