//! # In-Memory Backend
//!
//! Reference implementation of all three capability interfaces. Storage
//! lives for the process lifetime only; IDs come from one monotonically
//! increasing counter shared by both collections. This backend is bound
//! whenever no persistence path or remote server is configured.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{json, Value};

use crate::store::{
    Exploration, ExplorationStore, ExplorationUpdate, ProxyError, Source, SourceUpdate,
    SourcesStore, StoreError, StoreResult, TimeSeriesProxy, TimeSeriesQuery,
};
use crate::validation::{FormatRegistry, Validate};

const BACKEND: &str = "memory";

/// Process-lifetime backend for sources, explorations, and query proxying.
///
/// One mutex per collection; locks are never held across an await point.
pub struct MemoryBackend {
    sources: Mutex<BTreeMap<u64, Source>>,
    explorations: Mutex<BTreeMap<(u64, u64, u64), Exploration>>,
    next_id: AtomicU64,
    formats: FormatRegistry,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self {
            sources: Mutex::new(BTreeMap::new()),
            explorations: Mutex::new(BTreeMap::new()),
            next_id: AtomicU64::new(1),
            formats: FormatRegistry::default(),
        }
    }

    fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SourcesStore for MemoryBackend {
    fn backend(&self) -> &'static str {
        BACKEND
    }

    async fn all_sources(&self) -> StoreResult<Vec<Source>> {
        let sources = self.sources.lock().unwrap();
        Ok(sources.values().cloned().collect())
    }

    async fn source(&self, id: u64) -> StoreResult<Source> {
        let sources = self.sources.lock().unwrap();
        sources
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound("source"))
    }

    async fn add_source(&self, mut source: Source) -> StoreResult<Source> {
        source.validate(&self.formats)?;
        source.id = self.next_id();
        let mut sources = self.sources.lock().unwrap();
        sources.insert(source.id, source.clone());
        Ok(source)
    }

    async fn update_source(&self, id: u64, update: SourceUpdate) -> StoreResult<Source> {
        let mut sources = self.sources.lock().unwrap();
        let current = sources.get(&id).ok_or(StoreError::NotFound("source"))?;
        let mut updated = current.clone();
        update.apply(&mut updated);
        updated.validate(&self.formats)?;
        sources.insert(id, updated.clone());
        Ok(updated)
    }

    async fn delete_source(&self, id: u64) -> StoreResult<()> {
        let mut sources = self.sources.lock().unwrap();
        if sources.remove(&id).is_none() {
            return Err(StoreError::NotFound("source"));
        }
        drop(sources);
        // An exploration never outlives its source.
        let mut explorations = self.explorations.lock().unwrap();
        explorations.retain(|(source_id, _, _), _| *source_id != id);
        Ok(())
    }
}

#[async_trait]
impl ExplorationStore for MemoryBackend {
    fn backend(&self) -> &'static str {
        BACKEND
    }

    async fn explorations(&self, source_id: u64, user_id: u64) -> StoreResult<Vec<Exploration>> {
        let explorations = self.explorations.lock().unwrap();
        Ok(explorations
            .range((source_id, user_id, 0)..=(source_id, user_id, u64::MAX))
            .map(|(_, e)| e.clone())
            .collect())
    }

    async fn exploration(
        &self,
        source_id: u64,
        user_id: u64,
        id: u64,
    ) -> StoreResult<Exploration> {
        let explorations = self.explorations.lock().unwrap();
        explorations
            .get(&(source_id, user_id, id))
            .cloned()
            .ok_or(StoreError::NotFound("exploration"))
    }

    async fn add_exploration(&self, mut exploration: Exploration) -> StoreResult<Exploration> {
        exploration.id = self.next_id();
        let now = Utc::now();
        exploration.created_at = now;
        exploration.updated_at = now;
        let key = (exploration.source_id, exploration.user_id, exploration.id);
        let mut explorations = self.explorations.lock().unwrap();
        explorations.insert(key, exploration.clone());
        Ok(exploration)
    }

    async fn update_exploration(
        &self,
        source_id: u64,
        user_id: u64,
        id: u64,
        update: ExplorationUpdate,
    ) -> StoreResult<Exploration> {
        let mut explorations = self.explorations.lock().unwrap();
        let exploration = explorations
            .get_mut(&(source_id, user_id, id))
            .ok_or(StoreError::NotFound("exploration"))?;
        update.apply(exploration);
        exploration.updated_at = Utc::now();
        Ok(exploration.clone())
    }

    async fn delete_exploration(&self, source_id: u64, user_id: u64, id: u64) -> StoreResult<()> {
        let mut explorations = self.explorations.lock().unwrap();
        explorations
            .remove(&(source_id, user_id, id))
            .map(|_| ())
            .ok_or(StoreError::NotFound("exploration"))
    }
}

#[async_trait]
impl TimeSeriesProxy for MemoryBackend {
    fn backend(&self) -> &'static str {
        BACKEND
    }

    /// Deterministic mock: every query answers with an empty result set.
    async fn query(&self, source_id: u64, query: TimeSeriesQuery) -> Result<Value, ProxyError> {
        tracing::debug!(source_id, query = %query.query, "mock proxy query");
        Ok(json!({ "results": [] }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(name: &str, url: &str) -> Source {
        Source {
            id: 0,
            name: name.to_string(),
            source_type: "influx".to_string(),
            url: url.to_string(),
            username: None,
            password: None,
            default: false,
        }
    }

    #[tokio::test]
    async fn test_add_assigns_monotonic_ids() {
        let backend = MemoryBackend::new();
        let a = backend
            .add_source(source("a", "http://db:8086"))
            .await
            .unwrap();
        let b = backend
            .add_source(source("b", "http://db:8087"))
            .await
            .unwrap();
        assert!(a.id > 0);
        assert!(b.id > a.id);
    }

    #[tokio::test]
    async fn test_add_rejects_invalid_source() {
        let backend = MemoryBackend::new();
        let err = backend.add_source(source("", "")).await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        assert!(backend.all_sources().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_source_drops_its_explorations() {
        let backend = MemoryBackend::new();
        let s = backend
            .add_source(source("prod", "http://db:8086"))
            .await
            .unwrap();
        backend
            .add_exploration(Exploration {
                id: 0,
                source_id: s.id,
                user_id: 42,
                name: "cpu".to_string(),
                data: json!({"query": "SELECT *"}),
                created_at: Utc::now(),
                updated_at: Utc::now(),
            })
            .await
            .unwrap();
        backend.delete_source(s.id).await.unwrap();
        assert!(backend.explorations(s.id, 42).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_mock_proxy_answers_empty_results() {
        let backend = MemoryBackend::new();
        let result = backend
            .query(
                1,
                TimeSeriesQuery {
                    query: "SELECT * FROM cpu".to_string(),
                    db: None,
                    rp: None,
                    epoch: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(result, json!({ "results": [] }));
    }
}
