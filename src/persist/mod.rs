//! # Persistent Backend
//!
//! Embedded, file-backed implementation of [`SourcesStore`] and
//! [`ExplorationStore`] on top of redb. The database is opened once at
//! startup against the configured path; an open failure is a fatal
//! [`StartupError`] because the dispatch layer cannot operate half-wired.
//!
//! Key/value encoding (JSON values under integer keys) is private to this
//! module; the cross-component contract is read-after-write fidelity only.
//! Concurrent handler invocations share the single database handle and rely
//! on redb's own transaction isolation, with no external locking.

use std::fmt;
use std::path::Path;

use async_trait::async_trait;
use chrono::Utc;
use redb::{Database, ReadableTable, TableDefinition};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::store::{
    Exploration, ExplorationStore, ExplorationUpdate, Source, SourceUpdate, SourcesStore,
    StartupError, StoreError, StoreResult,
};
use crate::validation::{FormatRegistry, Validate};

const BACKEND: &str = "redb";

const SOURCES: TableDefinition<u64, &str> = TableDefinition::new("sources");
const EXPLORATIONS: TableDefinition<(u64, u64, u64), &str> = TableDefinition::new("explorations");
const META: TableDefinition<&str, u64> = TableDefinition::new("meta");

const NEXT_ID_KEY: &str = "next_id";

/// File-backed store for sources and explorations.
pub struct PersistentStore {
    db: Database,
    formats: FormatRegistry,
}

impl fmt::Debug for PersistentStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersistentStore").finish_non_exhaustive()
    }
}

fn store_err(err: impl std::fmt::Display) -> StoreError {
    StoreError::Internal(err.to_string())
}

fn encode<T: Serialize>(value: &T) -> StoreResult<String> {
    serde_json::to_string(value).map_err(store_err)
}

fn decode<T: DeserializeOwned>(raw: &str) -> StoreResult<T> {
    serde_json::from_str(raw).map_err(store_err)
}

impl PersistentStore {
    /// Open (or create) the database at `path` and ensure all tables exist
    /// so that later read transactions never observe a missing table.
    pub fn open(path: &Path) -> Result<Self, StartupError> {
        let open = || -> Result<Database, redb::Error> {
            let db = Database::create(path)?;
            let txn = db.begin_write()?;
            txn.open_table(SOURCES)?;
            txn.open_table(EXPLORATIONS)?;
            txn.open_table(META)?;
            txn.commit()?;
            Ok(db)
        };
        let db = open().map_err(|e| StartupError::StoreOpen {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        tracing::info!(path = %path.display(), "opened persistent store");
        Ok(Self {
            db,
            formats: FormatRegistry::default(),
        })
    }

    /// Advance the shared ID counter inside the caller's write transaction.
    fn next_id(txn: &redb::WriteTransaction) -> StoreResult<u64> {
        let mut meta = txn.open_table(META).map_err(store_err)?;
        let id = meta
            .get(NEXT_ID_KEY)
            .map_err(store_err)?
            .map(|v| v.value())
            .unwrap_or(1);
        meta.insert(NEXT_ID_KEY, id + 1).map_err(store_err)?;
        Ok(id)
    }
}

#[async_trait]
impl SourcesStore for PersistentStore {
    fn backend(&self) -> &'static str {
        BACKEND
    }

    async fn all_sources(&self) -> StoreResult<Vec<Source>> {
        let txn = self.db.begin_read().map_err(store_err)?;
        let table = txn.open_table(SOURCES).map_err(store_err)?;
        let mut sources = Vec::new();
        for entry in table.iter().map_err(store_err)? {
            let (_, value) = entry.map_err(store_err)?;
            sources.push(decode(value.value())?);
        }
        Ok(sources)
    }

    async fn source(&self, id: u64) -> StoreResult<Source> {
        let txn = self.db.begin_read().map_err(store_err)?;
        let table = txn.open_table(SOURCES).map_err(store_err)?;
        match table.get(id).map_err(store_err)? {
            Some(value) => decode(value.value()),
            None => Err(StoreError::NotFound("source")),
        }
    }

    async fn add_source(&self, mut source: Source) -> StoreResult<Source> {
        source.validate(&self.formats)?;
        let txn = self.db.begin_write().map_err(store_err)?;
        source.id = Self::next_id(&txn)?;
        {
            let mut table = txn.open_table(SOURCES).map_err(store_err)?;
            table
                .insert(source.id, encode(&source)?.as_str())
                .map_err(store_err)?;
        }
        txn.commit().map_err(store_err)?;
        Ok(source)
    }

    async fn update_source(&self, id: u64, update: SourceUpdate) -> StoreResult<Source> {
        let txn = self.db.begin_write().map_err(store_err)?;
        let updated = {
            let mut table = txn.open_table(SOURCES).map_err(store_err)?;
            let current: Source = match table.get(id).map_err(store_err)? {
                Some(value) => decode(value.value())?,
                None => return Err(StoreError::NotFound("source")),
            };
            let mut updated = current;
            update.apply(&mut updated);
            updated.validate(&self.formats)?;
            table
                .insert(id, encode(&updated)?.as_str())
                .map_err(store_err)?;
            updated
        };
        txn.commit().map_err(store_err)?;
        Ok(updated)
    }

    async fn delete_source(&self, id: u64) -> StoreResult<()> {
        let txn = self.db.begin_write().map_err(store_err)?;
        {
            let mut table = txn.open_table(SOURCES).map_err(store_err)?;
            if table.remove(id).map_err(store_err)?.is_none() {
                return Err(StoreError::NotFound("source"));
            }
        }
        {
            // An exploration never outlives its source.
            let mut table = txn.open_table(EXPLORATIONS).map_err(store_err)?;
            let keys: Vec<(u64, u64, u64)> = table
                .range((id, 0, 0)..=(id, u64::MAX, u64::MAX))
                .map_err(store_err)?
                .map(|entry| entry.map(|(k, _)| k.value()).map_err(store_err))
                .collect::<StoreResult<_>>()?;
            for key in keys {
                table.remove(key).map_err(store_err)?;
            }
        }
        txn.commit().map_err(store_err)?;
        Ok(())
    }
}

#[async_trait]
impl ExplorationStore for PersistentStore {
    fn backend(&self) -> &'static str {
        BACKEND
    }

    async fn explorations(&self, source_id: u64, user_id: u64) -> StoreResult<Vec<Exploration>> {
        let txn = self.db.begin_read().map_err(store_err)?;
        let table = txn.open_table(EXPLORATIONS).map_err(store_err)?;
        let mut explorations = Vec::new();
        for entry in table
            .range((source_id, user_id, 0)..=(source_id, user_id, u64::MAX))
            .map_err(store_err)?
        {
            let (_, value) = entry.map_err(store_err)?;
            explorations.push(decode(value.value())?);
        }
        Ok(explorations)
    }

    async fn exploration(
        &self,
        source_id: u64,
        user_id: u64,
        id: u64,
    ) -> StoreResult<Exploration> {
        let txn = self.db.begin_read().map_err(store_err)?;
        let table = txn.open_table(EXPLORATIONS).map_err(store_err)?;
        match table.get((source_id, user_id, id)).map_err(store_err)? {
            Some(value) => decode(value.value()),
            None => Err(StoreError::NotFound("exploration")),
        }
    }

    async fn add_exploration(&self, mut exploration: Exploration) -> StoreResult<Exploration> {
        let txn = self.db.begin_write().map_err(store_err)?;
        exploration.id = Self::next_id(&txn)?;
        let now = Utc::now();
        exploration.created_at = now;
        exploration.updated_at = now;
        {
            let mut table = txn.open_table(EXPLORATIONS).map_err(store_err)?;
            let key = (exploration.source_id, exploration.user_id, exploration.id);
            table
                .insert(key, encode(&exploration)?.as_str())
                .map_err(store_err)?;
        }
        txn.commit().map_err(store_err)?;
        Ok(exploration)
    }

    async fn update_exploration(
        &self,
        source_id: u64,
        user_id: u64,
        id: u64,
        update: ExplorationUpdate,
    ) -> StoreResult<Exploration> {
        let key = (source_id, user_id, id);
        let txn = self.db.begin_write().map_err(store_err)?;
        let updated = {
            let mut table = txn.open_table(EXPLORATIONS).map_err(store_err)?;
            let current: Exploration = match table.get(key).map_err(store_err)? {
                Some(value) => decode(value.value())?,
                None => return Err(StoreError::NotFound("exploration")),
            };
            let mut updated = current;
            update.apply(&mut updated);
            updated.updated_at = Utc::now();
            table
                .insert(key, encode(&updated)?.as_str())
                .map_err(store_err)?;
            updated
        };
        txn.commit().map_err(store_err)?;
        Ok(updated)
    }

    async fn delete_exploration(&self, source_id: u64, user_id: u64, id: u64) -> StoreResult<()> {
        let txn = self.db.begin_write().map_err(store_err)?;
        {
            let mut table = txn.open_table(EXPLORATIONS).map_err(store_err)?;
            if table
                .remove((source_id, user_id, id))
                .map_err(store_err)?
                .is_none()
            {
                return Err(StoreError::NotFound("exploration"));
            }
        }
        txn.commit().map_err(store_err)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn open_store(dir: &TempDir) -> PersistentStore {
        PersistentStore::open(&dir.path().join("dash.db")).unwrap()
    }

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
    async fn test_open_failure_is_fatal_startup_error() {
        let err = PersistentStore::open(Path::new("/nonexistent/dir/dash.db")).unwrap_err();
        assert!(matches!(err, StartupError::StoreOpen { .. }));
    }

    #[test]
    fn test_debug_does_not_expose_internals() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);
        assert!(format!("{store:?}").contains("PersistentStore"));
    }

    #[tokio::test]
    async fn test_source_round_trip_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let created = {
            let store = open_store(&dir);
            store
                .add_source(source("prod", "http://db:8086"))
                .await
                .unwrap()
        };

        let store = open_store(&dir);
        let read = store.source(created.id).await.unwrap();
        assert_eq!(read, created);
    }

    #[tokio::test]
    async fn test_id_counter_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let first = {
            let store = open_store(&dir);
            store
                .add_source(source("a", "http://db:8086"))
                .await
                .unwrap()
        };
        let store = open_store(&dir);
        let second = store
            .add_source(source("b", "http://db:8087"))
            .await
            .unwrap();
        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn test_delete_source_drops_its_explorations() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);
        let s = store
            .add_source(source("prod", "http://db:8086"))
            .await
            .unwrap();
        store
            .add_exploration(Exploration {
                id: 0,
                source_id: s.id,
                user_id: 1,
                name: "cpu".to_string(),
                data: json!({"query": "SELECT *"}),
                created_at: Utc::now(),
                updated_at: Utc::now(),
            })
            .await
            .unwrap();

        store.delete_source(s.id).await.unwrap();
        assert!(store.explorations(s.id, 1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_exploration_scoping_by_user() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);
        for user_id in [1u64, 2] {
            store
                .add_exploration(Exploration {
                    id: 0,
                    source_id: 9,
                    user_id,
                    name: format!("user {user_id}"),
                    data: json!({}),
                    created_at: Utc::now(),
                    updated_at: Utc::now(),
                })
                .await
                .unwrap();
        }
        let explorations = store.explorations(9, 1).await.unwrap();
        assert_eq!(explorations.len(), 1);
        assert_eq!(explorations[0].user_id, 1);
    }
}
