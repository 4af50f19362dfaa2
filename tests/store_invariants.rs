//! Store Invariant Tests
//!
//! The capability contracts hold for every backend variant:
//!
//! - create then read-by-ID returns what was created, with a store-assigned ID
//! - update is partial; untouched fields retain prior values
//! - read after delete yields NotFound
//! - explorations are scoped to (source, user) and never outlive their source
//!
//! Each check runs against both the in-memory and the persistent backend.

use fluxdash::memory::MemoryBackend;
use fluxdash::persist::PersistentStore;
use fluxdash::store::{
    Exploration, ExplorationStore, ExplorationUpdate, Source, SourceUpdate, SourcesStore,
    StoreError,
};
use serde_json::json;
use tempfile::TempDir;

fn prod_source() -> Source {
    Source {
        id: 0,
        name: "prod".to_string(),
        source_type: "influx".to_string(),
        url: "http://db:8086".to_string(),
        username: None,
        password: None,
        default: false,
    }
}

fn exploration(source_id: u64, user_id: u64, name: &str) -> Exploration {
    Exploration {
        id: 0,
        source_id,
        user_id,
        name: name.to_string(),
        data: json!({"query": "SELECT * FROM cpu"}),
        created_at: chrono::Utc::now(),
        updated_at: chrono::Utc::now(),
    }
}

async fn check_source_lifecycle(store: &dyn SourcesStore) {
    // create: ID assigned, fields preserved
    let created = store.add_source(prod_source()).await.unwrap();
    assert!(created.id > 0);
    assert_eq!(created.name, "prod");
    assert_eq!(created.url, "http://db:8086");

    // read-by-ID returns an equal value
    let read = store.source(created.id).await.unwrap();
    assert_eq!(read, created);

    // partial update: untouched fields retained
    let updated = store
        .update_source(
            created.id,
            SourceUpdate {
                name: Some("prod-eu".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "prod-eu");
    assert_eq!(updated.url, created.url);
    let read = store.source(created.id).await.unwrap();
    assert_eq!(read, updated);

    // delete then read yields NotFound
    store.delete_source(created.id).await.unwrap();
    let err = store.source(created.id).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
}

async fn check_exploration_lifecycle(store: &dyn ExplorationStore) {
    let created = store.add_exploration(exploration(3, 7, "cpu")).await.unwrap();
    assert!(created.id > 0);

    let read = store.exploration(3, 7, created.id).await.unwrap();
    assert_eq!(read, created);

    // scoping: a different user sees nothing
    assert!(store.explorations(3, 8).await.unwrap().is_empty());

    let updated = store
        .update_exploration(
            3,
            7,
            created.id,
            ExplorationUpdate {
                name: Some("cpu-busy".to_string()),
                data: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "cpu-busy");
    assert_eq!(updated.data, created.data);
    assert!(updated.updated_at >= created.updated_at);

    store.delete_exploration(3, 7, created.id).await.unwrap();
    let err = store.exploration(3, 7, created.id).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
}

#[tokio::test]
async fn test_memory_source_lifecycle() {
    let backend = MemoryBackend::new();
    check_source_lifecycle(&backend).await;
}

#[tokio::test]
async fn test_persistent_source_lifecycle() {
    let dir = TempDir::new().unwrap();
    let store = PersistentStore::open(&dir.path().join("dash.db")).unwrap();
    check_source_lifecycle(&store).await;
}

#[tokio::test]
async fn test_memory_exploration_lifecycle() {
    let backend = MemoryBackend::new();
    check_exploration_lifecycle(&backend).await;
}

#[tokio::test]
async fn test_persistent_exploration_lifecycle() {
    let dir = TempDir::new().unwrap();
    let store = PersistentStore::open(&dir.path().join("dash.db")).unwrap();
    check_exploration_lifecycle(&store).await;
}

#[tokio::test]
async fn test_create_rejects_invalid_source_on_both_backends() {
    let invalid = Source {
        name: String::new(),
        url: "not a uri".to_string(),
        ..prod_source()
    };

    let memory = MemoryBackend::new();
    let err = memory.add_source(invalid.clone()).await.unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));

    let dir = TempDir::new().unwrap();
    let store = PersistentStore::open(&dir.path().join("dash.db")).unwrap();
    let err = store.add_source(invalid).await.unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));
}

#[tokio::test]
async fn test_persistent_read_after_write_across_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("dash.db");

    let (source, exp) = {
        let store = PersistentStore::open(&path).unwrap();
        let source = store.add_source(prod_source()).await.unwrap();
        let exp = store
            .add_exploration(exploration(source.id, 1, "mem"))
            .await
            .unwrap();
        (source, exp)
    };

    let store = PersistentStore::open(&path).unwrap();
    assert_eq!(store.source(source.id).await.unwrap(), source);
    assert_eq!(
        store.exploration(source.id, 1, exp.id).await.unwrap(),
        exp
    );
}

#[tokio::test]
async fn test_exploration_never_outlives_source() {
    let dir = TempDir::new().unwrap();
    let store = PersistentStore::open(&dir.path().join("dash.db")).unwrap();

    let source = store.add_source(prod_source()).await.unwrap();
    let exp = store
        .add_exploration(exploration(source.id, 1, "cpu"))
        .await
        .unwrap();

    store.delete_source(source.id).await.unwrap();
    let err = store.exploration(source.id, 1, exp.id).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
}
