#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use graph_explorer::db::{migrate, Db};
use graph_explorer::graph::GraphFixture;
use graph_explorer::store::{InMemoryGraphStore, SqliteGraphStore};
use graph_explorer::GraphExplorer;
use tempfile::TempDir;

/// Two people, a transfer between them and a contact phone, plus a company
/// reachable only through its party key.
pub const SAMPLE_GRAPH: &str = r#"{
    "nodes": [
        {"id": "person:1", "kind": "person", "label": "Alice", "attrs": {"age": 30}, "flags": ["vip"]},
        {"id": "person:2", "kind": "person", "label": "Bob"},
        {"id": "phone:+7999", "kind": "phone", "label": "+7999"},
        {"id": "company:7700000000", "kind": "company", "label": "Acme"}
    ],
    "edges": [
        {"id": "e1", "src": "person:1", "dst": "person:2", "kind": "transfer", "attrs": {"amount": 100}, "flags": ["confirmed"]},
        {"id": "e2", "src": "person:2", "dst": "phone:+7999", "kind": "contact"}
    ],
    "lookups": [
        {"kind": "id", "value": "1", "nodeId": "person:1"},
        {"kind": "phone_no", "value": "+7999", "nodeId": "phone:+7999"},
        {"kind": "party_rk", "value": "7700000000", "nodeId": "company:7700000000"}
    ]
}"#;

pub fn sample_fixture() -> GraphFixture {
    GraphFixture::from_json(SAMPLE_GRAPH).unwrap()
}

pub fn memory_explorer() -> GraphExplorer {
    let store = InMemoryGraphStore::from_fixture(&sample_fixture());
    GraphExplorer::new(Arc::new(store), Duration::from_secs(5))
}

/// Migrated SQLite store loaded with [`SAMPLE_GRAPH`]; keep the `TempDir` alive.
pub async fn sqlite_store() -> (SqliteGraphStore, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let db = Db::new(temp_dir.path().join("graph.db"));
    db.with_connection(|conn| migrate::run_migrations(conn, &migrate::default_migrations_dir()))
        .await
        .unwrap();

    let store = SqliteGraphStore::new(db);
    store.import_fixture(sample_fixture(), true).await.unwrap();
    (store, temp_dir)
}
