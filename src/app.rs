//! Wiring shared by the binaries: open the configured store and build the engine.

use std::sync::Arc;

use crate::config::{Config, StoreBackend};
use crate::db::{migrate, Db};
use crate::engine::GraphExplorer;
use crate::error::{GraphError, Result};
use crate::graph::GraphFixture;
use crate::store::{CachedGraphStore, GraphStore, InMemoryGraphStore, SqliteGraphStore};

/// Open the SQLite database and bring its schema up to date.
pub async fn open_database(config: &Config) -> Result<Db> {
    let db = Db::new(config.db_path());
    let migrations_dir = config.graph.migrations_dir.clone();
    db.with_connection(move |conn| migrate::run_migrations(conn, &migrations_dir))
        .await?;
    log::info!("Database ready at {}", db.path().display());
    Ok(db)
}

/// The store selected by `[graph] store`, behind the node cache when enabled.
pub async fn open_store(config: &Config) -> Result<Arc<dyn GraphStore>> {
    let capacity = config.explorer.node_cache_capacity;

    match config.graph.store {
        StoreBackend::Sqlite => {
            let store = SqliteGraphStore::new(open_database(config).await?);
            Ok(with_cache(store, capacity))
        }
        StoreBackend::Memory => {
            let path = config.graph.fixture_path.as_deref().ok_or_else(|| {
                GraphError::Config("graph.fixture_path is required for the memory store".to_string())
            })?;
            let fixture = GraphFixture::from_file(path)?;
            let store = InMemoryGraphStore::from_fixture(&fixture);
            log::info!(
                "Loaded in-memory graph from {}: {} nodes, {} edges",
                path.display(),
                store.node_count(),
                store.edge_count()
            );
            Ok(with_cache(store, capacity))
        }
    }
}

pub async fn build_explorer(config: &Config) -> Result<GraphExplorer> {
    let store = open_store(config).await?;
    Ok(GraphExplorer::new(store, config.request_timeout()))
}

fn with_cache<S: GraphStore + 'static>(store: S, capacity: usize) -> Arc<dyn GraphStore> {
    if capacity > 0 {
        log::info!("Node cache enabled ({} entries)", capacity);
        Arc::new(CachedGraphStore::new(store, capacity))
    } else {
        Arc::new(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ResolveRequest;
    use std::fs;
    use tempfile::TempDir;

    const FIXTURE: &str = r#"{
        "nodes": [{"id": "phone:+7999", "label": "+7999"}],
        "lookups": [{"kind": "phone_no", "value": "+7999", "nodeId": "phone:+7999"}]
    }"#;

    #[tokio::test]
    async fn test_memory_store_from_fixture() {
        let temp_dir = TempDir::new().unwrap();
        let fixture_path = temp_dir.path().join("graph.json");
        fs::write(&fixture_path, FIXTURE).unwrap();

        let config = Config::from_toml(&format!(
            "[graph]\ndb_path = \"unused.db\"\nstore = \"memory\"\nfixture_path = {:?}\n\n[explorer]\nnode_cache_capacity = 8\n",
            fixture_path.display().to_string()
        ))
        .unwrap();

        let explorer = build_explorer(&config).await.unwrap();
        let response = explorer
            .resolve(ResolveRequest {
                phone_nos: vec!["+7999".into()],
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(response.nodes[0].id, "phone:+7999");
    }

    #[tokio::test]
    async fn test_sqlite_store_runs_migrations() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("graph.db");
        let config = Config::from_toml(&format!(
            "[graph]\ndb_path = {:?}\nmigrations_dir = {:?}\n",
            db_path.display().to_string(),
            migrate::default_migrations_dir().display().to_string()
        ))
        .unwrap();

        let store = open_store(&config).await.unwrap();
        assert!(store.ping().await.is_ok());
        assert!(db_path.exists());
    }
}
