use anyhow::Result;
use graph_explorer::api::HttpServer;
use graph_explorer::app;
use graph_explorer::db::{migrate, Db};
use graph_explorer::error::GraphError;
use graph_explorer::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;

    // RUST_LOG wins over the configured level
    env_logger::Builder::from_env(
        env_logger::Env::default()
            .filter_or("RUST_LOG", config.graph.log_level.as_str())
    ).init();

    let args: Vec<String> = std::env::args().collect();
    let command = args.get(1).map(|s| s.as_str()).unwrap_or("verify");

    match command {
        "serve" => run_http_server(config).await?,
        "verify" => run_schema_verification(config).await?,
        other => anyhow::bail!("Unknown command '{}'. Usage: graph-explorer [serve|verify]", other),
    }

    Ok(())
}

/// Serve the graph API over HTTP
async fn run_http_server(config: Config) -> Result<()> {
    log::info!("Starting graph-explorer v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Store backend: {:?}", config.graph.store);
    log::info!("Request timeout: {} ms", config.explorer.request_timeout_ms);

    let explorer = app::build_explorer(&config).await?;
    let server = HttpServer::new(explorer, &config.http_server);
    server.run().await?;

    Ok(())
}

/// Run migrations and check the SQLite schema
async fn run_schema_verification(config: Config) -> Result<()> {
    log::info!("Starting graph-explorer v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Database path: {}", config.db_path().display());

    let db = app::open_database(&config).await?;
    verify_database_schema(&db).await?;

    Ok(())
}

/// Verify that all expected database objects exist
async fn verify_database_schema(db: &Db) -> Result<()> {
    db.with_connection(|conn| {
        let mut stmt = conn.prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")?;
        let tables: Vec<String> = stmt.query_map([], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;

        let mut missing = Vec::new();
        for table in ["nodes", "edges", "node_lookup", "schema_migrations"] {
            if tables.iter().any(|t| t == table) {
                log::debug!("✓ Table exists: {}", table);
            } else {
                log::error!("Missing table: {}", table);
                missing.push(table);
            }
        }
        if !missing.is_empty() {
            return Err(GraphError::Config(format!("Missing tables: {}", missing.join(", "))));
        }

        let mut stmt = conn.prepare("SELECT name FROM sqlite_master WHERE type='index' AND name LIKE 'idx_%'")?;
        let indexes: Vec<String> = stmt.query_map([], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;
        for index_name in ["idx_edges_src_dst", "idx_node_lookup_node"] {
            if !indexes.iter().any(|i| i == index_name) {
                return Err(GraphError::Config(format!("Missing index: {}", index_name)));
            }
            log::debug!("✓ Index exists: {}", index_name);
        }

        let applied = migrate::get_applied_migrations(conn)?;
        log::debug!("✓ {} migrations applied", applied.len());

        let journal_mode: String = conn.query_row("PRAGMA journal_mode", [], |row| row.get(0))?;
        if journal_mode.to_uppercase() != "WAL" {
            return Err(GraphError::Config(format!("Journal mode is not WAL: {}", journal_mode)));
        }
        log::debug!("✓ Journal mode: WAL");

        let integrity: String = conn.query_row("PRAGMA integrity_check", [], |row| row.get(0))?;
        if integrity != "ok" {
            return Err(GraphError::Config(format!("Database integrity check failed: {}", integrity)));
        }

        let (nodes, edges): (i64, i64) = conn.query_row(
            "SELECT (SELECT COUNT(*) FROM nodes), (SELECT COUNT(*) FROM edges)",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        log::info!("✓ Database integrity: OK ({} nodes, {} edges)", nodes, edges);

        Ok(())
    }).await?;

    log::info!("✓ Database schema verification complete");
    Ok(())
}
