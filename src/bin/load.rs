use anyhow::{Context, Result};
use clap::Parser;
use graph_explorer::app;
use graph_explorer::graph::GraphFixture;
use graph_explorer::store::SqliteGraphStore;
use graph_explorer::Config;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "load")]
#[command(about = "Load nodes, edges and lookup entries from a JSON fixture into the graph database")]
struct Args {
    /// JSON fixture with `nodes`, `edges` and `lookups` arrays
    fixture: PathBuf,

    /// Delete every existing node, edge and lookup entry first
    #[arg(short, long)]
    replace: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = Config::load()?;

    env_logger::Builder::from_env(
        env_logger::Env::default()
            .filter_or("RUST_LOG", config.graph.log_level.as_str())
    ).init();

    log::info!("Loading {} into {}", args.fixture.display(), config.db_path().display());
    let fixture = GraphFixture::from_file(&args.fixture)
        .with_context(|| format!("Failed to read fixture {}", args.fixture.display()))?;

    let db = app::open_database(&config).await?;
    let store = SqliteGraphStore::new(db);

    let start = Instant::now();
    let stats = store.import_fixture(fixture, args.replace).await?;

    log::info!(
        "Loaded {} nodes, {} edges, {} lookup entries in {:.2?}{}",
        stats.nodes,
        stats.edges,
        stats.lookups,
        start.elapsed(),
        if args.replace { " (replaced existing graph)" } else { "" }
    );

    Ok(())
}
