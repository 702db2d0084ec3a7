use anyhow::Result;
use clap::{Parser, Subcommand};
use graph_explorer::app;
use graph_explorer::engine::{OneHopRequest, ResolveRequest, ShortestPathRequest};
use graph_explorer::Config;
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(name = "explore")]
#[command(about = "Run graph queries against the configured store and print JSON")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Outgoing edges of the given seeds, one page per seed
    OneHop {
        /// Canonical node ids
        #[arg(long = "seed")]
        seeds: Vec<String>,
        /// Ids resolved directly and through `id` lookups
        #[arg(long = "id")]
        ids: Vec<String>,
        #[arg(long = "phone")]
        phone_nos: Vec<String>,
        #[arg(long = "party")]
        party_rks: Vec<String>,
        /// `endCursor` of the previous page
        #[arg(long)]
        cursor: Option<String>,
        #[arg(long, default_value_t = 50)]
        limit: i64,
        #[arg(long = "kind")]
        edge_kinds: Vec<String>,
    },
    /// Node records for external keys
    Resolve {
        #[arg(long = "id")]
        ids: Vec<String>,
        #[arg(long = "phone")]
        phone_nos: Vec<String>,
        #[arg(long = "party")]
        party_rks: Vec<String>,
    },
    /// Shortest directed path between two nodes
    Path {
        from: String,
        to: String,
        #[arg(long = "kind")]
        edge_kinds: Vec<String>,
        #[arg(long, default_value_t = 6)]
        max_hops: i64,
    },
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = Config::load()?;

    env_logger::Builder::from_env(
        env_logger::Env::default()
            .filter_or("RUST_LOG", config.graph.log_level.as_str())
    ).init();

    let explorer = app::build_explorer(&config).await?;

    match args.command {
        Command::OneHop { seeds, ids, phone_nos, party_rks, cursor, limit, edge_kinds } => {
            let response = explorer
                .one_hop(OneHopRequest {
                    seeds,
                    ids,
                    phone_nos,
                    party_rks,
                    cursor,
                    limit: Some(limit),
                    edge_kinds,
                })
                .await?;
            print_json(&response)?;
        }
        Command::Resolve { ids, phone_nos, party_rks } => {
            let response = explorer
                .resolve(ResolveRequest { ids, phone_nos, party_rks })
                .await?;
            print_json(&response)?;
        }
        Command::Path { from, to, edge_kinds, max_hops } => {
            let response = explorer
                .shortest_path(ShortestPathRequest {
                    from: Some(from),
                    to: Some(to),
                    edge_kinds,
                    max_hops: Some(max_hops),
                })
                .await?;
            print_json(&response)?;
        }
    }

    Ok(())
}
