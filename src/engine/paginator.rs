//! One-hop expansion: a keyset page of out-edges per seed, fetched concurrently.

use std::collections::HashSet;
use std::sync::Arc;
use tokio::task::JoinSet;

use crate::error::{GraphError, Result};
use crate::graph::{Edge, SeedPage};
use crate::store::{EdgeKinds, GraphStore};

use super::normalize::OrderedIds;

/// Page of one seed before cross-seed merging.
#[derive(Debug)]
struct SeedFetch {
    edges: Vec<Edge>,
    page: SeedPage,
}

/// Merged result of a one-hop expansion.
#[derive(Debug, Default)]
pub struct OneHopPages {
    pub edges: Vec<Edge>,
    /// Seeds, then every edge endpoint, in first-seen order.
    pub node_ids: Vec<String>,
    pub pages: Vec<SeedPage>,
}

/// Fetch `limit` out-edges with `dst > cursor` for every seed.
///
/// One task per seed; results land in the seed's slot and are merged in seed
/// order, so the output does not depend on task completion order. The first
/// failing seed fails the whole expansion and the remaining tasks are aborted
/// when the set is dropped.
pub async fn expand(
    store: Arc<dyn GraphStore>,
    seeds: &[String],
    cursor: &str,
    limit: usize,
    edge_kinds: &EdgeKinds,
) -> Result<OneHopPages> {
    if seeds.is_empty() {
        return Ok(OneHopPages::default());
    }

    let mut tasks = JoinSet::new();
    for (slot, seed) in seeds.iter().enumerate() {
        let store = Arc::clone(&store);
        let seed = seed.clone();
        let cursor = cursor.to_string();
        let edge_kinds = edge_kinds.clone();
        tasks.spawn(async move {
            let fetched = fetch_page(store.as_ref(), seed, cursor, limit, &edge_kinds).await;
            (slot, fetched)
        });
    }

    let mut slots: Vec<Option<SeedFetch>> = seeds.iter().map(|_| None).collect();
    while let Some(joined) = tasks.join_next().await {
        let (slot, fetched) = joined?;
        slots[slot] = Some(fetched?);
    }

    let mut node_ids = OrderedIds::default();
    node_ids.extend(seeds.iter().map(String::as_str));
    let mut edge_ids = HashSet::new();
    let mut edges = Vec::new();
    let mut pages = Vec::with_capacity(seeds.len());

    for fetch in slots {
        let fetch = fetch.ok_or_else(|| GraphError::TaskJoin("seed task produced no result".to_string()))?;
        for edge in fetch.edges {
            if !edge_ids.insert(edge.id.clone()) {
                continue;
            }
            node_ids.push(&edge.src);
            node_ids.push(&edge.dst);
            edges.push(edge);
        }
        pages.push(fetch.page);
    }

    log::debug!(
        "One-hop: {} seed(s), {} edge(s), {} node(s), {} page(s) with more",
        seeds.len(),
        edges.len(),
        node_ids.len(),
        pages.iter().filter(|p| p.has_next).count()
    );

    Ok(OneHopPages {
        edges,
        node_ids: node_ids.into_vec(),
        pages,
    })
}

async fn fetch_page(
    store: &dyn GraphStore,
    seed: String,
    cursor: String,
    limit: usize,
    edge_kinds: &EdgeKinds,
) -> Result<SeedFetch> {
    let mut edges = store.find_out_edges(&seed, &cursor, limit + 1, edge_kinds).await?;
    let has_next = edges.len() > limit;
    edges.truncate(limit);
    let end_cursor = edges.last().map(|e| e.dst.clone()).unwrap_or(cursor);

    Ok(SeedFetch {
        edges,
        page: SeedPage {
            seed,
            end_cursor,
            has_next,
        },
    })
}
