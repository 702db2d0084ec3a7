//! Exploration engine: one-hop expansion, identifier resolution and shortest
//! paths over any [`GraphStore`].
//!
//! Every operation normalizes its input, talks to the store and materializes
//! node records, all under one request deadline. Nothing partial is returned
//! when the deadline passes.

pub mod materialize;
pub mod normalize;
pub mod paginator;
pub mod path;
pub mod resolver;
mod types;

pub use types::{
    GraphResponse, OneHopRequest, PathResponse, ResolveRequest, ResolveResponse, ShortestPathRequest,
};

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{GraphError, Result};
use crate::store::GraphStore;
use materialize::materialize_nodes;
use resolver::ExternalKeys;

/// Stateless query facade; cheap to clone and share across handlers.
#[derive(Clone)]
pub struct GraphExplorer {
    store: Arc<dyn GraphStore>,
    timeout: Duration,
}

impl GraphExplorer {
    pub fn new(store: Arc<dyn GraphStore>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    pub fn store(&self) -> &Arc<dyn GraphStore> {
        &self.store
    }

    /// Outgoing edges of the resolved seeds, one keyset page per seed.
    pub async fn one_hop(&self, request: OneHopRequest) -> Result<GraphResponse> {
        self.with_deadline(async {
            let seeds = normalize::clean_values(&request.seeds);
            let keys = external_keys(&request.ids, &request.phone_nos, &request.party_rks);
            let cursor = normalize::cursor(request.cursor.as_deref());
            let limit = normalize::page_limit(request.limit);
            let edge_kinds = normalize::edge_kinds(&request.edge_kinds);

            let seed_ids = resolver::resolve_seed_ids(self.store.as_ref(), &seeds, &keys).await?;
            if seed_ids.is_empty() {
                log::debug!("One-hop: no seeds resolved");
                return Ok(GraphResponse::default());
            }

            let pages = paginator::expand(Arc::clone(&self.store), &seed_ids, &cursor, limit, &edge_kinds).await?;
            let nodes = materialize_nodes(self.store.as_ref(), &pages.node_ids).await?;

            Ok(GraphResponse {
                nodes,
                edges: pages.edges,
                pages: pages.pages,
            })
        })
        .await
    }

    /// Node records matching the given external keys.
    pub async fn resolve(&self, request: ResolveRequest) -> Result<ResolveResponse> {
        self.with_deadline(async {
            let keys = external_keys(&request.ids, &request.phone_nos, &request.party_rks);
            let nodes = resolver::resolve_nodes(self.store.as_ref(), &keys).await?;
            Ok(ResolveResponse { nodes })
        })
        .await
    }

    /// Shortest directed path `from -> to`; an empty response when there is none.
    pub async fn shortest_path(&self, request: ShortestPathRequest) -> Result<PathResponse> {
        self.with_deadline(async {
            let from = request.from.as_deref().map(str::trim).unwrap_or_default();
            let to = request.to.as_deref().map(str::trim).unwrap_or_default();
            let max_hops = normalize::max_hops(request.max_hops);
            let edge_kinds = normalize::edge_kinds(&request.edge_kinds);

            let found = path::find_path(self.store.as_ref(), from, to, max_hops, &edge_kinds).await?;
            if found.vertices.is_empty() {
                return Ok(PathResponse::default());
            }

            let nodes = materialize_nodes(self.store.as_ref(), &found.vertices).await?;
            Ok(PathResponse {
                length: found.length(),
                nodes,
                edges: found.edges,
            })
        })
        .await
    }

    async fn with_deadline<T>(&self, work: impl Future<Output = Result<T>>) -> Result<T> {
        match tokio::time::timeout(self.timeout, work).await {
            Ok(result) => result,
            Err(_) => {
                let millis = u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX);
                log::warn!("Request abandoned after {} ms", millis);
                Err(GraphError::Timeout(millis))
            }
        }
    }
}

fn external_keys(ids: &[String], phone_nos: &[String], party_rks: &[String]) -> ExternalKeys {
    ExternalKeys {
        ids: normalize::clean_values(ids),
        phone_nos: normalize::clean_values(phone_nos),
        party_rks: normalize::clean_values(party_rks),
    }
}
