//! Graph storage interface consumed by the exploration engine, plus backends.

mod cached;
mod memory;
pub mod path;
mod sqlite;

pub use cached::CachedGraphStore;
pub use memory::InMemoryGraphStore;
pub use path::{PathSearch, MAX_PATH_HOPS};
pub use sqlite::{ImportStats, SqliteGraphStore};

use async_trait::async_trait;
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::error::Result;
use crate::graph::{Edge, Node};

/// Normalized edge-kind filter; empty means every kind.
pub type EdgeKinds = BTreeSet<String>;

/// Read-only access to nodes, edges and the external-key lookup index.
///
/// Implementations must be safe for concurrent readers. Absent data is never
/// an error: lookups return empty collections or `None`.
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Nodes with the given ids, in input order, duplicates removed.
    async fn find_nodes_by_ids(&self, ids: &[String]) -> Result<Vec<Node>>;

    /// Distinct nodes reachable through `(lookup_kind, value)` entries, grouped
    /// by value in input order and ordered by id within a value.
    async fn find_nodes_by_lookup(&self, lookup_kind: &str, values: &[String]) -> Result<Vec<Node>>;

    /// Up to `limit` out-edges of `src` with `dst > cursor`, ascending by
    /// `(dst, kind, id)`, restricted to `edge_kinds` unless empty.
    ///
    /// The cursor is a bare `dst`. When a page ends inside a run of parallel
    /// edges to the same `dst`, the rest of that run is not reachable from the
    /// next page.
    async fn find_out_edges(
        &self,
        src: &str,
        cursor: &str,
        limit: usize,
        edge_kinds: &EdgeKinds,
    ) -> Result<Vec<Edge>>;

    /// First `src -> dst` edge by `(kind, id)` among the allowed kinds.
    async fn find_edge(&self, src: &str, dst: &str, edge_kinds: &EdgeKinds) -> Result<Option<Edge>>;

    /// Shortest simple directed path from `from` to `to` with at most
    /// `max_hops` edges, lexicographically smallest on ties; empty if none.
    /// See [`PathSearch`] for the exact semantics.
    async fn shortest_path_vertices(
        &self,
        from: &str,
        to: &str,
        max_hops: usize,
        edge_kinds: &EdgeKinds,
    ) -> Result<Vec<String>>;

    /// Cheap liveness probe used by the health endpoint.
    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

#[async_trait]
impl<S: GraphStore + ?Sized> GraphStore for Arc<S> {
    async fn find_nodes_by_ids(&self, ids: &[String]) -> Result<Vec<Node>> {
        (**self).find_nodes_by_ids(ids).await
    }

    async fn find_nodes_by_lookup(&self, lookup_kind: &str, values: &[String]) -> Result<Vec<Node>> {
        (**self).find_nodes_by_lookup(lookup_kind, values).await
    }

    async fn find_out_edges(
        &self,
        src: &str,
        cursor: &str,
        limit: usize,
        edge_kinds: &EdgeKinds,
    ) -> Result<Vec<Edge>> {
        (**self).find_out_edges(src, cursor, limit, edge_kinds).await
    }

    async fn find_edge(&self, src: &str, dst: &str, edge_kinds: &EdgeKinds) -> Result<Option<Edge>> {
        (**self).find_edge(src, dst, edge_kinds).await
    }

    async fn shortest_path_vertices(
        &self,
        from: &str,
        to: &str,
        max_hops: usize,
        edge_kinds: &EdgeKinds,
    ) -> Result<Vec<String>> {
        (**self).shortest_path_vertices(from, to, max_hops, edge_kinds).await
    }

    async fn ping(&self) -> Result<()> {
        (**self).ping().await
    }
}

/// `true` when `kind` passes the filter.
pub(crate) fn kind_allowed(edge_kinds: &EdgeKinds, kind: &str) -> bool {
    edge_kinds.is_empty() || edge_kinds.contains(kind)
}
