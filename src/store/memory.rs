//! In-memory `GraphStore`, used for fixtures and tests.

use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::convert::Infallible;

use super::path::PathSearch;
use super::{kind_allowed, EdgeKinds, GraphStore};
use crate::error::Result;
use crate::graph::{Edge, GraphFixture, Node};

/// Immutable snapshot of a property graph held in memory.
///
/// Out-edges are kept sorted by `(dst, kind, id)` so keyset pagination is a
/// binary search plus a slice scan.
#[derive(Debug, Default, Clone)]
pub struct InMemoryGraphStore {
    nodes: HashMap<String, Node>,
    out_edges: HashMap<String, Vec<Edge>>,
    edge_ids: HashSet<String>,
    lookup: HashMap<(String, String), BTreeSet<String>>,
}

impl InMemoryGraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fixture(fixture: &GraphFixture) -> Self {
        let mut store = Self::new();
        for node in fixture.nodes() {
            store.insert_node(node);
        }
        for edge in fixture.edges() {
            store.insert_edge(edge);
        }
        for entry in &fixture.lookups {
            store.insert_lookup(&entry.kind, &entry.value, &entry.node_id);
        }
        store
    }

    /// Insert or replace a node.
    pub fn insert_node(&mut self, node: Node) -> &mut Self {
        self.nodes.insert(node.id.clone(), node);
        self
    }

    /// Insert an edge; a second edge with an existing id is ignored.
    pub fn insert_edge(&mut self, edge: Edge) -> &mut Self {
        if !self.edge_ids.insert(edge.id.clone()) {
            log::warn!("Duplicate edge id {} ignored", edge.id);
            return self;
        }
        let edges = self.out_edges.entry(edge.src.clone()).or_default();
        let pos = edges
            .binary_search_by(|e| edge_order(e).cmp(&edge_order(&edge)))
            .unwrap_or_else(|p| p);
        edges.insert(pos, edge);
        self
    }

    pub fn insert_lookup(&mut self, lookup_kind: &str, value: &str, node_id: &str) -> &mut Self {
        self.lookup
            .entry((lookup_kind.to_string(), value.to_string()))
            .or_default()
            .insert(node_id.to_string());
        self
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_ids.len()
    }

    fn neighbors(&self, frontier: &[String], edge_kinds: &EdgeKinds) -> HashMap<String, Vec<String>> {
        let mut level = HashMap::new();
        for vertex in frontier {
            let Some(edges) = self.out_edges.get(vertex) else {
                continue;
            };
            let outs: Vec<String> = edges
                .iter()
                .filter(|e| kind_allowed(edge_kinds, &e.kind))
                .map(|e| e.dst.clone())
                .collect();
            level.insert(vertex.clone(), outs);
        }
        level
    }
}

fn edge_order(edge: &Edge) -> (&str, &str, &str) {
    (&edge.dst, &edge.kind, &edge.id)
}

#[async_trait]
impl GraphStore for InMemoryGraphStore {
    async fn find_nodes_by_ids(&self, ids: &[String]) -> Result<Vec<Node>> {
        let mut seen = HashSet::new();
        Ok(ids
            .iter()
            .filter(|id| seen.insert(id.as_str()))
            .filter_map(|id| self.nodes.get(id).cloned())
            .collect())
    }

    async fn find_nodes_by_lookup(&self, lookup_kind: &str, values: &[String]) -> Result<Vec<Node>> {
        let mut seen = HashSet::new();
        let mut found = Vec::new();
        for value in values {
            let Some(node_ids) = self.lookup.get(&(lookup_kind.to_string(), value.clone())) else {
                continue;
            };
            // Lookup rows pointing at missing nodes are dropped, like an inner join.
            for node_id in node_ids {
                if let Some(node) = self.nodes.get(node_id) {
                    if seen.insert(node_id.as_str()) {
                        found.push(node.clone());
                    }
                }
            }
        }
        Ok(found)
    }

    async fn find_out_edges(
        &self,
        src: &str,
        cursor: &str,
        limit: usize,
        edge_kinds: &EdgeKinds,
    ) -> Result<Vec<Edge>> {
        let Some(edges) = self.out_edges.get(src) else {
            return Ok(Vec::new());
        };
        let start = edges.partition_point(|e| e.dst.as_str() <= cursor);
        Ok(edges[start..]
            .iter()
            .filter(|e| kind_allowed(edge_kinds, &e.kind))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn find_edge(&self, src: &str, dst: &str, edge_kinds: &EdgeKinds) -> Result<Option<Edge>> {
        let Some(edges) = self.out_edges.get(src) else {
            return Ok(None);
        };
        let start = edges.partition_point(|e| e.dst.as_str() < dst);
        Ok(edges[start..]
            .iter()
            .take_while(|e| e.dst == dst)
            .find(|e| kind_allowed(edge_kinds, &e.kind))
            .cloned())
    }

    async fn shortest_path_vertices(
        &self,
        from: &str,
        to: &str,
        max_hops: usize,
        edge_kinds: &EdgeKinds,
    ) -> Result<Vec<String>> {
        if from.is_empty() || to.is_empty() {
            return Ok(Vec::new());
        }
        if from == to && !self.nodes.contains_key(from) {
            return Ok(Vec::new());
        }

        let path = PathSearch::new(from, to, max_hops)
            .run(|frontier| Ok::<_, Infallible>(self.neighbors(frontier, edge_kinds)));
        Ok(match path {
            Ok(path) => path,
            Err(never) => match never {},
        })
    }
}
