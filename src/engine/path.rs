//! Shortest-path orchestration: vertex search in the store, then edge records
//! for every hop.

use crate::error::Result;
use crate::graph::Edge;
use crate::store::{EdgeKinds, GraphStore};

/// Vertices of the shortest path plus one edge per hop; both empty if none.
#[derive(Debug, Default)]
pub struct FoundPath {
    pub vertices: Vec<String>,
    pub edges: Vec<Edge>,
}

impl FoundPath {
    pub fn length(&self) -> usize {
        self.vertices.len().saturating_sub(1)
    }
}

pub async fn find_path(
    store: &dyn GraphStore,
    from: &str,
    to: &str,
    max_hops: usize,
    edge_kinds: &EdgeKinds,
) -> Result<FoundPath> {
    if from.is_empty() || to.is_empty() {
        return Ok(FoundPath::default());
    }

    let vertices = store.shortest_path_vertices(from, to, max_hops, edge_kinds).await?;

    let mut edges = Vec::with_capacity(vertices.len().saturating_sub(1));
    for hop in vertices.windows(2) {
        let (src, dst) = (&hop[0], &hop[1]);
        let edge = match store.find_edge(src, dst, edge_kinds).await? {
            Some(edge) => edge,
            None => {
                log::warn!("No stored edge for path hop {} -> {}, using placeholder", src, dst);
                Edge::path_fallback(src, dst)
            }
        };
        edges.push(edge);
    }

    log::debug!("Path {} -> {}: {} hop(s)", from, to, edges.len());
    Ok(FoundPath { vertices, edges })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use crate::graph::{Attrs, Flags, Node};
    use crate::store::InMemoryGraphStore;

    /// Reports a fixed path but stores no edges.
    struct EdgelessStore;

    #[async_trait]
    impl GraphStore for EdgelessStore {
        async fn find_nodes_by_ids(&self, _ids: &[String]) -> Result<Vec<Node>> {
            Ok(Vec::new())
        }

        async fn find_nodes_by_lookup(&self, _kind: &str, _values: &[String]) -> Result<Vec<Node>> {
            Ok(Vec::new())
        }

        async fn find_out_edges(&self, _: &str, _: &str, _: usize, _: &EdgeKinds) -> Result<Vec<Edge>> {
            Ok(Vec::new())
        }

        async fn find_edge(&self, _: &str, _: &str, _: &EdgeKinds) -> Result<Option<Edge>> {
            Ok(None)
        }

        async fn shortest_path_vertices(&self, from: &str, to: &str, _: usize, _: &EdgeKinds) -> Result<Vec<String>> {
            Ok(vec![from.to_string(), "mid:1".to_string(), to.to_string()])
        }
    }

    #[tokio::test]
    async fn test_edges_follow_path() {
        let mut store = InMemoryGraphStore::new();
        store
            .insert_edge(Edge::new(Some("e1".into()), "a", "b", Some("t".into()), Attrs::new(), Flags::new()))
            .insert_edge(Edge::new(Some("e0".into()), "a", "b", Some("s".into()), Attrs::new(), Flags::new()))
            .insert_edge(Edge::new(Some("e2".into()), "b", "c", Some("t".into()), Attrs::new(), Flags::new()));

        let kinds: EdgeKinds = ["t".to_string()].into_iter().collect();
        let path = find_path(&store, "a", "c", 5, &kinds).await.unwrap();
        assert_eq!(path.vertices, vec!["a", "b", "c"]);
        assert_eq!(path.length(), 2);
        let ids: Vec<_> = path.edges.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["e1", "e2"]);
    }

    #[tokio::test]
    async fn test_missing_edge_synthesized() {
        let path = find_path(&EdgelessStore, "a:1", "b:2", 5, &EdgeKinds::new()).await.unwrap();
        assert_eq!(path.edges.len(), 2);
        assert_eq!(path.edges[0].id, "a:1->mid:1:path");
        assert_eq!(path.edges[1].kind, "path");
        assert!(path.edges[1].attrs.is_empty());
    }

    #[tokio::test]
    async fn test_blank_endpoints_give_empty_path() {
        let path = find_path(&EdgelessStore, "", "b:2", 5, &EdgeKinds::new()).await.unwrap();
        assert!(path.vertices.is_empty());
        assert_eq!(path.length(), 0);
    }
}
