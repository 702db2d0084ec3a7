use async_trait::async_trait;
use lru::LruCache;
use std::collections::{HashMap, HashSet};
use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard};

use super::{EdgeKinds, GraphStore};
use crate::error::Result;
use crate::graph::{Edge, Node};

/// Thread-safe LRU cache of node records in front of another store
///
/// Only `find_nodes_by_ids` is served from the cache; edges, lookups and path
/// search always go to the inner store. Absent ids are not cached.
pub struct CachedGraphStore<S> {
    inner: S,
    nodes: Mutex<LruCache<String, Node>>,
}

impl<S: GraphStore> CachedGraphStore<S> {
    /// Wrap `inner` with a cache holding at most `capacity` nodes (minimum 1).
    pub fn new(inner: S, capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner,
            nodes: Mutex::new(LruCache::new(cap)),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Number of cached nodes
    pub fn len(&self) -> usize {
        self.cache().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache().is_empty()
    }

    pub fn clear(&self) {
        self.cache().clear();
    }

    fn cache(&self) -> MutexGuard<'_, LruCache<String, Node>> {
        // A panic while holding the lock cannot leave a half-written entry.
        self.nodes.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl<S: GraphStore> GraphStore for CachedGraphStore<S> {
    async fn find_nodes_by_ids(&self, ids: &[String]) -> Result<Vec<Node>> {
        let mut hits = Vec::with_capacity(ids.len());
        let mut misses = Vec::new();
        let mut missed = HashSet::new();
        {
            let mut cache = self.cache();
            for id in ids {
                let hit = cache.get(id).cloned();
                if hit.is_none() && missed.insert(id.as_str()) {
                    misses.push(id.clone());
                }
                hits.push((id, hit));
            }
        }

        if !misses.is_empty() {
            log::debug!("Node cache: {} misses out of {} ids", misses.len(), ids.len());
            let fetched = self.inner.find_nodes_by_ids(&misses).await?;
            let mut cache = self.cache();
            for node in &fetched {
                cache.put(node.id.clone(), node.clone());
            }
            let mut fetched: HashMap<String, Node> =
                fetched.into_iter().map(|n| (n.id.clone(), n)).collect();
            for (id, hit) in hits.iter_mut() {
                if hit.is_none() {
                    *hit = fetched.remove(id.as_str());
                }
            }
        }

        let mut seen = HashSet::new();
        Ok(hits
            .into_iter()
            .filter(|(id, _)| seen.insert(id.as_str()))
            .filter_map(|(_, node)| node)
            .collect())
    }

    async fn find_nodes_by_lookup(&self, lookup_kind: &str, values: &[String]) -> Result<Vec<Node>> {
        self.inner.find_nodes_by_lookup(lookup_kind, values).await
    }

    async fn find_out_edges(
        &self,
        src: &str,
        cursor: &str,
        limit: usize,
        edge_kinds: &EdgeKinds,
    ) -> Result<Vec<Edge>> {
        self.inner.find_out_edges(src, cursor, limit, edge_kinds).await
    }

    async fn find_edge(&self, src: &str, dst: &str, edge_kinds: &EdgeKinds) -> Result<Option<Edge>> {
        self.inner.find_edge(src, dst, edge_kinds).await
    }

    async fn shortest_path_vertices(
        &self,
        from: &str,
        to: &str,
        max_hops: usize,
        edge_kinds: &EdgeKinds,
    ) -> Result<Vec<String>> {
        self.inner.shortest_path_vertices(from, to, max_hops, edge_kinds).await
    }

    async fn ping(&self) -> Result<()> {
        self.inner.ping().await
    }
}
