//! Bounded shortest simple path search shared by every `GraphStore`.
//!
//! Level-synchronous BFS over an arena of path nodes. Each frontier is kept in
//! lexicographic path order and neighbours are expanded in ascending id order,
//! so the first path to claim a vertex is the lexicographically smallest
//! shortest path to it. The first path to reach the target is therefore the
//! minimum-hop path with the smallest vertex sequence, and claimed vertices
//! never repeat within a path.
//!
//! Backends drive the search one level at a time: ask for
//! [`PathSearch::frontier_vertices`], fetch their out-neighbours in one batch,
//! then call [`PathSearch::advance`].

use std::collections::{HashMap, HashSet};

/// Hard bound on path length, whatever the caller asks for.
pub const MAX_PATH_HOPS: usize = 20;

/// Clamp a requested hop bound into `[1, MAX_PATH_HOPS]`.
pub fn clamp_hops(max_hops: usize) -> usize {
    max_hops.clamp(1, MAX_PATH_HOPS)
}

#[derive(Debug)]
struct PathNode {
    vertex: String,
    parent: Option<usize>,
}

#[derive(Debug)]
pub struct PathSearch {
    target: String,
    max_hops: usize,
    arena: Vec<PathNode>,
    claimed: HashSet<String>,
    frontier: Vec<usize>,
    depth: usize,
    found: Option<usize>,
}

impl PathSearch {
    /// Start a search from `from` towards `to`.
    ///
    /// `from == to` is found immediately; callers decide whether the vertex
    /// exists before trusting that result.
    pub fn new(from: &str, to: &str, max_hops: usize) -> Self {
        let arena = vec![PathNode {
            vertex: from.to_string(),
            parent: None,
        }];
        let mut claimed = HashSet::new();
        claimed.insert(from.to_string());

        Self {
            target: to.to_string(),
            max_hops: clamp_hops(max_hops),
            arena,
            claimed,
            frontier: vec![0],
            depth: 0,
            found: (from == to).then_some(0),
        }
    }

    /// True once the target is reached, the frontier is empty or the hop
    /// bound forbids another level.
    pub fn is_done(&self) -> bool {
        self.found.is_some() || self.frontier.is_empty() || self.depth >= self.max_hops
    }

    /// Vertices whose out-neighbours the next [`advance`](Self::advance) needs.
    pub fn frontier_vertices(&self) -> Vec<String> {
        self.frontier
            .iter()
            .map(|&idx| self.arena[idx].vertex.clone())
            .collect()
    }

    /// Extend every frontier path by one hop.
    ///
    /// `adjacency` maps a frontier vertex to its (already kind-filtered)
    /// out-neighbours; missing entries mean no outgoing edges.
    pub fn advance(&mut self, adjacency: &HashMap<String, Vec<String>>) {
        if self.is_done() {
            return;
        }

        let mut next = Vec::new();
        for &idx in &self.frontier {
            let Some(outs) = adjacency.get(&self.arena[idx].vertex) else {
                continue;
            };
            let mut outs: Vec<&String> = outs.iter().collect();
            outs.sort();
            outs.dedup();

            for dst in outs {
                if !self.claimed.insert(dst.clone()) {
                    continue;
                }
                self.arena.push(PathNode {
                    vertex: dst.clone(),
                    parent: Some(idx),
                });
                let child = self.arena.len() - 1;

                // A path that reached the target is never extended.
                if *dst == self.target {
                    self.found = Some(child);
                    self.depth += 1;
                    return;
                }
                next.push(child);
            }
        }

        self.frontier = next;
        self.depth += 1;
    }

    /// Vertex sequence of the found path, or empty if none (yet).
    pub fn path(&self) -> Vec<String> {
        let Some(mut idx) = self.found else {
            return Vec::new();
        };

        let mut path = Vec::with_capacity(self.depth + 1);
        loop {
            let node = &self.arena[idx];
            path.push(node.vertex.clone());
            match node.parent {
                Some(parent) => idx = parent,
                None => break,
            }
        }
        path.reverse();
        path
    }

    /// Run to completion against a synchronous adjacency source.
    pub fn run<F, E>(mut self, mut neighbors: F) -> Result<Vec<String>, E>
    where
        F: FnMut(&[String]) -> Result<HashMap<String, Vec<String>>, E>,
    {
        while !self.is_done() {
            let level = neighbors(&self.frontier_vertices())?;
            self.advance(&level);
        }
        Ok(self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    fn search(edges: &[(&str, &str)], from: &str, to: &str, max_hops: usize) -> Vec<String> {
        let mut adjacency: HashMap<String, Vec<String>> = HashMap::new();
        for (src, dst) in edges {
            adjacency.entry(src.to_string()).or_default().push(dst.to_string());
        }
        PathSearch::new(from, to, max_hops)
            .run(|frontier| {
                Ok::<_, Infallible>(
                    frontier
                        .iter()
                        .filter_map(|v| adjacency.get(v).map(|outs| (v.clone(), outs.clone())))
                        .collect(),
                )
            })
            .unwrap()
    }

    #[test]
    fn test_clamp_hops() {
        assert_eq!(clamp_hops(0), 1);
        assert_eq!(clamp_hops(6), 6);
        assert_eq!(clamp_hops(100), 20);
    }

    #[test]
    fn test_linear_path() {
        let path = search(&[("a", "b"), ("b", "c")], "a", "c", 6);
        assert_eq!(path, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_lexicographic_tie_break() {
        // Inserted in reverse order on purpose.
        let edges = [("a", "c"), ("a", "b"), ("c", "z"), ("b", "z")];
        assert_eq!(search(&edges, "a", "z", 5), vec!["a", "b", "z"]);
    }

    #[test]
    fn test_tie_break_is_on_whole_sequence() {
        // Both middle vertices are reachable at depth 1; "a,m,x,t" beats "a,n,b,t"
        // even though "b" < "x", because the prefix decides first.
        let edges = [("a", "n"), ("a", "m"), ("n", "b"), ("m", "x"), ("b", "t"), ("x", "t")];
        assert_eq!(search(&edges, "a", "t", 5), vec!["a", "m", "x", "t"]);
    }

    #[test]
    fn test_prefers_fewer_hops_over_lexicographic_order() {
        let edges = [("a", "b"), ("b", "c"), ("c", "z"), ("a", "y"), ("y", "z")];
        assert_eq!(search(&edges, "a", "z", 5), vec!["a", "y", "z"]);
    }

    #[test]
    fn test_hop_bound_prunes() {
        let edges = [("a", "b"), ("b", "c"), ("c", "d")];
        assert!(search(&edges, "a", "d", 2).is_empty());
        assert_eq!(search(&edges, "a", "d", 3).len(), 4);
    }

    #[test]
    fn test_cycles_terminate_and_never_repeat() {
        let edges = [("a", "b"), ("b", "a"), ("b", "c"), ("c", "a"), ("c", "d")];
        let path = search(&edges, "a", "d", 20);
        assert_eq!(path, vec!["a", "b", "c", "d"]);
        let unique: HashSet<_> = path.iter().collect();
        assert_eq!(unique.len(), path.len());
    }

    #[test]
    fn test_unreachable() {
        assert!(search(&[("a", "b")], "b", "a", 10).is_empty());
        assert!(search(&[], "a", "b", 10).is_empty());
    }

    #[test]
    fn test_self_path() {
        assert_eq!(search(&[("a", "b")], "a", "a", 3), vec!["a"]);
    }

    #[test]
    fn test_parallel_edges_collapse() {
        let edges = [("a", "b"), ("a", "b"), ("b", "c")];
        assert_eq!(search(&edges, "a", "c", 4), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_zero_hops_still_allows_one() {
        assert_eq!(search(&[("a", "b")], "a", "b", 0), vec!["a", "b"]);
    }
}
