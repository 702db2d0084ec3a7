use std::collections::HashMap;

use crate::error::Result;
use crate::graph::Node;
use crate::store::GraphStore;

/// Node records for `ids`, in caller order, with a fallback record for every
/// id the store has no row for.
pub async fn materialize_nodes(store: &dyn GraphStore, ids: &[String]) -> Result<Vec<Node>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut known: HashMap<String, Node> = store
        .find_nodes_by_ids(ids)
        .await?
        .into_iter()
        .map(|node| (node.id.clone(), node))
        .collect();

    Ok(ids
        .iter()
        .map(|id| known.remove(id).unwrap_or_else(|| Node::fallback(id)))
        .collect())
}
