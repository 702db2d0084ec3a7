//! Identifier resolution: external keys to canonical node records.

use crate::error::Result;
use crate::graph::{lookup_kind, Node};
use crate::store::GraphStore;

use super::normalize::OrderedIds;

/// Already-cleaned external keys (see [`super::normalize::clean_values`]).
#[derive(Debug, Default, Clone)]
pub struct ExternalKeys {
    pub ids: Vec<String>,
    pub phone_nos: Vec<String>,
    pub party_rks: Vec<String>,
}

impl ExternalKeys {
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty() && self.phone_nos.is_empty() && self.party_rks.is_empty()
    }
}

/// Node records reachable from `keys`, first occurrence kept, in the order:
/// direct id hits, `id` lookups, `phone_no` lookups, `party_rk` lookups.
pub async fn resolve_nodes(store: &dyn GraphStore, keys: &ExternalKeys) -> Result<Vec<Node>> {
    if keys.is_empty() {
        return Ok(Vec::new());
    }

    let (direct, by_id, by_phone, by_party) = tokio::try_join!(
        nodes_by_ids(store, &keys.ids),
        nodes_by_lookup(store, lookup_kind::ID, &keys.ids),
        nodes_by_lookup(store, lookup_kind::PHONE_NO, &keys.phone_nos),
        nodes_by_lookup(store, lookup_kind::PARTY_RK, &keys.party_rks),
    )?;

    let mut seen = OrderedIds::default();
    let nodes: Vec<Node> = [direct, by_id, by_phone, by_party]
        .into_iter()
        .flatten()
        .filter(|node| seen.push(&node.id))
        .collect();

    log::debug!(
        "Resolved {} node(s) from {} id(s), {} phone(s), {} party key(s)",
        nodes.len(),
        keys.ids.len(),
        keys.phone_nos.len(),
        keys.party_rks.len()
    );
    Ok(nodes)
}

/// Canonical seed ids: `seeds` verbatim, then whatever `keys` resolve to.
pub async fn resolve_seed_ids(
    store: &dyn GraphStore,
    seeds: &[String],
    keys: &ExternalKeys,
) -> Result<Vec<String>> {
    let mut ids = OrderedIds::default();
    ids.extend(seeds.iter().map(String::as_str));
    for node in resolve_nodes(store, keys).await? {
        ids.push(&node.id);
    }
    Ok(ids.into_vec())
}

async fn nodes_by_ids(store: &dyn GraphStore, ids: &[String]) -> Result<Vec<Node>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    store.find_nodes_by_ids(ids).await
}

async fn nodes_by_lookup(store: &dyn GraphStore, kind: &str, values: &[String]) -> Result<Vec<Node>> {
    if values.is_empty() {
        return Ok(Vec::new());
    }
    store.find_nodes_by_lookup(kind, values).await
}
