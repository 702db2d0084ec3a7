//! Request and response shapes of the exploration operations.
//!
//! Field names are camelCase on the wire; the snake_case spellings used by
//! older clients are accepted as aliases.

use serde::{Deserialize, Deserializer, Serialize};

use crate::graph::{Edge, Node, SeedPage};

/// A JSON list of strings where `null` (for the list or any entry) is skipped.
fn string_list<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<Option<String>>> = Option::deserialize(deserializer)?;
    Ok(raw.unwrap_or_default().into_iter().flatten().collect())
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OneHopRequest {
    /// Canonical node ids, used as-is.
    #[serde(default, deserialize_with = "string_list")]
    pub seeds: Vec<String>,
    #[serde(default, deserialize_with = "string_list")]
    pub ids: Vec<String>,
    #[serde(default, alias = "phone_no", alias = "phone_nos", deserialize_with = "string_list")]
    pub phone_nos: Vec<String>,
    #[serde(default, alias = "party_rk", alias = "party_rks", deserialize_with = "string_list")]
    pub party_rks: Vec<String>,
    #[serde(default)]
    pub cursor: Option<String>,
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default, alias = "edge_kinds", deserialize_with = "string_list")]
    pub edge_kinds: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveRequest {
    #[serde(default, deserialize_with = "string_list")]
    pub ids: Vec<String>,
    #[serde(default, alias = "phone_no", alias = "phone_nos", deserialize_with = "string_list")]
    pub phone_nos: Vec<String>,
    #[serde(default, alias = "party_rk", alias = "party_rks", deserialize_with = "string_list")]
    pub party_rks: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortestPathRequest {
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default, alias = "edge_kinds", deserialize_with = "string_list")]
    pub edge_kinds: Vec<String>,
    #[serde(default, alias = "max_hops")]
    pub max_hops: Option<i64>,
}

/// Subgraph around the seeds plus one pagination state per seed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphResponse {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub pages: Vec<SeedPage>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveResponse {
    pub nodes: Vec<Node>,
}

/// `length` is the hop count; an empty path has length 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathResponse {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub length: usize,
}
