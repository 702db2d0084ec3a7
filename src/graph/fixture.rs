//! JSON graph fixtures, as consumed by the `load` binary and the in-memory store.
//!
//! ```json
//! {
//!   "nodes":   [{"id": "person:1", "label": "Alice", "attrs": {"age": 30}, "flags": ["vip"]}],
//!   "edges":   [{"id": "e1", "src": "person:1", "dst": "person:2", "kind": "transfer"}],
//!   "lookups": [{"kind": "phone_no", "value": "+7999", "nodeId": "phone:+7999"}]
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::{Attrs, Edge, Flags, Node};
use crate::error::Result;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GraphFixture {
    #[serde(default)]
    nodes: Vec<NodeRecord>,
    #[serde(default)]
    edges: Vec<EdgeRecord>,
    #[serde(default)]
    pub lookups: Vec<LookupEntry>,
}

#[derive(Debug, Clone, Deserialize)]
struct NodeRecord {
    id: String,
    kind: Option<String>,
    label: Option<String>,
    #[serde(default)]
    attrs: Attrs,
    #[serde(default)]
    flags: Flags,
}

#[derive(Debug, Clone, Deserialize)]
struct EdgeRecord {
    id: Option<String>,
    src: String,
    dst: String,
    kind: Option<String>,
    #[serde(default)]
    attrs: Attrs,
    #[serde(default)]
    flags: Flags,
}

/// `(lookupKind, lookupValue) -> nodeId` entry of the external-key index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupEntry {
    pub kind: String,
    pub value: String,
    #[serde(alias = "node_id")]
    pub node_id: String,
}

impl GraphFixture {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Nodes with kind/label defaults applied.
    pub fn nodes(&self) -> Vec<Node> {
        self.nodes
            .iter()
            .map(|r| Node::new(r.id.clone(), r.kind.clone(), r.label.clone(), r.attrs.clone(), r.flags.clone()))
            .collect()
    }

    /// Edges with kind/id defaults applied.
    pub fn edges(&self) -> Vec<Edge> {
        self.edges
            .iter()
            .map(|r| {
                Edge::new(
                    r.id.clone(),
                    r.src.clone(),
                    r.dst.clone(),
                    r.kind.clone(),
                    r.attrs.clone(),
                    r.flags.clone(),
                )
            })
            .collect()
    }
}
