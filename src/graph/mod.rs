//! Property-graph data model shared by stores, the engine and the transport.
//!
//! Node ids look like `person:123`; the prefix before the first `:` is the
//! node kind when the stored record does not carry one.

mod attrs;
mod fixture;

pub use attrs::{AttrValue, Attrs, Flags};
pub use fixture::{GraphFixture, LookupEntry};

use serde::{Deserialize, Serialize};

/// Kind used when an id has no `<kind>:` prefix.
pub const DEFAULT_NODE_KIND: &str = "entity";
/// Kind used when a stored edge has none.
pub const DEFAULT_EDGE_KIND: &str = "edge";
/// Kind of edges synthesized for path segments with no stored edge.
pub const PATH_EDGE_KIND: &str = "path";

/// Well-known lookup kinds of the external-key index.
pub mod lookup_kind {
    pub const ID: &str = "id";
    pub const PHONE_NO: &str = "phone_no";
    pub const PARTY_RK: &str = "party_rk";
}

/// A graph vertex (person, phone, company, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub kind: String,
    pub label: String,
    #[serde(default)]
    pub attrs: Attrs,
    #[serde(default)]
    pub flags: Flags,
}

impl Node {
    /// Build a node, defaulting blank kind/label from the id.
    pub fn new(
        id: impl Into<String>,
        kind: Option<String>,
        label: Option<String>,
        attrs: Attrs,
        flags: Flags,
    ) -> Self {
        let id = id.into();
        let kind = non_blank(kind).unwrap_or_else(|| detect_kind(&id).to_string());
        let label = non_blank(label).unwrap_or_else(|| id.clone());
        Self { id, kind, label, attrs, flags }
    }

    /// Placeholder for an id the store has no row for.
    pub fn fallback(id: &str) -> Self {
        Self::new(id, None, None, Attrs::new(), Flags::new())
    }
}

/// A directed, typed relationship `src -> dst`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: String,
    pub src: String,
    pub dst: String,
    pub kind: String,
    #[serde(default)]
    pub attrs: Attrs,
    #[serde(default)]
    pub flags: Flags,
}

impl Edge {
    /// Build an edge, defaulting a blank kind to `edge` and a blank id to
    /// `<src>-><dst>:<kind>`. Kinds are trimmed so filters match what is returned.
    pub fn new(
        id: Option<String>,
        src: impl Into<String>,
        dst: impl Into<String>,
        kind: Option<String>,
        attrs: Attrs,
        flags: Flags,
    ) -> Self {
        let src = src.into();
        let dst = dst.into();
        let kind = non_blank(kind)
            .map(|k| k.trim().to_string())
            .unwrap_or_else(|| DEFAULT_EDGE_KIND.to_string());
        let id = non_blank(id).unwrap_or_else(|| synthesized_edge_id(&src, &dst, &kind));
        Self { id, src, dst, kind, attrs, flags }
    }

    /// Placeholder for a path segment with no stored edge.
    pub fn path_fallback(src: &str, dst: &str) -> Self {
        Self::new(
            None,
            src,
            dst,
            Some(PATH_EDGE_KIND.to_string()),
            Attrs::new(),
            Flags::new(),
        )
    }
}

/// Per-seed pagination state produced by one-hop expansion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedPage {
    pub seed: String,
    pub end_cursor: String,
    pub has_next: bool,
}

/// Kind prefix of an id (`"person:1"` -> `"person"`), or `entity`.
pub fn detect_kind(id: &str) -> &str {
    match id.find(':') {
        Some(idx) if idx > 0 => &id[..idx],
        _ => DEFAULT_NODE_KIND,
    }
}

pub fn synthesized_edge_id(src: &str, dst: &str, kind: &str) -> String {
    format!("{}->{}:{}", src, dst, kind)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
