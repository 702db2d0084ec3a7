//! SQLite-backed `GraphStore` over the `nodes`, `edges` and `node_lookup` tables.

use async_trait::async_trait;
use rusqlite::{params, Connection, ToSql};
use std::collections::{HashMap, HashSet};

use super::path::PathSearch;
use super::{EdgeKinds, GraphStore};
use crate::db::Db;
use crate::error::{GraphError, Result};
use crate::graph::{Attrs, Edge, Flags, GraphFixture, Node};

/// Stored kind with the `edge` default applied, so filters and ordering agree
/// with what callers see on the returned records.
const EDGE_KIND_EXPR: &str = "COALESCE(NULLIF(TRIM(kind), ''), 'edge')";

/// Stay well below SQLite's bound-parameter limit on large node sets.
const IN_CLAUSE_BATCH: usize = 500;

/// Graph store reading from a SQLite database file.
#[derive(Debug, Clone)]
pub struct SqliteGraphStore {
    db: Db,
}

/// Counts reported by [`SqliteGraphStore::import_fixture`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportStats {
    pub nodes: usize,
    pub edges: usize,
    pub lookups: usize,
}

struct RawNode {
    id: String,
    kind: Option<String>,
    label: Option<String>,
    attrs: Option<String>,
    flags: Option<String>,
}

struct RawEdge {
    id: Option<String>,
    src: String,
    dst: String,
    kind: Option<String>,
    attrs: Option<String>,
    flags: Option<String>,
}

impl SqliteGraphStore {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Db {
        &self.db
    }

    /// Write a fixture in one transaction. With `replace`, existing rows are
    /// deleted first; otherwise rows with existing keys are overwritten.
    /// Within the fixture itself the first edge with a given id wins.
    pub async fn import_fixture(&self, fixture: GraphFixture, replace: bool) -> Result<ImportStats> {
        self.db
            .with_connection(move |conn| {
                let tx = conn.transaction()?;
                if replace {
                    tx.execute_batch("DELETE FROM node_lookup; DELETE FROM edges; DELETE FROM nodes;")?;
                }

                let mut stats = ImportStats::default();
                {
                    let mut insert_node = tx.prepare(
                        "INSERT OR REPLACE INTO nodes (id, kind, label, attrs, flags) VALUES (?1, ?2, ?3, ?4, ?5)",
                    )?;
                    for node in fixture.nodes() {
                        insert_node.execute(params![
                            node.id,
                            node.kind,
                            node.label,
                            serde_json::to_string(&node.attrs)?,
                            serde_json::to_string(&node.flags)?,
                        ])?;
                        stats.nodes += 1;
                    }

                    let mut insert_edge = tx.prepare(
                        "INSERT OR REPLACE INTO edges (id, src, dst, kind, attrs, flags) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                    )?;
                    let mut seen_edges = HashSet::new();
                    for edge in fixture.edges() {
                        if !seen_edges.insert(edge.id.clone()) {
                            log::warn!("Duplicate edge id {} ignored", edge.id);
                            continue;
                        }
                        insert_edge.execute(params![
                            edge.id,
                            edge.src,
                            edge.dst,
                            edge.kind,
                            serde_json::to_string(&edge.attrs)?,
                            serde_json::to_string(&edge.flags)?,
                        ])?;
                        stats.edges += 1;
                    }

                    let mut insert_lookup = tx.prepare(
                        "INSERT OR IGNORE INTO node_lookup (lookup_kind, lookup_value, node_id) VALUES (?1, ?2, ?3)",
                    )?;
                    for entry in &fixture.lookups {
                        stats.lookups += insert_lookup.execute(params![entry.kind, entry.value, entry.node_id])?;
                    }
                }
                tx.commit()?;
                Ok(stats)
            })
            .await
    }
}

fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

/// ` AND <kind> IN (...)` plus its bound values, or nothing for "all kinds".
fn kind_filter(edge_kinds: &EdgeKinds, params: &mut Vec<Box<dyn ToSql>>) -> String {
    if edge_kinds.is_empty() {
        return String::new();
    }
    params.extend(edge_kinds.iter().map(|k| Box::new(k.clone()) as Box<dyn ToSql>));
    format!(" AND {} IN ({})", EDGE_KIND_EXPR, placeholders(edge_kinds.len()))
}

fn parse_attrs(raw: Option<String>, record: &str) -> Result<Attrs> {
    match raw {
        Some(json) if !json.trim().is_empty() => {
            serde_json::from_str(&json).map_err(|source| GraphError::MalformedPayload {
                column: "attrs",
                record: record.to_string(),
                source,
            })
        }
        _ => Ok(Attrs::new()),
    }
}

fn parse_flags(raw: Option<String>, record: &str) -> Result<Flags> {
    match raw {
        Some(json) if !json.trim().is_empty() => {
            serde_json::from_str(&json).map_err(|source| GraphError::MalformedPayload {
                column: "flags",
                record: record.to_string(),
                source,
            })
        }
        _ => Ok(Flags::new()),
    }
}

impl RawNode {
    fn from_row(row: &rusqlite::Row<'_>, offset: usize) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(offset)?,
            kind: row.get(offset + 1)?,
            label: row.get(offset + 2)?,
            attrs: row.get(offset + 3)?,
            flags: row.get(offset + 4)?,
        })
    }

    fn into_node(self) -> Result<Node> {
        let attrs = parse_attrs(self.attrs, &self.id)?;
        let flags = parse_flags(self.flags, &self.id)?;
        Ok(Node::new(self.id, self.kind, self.label, attrs, flags))
    }
}

impl RawEdge {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            src: row.get(1)?,
            dst: row.get(2)?,
            kind: row.get(3)?,
            attrs: row.get(4)?,
            flags: row.get(5)?,
        })
    }

    fn into_edge(self) -> Result<Edge> {
        let record = self
            .id
            .clone()
            .unwrap_or_else(|| format!("{}->{}", self.src, self.dst));
        let attrs = parse_attrs(self.attrs, &record)?;
        let flags = parse_flags(self.flags, &record)?;
        Ok(Edge::new(self.id, self.src, self.dst, self.kind, attrs, flags))
    }
}

fn query_edges(conn: &Connection, sql: &str, params: Vec<Box<dyn ToSql>>) -> Result<Vec<Edge>> {
    let mut stmt = conn.prepare(sql)?;
    let raw = stmt
        .query_map(rusqlite::params_from_iter(params), RawEdge::from_row)?
        .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;
    raw.into_iter().map(RawEdge::into_edge).collect()
}

fn node_exists(conn: &Connection, id: &str) -> Result<bool> {
    let mut stmt = conn.prepare("SELECT 1 FROM nodes WHERE id = ?1")?;
    Ok(stmt.exists([id])?)
}

/// Out-neighbours of every frontier vertex, one query per BFS level.
fn level_neighbors(
    conn: &Connection,
    frontier: &[String],
    edge_kinds: &EdgeKinds,
) -> Result<HashMap<String, Vec<String>>> {
    let mut level: HashMap<String, Vec<String>> = HashMap::new();
    for batch in frontier.chunks(IN_CLAUSE_BATCH) {
        let mut params: Vec<Box<dyn ToSql>> = batch
            .iter()
            .map(|v| Box::new(v.clone()) as Box<dyn ToSql>)
            .collect();
        let filter = kind_filter(edge_kinds, &mut params);
        let sql = format!(
            "SELECT DISTINCT src, dst FROM edges WHERE src IN ({}){}",
            placeholders(batch.len()),
            filter
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(rusqlite::params_from_iter(params), |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;
        for row in rows {
            let (src, dst) = row?;
            level.entry(src).or_default().push(dst);
        }
    }
    Ok(level)
}

#[async_trait]
impl GraphStore for SqliteGraphStore {
    async fn find_nodes_by_ids(&self, ids: &[String]) -> Result<Vec<Node>> {
        let mut seen = HashSet::new();
        let ids: Vec<String> = ids.iter().filter(|id| seen.insert(id.as_str())).cloned().collect();
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        self.db
            .with_connection(move |conn| {
                let mut by_id = HashMap::new();
                for batch in ids.chunks(IN_CLAUSE_BATCH) {
                    let sql = format!(
                        "SELECT id, kind, label, attrs, flags FROM nodes WHERE id IN ({})",
                        placeholders(batch.len())
                    );
                    let mut stmt = conn.prepare(&sql)?;
                    let rows = stmt.query_map(rusqlite::params_from_iter(batch), |row| RawNode::from_row(row, 0))?;
                    for row in rows {
                        let raw = row?;
                        by_id.insert(raw.id.clone(), raw);
                    }
                }

                ids.iter()
                    .filter_map(|id| by_id.remove(id))
                    .map(RawNode::into_node)
                    .collect()
            })
            .await
    }

    async fn find_nodes_by_lookup(&self, lookup_kind: &str, values: &[String]) -> Result<Vec<Node>> {
        let mut seen = HashSet::new();
        let values: Vec<String> = values.iter().filter(|v| seen.insert(v.as_str())).cloned().collect();
        if values.is_empty() {
            return Ok(Vec::new());
        }
        let lookup_kind = lookup_kind.to_string();

        self.db
            .with_connection(move |conn| {
                let mut by_value: HashMap<String, Vec<RawNode>> = HashMap::new();
                for batch in values.chunks(IN_CLAUSE_BATCH) {
                    let sql = format!(
                        "SELECT l.lookup_value, n.id, n.kind, n.label, n.attrs, n.flags \
                         FROM node_lookup l \
                         JOIN nodes n ON n.id = l.node_id \
                         WHERE l.lookup_kind = ? AND l.lookup_value IN ({}) \
                         ORDER BY n.id",
                        placeholders(batch.len())
                    );
                    let mut params: Vec<Box<dyn ToSql>> = vec![Box::new(lookup_kind.clone())];
                    params.extend(batch.iter().map(|v| Box::new(v.clone()) as Box<dyn ToSql>));

                    let mut stmt = conn.prepare(&sql)?;
                    let rows = stmt.query_map(rusqlite::params_from_iter(params), |row| {
                        Ok((row.get::<_, String>(0)?, RawNode::from_row(row, 1)?))
                    })?;
                    for row in rows {
                        let (value, raw) = row?;
                        by_value.entry(value).or_default().push(raw);
                    }
                }

                let mut emitted = HashSet::new();
                let mut nodes = Vec::new();
                for value in &values {
                    for raw in by_value.remove(value).unwrap_or_default() {
                        if emitted.insert(raw.id.clone()) {
                            nodes.push(raw.into_node()?);
                        }
                    }
                }
                Ok(nodes)
            })
            .await
    }

    async fn find_out_edges(
        &self,
        src: &str,
        cursor: &str,
        limit: usize,
        edge_kinds: &EdgeKinds,
    ) -> Result<Vec<Edge>> {
        let src = src.to_string();
        let cursor = cursor.to_string();
        let edge_kinds = edge_kinds.clone();

        self.db
            .with_connection(move |conn| {
                let mut params: Vec<Box<dyn ToSql>> = vec![Box::new(src), Box::new(cursor)];
                let filter = kind_filter(&edge_kinds, &mut params);
                params.push(Box::new(i64::try_from(limit).unwrap_or(i64::MAX)));
                let sql = format!(
                    "SELECT id, src, dst, kind, attrs, flags FROM edges \
                     WHERE src = ? AND dst > ?{} \
                     ORDER BY dst, {}, id LIMIT ?",
                    filter, EDGE_KIND_EXPR
                );
                query_edges(conn, &sql, params)
            })
            .await
    }

    async fn find_edge(&self, src: &str, dst: &str, edge_kinds: &EdgeKinds) -> Result<Option<Edge>> {
        let src = src.to_string();
        let dst = dst.to_string();
        let edge_kinds = edge_kinds.clone();

        let edges = self
            .db
            .with_connection(move |conn| {
                let mut params: Vec<Box<dyn ToSql>> = vec![Box::new(src), Box::new(dst)];
                let filter = kind_filter(&edge_kinds, &mut params);
                let sql = format!(
                    "SELECT id, src, dst, kind, attrs, flags FROM edges \
                     WHERE src = ? AND dst = ?{} \
                     ORDER BY {}, id LIMIT 1",
                    filter, EDGE_KIND_EXPR
                );
                query_edges(conn, &sql, params)
            })
            .await?;
        Ok(edges.into_iter().next())
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
        let from = from.to_string();
        let to = to.to_string();
        let edge_kinds = edge_kinds.clone();

        self.db
            .with_connection(move |conn| {
                if from == to && !node_exists(conn, &from)? {
                    return Ok(Vec::new());
                }
                PathSearch::new(&from, &to, max_hops)
                    .run(|frontier| level_neighbors(conn, frontier, &edge_kinds))
            })
            .await
    }

    async fn ping(&self) -> Result<()> {
        self.db
            .with_connection(|conn| {
                let one: i64 = conn.query_row("SELECT 1", [], |row| row.get(0))?;
                if one == 1 {
                    Ok(())
                } else {
                    Err(GraphError::Store(format!("unexpected probe result {}", one)))
                }
            })
            .await
    }
}
