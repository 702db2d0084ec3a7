//! Input clean-up applied before any store access.

use std::collections::HashSet;

use crate::store::{EdgeKinds, MAX_PATH_HOPS};

/// Upper bound on the per-seed page size.
pub const MAX_PAGE_LIMIT: usize = 200;
/// Hop bound used when the caller gives none (or a non-positive one).
pub const DEFAULT_MAX_HOPS: usize = 10;

/// Trim every value, dropping blanks and repeats; first occurrence wins.
pub fn clean_values<S: AsRef<str>>(values: &[S]) -> Vec<String> {
    let mut ids = OrderedIds::default();
    for value in values {
        ids.push(value.as_ref().trim());
    }
    ids.into_vec()
}

/// `None` or `<= 0` means 1; anything above [`MAX_PAGE_LIMIT`] is capped.
pub fn page_limit(limit: Option<i64>) -> usize {
    match limit {
        Some(l) if l > 0 => usize::try_from(l).unwrap_or(MAX_PAGE_LIMIT).min(MAX_PAGE_LIMIT),
        _ => 1,
    }
}

/// `None` or `<= 0` means [`DEFAULT_MAX_HOPS`]; capped at [`MAX_PATH_HOPS`].
pub fn max_hops(hops: Option<i64>) -> usize {
    match hops {
        Some(h) if h > 0 => usize::try_from(h).unwrap_or(MAX_PATH_HOPS).min(MAX_PATH_HOPS),
        _ => DEFAULT_MAX_HOPS,
    }
}

pub fn cursor(cursor: Option<&str>) -> String {
    cursor.map(str::trim).unwrap_or_default().to_string()
}

pub fn edge_kinds<S: AsRef<str>>(kinds: &[S]) -> EdgeKinds {
    kinds
        .iter()
        .map(|k| k.as_ref().trim())
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}

/// Insertion-ordered set of ids.
#[derive(Debug, Default, Clone)]
pub struct OrderedIds {
    order: Vec<String>,
    seen: HashSet<String>,
}

impl OrderedIds {
    /// Add `id` unless it is blank or already present. Returns whether it was added.
    pub fn push(&mut self, id: &str) -> bool {
        if id.is_empty() || self.seen.contains(id) {
            return false;
        }
        self.seen.insert(id.to_string());
        self.order.push(id.to_string());
        true
    }

    pub fn extend<'a>(&mut self, ids: impl IntoIterator<Item = &'a str>) {
        for id in ids {
            self.push(id);
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.order
    }
}
