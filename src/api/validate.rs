//! Request checks performed before the engine sees a request.

use super::error::FieldError;
use crate::engine::{OneHopRequest, ResolveRequest, ShortestPathRequest};

pub const MAX_LIST_LEN: usize = 200;
pub const MAX_EDGE_KINDS: usize = 20;
pub const MAX_TEXT_LEN: usize = 200;
const MIN_LIMIT: i64 = 1;
const MAX_LIMIT: i64 = 200;

/// Field errors of a one-hop request.
///
/// `limit` is range-checked only when present. A request without it is
/// accepted and served one edge per seed instead of being rejected.
pub fn one_hop(req: &OneHopRequest) -> Vec<FieldError> {
    let mut fields = Vec::new();
    list_size(&mut fields, "seeds", &req.seeds, MAX_LIST_LEN);
    list_size(&mut fields, "ids", &req.ids, MAX_LIST_LEN);
    list_size(&mut fields, "phoneNos", &req.phone_nos, MAX_LIST_LEN);
    list_size(&mut fields, "partyRks", &req.party_rks, MAX_LIST_LEN);
    if let Some(cursor) = &req.cursor {
        text_size(&mut fields, "cursor", cursor);
    }
    if let Some(limit) = req.limit {
        if limit < MIN_LIMIT {
            fields.push(FieldError::new("limit", format!("must be greater than or equal to {}", MIN_LIMIT)));
        } else if limit > MAX_LIMIT {
            fields.push(FieldError::new("limit", format!("must be less than or equal to {}", MAX_LIMIT)));
        }
    }
    list_size(&mut fields, "edgeKinds", &req.edge_kinds, MAX_EDGE_KINDS);

    let any_seed = [&req.seeds, &req.ids, &req.phone_nos, &req.party_rks]
        .iter()
        .any(|values| values.iter().any(|v| !v.trim().is_empty()));
    if !any_seed {
        fields.push(FieldError::new(
            "anySeedPresent",
            "At least one of seeds/ids/phoneNos/partyRks must be provided",
        ));
    }
    fields
}

pub fn resolve(req: &ResolveRequest) -> Vec<FieldError> {
    let mut fields = Vec::new();
    list_size(&mut fields, "ids", &req.ids, MAX_LIST_LEN);
    list_size(&mut fields, "phoneNos", &req.phone_nos, MAX_LIST_LEN);
    list_size(&mut fields, "partyRks", &req.party_rks, MAX_LIST_LEN);
    fields
}

pub fn shortest_path(req: &ShortestPathRequest) -> Vec<FieldError> {
    let mut fields = Vec::new();
    for (name, value) in [("from", &req.from), ("to", &req.to)] {
        match value.as_deref() {
            Some(v) if !v.trim().is_empty() => text_size(&mut fields, name, v),
            _ => fields.push(FieldError::new(name, "must not be blank")),
        }
    }
    list_size(&mut fields, "edgeKinds", &req.edge_kinds, MAX_EDGE_KINDS);
    fields
}

fn list_size(fields: &mut Vec<FieldError>, name: &str, values: &[String], max: usize) {
    if values.len() > max {
        fields.push(FieldError::new(name, format!("size must be between 0 and {}", max)));
    }
}

fn text_size(fields: &mut Vec<FieldError>, name: &str, value: &str) {
    if value.chars().count() > MAX_TEXT_LEN {
        fields.push(FieldError::new(name, format!("size must be between 0 and {}", MAX_TEXT_LEN)));
    }
}
