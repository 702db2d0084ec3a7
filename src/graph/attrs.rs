use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Open-schema attribute map of a node or edge.
pub type Attrs = BTreeMap<String, AttrValue>;

/// Status/tag markers of a node or edge.
pub type Flags = BTreeSet<String>;

/// A dynamically typed attribute value.
///
/// Serialized untagged, so `{"age": 30, "tags": ["a"]}` round-trips as plain JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    List(Vec<AttrValue>),
    Map(BTreeMap<String, AttrValue>),
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::String(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::String(value)
    }
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        AttrValue::Integer(value)
    }
}

impl From<f64> for AttrValue {
    fn from(value: f64) -> Self {
        AttrValue::Float(value)
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        AttrValue::Bool(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mixed_attrs() {
        let attrs: Attrs = serde_json::from_str(
            r#"{"age":30,"score":0.5,"vip":true,"note":null,"name":"Alice","tags":["a",1],"addr":{"city":"X"}}"#,
        )
        .unwrap();

        assert_eq!(attrs["age"], AttrValue::Integer(30));
        assert_eq!(attrs["score"], AttrValue::Float(0.5));
        assert_eq!(attrs["vip"], AttrValue::Bool(true));
        assert_eq!(attrs["note"], AttrValue::Null);
        assert_eq!(attrs["name"], AttrValue::from("Alice"));
        assert_eq!(
            attrs["tags"],
            AttrValue::List(vec![AttrValue::from("a"), AttrValue::Integer(1)])
        );
        assert!(matches!(&attrs["addr"], AttrValue::Map(m) if m["city"] == AttrValue::from("X")));
    }

    #[test]
    fn test_serializes_as_plain_json() {
        let mut attrs = Attrs::new();
        attrs.insert("amount".into(), AttrValue::Integer(100));
        attrs.insert("currency".into(), AttrValue::from("RUB"));
        assert_eq!(
            serde_json::to_string(&attrs).unwrap(),
            r#"{"amount":100,"currency":"RUB"}"#
        );
    }

    #[test]
    fn test_flags_deduplicate() {
        let flags: Flags = serde_json::from_str(r#"["vip","vip","blacklist"]"#).unwrap();
        assert_eq!(flags.len(), 2);
    }
}
