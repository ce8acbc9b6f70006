//! # Query Descriptor
//!
//! The deserialized request body: a string-keyed map of arbitrary JSON
//! values. Keys are interpreted by the engine, never by the adapter.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single result row returned by an engine
pub type Row = Map<String, Value>;

/// Client query request, bound from a JSON object body
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryDescriptor(Map<String, Value>);

impl QueryDescriptor {
    pub fn new(entries: Map<String, Value>) -> Self {
        Self(entries)
    }

    /// Look up a top-level key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for QueryDescriptor {
    fn from(entries: Map<String, Value>) -> Self {
        Self(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_binds_object_body() {
        let descriptor: QueryDescriptor =
            serde_json::from_value(json!({"filter": {"age__gt": 18}, "limit": 5})).unwrap();

        assert_eq!(descriptor.get("limit"), Some(&json!(5)));
        assert_eq!(descriptor.get("filter").unwrap()["age__gt"], 18);
        assert_eq!(descriptor.keys().count(), 2);
    }

    #[test]
    fn test_rejects_non_object_body() {
        assert!(serde_json::from_str::<QueryDescriptor>("[1, 2, 3]").is_err());
        assert!(serde_json::from_str::<QueryDescriptor>("\"filter\"").is_err());
        assert!(serde_json::from_str::<QueryDescriptor>("not-json").is_err());
    }

    #[test]
    fn test_empty_object() {
        let descriptor: QueryDescriptor = serde_json::from_str("{}").unwrap();
        assert!(descriptor.is_empty());
    }
}
