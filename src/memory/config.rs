//! # In-Memory Engine Configuration
//!
//! Field whitelists, pagination bounds and the dataset itself. An empty
//! whitelist allows every field.

use serde::{Deserialize, Serialize};

use crate::descriptor::Row;

/// Default page size when a query has no `limit`
pub const DEFAULT_LIMIT: usize = 20;

/// Largest page a query may request
pub const MAX_LIMIT: usize = 100;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Fields that may appear in `filter`
    #[serde(default)]
    pub filter_fields: Vec<String>,

    /// Fields that may appear in `sort`
    #[serde(default)]
    pub sort_fields: Vec<String>,

    /// Fields that may appear in `fields`
    #[serde(default)]
    pub select_fields: Vec<String>,

    #[serde(default = "default_limit")]
    pub default_limit: usize,

    #[serde(default = "max_limit")]
    pub max_limit: usize,

    /// Dataset served by the engine
    #[serde(default)]
    pub rows: Vec<Row>,
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

fn max_limit() -> usize {
    MAX_LIMIT
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            filter_fields: Vec::new(),
            sort_fields: Vec::new(),
            select_fields: Vec::new(),
            default_limit: DEFAULT_LIMIT,
            max_limit: MAX_LIMIT,
            rows: Vec::new(),
        }
    }
}

impl MemoryConfig {
    /// Create a config serving `rows` with no field restrictions
    pub fn with_rows(rows: Vec<Row>) -> Self {
        Self {
            rows,
            ..Default::default()
        }
    }

    pub fn allows_filter(&self, field: &str) -> bool {
        allowed(&self.filter_fields, field)
    }

    pub fn allows_sort(&self, field: &str) -> bool {
        allowed(&self.sort_fields, field)
    }

    pub fn allows_select(&self, field: &str) -> bool {
        allowed(&self.select_fields, field)
    }
}

fn allowed(whitelist: &[String], field: &str) -> bool {
    whitelist.is_empty() || whitelist.iter().any(|f| f == field)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_from_empty_json() {
        let config: MemoryConfig = serde_json::from_value(json!({})).unwrap();
        assert_eq!(config.default_limit, DEFAULT_LIMIT);
        assert_eq!(config.max_limit, MAX_LIMIT);
        assert!(config.rows.is_empty());
        assert!(config.allows_filter("anything"));
    }

    #[test]
    fn test_whitelist() {
        let config = MemoryConfig {
            sort_fields: vec!["age".to_string()],
            ..Default::default()
        };
        assert!(config.allows_sort("age"));
        assert!(!config.allows_sort("name"));
        assert!(config.allows_select("name"));
    }
}
