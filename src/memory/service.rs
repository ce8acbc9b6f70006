//! # In-Memory Query Service
//!
//! Runs parsed queries over the configured rows: filter, count, sort,
//! paginate, project.

use std::cmp::Ordering;
use std::sync::Arc;

use super::config::MemoryConfig;
use super::filter::{compare_json_values, FilterExpr};
use super::query::{ParsedQuery, SortKey};
use crate::descriptor::{QueryDescriptor, Row};
use crate::engine::{EngineResult, QueryConfig, QueryPage, QueryService};

/// Execution handle built from a [`MemoryConfig`]
#[derive(Debug, Clone)]
pub struct MemoryService {
    config: Arc<MemoryConfig>,
}

impl MemoryService {
    pub fn new(config: MemoryConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Run an already parsed query
    pub fn run(&self, query: &ParsedQuery) -> EngineResult<QueryPage> {
        let mut rows = Self::apply_filters(&self.config.rows, &query.filters)?;
        let total_count = rows.len();

        Self::apply_sort(&mut rows, &query.sort);

        let page = rows
            .into_iter()
            .skip(query.offset)
            .take(query.limit)
            .map(|row| Self::project(row, query.fields.as_deref()))
            .collect();

        Ok(QueryPage::new(page, total_count))
    }

    fn apply_filters(rows: &[Row], filters: &[FilterExpr]) -> EngineResult<Vec<Row>> {
        let mut matched = Vec::new();
        for row in rows {
            let mut keep = true;
            for filter in filters {
                if !filter.matches(row)? {
                    keep = false;
                    break;
                }
            }
            if keep {
                matched.push(row.clone());
            }
        }
        Ok(matched)
    }

    /// Stable multi-key sort; missing or null values go last
    fn apply_sort(rows: &mut [Row], sort: &[SortKey]) {
        if sort.is_empty() {
            return;
        }

        rows.sort_by(|a, b| {
            for key in sort {
                let a_val = a.get(&key.field).filter(|v| !v.is_null());
                let b_val = b.get(&key.field).filter(|v| !v.is_null());

                let cmp = match (a_val, b_val) {
                    (Some(a), Some(b)) => {
                        let cmp = compare_json_values(a, b).unwrap_or(Ordering::Equal);
                        if key.ascending {
                            cmp
                        } else {
                            cmp.reverse()
                        }
                    }
                    (Some(_), None) => Ordering::Less,
                    (None, Some(_)) => Ordering::Greater,
                    (None, None) => Ordering::Equal,
                };

                if cmp != Ordering::Equal {
                    return cmp;
                }
            }
            Ordering::Equal
        });
    }

    fn project(row: Row, fields: Option<&[String]>) -> Row {
        match fields {
            None => row,
            Some(fields) => row
                .into_iter()
                .filter(|(k, _)| fields.contains(k))
                .collect(),
        }
    }
}

impl QueryService for MemoryService {
    fn get(&self, query: &QueryDescriptor) -> EngineResult<QueryPage> {
        let parsed = ParsedQuery::parse(query, &self.config)?;
        self.run(&parsed)
    }
}

impl QueryConfig for MemoryConfig {
    type Service = MemoryService;

    fn build(&self) -> MemoryService {
        MemoryService::new(self.clone())
    }

    fn validate(&self, query: &QueryDescriptor) -> EngineResult<()> {
        ParsedQuery::parse(query, self).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn people() -> MemoryConfig {
        let rows = json!([
            {"id": 1, "name": "Alice", "age": 34, "status": "active"},
            {"id": 2, "name": "Bob", "age": 17, "status": "pending"},
            {"id": 3, "name": "Carol", "age": 52, "status": "active"},
            {"id": 4, "name": "Dave", "age": 25, "status": "inactive"},
            {"id": 5, "name": "Erin", "status": "active"}
        ]);
        let rows = rows
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r.as_object().cloned().unwrap())
            .collect();
        MemoryConfig::with_rows(rows)
    }

    fn get(service: &MemoryService, body: Value) -> EngineResult<QueryPage> {
        service.get(&serde_json::from_value(body).unwrap())
    }

    fn ids(page: &QueryPage) -> Vec<i64> {
        page.rows.iter().map(|r| r["id"].as_i64().unwrap()).collect()
    }

    #[test]
    fn test_filter_counts_before_pagination() {
        let service = people().build();
        let page = get(&service, json!({"filter": {"status": "active"}, "limit": 2})).unwrap();

        assert_eq!(page.total_count, 3);
        assert_eq!(page.size, 2);
        assert_eq!(ids(&page), vec![1, 3]);
    }

    #[test]
    fn test_sort_descending_with_missing_last() {
        let service = people().build();
        let page = get(&service, json!({"sort": ["-age"]})).unwrap();

        assert_eq!(ids(&page), vec![3, 1, 4, 2, 5]);
    }

    #[test]
    fn test_multi_key_sort() {
        let service = people().build();
        let page = get(&service, json!({"sort": ["status", "-id"]})).unwrap();

        assert_eq!(ids(&page), vec![5, 3, 1, 4, 2]);
    }

    #[test]
    fn test_offset_past_end() {
        let service = people().build();
        let page = get(&service, json!({"offset": 10})).unwrap();

        assert_eq!(page.size, 0);
        assert_eq!(page.total_count, 5);
    }

    #[test]
    fn test_projection() {
        let service = people().build();
        let page = get(&service, json!({"filter": {"id": 2}, "fields": ["name"]})).unwrap();

        assert_eq!(page.rows, vec![json!({"name": "Bob"}).as_object().cloned().unwrap()]);
    }

    #[test]
    fn test_incomparable_filter_is_execution_error() {
        let service = people().build();
        let err = get(&service, json!({"filter": {"name__gt": 3}})).unwrap_err();

        assert_eq!(err.code, 422_001);
    }

    #[test]
    fn test_validate_matches_parse() {
        let config = people();
        assert!(config
            .validate(&serde_json::from_value(json!({"filter": {"age__gt": 18}})).unwrap())
            .is_ok());
        assert!(config
            .validate(&serde_json::from_value(json!({"page": 1})).unwrap())
            .is_err());
    }
}
