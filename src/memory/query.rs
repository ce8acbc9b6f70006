//! # Query Parser
//!
//! Turns a descriptor into a structured query the in-memory engine can run.
//! Parsing doubles as validation against the engine configuration.

use serde_json::Value;

use super::config::MemoryConfig;
use super::errors::MemoryErrorKind;
use super::filter::{parse_filters, FilterExpr};
use crate::descriptor::QueryDescriptor;
use crate::engine::EngineResult;

/// Top-level descriptor keys the engine understands
pub const KNOWN_KEYS: [&str; 5] = ["filter", "sort", "fields", "limit", "offset"];

/// Sort clause
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub field: String,
    pub ascending: bool,
}

impl SortKey {
    /// Parse `field` or `-field`
    pub fn parse(raw: &str) -> EngineResult<Self> {
        let (field, ascending) = match raw.strip_prefix('-') {
            Some(field) => (field, false),
            None => (raw, true),
        };
        if field.is_empty() {
            return Err(MemoryErrorKind::InvalidSort.error("Sort field cannot be empty"));
        }
        Ok(Self {
            field: field.to_string(),
            ascending,
        })
    }
}

/// A validated query
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedQuery {
    pub filters: Vec<FilterExpr>,
    pub sort: Vec<SortKey>,
    /// Fields to project (None = whole row)
    pub fields: Option<Vec<String>>,
    pub limit: usize,
    pub offset: usize,
}

impl ParsedQuery {
    /// Parse and validate a descriptor against `config`
    pub fn parse(query: &QueryDescriptor, config: &MemoryConfig) -> EngineResult<Self> {
        if let Some(key) = query.keys().find(|key| !KNOWN_KEYS.contains(key)) {
            return Err(MemoryErrorKind::UnknownKey.error(format!("Unknown query key: {key}")));
        }

        let filters = match query.get("filter") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Object(filter)) => parse_filters(filter)?,
            Some(_) => {
                return Err(MemoryErrorKind::InvalidFilter.error("filter must be an object"))
            }
        };
        for filter in &filters {
            if !config.allows_filter(&filter.field) {
                return Err(MemoryErrorKind::FieldNotAllowed
                    .error(format!("Filtering on '{}' is not allowed", filter.field)));
            }
        }

        let sort = parse_sort(query.get("sort"))?;
        for key in &sort {
            if !config.allows_sort(&key.field) {
                return Err(MemoryErrorKind::FieldNotAllowed
                    .error(format!("Sorting on '{}' is not allowed", key.field)));
            }
        }

        let fields = parse_fields(query.get("fields"))?;
        if let Some(fields) = &fields {
            if let Some(field) = fields.iter().find(|f| !config.allows_select(f)) {
                return Err(MemoryErrorKind::FieldNotAllowed
                    .error(format!("Selecting '{field}' is not allowed")));
            }
        }

        // Queries without a limit get the default, capped at the maximum
        let default_limit = config.default_limit.min(config.max_limit);
        let limit = parse_count(query.get("limit"), "limit")?.unwrap_or(default_limit);
        if limit > config.max_limit {
            return Err(MemoryErrorKind::LimitExceeded.error(format!(
                "Limit {limit} exceeds maximum {}",
                config.max_limit
            )));
        }
        let offset = parse_count(query.get("offset"), "offset")?.unwrap_or(0);

        Ok(Self {
            filters,
            sort,
            fields,
            limit,
            offset,
        })
    }
}

fn parse_sort(value: Option<&Value>) -> EngineResult<Vec<SortKey>> {
    match value {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::String(raw)) => Ok(vec![SortKey::parse(raw)?]),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str().map(SortKey::parse).unwrap_or_else(|| {
                    Err(MemoryErrorKind::InvalidSort.error("Sort entries must be strings"))
                })
            })
            .collect(),
        Some(_) => Err(MemoryErrorKind::InvalidSort.error("sort must be a string or an array")),
    }
}

fn parse_fields(value: Option<&Value>) -> EngineResult<Option<Vec<String>>> {
    let items = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Array(items)) => items,
        Some(_) => return Err(MemoryErrorKind::InvalidFields.error("fields must be an array")),
    };

    let fields = items
        .iter()
        .map(|item| match item.as_str() {
            Some(field) if !field.is_empty() => Ok(field.to_string()),
            _ => Err(MemoryErrorKind::InvalidFields
                .error("fields entries must be non-empty strings")),
        })
        .collect::<EngineResult<Vec<_>>>()?;

    if fields.is_empty() {
        return Err(MemoryErrorKind::InvalidFields.error("fields cannot be empty"));
    }
    Ok(Some(fields))
}

fn parse_count(value: Option<&Value>, name: &str) -> EngineResult<Option<usize>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value
            .as_u64()
            .and_then(|n| usize::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| {
                MemoryErrorKind::InvalidPagination
                    .error(format!("{name} must be a non-negative integer"))
            }),
    }
}
