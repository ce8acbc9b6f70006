//! # Filter Expressions
//!
//! `filter` entries are written as `"<field>__<op>": value`; a bare
//! `"<field>"` means equality. All entries are combined with AND.

use std::cmp::Ordering;

use serde_json::{Map, Value};

use super::errors::MemoryErrorKind;
use crate::descriptor::Row;
use crate::engine::EngineResult;

/// Separator between field name and operator
pub const OPERATOR_SEPARATOR: &str = "__";

/// Filter operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOperator {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    /// Value in list
    In,
    /// Value not in list
    Nin,
    /// Pattern match, `%` any run and `_` one character
    Like,
    /// `true` matches null or missing fields, `false` matches present ones
    IsNull,
}

impl FilterOperator {
    pub fn parse(op: &str) -> Option<Self> {
        let op = match op {
            "eq" => FilterOperator::Eq,
            "ne" => FilterOperator::Ne,
            "gt" => FilterOperator::Gt,
            "gte" => FilterOperator::Gte,
            "lt" => FilterOperator::Lt,
            "lte" => FilterOperator::Lte,
            "in" => FilterOperator::In,
            "nin" => FilterOperator::Nin,
            "like" => FilterOperator::Like,
            "isnull" => FilterOperator::IsNull,
            _ => return None,
        };
        Some(op)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOperator::Eq => "eq",
            FilterOperator::Ne => "ne",
            FilterOperator::Gt => "gt",
            FilterOperator::Gte => "gte",
            FilterOperator::Lt => "lt",
            FilterOperator::Lte => "lte",
            FilterOperator::In => "in",
            FilterOperator::Nin => "nin",
            FilterOperator::Like => "like",
            FilterOperator::IsNull => "isnull",
        }
    }

    fn is_ordering(&self) -> bool {
        matches!(
            self,
            FilterOperator::Gt | FilterOperator::Gte | FilterOperator::Lt | FilterOperator::Lte
        )
    }
}

/// A single filter condition
#[derive(Debug, Clone, PartialEq)]
pub struct FilterExpr {
    pub field: String,
    pub operator: FilterOperator,
    pub value: Value,
}

impl FilterExpr {
    pub fn new(field: impl Into<String>, operator: FilterOperator, value: Value) -> Self {
        Self {
            field: field.into(),
            operator,
            value,
        }
    }

    /// Parse one `filter` entry, checking the value shape the operator needs
    pub fn parse(key: &str, value: &Value) -> EngineResult<Self> {
        let (field, operator) = match key.rsplit_once(OPERATOR_SEPARATOR) {
            Some((field, op)) => {
                let operator = FilterOperator::parse(op).ok_or_else(|| {
                    MemoryErrorKind::InvalidOperator
                        .error(format!("Unknown filter operator '{op}' in '{key}'"))
                })?;
                (field, operator)
            }
            None => (key, FilterOperator::Eq),
        };

        if field.is_empty() {
            return Err(MemoryErrorKind::InvalidFilter
                .error(format!("Filter '{key}' does not name a field")));
        }

        let shape_ok = match operator {
            FilterOperator::In | FilterOperator::Nin => value.is_array(),
            FilterOperator::Like => value.is_string(),
            FilterOperator::IsNull => value.is_boolean(),
            op if op.is_ordering() => value.is_number() || value.is_string(),
            _ => true,
        };
        if !shape_ok {
            return Err(MemoryErrorKind::InvalidFilter.error(format!(
                "Filter '{key}' has an invalid value for operator '{}'",
                operator.as_str()
            )));
        }

        Ok(Self::new(field, operator, value.clone()))
    }

    /// Check whether a row satisfies this condition
    pub fn matches(&self, row: &Row) -> EngineResult<bool> {
        let field_value = row.get(&self.field).filter(|v| !v.is_null());

        let matched = match (self.operator, field_value) {
            (FilterOperator::IsNull, v) => v.is_none() == self.value.as_bool().unwrap_or(true),
            // A missing field never equals anything
            (FilterOperator::Ne | FilterOperator::Nin, None) => true,
            (_, None) => false,
            (FilterOperator::Eq, Some(v)) => json_eq(v, &self.value),
            (FilterOperator::Ne, Some(v)) => !json_eq(v, &self.value),
            (FilterOperator::Gt, Some(v)) => self.compare(v)? == Ordering::Greater,
            (FilterOperator::Gte, Some(v)) => self.compare(v)? != Ordering::Less,
            (FilterOperator::Lt, Some(v)) => self.compare(v)? == Ordering::Less,
            (FilterOperator::Lte, Some(v)) => self.compare(v)? != Ordering::Greater,
            (FilterOperator::In, Some(v)) => self.in_list(v),
            (FilterOperator::Nin, Some(v)) => !self.in_list(v),
            (FilterOperator::Like, Some(v)) => match (v.as_str(), self.value.as_str()) {
                (Some(text), Some(pattern)) => matches_like_pattern(text, pattern),
                _ => false,
            },
        };
        Ok(matched)
    }

    fn compare(&self, field_value: &Value) -> EngineResult<Ordering> {
        compare_json_values(field_value, &self.value).ok_or_else(|| {
            MemoryErrorKind::IncomparableValues.error(format!(
                "Field '{}' cannot be compared with {}",
                self.field, self.value
            ))
        })
    }

    fn in_list(&self, field_value: &Value) -> bool {
        self.value
            .as_array()
            .is_some_and(|list| list.iter().any(|v| json_eq(field_value, v)))
    }
}

/// Parse the `filter` object of a descriptor
pub fn parse_filters(filter: &Map<String, Value>) -> EngineResult<Vec<FilterExpr>> {
    filter
        .iter()
        .map(|(key, value)| FilterExpr::parse(key, value))
        .collect()
}

/// Equality that treats `1` and `1.0` as the same number
fn json_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        _ => a == b,
    }
}

/// Order two JSON scalars of the same kind; `None` when they do not compare
pub fn compare_json_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

/// LIKE matching over characters.
///
/// Greedy scan that backtracks only to the most recent `%`, so the cost is
/// bounded by `value.len() * pattern.len()`.
fn matches_like_pattern(value: &str, pattern: &str) -> bool {
    let value: Vec<char> = value.chars().collect();
    let pattern: Vec<char> = pattern.chars().collect();

    let (mut v, mut p) = (0, 0);
    // (pattern index after the last `%`, value index it was matched against)
    let mut backtrack: Option<(usize, usize)> = None;

    while v < value.len() {
        match pattern.get(p) {
            Some('%') => {
                p += 1;
                backtrack = Some((p, v));
            }
            Some('_') => {
                p += 1;
                v += 1;
            }
            Some(c) if *c == value[v] => {
                p += 1;
                v += 1;
            }
            _ => match backtrack {
                Some((star_p, star_v)) => {
                    p = star_p;
                    v = star_v + 1;
                    backtrack = Some((star_p, star_v + 1));
                }
                None => return false,
            },
        }
    }

    pattern[p..].iter().all(|c| *c == '%')
}
