//! # Engine Error Catalog
//!
//! Codes emitted by the in-memory engine. The leading three digits of
//! every code are the HTTP status class.

use crate::engine::EngineError;

/// Error kinds of the in-memory engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryErrorKind {
    UnknownKey,
    InvalidFilter,
    InvalidOperator,
    FieldNotAllowed,
    InvalidSort,
    InvalidPagination,
    LimitExceeded,
    InvalidFields,
    IncomparableValues,
    Internal,
}

impl MemoryErrorKind {
    /// Error key reported to callers
    pub fn key(&self) -> &'static str {
        match self {
            Self::UnknownKey => "UNKNOWN_KEY",
            Self::InvalidFilter => "INVALID_FILTER",
            Self::InvalidOperator => "INVALID_OPERATOR",
            Self::FieldNotAllowed => "FIELD_NOT_ALLOWED",
            Self::InvalidSort => "INVALID_SORT",
            Self::InvalidPagination => "INVALID_PAGINATION",
            Self::LimitExceeded => "LIMIT_EXCEEDED",
            Self::InvalidFields => "INVALID_FIELDS",
            Self::IncomparableValues => "INCOMPARABLE_VALUES",
            Self::Internal => "INTERNAL_ERR",
        }
    }

    pub fn code(&self) -> u32 {
        match self {
            Self::UnknownKey => 400_001,
            Self::InvalidFilter => 400_002,
            Self::InvalidOperator => 400_003,
            Self::FieldNotAllowed => 400_004,
            Self::InvalidSort => 400_005,
            Self::InvalidPagination => 400_006,
            Self::LimitExceeded => 400_007,
            Self::InvalidFields => 400_008,
            Self::IncomparableValues => 422_001,
            Self::Internal => 500_000,
        }
    }

    /// Build the structured error for this kind
    pub fn error(self, message: impl Into<String>) -> EngineError {
        EngineError::new(self.code(), self.key(), message)
    }
}
