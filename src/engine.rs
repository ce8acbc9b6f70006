//! # Query Engine Seam
//!
//! Traits the adapter consumes from a TesoQL engine. A configuration
//! validates descriptors and builds the execution service; the service
//! runs a validated descriptor and returns one page of rows.

use thiserror::Error;

use crate::descriptor::{QueryDescriptor, Row};

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Structured error shared by validation and execution.
///
/// Codes are laid out so that `code / 1000` is the HTTP status class,
/// e.g. `400004` belongs to `400` and `503001` to `503`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{error_type} ({code}): {message}")]
pub struct EngineError {
    pub code: u32,
    pub error_type: String,
    pub message: String,
}

impl EngineError {
    pub fn new(code: u32, error_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code,
            error_type: error_type.into(),
            message: message.into(),
        }
    }

    /// Coarse class derived from the fine-grained code
    pub fn status_class(&self) -> u32 {
        self.code / 1000
    }
}

/// One page of query results
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryPage {
    pub rows: Vec<Row>,
    /// Rows matching the query across the full result set
    pub total_count: usize,
    /// Rows in this page
    pub size: usize,
}

impl QueryPage {
    pub fn new(rows: Vec<Row>, total_count: usize) -> Self {
        let size = rows.len();
        Self {
            rows,
            total_count,
            size,
        }
    }
}

/// Executes validated descriptors.
///
/// Called synchronously from the request handler. Engines that block on I/O
/// are expected to offload it themselves.
pub trait QueryService: Send + Sync + 'static {
    fn get(&self, query: &QueryDescriptor) -> EngineResult<QueryPage>;
}

/// Read-only engine configuration, shared across all requests.
pub trait QueryConfig: Send + Sync + 'static {
    type Service: QueryService;

    /// Build the execution service. Misconfiguration is fatal here.
    fn build(&self) -> Self::Service;

    /// Check a descriptor against this configuration
    fn validate(&self, query: &QueryDescriptor) -> EngineResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_class() {
        assert_eq!(EngineError::new(400_004, "FIELD_NOT_ALLOWED", "x").status_class(), 400);
        assert_eq!(EngineError::new(503_001, "BACKEND_DOWN", "x").status_class(), 503);
        assert_eq!(EngineError::new(999, "ODD", "x").status_class(), 0);
    }

    #[test]
    fn test_display() {
        let err = EngineError::new(400_001, "UNKNOWN_KEY", "Unknown key: foo");
        assert_eq!(err.to_string(), "UNKNOWN_KEY (400001): Unknown key: foo");
    }

    #[test]
    fn test_page_size_tracks_rows() {
        let row = json!({"id": 1}).as_object().cloned().unwrap();
        let page = QueryPage::new(vec![row.clone(), row], 10);
        assert_eq!(page.size, 2);
        assert_eq!(page.total_count, 10);
    }
}
