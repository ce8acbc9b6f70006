//! # Response Formatting
//!
//! The two mutually exclusive JSON bodies the adapter produces.

use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::descriptor::Row;
use crate::engine::QueryPage;

/// Success envelope for a query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    /// Number of rows in this response
    pub size: usize,
    /// Number of rows matching the query
    #[serde(rename = "totalCount")]
    pub total_count: usize,
    pub data: Vec<Row>,
}

impl QueryResponse {
    pub fn new(total_count: usize, size: usize, data: Vec<Row>) -> Self {
        Self {
            size,
            total_count,
            data,
        }
    }
}

impl From<QueryPage> for QueryResponse {
    fn from(page: QueryPage) -> Self {
        Self::new(page.total_count, page.size, page.rows)
    }
}

impl IntoResponse for QueryResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Error envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpError {
    /// HTTP status sent with the body
    pub code: u16,
    /// Error key, e.g. `BINDING_ERR`
    #[serde(rename = "error")]
    pub key: String,
    pub message: String,
    /// Fine-grained engine code
    #[serde(rename = "tesoQlErrCode")]
    pub tesoql_err_code: u32,
}

impl HttpError {
    pub fn new(status: StatusCode, key: &str, message: &str, tesoql_err_code: u32) -> Self {
        Self {
            code: status.as_u16(),
            key: key.to_string(),
            message: message.to_string(),
            tesoql_err_code,
        }
    }
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.key, self.message)
    }
}

impl std::error::Error for HttpError {}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}
