//! # Error Policy
//!
//! Decides how a failed query becomes an HTTP response. The handler always
//! calls the policy with the same four arguments; swapping the policy
//! changes rendering without touching the handler's control flow.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::response::HttpError;

/// Error key for request bodies that cannot be bound
pub const BINDING_ERR: &str = "BINDING_ERR";

/// Engine code reported for binding failures
pub const BINDING_ERR_CODE: u32 = 400_000;

/// Message reported for binding failures
pub const BINDING_ERR_MSG: &str = "Error encountered while binding the request payload!";

/// Renders an error for the caller.
///
/// Arguments are the HTTP status, the error key, the human-readable
/// message and the raw engine error code.
pub trait ErrorPolicy: Send + Sync + 'static {
    fn render(&self, status: StatusCode, key: &str, message: &str, code: u32) -> Response;
}

impl<F> ErrorPolicy for F
where
    F: Fn(StatusCode, &str, &str, u32) -> Response + Send + Sync + 'static,
{
    fn render(&self, status: StatusCode, key: &str, message: &str, code: u32) -> Response {
        self(status, key, message, code)
    }
}

/// Default policy: an [`HttpError`] JSON body sent with `status`
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonErrorPolicy;

impl ErrorPolicy for JsonErrorPolicy {
    fn render(&self, status: StatusCode, key: &str, message: &str, code: u32) -> Response {
        json_error(status, key, message, code)
    }
}

/// Build the default JSON error response
pub fn json_error(status: StatusCode, key: &str, message: &str, code: u32) -> Response {
    let body = HttpError::new(status, key, message, code);
    (status, axum::Json(body)).into_response()
}

/// Map an engine error code onto the HTTP status it encodes.
///
/// The status is `code / 1000`. Codes whose class is not an error status
/// (400..=599) are reported as 500.
pub fn derive_status(code: u32) -> StatusCode {
    let class = code / 1000;
    match u16::try_from(class)
        .ok()
        .filter(|class| (400..=599).contains(class))
        .and_then(|class| StatusCode::from_u16(class).ok())
    {
        Some(status) => status,
        None => {
            tracing::warn!(code, class, "engine error code does not encode an error status");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
