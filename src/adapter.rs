//! # TesoQL Route
//!
//! Binds a query engine to a single `POST` endpoint. The engine handle,
//! its configuration and the error policy are built once and shared by
//! reference across every request.

use std::sync::Arc;

use axum::body::{Body, Bytes};
use axum::extract::rejection::{BytesRejection, JsonRejection};
use axum::extract::{FromRequest, Request, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};

use crate::descriptor::QueryDescriptor;
use crate::engine::{EngineError, QueryConfig, QueryService};
use crate::policy::{
    derive_status, ErrorPolicy, JsonErrorPolicy, BINDING_ERR, BINDING_ERR_CODE, BINDING_ERR_MSG,
};
use crate::response::QueryResponse;

/// A query endpoint backed by engine configuration `C`
pub struct TesoQlRoute<C: QueryConfig> {
    service: Arc<C::Service>,
    config: Arc<C>,
    error_policy: Arc<dyn ErrorPolicy>,
}

impl<C: QueryConfig> Clone for TesoQlRoute<C> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            config: Arc::clone(&self.config),
            error_policy: Arc::clone(&self.error_policy),
        }
    }
}

impl<C: QueryConfig> TesoQlRoute<C> {
    /// Create a route that reports errors with [`JsonErrorPolicy`]
    pub fn new(config: C) -> Self {
        Self::with_error_policy(config, JsonErrorPolicy)
    }

    /// Create a route with a custom error policy
    pub fn with_error_policy(config: C, policy: impl ErrorPolicy) -> Self {
        let service = config.build();
        Self {
            service: Arc::new(service),
            config: Arc::new(config),
            error_policy: Arc::new(policy),
        }
    }

    pub fn config(&self) -> &C {
        &self.config
    }

    /// Register the query handler for `POST path` on `router`
    pub fn route<S>(&self, router: Router<S>, path: &str) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        router.route(path, post(query_handler::<C>).with_state(self.clone()))
    }

    /// Run one bound descriptor through validation and execution
    pub fn execute(&self, query: &QueryDescriptor) -> Result<QueryResponse, EngineError> {
        self.config.validate(query)?;
        let page = self.service.get(query)?;
        Ok(QueryResponse::from(page))
    }

    fn reject(&self, err: &EngineError) -> Response {
        tracing::debug!(
            code = err.code,
            error_type = %err.error_type,
            "query rejected by engine"
        );
        self.error_policy.render(
            derive_status(err.code),
            &err.error_type,
            &err.message,
            err.code,
        )
    }
}

async fn query_handler<C: QueryConfig>(
    State(route): State<TesoQlRoute<C>>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let bound = match body {
        Ok(body) => bind_query(headers, body).await,
        Err(rejection) => Err(rejection.body_text()),
    };

    let query = match bound {
        Ok(query) => query,
        Err(reason) => {
            tracing::debug!(error = %reason, "failed to bind query payload");
            return route.error_policy.render(
                StatusCode::BAD_REQUEST,
                BINDING_ERR,
                BINDING_ERR_MSG,
                BINDING_ERR_CODE,
            );
        }
    };

    match route.execute(&query) {
        Ok(response) => response.into_response(),
        Err(err) => route.reject(&err),
    }
}

/// Bind a request body into a descriptor.
///
/// An empty body binds to an empty descriptor whatever its content type.
/// Anything else must be a JSON object sent as `application/json`.
async fn bind_query(headers: HeaderMap, body: Bytes) -> Result<QueryDescriptor, String> {
    if body.is_empty() {
        return Ok(QueryDescriptor::default());
    }

    let mut request = Request::new(Body::from(body));
    *request.headers_mut() = headers;

    Json::<QueryDescriptor>::from_request(request, &())
        .await
        .map(|Json(query)| query)
        .map_err(|rejection: JsonRejection| rejection.body_text())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{EngineResult, QueryPage};
    use serde_json::json;

    struct FixedConfig {
        reject_with: Option<EngineError>,
    }

    struct FixedService;

    impl QueryService for FixedService {
        fn get(&self, _query: &QueryDescriptor) -> EngineResult<QueryPage> {
            let row = json!({"id": 7}).as_object().cloned().unwrap_or_default();
            Ok(QueryPage::new(vec![row], 12))
        }
    }

    impl QueryConfig for FixedConfig {
        type Service = FixedService;

        fn build(&self) -> FixedService {
            FixedService
        }

        fn validate(&self, _query: &QueryDescriptor) -> EngineResult<()> {
            match &self.reject_with {
                Some(err) => Err(err.clone()),
                None => Ok(()),
            }
        }
    }

    #[test]
    fn test_execute_shapes_page() {
        let route = TesoQlRoute::new(FixedConfig { reject_with: None });
        let response = route.execute(&QueryDescriptor::default()).unwrap();

        assert_eq!(response.size, 1);
        assert_eq!(response.total_count, 12);
        assert_eq!(response.data[0]["id"], 7);
    }

    #[test]
    fn test_execute_stops_at_validation() {
        let err = EngineError::new(400_001, "UNKNOWN_KEY", "Unknown key: x");
        let route = TesoQlRoute::new(FixedConfig {
            reject_with: Some(err.clone()),
        });

        assert_eq!(route.execute(&QueryDescriptor::default()), Err(err));
    }

    #[tokio::test]
    async fn test_bind_empty_body_without_content_type() {
        let query = bind_query(HeaderMap::new(), Bytes::new()).await.unwrap();
        assert!(query.is_empty());
    }

    #[tokio::test]
    async fn test_bind_requires_json_content_type() {
        assert!(bind_query(HeaderMap::new(), Bytes::from_static(b"{}")).await.is_err());

        let mut headers = HeaderMap::new();
        headers.insert("content-type", "application/json".parse().unwrap());
        let query = bind_query(headers, Bytes::from_static(br#"{"limit": 3}"#))
            .await
            .unwrap();
        assert_eq!(query.get("limit"), Some(&json!(3)));
    }

    #[test]
    fn test_reject_derives_status() {
        let route = TesoQlRoute::new(FixedConfig { reject_with: None });
        let response = route.reject(&EngineError::new(404_002, "MISSING", "gone"));
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
