//! # HTTP Server
//!
//! Serves the in-memory engine through a [`TesoQlRoute`], with CORS and
//! request tracing layered on top.

use axum::http::HeaderValue;
use axum::routing::get;
use axum::Router;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::adapter::TesoQlRoute;
use crate::config::ServerConfig;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// HTTP server exposing one query endpoint plus a health check
pub struct HttpServer {
    config: ServerConfig,
    router: Router,
}

impl HttpServer {
    pub fn new(config: ServerConfig) -> Self {
        let router = Self::build_router(&config);
        Self { config, router }
    }

    fn build_router(config: &ServerConfig) -> Router {
        let route = TesoQlRoute::new(config.engine.clone());

        let cors = if config.cors_origins.is_empty() {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            let origins: Vec<_> = config
                .cors_origins
                .iter()
                .filter_map(|origin| match origin.parse::<HeaderValue>() {
                    Ok(value) => Some(value),
                    Err(err) => {
                        tracing::warn!(%origin, error = %err, "ignoring invalid CORS origin");
                        None
                    }
                })
                .collect();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        let router = Router::new().route("/health", get(|| async { "ok" }));
        route
            .route(router, &config.path)
            .layer(TraceLayer::new_for_http())
            .layer(cors)
    }

    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    pub async fn start(self) -> Result<(), ServerError> {
        let addr = self.config.socket_addr();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: addr.clone(),
                source,
            })?;

        tracing::info!(
            %addr,
            path = %self.config.path,
            rows = self.config.engine.rows.len(),
            "serving TesoQL endpoint"
        );

        axum::serve(listener, self.router).await?;
        Ok(())
    }
}
