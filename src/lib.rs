//! tesoql-axum - expose a TesoQL query engine as one JSON endpoint
//!
//! A [`TesoQlRoute`] binds the request body into a [`QueryDescriptor`],
//! validates it against the engine configuration, executes it and answers
//! with a [`QueryResponse`]. Failures go through an [`ErrorPolicy`].

pub mod adapter;
pub mod cli;
pub mod config;
pub mod descriptor;
pub mod engine;
pub mod memory;
pub mod policy;
pub mod response;
pub mod server;

pub use adapter::TesoQlRoute;
pub use descriptor::{QueryDescriptor, Row};
pub use engine::{EngineError, EngineResult, QueryConfig, QueryPage, QueryService};
pub use policy::{
    derive_status, json_error, ErrorPolicy, JsonErrorPolicy, BINDING_ERR, BINDING_ERR_CODE,
    BINDING_ERR_MSG,
};
pub use response::{HttpError, QueryResponse};
