//! # In-Memory Engine
//!
//! A small TesoQL engine over a fixed set of rows. It understands the
//! descriptor keys `filter`, `sort`, `fields`, `limit` and `offset`, and is
//! used by the demo server and by tests of the route.
//!
//! ```ignore
//! use tesoql_axum::memory::MemoryConfig;
//! use tesoql_axum::TesoQlRoute;
//!
//! let route = TesoQlRoute::new(MemoryConfig::with_rows(rows));
//! let app = route.route(axum::Router::new(), "/tesoql");
//! ```

pub mod config;
pub mod errors;
pub mod filter;
pub mod query;
pub mod service;

pub use config::MemoryConfig;
pub use errors::MemoryErrorKind;
pub use filter::{FilterExpr, FilterOperator};
pub use query::{ParsedQuery, SortKey};
pub use service::MemoryService;
