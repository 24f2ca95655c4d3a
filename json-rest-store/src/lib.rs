//! # json-rest-store
//!
//! Expose a pluggable JSON document store as REST resources over axum.
//!
//! ## Features
//!
//! - **Six operations per resource**: query, read, create, update (PUT), append
//!   (PATCH and POST-to-item merge) and delete, each individually switchable
//! - **Query strings as store queries**: equality filters, `sort(+a,-b)` sorting
//!   (or a named sort parameter), `Range: items=0-24` windows with `Content-Range`
//! - **Pluggable backends** through the [`Store`](store::Store) trait, with an
//!   in-memory [`MemoryStore`](store::MemoryStore) included
//! - **Layered configuration**, JSON logging, graceful shutdown
//!
//! ## Example
//!
//! ```rust,no_run
//! use json_rest_store::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::load()?;
//!     init_tracing(&config)?;
//!
//!     let app = JsonRestStore::new(MemoryStore::new())
//!         .rest("/users", "id")
//!         .rest_with("/audit", "seq", OperationSet::from([Operation::Query, Operation::Read]))
//!         .into_router();
//!
//!     Server::new(config).serve(app).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod observability;
pub mod rest;
pub mod server;
pub mod store;

pub use config::Config;
pub use error::{Error, Result};
pub use rest::JsonRestStore;

/// Everything needed to configure, bind and serve resources
pub mod prelude {
    pub use crate::config::{Config, ResourceConfig};
    pub use crate::error::{Error, ErrorResponse, Result};
    pub use crate::observability::init_tracing;
    pub use crate::rest::{JsonRestStore, Operation, OperationSet, QueryTranslator};
    pub use crate::server::Server;
    pub use crate::store::{
        Entity, Filters, ItemRange, MemoryStore, SortDirection, SortSpec, Store, StoreError,
        StoreErrorKind, StoreOperation, StoreResult,
    };

    pub use axum::Router;
}
