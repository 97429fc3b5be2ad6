//! # catalog-service
//!
//! Query-facing layer for a product catalog: paginated list endpoints for
//! categories and products, opaque time-based cursors, and a uniform JSON
//! envelope for successes and failures.
//!
//! ## Features
//!
//! - **Cursor pagination**: base64 URL-safe RFC 3339 watermarks, lossless to the
//!   nanosecond for years 1 through 9999
//! - **Stable error catalog**: numeric codes with fixed client messages
//! - **Structured logging**: one JSON error record per failure, with call site
//! - **Pluggable storage**: backends implement [`ListRepository`](repository::ListRepository)
//! - **Graceful shutdown**: SIGTERM and SIGINT drain in-flight requests
//!
//! ## Example
//!
//! ```rust,no_run
//! use catalog_service::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::load()?;
//!     let logger = Logger::stdout(&LoggingSettings::from_config(&config));
//!
//!     let state = AppState::new(
//!         &config,
//!         &logger,
//!         MemoryRepository::<Category>::with_records("Category", Vec::new())?,
//!         MemoryRepository::<Product>::with_records("Product", Vec::new())?,
//!     );
//!
//!     Server::new(config).serve(router(state)).await
//! }
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod observability;
pub mod pagination;
pub mod repository;
pub mod routes;
pub mod server;
pub mod state;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::error::{Error, Result};
    pub use crate::handlers::{
        BufferedResponse, ErrorCode, ListEndpoint, ListSettings, PaginationParams, Responder,
        ResponseWriter,
    };
    pub use crate::models::{Category, Product, SeedData, Timestamped};
    pub use crate::observability::{Logger, LoggingSettings};
    pub use crate::pagination::{decode_cursor, encode_cursor, Watermark};
    pub use crate::repository::{
        ListQuery, ListRepository, ListResult, MemoryRepository, RepositoryError,
    };
    pub use crate::routes::router;
    pub use crate::server::Server;
    pub use crate::state::AppState;
}
