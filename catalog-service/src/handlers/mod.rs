//! Paginated list handlers
//!
//! This module turns a raw list request into a JSON envelope. It builds on
//! the repository traits and the cursor codec.
//!
//! # Features
//!
//! - **Pagination parsing**: [`parse_pagination`] validates `cursor` and `limit`
//! - **Error catalog**: [`ErrorCode`] with stable numeric codes and status mapping
//! - **Envelopes**: [`SuccessEnvelope`] and [`ErrorEnvelope`] with a fixed wire shape
//! - **Rendering**: [`Responder`] logs failures and writes through a [`ResponseWriter`]
//! - **Endpoints**: [`ListEndpoint`] orchestrates parsing, storage and rendering
//!
//! # Integration with Axum
//!
//! ```rust,ignore
//! use axum::extract::{Query, State};
//! use catalog_service::handlers::{BufferedResponse, PaginationParams};
//!
//! async fn list_categories(
//!     State(state): State<AppState>,
//!     Query(params): Query<PaginationParams>,
//! ) -> BufferedResponse {
//!     let mut response = BufferedResponse::new();
//!     state.categories.list(&params, None, &mut response).await;
//!     response
//! }
//! ```

mod endpoint;
mod error;
mod query;
mod responder;
mod response;
mod writer;

// Re-export all public types
pub use endpoint::{ListEndpoint, ListSettings};
pub use error::ErrorCode;
pub use query::{parse_pagination, PaginationError, PaginationParams, DEFAULT_LIMIT};
pub use responder::Responder;
pub use response::{EnvelopeStatus, ErrorEntry, ErrorEnvelope, PaginationMeta, SuccessEnvelope};
pub use writer::{BufferedResponse, ResponseWriter};

#[cfg(test)]
pub(crate) use endpoint::testing as endpoint_testing;
