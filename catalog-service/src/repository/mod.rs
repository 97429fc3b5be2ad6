//! Storage collaborators for list endpoints
//!
//! # Features
//!
//! - **Keyset listing**: [`ListRepository`] returns records created strictly
//!   after a [`Watermark`](crate::pagination::Watermark)
//! - **Structured errors**: [`RepositoryError`] carries operation, kind and resource
//! - **In-memory backend**: [`MemoryRepository`] for seeding and tests
//!
//! Concrete backends are chosen at wiring time; the endpoint only sees the trait.

mod error;
mod memory;
mod pagination;
mod traits;

// Re-export all public types
pub use error::{RepositoryError, RepositoryErrorKind, RepositoryOperation};
pub use memory::MemoryRepository;
pub use pagination::{ListQuery, ListResult};
pub use traits::{ListRepository, RepositoryResult};
