//! Repository trait definitions
//!
//! Storage is a capability parameterised by record type. Traits use RPITIT
//! (Return Position Impl Trait In Traits) so backends can write plain
//! `async fn` bodies without `async_trait`.
//!
//! # Example
//!
//! ```rust,ignore
//! use catalog_service::repository::{ListQuery, ListRepository, ListResult, RepositoryResult};
//!
//! struct PgCategories { pool: PgPool }
//!
//! impl ListRepository<Category> for PgCategories {
//!     async fn list_items(
//!         &self,
//!         query: ListQuery,
//!         cancel: CancellationToken,
//!     ) -> RepositoryResult<ListResult<Category>> {
//!         // SELECT ... WHERE created_at > $1 ORDER BY created_at LIMIT $2 + 1
//!         todo!()
//!     }
//! }
//! ```

use std::future::Future;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::error::RepositoryError;
use super::pagination::{ListQuery, ListResult};

/// Result type for repository operations
pub type RepositoryResult<T> = std::result::Result<T, RepositoryError>;

/// Keyset-paginated listing of one record type
///
/// Implementations return records created strictly after
/// `query.created_after`, in creation order, at most `query.limit` of them.
/// A successful call always carries a result, possibly empty.
///
/// `cancel` fires when the request deadline passes. The caller then keeps
/// polling the future for a short grace period so the backend can release
/// resources and return [`RepositoryError::cancelled`]; after that the future
/// is dropped. Any result produced after the token fired is discarded.
pub trait ListRepository<T>: Send + Sync {
    /// Fetch one page
    fn list_items(
        &self,
        query: ListQuery,
        cancel: CancellationToken,
    ) -> impl Future<Output = RepositoryResult<ListResult<T>>> + Send;
}

impl<T, R> ListRepository<T> for Arc<R>
where
    R: ListRepository<T>,
{
    fn list_items(
        &self,
        query: ListQuery,
        cancel: CancellationToken,
    ) -> impl Future<Output = RepositoryResult<ListResult<T>>> + Send {
        (**self).list_items(query, cancel)
    }
}
