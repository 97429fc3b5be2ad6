//! In-memory list repository
//!
//! Records are kept sorted by creation time behind a `std::sync::RwLock`.
//! The lock is only held for the synchronous page slice, never across an
//! await point.

use std::sync::RwLock;

use tokio_util::sync::CancellationToken;

use super::error::{RepositoryError, RepositoryOperation};
use super::pagination::{ListQuery, ListResult};
use super::traits::{ListRepository, RepositoryResult};
use crate::models::Timestamped;
use crate::pagination::Watermark;

/// Repository backed by a sorted vector
#[derive(Debug)]
pub struct MemoryRepository<T> {
    resource: &'static str,
    records: RwLock<Vec<T>>,
}

impl<T> MemoryRepository<T>
where
    T: Timestamped + Clone,
{
    /// Create a repository holding `records`
    ///
    /// Every `created_at` must be representable as a cursor watermark,
    /// otherwise the page after it could never be requested.
    pub fn with_records(resource: &'static str, mut records: Vec<T>) -> RepositoryResult<Self> {
        for record in &records {
            Self::watermark(resource, RepositoryOperation::Seed, record)?;
        }
        records.sort_by_key(|record| record.created_at());
        Ok(Self {
            resource,
            records: RwLock::new(records),
        })
    }

    fn watermark(
        resource: &'static str,
        operation: RepositoryOperation,
        record: &T,
    ) -> RepositoryResult<Watermark> {
        Watermark::new(record.created_at()).map_err(|err| {
            RepositoryError::invalid_record(operation, err.to_string()).with_resource(resource)
        })
    }

    fn poisoned(&self, operation: RepositoryOperation) -> RepositoryError {
        RepositoryError::database_error(operation, "record lock poisoned")
            .with_resource(self.resource)
    }

    fn page(&self, query: ListQuery) -> RepositoryResult<ListResult<T>> {
        let records = self
            .records
            .read()
            .map_err(|_| self.poisoned(RepositoryOperation::List))?;

        let after = query.created_after.as_datetime();
        let start = records.partition_point(|record| record.created_at() <= after);
        let remaining = &records[start..];

        let limit = query.limit_usize();
        let items: Vec<T> = remaining.iter().take(limit).cloned().collect();
        let has_more = remaining.len() > items.len();
        let next_cursor = match items.last() {
            Some(record) => Self::watermark(self.resource, RepositoryOperation::List, record)?,
            None => Watermark::zero(),
        };

        Ok(ListResult {
            items,
            has_more,
            next_cursor,
        })
    }
}

impl<T> ListRepository<T> for MemoryRepository<T>
where
    T: Timestamped + Clone + Send + Sync,
{
    async fn list_items(
        &self,
        query: ListQuery,
        cancel: CancellationToken,
    ) -> RepositoryResult<ListResult<T>> {
        if cancel.is_cancelled() {
            return Err(
                RepositoryError::cancelled(RepositoryOperation::List).with_resource(self.resource)
            );
        }

        tracing::debug!(
            resource = self.resource,
            created_after = %query.created_after,
            limit = query.limit,
            "listing records"
        );

        self.page(query)
    }
}
