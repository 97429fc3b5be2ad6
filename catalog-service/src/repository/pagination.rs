//! Keyset pagination types shared by the endpoint and storage backends

use crate::pagination::Watermark;

/// One page request against a list repository
///
/// `limit` is passed through as parsed; backends decide how to treat zero
/// or negative values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListQuery {
    /// Only records created strictly after this instant are returned
    pub created_after: Watermark,
    /// Maximum number of records in the page
    pub limit: i32,
}

impl ListQuery {
    /// Create a query from a watermark and limit
    pub fn new(created_after: Watermark, limit: i32) -> Self {
        Self {
            created_after,
            limit,
        }
    }

    /// Limit as a usize, with negative values treated as zero
    pub fn limit_usize(&self) -> usize {
        usize::try_from(self.limit).unwrap_or(0)
    }
}

/// One page of records as returned by storage
#[derive(Debug, Clone, PartialEq)]
pub struct ListResult<T> {
    /// Records in creation order
    pub items: Vec<T>,
    /// Whether records exist past this page
    pub has_more: bool,
    /// Watermark to resume from
    pub next_cursor: Watermark,
}
