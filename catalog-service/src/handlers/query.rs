//! Query parameters for list operations
//!
//! Raw `cursor` and `limit` strings are extracted as-is and validated by
//! [`parse_pagination`], so malformed values are reported through the error
//! envelope instead of an extractor rejection.
//!
//! # Example
//!
//! ```rust
//! use catalog_service::handlers::{parse_pagination, PaginationParams, DEFAULT_LIMIT};
//!
//! let query = parse_pagination(&PaginationParams::default(), DEFAULT_LIMIT).unwrap();
//! assert!(query.created_after.is_zero());
//! assert_eq!(query.limit, 20);
//! ```

use std::num::ParseIntError;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pagination::{decode_cursor, CursorError, Watermark};
use crate::repository::ListQuery;

/// Default number of items per page
pub const DEFAULT_LIMIT: i32 = 20;

/// Raw pagination parameters from the query string
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationParams {
    /// Opaque cursor from a previous page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
    /// Page size as a base-10 integer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<String>,
}

impl PaginationParams {
    /// Set the cursor
    #[must_use]
    pub fn with_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = Some(cursor.into());
        self
    }

    /// Set the limit
    #[must_use]
    pub fn with_limit(mut self, limit: impl Into<String>) -> Self {
        self.limit = Some(limit.into());
        self
    }
}

/// Why pagination parameters were rejected
#[derive(Debug, Error)]
pub enum PaginationError {
    /// The cursor failed to decode
    #[error(transparent)]
    InvalidCursor(#[from] CursorError),

    /// The limit is not a signed 32-bit integer
    #[error("invalid limit value: `{value}`, error: {source}")]
    InvalidLimit {
        value: String,
        #[source]
        source: ParseIntError,
    },
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Validate raw parameters into a list query
///
/// The cursor is checked before the limit, so when both are malformed the
/// cursor error is reported. No bounds are applied to the limit.
pub fn parse_pagination(
    params: &PaginationParams,
    default_limit: i32,
) -> Result<ListQuery, PaginationError> {
    let created_after = match present(&params.cursor) {
        Some(cursor) => decode_cursor(cursor)?,
        None => Watermark::zero(),
    };

    let limit = match present(&params.limit) {
        Some(raw) => raw
            .parse::<i32>()
            .map_err(|source| PaginationError::InvalidLimit {
                value: raw.to_string(),
                source,
            })?,
        None => default_limit,
    };

    Ok(ListQuery::new(created_after, limit))
}
