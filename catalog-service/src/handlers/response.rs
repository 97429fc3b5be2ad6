//! Response envelope types
//!
//! Every body the service writes is one of two shapes:
//!
//! ```json
//! {"status":"success","data":[...],"pagination":{"next_cursor":"...","has_more":false},"message":"..."}
//! {"status":"error","error":{"code":1002,"message":"Invalid field format"}}
//! ```
//!
//! `pagination` and `details` are omitted rather than rendered as `null`.
//!
//! # Example
//!
//! ```rust
//! use catalog_service::handlers::{ErrorCode, ErrorEnvelope};
//!
//! let body = serde_json::to_string(&ErrorEnvelope::new(ErrorCode::InvalidFieldFormat, None)).unwrap();
//! assert_eq!(body, r#"{"status":"error","error":{"code":1002,"message":"Invalid field format"}}"#);
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::ErrorCode;
use crate::pagination::{encode_cursor, Watermark};

/// Envelope discriminator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvelopeStatus {
    Success,
    Error,
}

/// Continuation state for list responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationMeta {
    /// Opaque cursor for the next page
    pub next_cursor: String,
    /// Whether the next page has records
    pub has_more: bool,
}

impl PaginationMeta {
    /// Build from a storage watermark, encoding it as a cursor
    pub fn new(next_cursor: Watermark, has_more: bool) -> Self {
        Self {
            next_cursor: encode_cursor(next_cursor),
            has_more,
        }
    }
}

/// Successful response body
#[derive(Debug, Clone, Serialize)]
pub struct SuccessEnvelope<'a, T: ?Sized> {
    pub status: EnvelopeStatus,
    pub data: &'a T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PaginationMeta>,
    pub message: &'a str,
}

impl<'a, T: ?Sized> SuccessEnvelope<'a, T> {
    /// Create a success envelope around borrowed data
    pub fn new(data: &'a T, message: &'a str, pagination: Option<PaginationMeta>) -> Self {
        Self {
            status: EnvelopeStatus::Success,
            data,
            pagination,
            message,
        }
    }
}

/// Client-visible error description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEntry {
    pub code: u16,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

/// Error response body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub status: EnvelopeStatus,
    pub error: ErrorEntry,
}

impl ErrorEnvelope {
    /// Build the body for `code`; diagnostic text never appears here
    pub fn new(code: ErrorCode, details: Option<Value>) -> Self {
        Self {
            status: EnvelopeStatus::Error,
            error: ErrorEntry {
                code: code.code(),
                message: code.client_message().to_string(),
                details,
            },
        }
    }
}
