//! Error catalog for list endpoints
//!
//! Every failure a handler reports is classified into one [`ErrorCode`]. The
//! numeric code and client message are part of the wire contract and never
//! change; the log summary is what operators see as the record's message.
//!
//! # Example
//!
//! ```rust
//! use catalog_service::handlers::ErrorCode;
//! use axum::http::StatusCode;
//!
//! let code = ErrorCode::InvalidFieldFormat;
//! assert_eq!(code.code(), 1002);
//! assert_eq!(code.status_code(), StatusCode::BAD_REQUEST);
//! assert_eq!(code.client_message(), "Invalid field format");
//! ```

use std::fmt;

use axum::http::StatusCode;

/// Closed set of error codes reported to clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// A query parameter (cursor, limit, or the query string itself) is malformed
    InvalidFieldFormat,
    /// Storage failed or did not answer in time
    InternalServerError,
    /// A response body could not be serialized
    JsonEncoding,
    /// Writing an already committed response failed; logged only
    ResponseWrite,
}

impl ErrorCode {
    /// Stable numeric code
    #[must_use]
    pub const fn code(&self) -> u16 {
        match self {
            Self::InvalidFieldFormat => 1002,
            Self::InternalServerError => 1600,
            Self::JsonEncoding => 1601,
            Self::ResponseWrite => 1602,
        }
    }

    /// Get the HTTP status code for this error code
    ///
    /// `ResponseWrite` is only ever logged, since by then the status line has
    /// already been sent.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidFieldFormat => StatusCode::BAD_REQUEST,
            Self::InternalServerError | Self::JsonEncoding | Self::ResponseWrite => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message sent to clients
    #[must_use]
    pub const fn client_message(&self) -> &'static str {
        match self {
            Self::InvalidFieldFormat => "Invalid field format",
            Self::InternalServerError | Self::JsonEncoding => "Internal server error",
            Self::ResponseWrite => "Failed response writer",
        }
    }

    /// Message attached to the log record
    #[must_use]
    pub const fn log_summary(&self) -> &'static str {
        match self {
            Self::InvalidFieldFormat => "Invalid field format",
            Self::InternalServerError => "Internal server error",
            Self::JsonEncoding => "JSON encoding error",
            Self::ResponseWrite => "Failed response writer",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.log_summary(), self.code())
    }
}
