//! Opaque pagination cursors
//!
//! A cursor is the URL-safe, unpadded base64 rendering of an RFC 3339 UTC
//! timestamp. Clients treat it as opaque; internally it is a [`Watermark`]
//! meaning "records created strictly after this instant".
//!
//! RFC 3339 has four-digit years, so watermarks are limited to
//! `0001-01-01T00:00:00Z..=9999-12-31T23:59:59.999999999Z`. Every watermark in
//! that range survives an encode/decode round trip unchanged.
//!
//! ```rust
//! use catalog_service::pagination::{decode_cursor, encode_cursor, Watermark};
//!
//! let cursor = encode_cursor(Watermark::zero());
//! assert_eq!(cursor, "MDAwMS0wMS0wMVQwMDowMDowMFo");
//! assert!(decode_cursor(&cursor).unwrap().is_zero());
//! ```

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt;
use thiserror::Error;

/// Seconds from the Unix epoch back to 0001-01-01T00:00:00Z
const ZERO_WATERMARK_SECS: i64 = -62_135_596_800;

/// Seconds from the Unix epoch to 9999-12-31T23:59:59Z
const MAX_WATERMARK_SECS: i64 = 253_402_300_799;

/// Point in time used as an exclusive lower bound for list queries
///
/// The zero watermark (`0001-01-01T00:00:00Z`) means "no lower bound".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Watermark(DateTime<Utc>);

/// Timestamp outside the range a cursor can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error(
    "timestamp {at} is outside the cursor range {min}..={max}",
    min = Watermark::zero(),
    max = Watermark::max()
)]
pub struct WatermarkRangeError {
    pub at: DateTime<Utc>,
}

impl Watermark {
    /// The zero watermark
    pub fn zero() -> Self {
        Self(
            DateTime::<Utc>::from_timestamp(ZERO_WATERMARK_SECS, 0)
                .unwrap_or(DateTime::<Utc>::MIN_UTC),
        )
    }

    /// The latest representable watermark
    pub fn max() -> Self {
        Self(
            DateTime::<Utc>::from_timestamp(MAX_WATERMARK_SECS, 999_999_999)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        )
    }

    /// Wrap a UTC timestamp, rejecting instants a cursor cannot carry
    pub fn new(at: DateTime<Utc>) -> Result<Self, WatermarkRangeError> {
        let candidate = Self(at);
        if candidate < Self::zero() || candidate > Self::max() {
            return Err(WatermarkRangeError { at });
        }
        Ok(candidate)
    }

    /// Whether this is the zero watermark
    pub fn is_zero(&self) -> bool {
        *self == Self::zero()
    }

    /// The underlying timestamp
    pub fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }
}

impl Default for Watermark {
    fn default() -> Self {
        Self::zero()
    }
}

impl TryFrom<DateTime<Utc>> for Watermark {
    type Error = WatermarkRangeError;

    fn try_from(at: DateTime<Utc>) -> Result<Self, Self::Error> {
        Self::new(at)
    }
}

impl fmt::Display for Watermark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }
}

/// Reasons a client-supplied cursor is rejected
#[derive(Debug, Error)]
pub enum CursorError {
    /// Not valid unpadded URL-safe base64
    #[error("invalid cursor encoding: `{cursor}`, error: {source}")]
    InvalidEncoding {
        cursor: String,
        #[source]
        source: base64::DecodeError,
    },

    /// Decoded bytes are not UTF-8
    #[error("invalid cursor time format: `{cursor}`, error: {source}")]
    InvalidText {
        cursor: String,
        #[source]
        source: std::string::FromUtf8Error,
    },

    /// Decoded text is not an RFC 3339 timestamp
    #[error("invalid cursor time format: `{cursor}`, error: {source}")]
    InvalidTimeFormat {
        cursor: String,
        #[source]
        source: chrono::ParseError,
    },

    /// Decoded timestamp is before year 1 (e.g. `0000-06-01T00:00:00Z`)
    #[error("invalid cursor time format: `{cursor}`, error: {source}")]
    OutOfRange {
        cursor: String,
        #[source]
        source: WatermarkRangeError,
    },
}

/// Encode a watermark as an opaque cursor
///
/// Sub-second precision is kept (0, 3, 6 or 9 fractional digits), so
/// decoding the result yields the same instant.
pub fn encode_cursor(watermark: Watermark) -> String {
    URL_SAFE_NO_PAD.encode(watermark.to_string())
}

/// Decode a cursor produced by [`encode_cursor`]
///
/// Anything else fails; there is no fallback to the zero watermark.
pub fn decode_cursor(cursor: &str) -> Result<Watermark, CursorError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(cursor)
        .map_err(|source| CursorError::InvalidEncoding {
            cursor: cursor.to_string(),
            source,
        })?;

    let text = String::from_utf8(bytes).map_err(|source| CursorError::InvalidText {
        cursor: cursor.to_string(),
        source,
    })?;

    let at = DateTime::parse_from_rfc3339(&text).map_err(|source| {
        CursorError::InvalidTimeFormat {
            cursor: cursor.to_string(),
            source,
        }
    })?;

    Watermark::new(at.with_timezone(&Utc)).map_err(|source| CursorError::OutOfRange {
        cursor: cursor.to_string(),
        source,
    })
}
