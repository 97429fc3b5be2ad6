//! Service-level error types
//!
//! These errors cover startup and wiring (configuration, seed data, socket
//! binding). Request-scoped failures never surface as [`Error`]; they are
//! classified through the [`ErrorCode`](crate::handlers::ErrorCode) catalog
//! and rendered by the response envelope.

use thiserror::Error;

/// Result type alias using the service error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the service
///
/// Large error variants are boxed to reduce stack size
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(Box<figment::Error>),

    /// Seed data could not be parsed
    #[error("Seed data error in {path}: {source}")]
    Seed {
        /// Path of the seed file
        path: String,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },

    /// Seed records rejected by a storage backend
    #[error("{0}")]
    Repository(#[from] crate::repository::RepositoryError),

    /// Logging pipeline could not be installed
    #[error("Logging error: {0}")]
    Logging(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Error::Config(Box::new(err))
    }
}
