//! Repository error types
//!
//! Storage collaborators report failures through [`RepositoryError`]. The list
//! endpoint never shows this text to clients; it is logged as the diagnostic
//! of an internal server error.
//!
//! # Example
//!
//! ```rust
//! use catalog_service::repository::{RepositoryError, RepositoryErrorKind, RepositoryOperation};
//!
//! let error = RepositoryError::database_error(RepositoryOperation::List, "db down")
//!     .with_resource("Category");
//! assert_eq!(error.kind, RepositoryErrorKind::DatabaseError);
//! assert_eq!(error.to_string(), "Repository database_error error during list: db down [Category]");
//! ```

use std::fmt;

/// Operation being performed when the repository error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepositoryOperation {
    /// Listing a page of records after a watermark
    List,
    /// Loading seed records into a backend
    Seed,
}

impl fmt::Display for RepositoryOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List => write!(f, "list"),
            Self::Seed => write!(f, "seed"),
        }
    }
}

/// Category of repository error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepositoryErrorKind {
    /// Operation did not finish within its budget
    Timeout,
    /// Caller cancelled the operation
    Cancelled,
    /// Underlying database error
    DatabaseError,
    /// Record cannot be served by this backend
    InvalidRecord,
}

impl fmt::Display for RepositoryErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "timeout"),
            Self::Cancelled => write!(f, "cancelled"),
            Self::DatabaseError => write!(f, "database_error"),
            Self::InvalidRecord => write!(f, "invalid_record"),
        }
    }
}

/// Structured repository error with operation context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryError {
    /// The operation being performed when the error occurred
    pub operation: RepositoryOperation,
    /// The category of error
    pub kind: RepositoryErrorKind,
    /// Diagnostic message, never shown to clients
    pub message: String,
    /// The resource involved (e.g. "Category", "Product")
    pub resource: Option<String>,
}

impl RepositoryError {
    /// Create a new repository error
    pub fn new(
        operation: RepositoryOperation,
        kind: RepositoryErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            operation,
            kind,
            message: message.into(),
            resource: None,
        }
    }

    /// Create a timeout error
    pub fn timeout(operation: RepositoryOperation, message: impl Into<String>) -> Self {
        Self::new(operation, RepositoryErrorKind::Timeout, message)
    }

    /// Create a cancellation error for a list call whose token fired
    pub fn cancelled(operation: RepositoryOperation) -> Self {
        Self::new(
            operation,
            RepositoryErrorKind::Cancelled,
            "operation cancelled",
        )
    }

    /// Create a database error
    pub fn database_error(operation: RepositoryOperation, message: impl Into<String>) -> Self {
        Self::new(operation, RepositoryErrorKind::DatabaseError, message)
    }

    /// Create an error for a record the backend refuses to store
    pub fn invalid_record(operation: RepositoryOperation, message: impl Into<String>) -> Self {
        Self::new(operation, RepositoryErrorKind::InvalidRecord, message)
    }

    /// Attach the resource name to an existing error
    #[must_use]
    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }
}

impl fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Repository {} error during {}: {}",
            self.kind, self.operation, self.message
        )?;
        if let Some(ref resource) = self.resource {
            write!(f, " [{}]", resource)?;
        }
        Ok(())
    }
}

impl std::error::Error for RepositoryError {}
