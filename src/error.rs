//! Unified error type for the facade.
//!
//! Wraps the engine's [`TraceError`] and serialization failures behind one
//! stable enum.

use thiserror::Error;
use tracestore_core::TraceError;

/// All facade errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Variable or particle not found
    #[error("not found: {0}")]
    NotFound(String),

    /// Variable registered twice in one trace
    #[error("duplicate variable: {0}")]
    Duplicate(String),

    /// Flat value length disagrees with the slot or distribution
    #[error("shape mismatch for {name}: expected {expected} values, got {actual}")]
    ShapeMismatch {
        /// Variable (or buffer) name
        name: String,
        /// Expected length
        expected: usize,
        /// Supplied length
        actual: usize,
    },

    /// Invalid argument (inconsistent group, bad particle index, ...)
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Invalid configuration
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Result type for facade operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }

    /// Check if this is a duplicate-registration error.
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Error::Duplicate(_))
    }
}

impl From<TraceError> for Error {
    fn from(e: TraceError) -> Self {
        match e {
            TraceError::DuplicateVariable { name } => Error::Duplicate(name.to_string()),
            TraceError::UnknownVariable { name } => Error::NotFound(name.to_string()),
            TraceError::ShapeMismatch {
                name,
                expected,
                actual,
            } => Error::ShapeMismatch {
                name,
                expected,
                actual,
            },
            TraceError::InconsistentGroup { reason } => Error::InvalidInput(reason),
            TraceError::Config(msg) => Error::Config(msg),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
