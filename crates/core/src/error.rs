//! Error types for trace operations
//!
//! Fatal contract violations are [`TraceError`] and propagate immediately to
//! the caller. Redundant link/invlink requests are *not* errors: they are
//! reported as [`TransformWarning`] through logging and transform reports.

use thiserror::Error;

use crate::varname::VarName;

/// Fatal trace errors
///
/// Each variant signals a model or sampler bug; nothing is retried.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TraceError {
    /// A name was registered twice in one trace
    #[error("duplicate variable: {name}")]
    DuplicateVariable {
        /// The name that was already present
        name: VarName,
    },

    /// A name was used before it was ever registered
    #[error("unknown variable: {name}")]
    UnknownVariable {
        /// The name that was not found
        name: VarName,
    },

    /// A replacement value's flat length differs from the slot's range
    #[error("shape mismatch for {name}: expected {expected} values, got {actual}")]
    ShapeMismatch {
        /// The variable being written (rendered)
        name: String,
        /// Length of the existing range
        expected: usize,
        /// Length of the supplied value
        actual: usize,
    },

    /// A multi-name read mixed transform states or distribution families
    #[error("inconsistent group: {reason}")]
    InconsistentGroup {
        /// What differed between members
        reason: String,
    },

    /// Invalid configuration input
    #[error("config error: {0}")]
    Config(String),
}

/// Result type for trace operations
pub type Result<T> = std::result::Result<T, TraceError>;

impl TraceError {
    /// Check if this is a duplicate-registration error
    pub fn is_duplicate(&self) -> bool {
        matches!(self, TraceError::DuplicateVariable { .. })
    }

    /// Check if this is an unknown-variable error
    pub fn is_unknown(&self) -> bool {
        matches!(self, TraceError::UnknownVariable { .. })
    }

    /// Check if this is a shape mismatch
    pub fn is_shape_mismatch(&self) -> bool {
        matches!(self, TraceError::ShapeMismatch { .. })
    }

    pub(crate) fn shape(name: impl ToString, expected: usize, actual: usize) -> Self {
        TraceError::ShapeMismatch {
            name: name.to_string(),
            expected,
            actual,
        }
    }
}

/// Shape check shared by every store write path
pub fn check_len(name: impl ToString, expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(TraceError::shape(name, expected, actual))
    }
}

/// Non-fatal transform notices
///
/// Emitted when a link is requested on an already-linked group (or invlink
/// on an unlinked one). The operation degrades to a no-op.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformWarning {
    /// Link requested but the group is already in unconstrained space
    #[error("{target} is already transformed")]
    AlreadyTransformed {
        /// Symbol or variable the request targeted (rendered)
        target: String,
    },

    /// Invlink requested but the group is already in constrained space
    #[error("{target} is not transformed")]
    NotTransformed {
        /// Symbol or variable the request targeted (rendered)
        target: String,
    },
}

impl TransformWarning {
    /// The symbol or variable the warning refers to
    pub fn target(&self) -> &str {
        match self {
            TransformWarning::AlreadyTransformed { target }
            | TransformWarning::NotTransformed { target } => target,
        }
    }
}
