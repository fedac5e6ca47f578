//! Convenient imports for Tracestore.
//!
//! This module re-exports the most commonly used types and every extension
//! trait, so trace methods resolve with a single import:
//!
//! ```
//! use tracestore::prelude::*;
//!
//! let trace = Trace::new();
//! assert!(trace.owned_names(&Selector::default(), &Space::all()).is_empty());
//! ```

// Main entry points
pub use crate::particles::{Particles, ParticlesBuilder};
pub use tracestore_engine::{NamedValues, SlotSelection, Trace, TraceConfig, TransformReport};

// Error handling
pub use crate::error::{Error, Result};
pub use tracestore_core::{TraceError, TransformWarning};

// Extension traits
pub use tracestore_engine::{Extract, Retention, Selection, TraceOps, Transform};

// Core types
pub use tracestore_core::{DistHandle, Owners, Selector, Space, Symbol, Value, VarName};

// Reference distributions
pub use tracestore_core::{Beta, Distribution, Exponential, Iid, LogNormal, Normal, Uniform};

// Flag keys
pub use tracestore_storage::{DEL, TRANS};
