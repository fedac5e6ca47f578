//! # Tracestore
//!
//! Execution trace store for probabilistic-model evaluators.
//!
//! A trace records, for one run of a generative model, every sampled
//! variable's identity, value, distribution, owning samplers and bookkeeping
//! flags. Samplers read and write values, transform them between constrained
//! and unconstrained space, and prune stale variables between SMC passes.
//!
//! ## Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use tracestore::prelude::*;
//!
//! let mut trace = Trace::new();
//! let normal = Arc::new(Normal::standard());
//!
//! trace.push(VarName::from("x[1]"), 2.0, normal.clone(), Owners::none())?;
//! trace.push(VarName::from("x[2]"), 3.0, normal, Owners::none())?;
//! trace.add_log_prob(-1.5);
//! trace.add_log_prob(-1.5);
//!
//! let named = trace.export_named_values();
//! assert_eq!(named.flat_values("x"), Some(vec![2.0, 3.0]));
//! assert_eq!(trace.log_prob(), -3.0);
//! # Ok::<(), tracestore::Error>(())
//! ```
//!
//! ## Crates
//!
//! - `tracestore-core` - names, spaces, selectors, values, distributions
//! - `tracestore-storage` - the columnar metadata store
//! - `tracestore-engine` - traces, selection, transforms, retention, export
//!
//! This crate re-exports all three and adds [`Particles`], a set of
//! independent traces for multi-particle samplers.

#![warn(missing_docs)]

mod error;
mod particles;

pub mod prelude;

// Re-export main entry points
pub use error::{Error, Result};
pub use particles::{export_json, Particles, ParticlesBuilder};

// Re-export component types
pub use tracestore_core::{
    DistHandle, Distribution, Owners, Selector, Shape, Space, Symbol, TraceError, TransformWarning,
    Value, VarName,
};
pub use tracestore_engine::{
    Extract, NamedValues, Retention, Selection, SlotSelection, Trace, TraceConfig, TraceOps,
    Transform, TransformReport,
};
pub use tracestore_storage::{DEL, TRANS};
