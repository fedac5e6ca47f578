//! Trace engine
//!
//! This crate builds execution traces on top of the metadata store:
//! - Trace: homogeneous or symbol-partitioned, behind the shared TraceOps contract
//! - Selection: which slots a sampler owns
//! - Transform: group link/invlink with redundant-request reporting
//! - Retention: staleness marking between SMC passes
//! - Extract: named export of constrained values
//! - TraceConfig: allocation hints and diagnostics switches
//!
//! Selection, Transform, Retention and Extract are extension traits with
//! blanket impls for every [`TraceOps`] type; bring them into scope (or use
//! the root crate's prelude) to call their methods on a [`Trace`].

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod extract;
pub mod retention;
pub mod selection;
pub mod trace;
pub mod transform;

pub use config::{TraceConfig, TraceConfigBuilder};
pub use extract::{Extract, NamedValues, SymbolValues};
pub use retention::Retention;
pub use selection::{Selection, SlotSelection};
pub use trace::{HomogeneousTrace, PartitionedTrace, SymbolGroup, Trace, TraceOps, TraceState};
pub use transform::{Transform, TransformReport};
