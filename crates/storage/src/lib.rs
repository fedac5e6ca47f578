//! Storage layer for tracestore
//!
//! This crate implements the per-trace storage backend:
//! - MetadataStore: append-only columnar slot table with a flat value buffer
//! - FlagTable: lazily-extended named boolean columns (`trans`, `del`, ...)
//! - VariableRecord: read-only view of one slot

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod flags;
pub mod metadata;

pub use flags::{FlagTable, DEL, TRANS};
pub use metadata::{MetadataStore, VariableRecord};
