//! Core types for the execution trace store
//!
//! This crate defines the leaf types everything else is built on:
//! - [`VarName`] / [`Symbol`]: identity of a random-variable occurrence
//! - [`Space`]: allow-list restricting a query to a subset of variables
//! - [`Selector`]: opaque identifier of the sampler that owns a variable
//! - [`Value`] / [`Shape`]: natural-shape values and their flat layout
//! - [`Distribution`]: the collaborator contract (dimension, link, invlink)
//! - [`TraceError`]: fatal error taxonomy, plus non-fatal [`TransformWarning`]

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod distribution;
pub mod error;
pub mod selector;
pub mod space;
pub mod value;
pub mod varname;

pub use distribution::{
    Beta, DistHandle, Distribution, Exponential, Iid, LogNormal, Normal, Uniform,
};
pub use error::{check_len, Result, TraceError, TransformWarning};
pub use selector::{Owners, Selector};
pub use space::{Space, SpaceEntry};
pub use value::{Shape, Value};
pub use varname::{Symbol, VarName};
