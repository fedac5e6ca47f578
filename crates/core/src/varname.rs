//! Variable identity
//!
//! This module defines the key types used to identify random variables:
//! - [`Symbol`]: the top-level model variable name (`x`, `theta`, ...)
//! - [`VarName`]: a symbol plus an opaque indexing path (`x[1]`, `m[2][3]`)
//!
//! Identity, hashing and ordering are defined over `(symbol, path)`.
//! The rendered form `"{symbol}{path}"` is only used for space matching
//! and export, never for identity.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

use crate::space::Space;

/// Name of a top-level model variable
///
/// Cheap to clone; partitioned traces key their sub-stores by it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Symbol(Arc<str>);

impl Symbol {
    /// Create a new symbol
    ///
    /// # Examples
    ///
    /// ```
    /// use tracestore_core::Symbol;
    ///
    /// let s = Symbol::new("theta");
    /// assert_eq!(s.as_str(), "theta");
    /// ```
    pub fn new(name: impl AsRef<str>) -> Self {
        Symbol(Arc::from(name.as_ref()))
    }

    /// Borrow the symbol text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Symbol {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Symbol::new(s)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity of one random-variable occurrence
///
/// `path` is an opaque, order-preserving encoding of any sub-indexing.
/// It is empty when the whole variable is sampled at once.
///
/// # Examples
///
/// ```
/// use tracestore_core::VarName;
///
/// let vn = VarName::new("x", "[1]");
/// assert_eq!(vn.symbol().as_str(), "x");
/// assert_eq!(vn.to_string(), "x[1]");
/// assert_eq!(VarName::from("x[1]"), vn);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VarName {
    symbol: Symbol,
    path: String,
}

impl VarName {
    /// Create a name from a symbol and an indexing path
    pub fn new(symbol: impl Into<Symbol>, path: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            path: path.into(),
        }
    }

    /// Create a name for a whole (un-indexed) variable
    pub fn scalar(symbol: impl Into<Symbol>) -> Self {
        Self::new(symbol, String::new())
    }

    /// The top-level symbol
    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    /// The indexing path (possibly empty)
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Whether this name belongs to `space`
    ///
    /// True if the space is empty, names this symbol, or holds a path
    /// pattern matching the rendered name.
    pub fn contained_in(&self, space: &Space) -> bool {
        space.contains(self)
    }
}

impl From<&str> for VarName {
    /// Split a rendered name at its first `[`: `"x[1][2]"` becomes
    /// symbol `x` with path `[1][2]`.
    fn from(rendered: &str) -> Self {
        match rendered.find('[') {
            Some(at) => VarName::new(&rendered[..at], &rendered[at..]),
            None => VarName::scalar(rendered),
        }
    }
}

impl fmt::Display for VarName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.symbol, self.path)
    }
}
