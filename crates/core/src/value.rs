//! Value types for sampled variables
//!
//! A variable's value lives in two forms:
//! - its natural shape, as a [`Value`] (scalar, vector, or matrix), which is
//!   what model code and export consumers see;
//! - a flat `[f64]` slice inside a metadata store's value buffer.
//!
//! [`Shape`] describes how to move between the two. Matrices are flattened
//! column-major.
//!
//! ## Equality Rules
//!
//! - Different variants are never equal (`Scalar(1.0) != Vector([1.0])`)
//! - Floats use IEEE-754 equality: `NaN != NaN`, `-0.0 == 0.0`

use serde::{Deserialize, Serialize};

/// Natural shape of a distribution's samples
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Shape {
    /// A single real number
    Scalar,
    /// A vector of the given length
    Vector(usize),
    /// A `rows x cols` matrix
    Matrix(usize, usize),
}

impl Shape {
    /// Flattened dimensionality
    pub fn dim(&self) -> usize {
        match self {
            Shape::Scalar => 1,
            Shape::Vector(n) => *n,
            Shape::Matrix(r, c) => r * c,
        }
    }

    /// Rebuild a natural-shape value from a flat slice
    ///
    /// The caller guarantees `flat.len() == self.dim()`; stores enforce this
    /// at registration time.
    pub fn reshape(&self, flat: &[f64]) -> Value {
        match *self {
            Shape::Scalar => Value::Scalar(flat.first().copied().unwrap_or(f64::NAN)),
            Shape::Vector(_) => Value::Vector(flat.to_vec()),
            Shape::Matrix(rows, cols) => Value::Matrix {
                rows,
                cols,
                data: flat.to_vec(),
            },
        }
    }
}

/// A sampled value in its natural shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// A single real number
    Scalar(f64),
    /// A vector of reals
    Vector(Vec<f64>),
    /// A matrix stored column-major
    Matrix {
        /// Row count
        rows: usize,
        /// Column count
        cols: usize,
        /// Column-major data, `rows * cols` long
        data: Vec<f64>,
    },
}

impl Value {
    /// Returns the variant name (for error messages)
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Scalar(_) => "Scalar",
            Value::Vector(_) => "Vector",
            Value::Matrix { .. } => "Matrix",
        }
    }

    /// Shape of this value
    pub fn shape(&self) -> Shape {
        match self {
            Value::Scalar(_) => Shape::Scalar,
            Value::Vector(v) => Shape::Vector(v.len()),
            Value::Matrix { rows, cols, .. } => Shape::Matrix(*rows, *cols),
        }
    }

    /// Flattened length
    pub fn len(&self) -> usize {
        self.as_flat().len()
    }

    /// True for zero-length vectors and matrices
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Borrow the flat representation
    pub fn as_flat(&self) -> &[f64] {
        match self {
            Value::Scalar(x) => std::slice::from_ref(x),
            Value::Vector(v) => v,
            Value::Matrix { data, .. } => data,
        }
    }

    /// Copy out the flat representation
    pub fn flatten(&self) -> Vec<f64> {
        self.as_flat().to_vec()
    }

    /// Try to get as a scalar
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Value::Scalar(x) => Some(*x),
            _ => None,
        }
    }

    /// Try to get as a vector slice
    pub fn as_vector(&self) -> Option<&[f64]> {
        match self {
            Value::Vector(v) => Some(v),
            _ => None,
        }
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Scalar(x)
    }
}

impl From<Vec<f64>> for Value {
    fn from(v: Vec<f64>) -> Self {
        Value::Vector(v)
    }
}
