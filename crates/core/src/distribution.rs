//! Distribution collaborator contract
//!
//! The trace store never evaluates densities. From a distribution it only
//! needs:
//! - the flattened dimensionality and natural [`Shape`] of a sample
//! - a forward map constrained → unconstrained (`link`) and its inverse
//! - a reshape from a flat slice back to a natural [`Value`]
//!
//! Handles are shared immutable values ([`DistHandle`]); many traces may hold
//! the same handle at once.
//!
//! ## Reference distributions
//!
//! A handful of scalar distributions and an iid vector wrapper are provided
//! so the store can be exercised without an external distribution library.
//! All transforms are dimension-preserving.

use std::fmt::Debug;
use std::sync::Arc;

use crate::value::{Shape, Value};

/// Shared handle to a distribution
pub type DistHandle = Arc<dyn Distribution>;

/// Capabilities the trace store requires from a distribution
pub trait Distribution: Debug + Send + Sync {
    /// Runtime family identifier, e.g. `"Normal"`
    ///
    /// Distributions with the same family share a transform.
    fn family(&self) -> &'static str;

    /// Natural shape of a sample
    fn shape(&self) -> Shape;

    /// Flattened dimensionality of a sample
    fn dim(&self) -> usize {
        self.shape().dim()
    }

    /// Map a flat constrained value into unconstrained space
    fn link(&self, x: &[f64]) -> Vec<f64>;

    /// Map a flat unconstrained value back into constrained space
    fn invlink(&self, y: &[f64]) -> Vec<f64>;

    /// Rebuild a natural-shape value from its flat form
    fn reshape(&self, flat: &[f64]) -> Value {
        self.shape().reshape(flat)
    }
}

fn logistic(y: f64) -> f64 {
    1.0 / (1.0 + (-y).exp())
}

fn logit(p: f64) -> f64 {
    (p / (1.0 - p)).ln()
}

/// Normal distribution; support is the whole real line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normal {
    /// Mean
    pub mu: f64,
    /// Standard deviation
    pub sigma: f64,
}

impl Normal {
    /// Create a normal distribution
    pub fn new(mu: f64, sigma: f64) -> Self {
        Self { mu, sigma }
    }

    /// Standard normal
    pub fn standard() -> Self {
        Self::new(0.0, 1.0)
    }
}

impl Distribution for Normal {
    fn family(&self) -> &'static str {
        "Normal"
    }

    fn shape(&self) -> Shape {
        Shape::Scalar
    }

    fn link(&self, x: &[f64]) -> Vec<f64> {
        x.to_vec()
    }

    fn invlink(&self, y: &[f64]) -> Vec<f64> {
        y.to_vec()
    }
}

/// Exponential distribution; support `(0, ∞)`, log transform
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Exponential {
    /// Rate parameter
    pub rate: f64,
}

impl Exponential {
    /// Create an exponential distribution
    pub fn new(rate: f64) -> Self {
        Self { rate }
    }
}

impl Distribution for Exponential {
    fn family(&self) -> &'static str {
        "Exponential"
    }

    fn shape(&self) -> Shape {
        Shape::Scalar
    }

    fn link(&self, x: &[f64]) -> Vec<f64> {
        x.iter().map(|v| v.ln()).collect()
    }

    fn invlink(&self, y: &[f64]) -> Vec<f64> {
        y.iter().map(|v| v.exp()).collect()
    }
}

/// Log-normal distribution; support `(0, ∞)`, log transform
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogNormal {
    /// Mean of the underlying normal
    pub mu: f64,
    /// Standard deviation of the underlying normal
    pub sigma: f64,
}

impl LogNormal {
    /// Create a log-normal distribution
    pub fn new(mu: f64, sigma: f64) -> Self {
        Self { mu, sigma }
    }
}

impl Distribution for LogNormal {
    fn family(&self) -> &'static str {
        "LogNormal"
    }

    fn shape(&self) -> Shape {
        Shape::Scalar
    }

    fn link(&self, x: &[f64]) -> Vec<f64> {
        x.iter().map(|v| v.ln()).collect()
    }

    fn invlink(&self, y: &[f64]) -> Vec<f64> {
        y.iter().map(|v| v.exp()).collect()
    }
}

/// Uniform distribution on `(a, b)`, scaled logit transform
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Uniform {
    /// Lower bound
    pub a: f64,
    /// Upper bound
    pub b: f64,
}

impl Uniform {
    /// Create a uniform distribution on `(a, b)`
    pub fn new(a: f64, b: f64) -> Self {
        Self { a, b }
    }
}

impl Distribution for Uniform {
    fn family(&self) -> &'static str {
        "Uniform"
    }

    fn shape(&self) -> Shape {
        Shape::Scalar
    }

    fn link(&self, x: &[f64]) -> Vec<f64> {
        let width = self.b - self.a;
        x.iter().map(|v| logit((v - self.a) / width)).collect()
    }

    fn invlink(&self, y: &[f64]) -> Vec<f64> {
        let width = self.b - self.a;
        y.iter().map(|v| self.a + width * logistic(*v)).collect()
    }
}

/// Beta distribution; support `(0, 1)`, logit transform
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Beta {
    /// First shape parameter
    pub alpha: f64,
    /// Second shape parameter
    pub beta: f64,
}

impl Beta {
    /// Create a beta distribution
    pub fn new(alpha: f64, beta: f64) -> Self {
        Self { alpha, beta }
    }
}

impl Distribution for Beta {
    fn family(&self) -> &'static str {
        "Beta"
    }

    fn shape(&self) -> Shape {
        Shape::Scalar
    }

    fn link(&self, x: &[f64]) -> Vec<f64> {
        x.iter().map(|v| logit(*v)).collect()
    }

    fn invlink(&self, y: &[f64]) -> Vec<f64> {
        y.iter().map(|v| logistic(*v)).collect()
    }
}

/// `n` independent draws from a scalar distribution, as a vector
///
/// The transform is applied element-wise; the family is the inner family.
#[derive(Debug, Clone, PartialEq)]
pub struct Iid<D> {
    inner: D,
    n: usize,
}

impl<D: Distribution> Iid<D> {
    /// Wrap a scalar distribution
    pub fn new(inner: D, n: usize) -> Self {
        Self { inner, n }
    }

    /// The element distribution
    pub fn inner(&self) -> &D {
        &self.inner
    }
}

impl<D: Distribution> Distribution for Iid<D> {
    fn family(&self) -> &'static str {
        self.inner.family()
    }

    fn shape(&self) -> Shape {
        Shape::Vector(self.n * self.inner.dim())
    }

    fn link(&self, x: &[f64]) -> Vec<f64> {
        x.chunks(self.inner.dim().max(1))
            .flat_map(|chunk| self.inner.link(chunk))
            .collect()
    }

    fn invlink(&self, y: &[f64]) -> Vec<f64> {
        y.chunks(self.inner.dim().max(1))
            .flat_map(|chunk| self.inner.invlink(chunk))
            .collect()
    }
}
