//! Particle sets
//!
//! This module provides [`Particles`], the entry point for samplers that run
//! several executions side by side (SMC particles, parallel chains). Each
//! particle is an independent [`Trace`]; nothing is shared between them
//! except immutable distribution handles.

use crate::error::{Error, Result};
use tracestore_core::Selector;
use tracestore_engine::{Extract, Retention, Trace, TraceConfig};
use tracing::debug;

/// An ordered set of independent traces.
///
/// Create one with [`Particles::builder`].
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use tracestore::prelude::*;
///
/// let mut particles = Particles::builder().count(4).build()?;
/// for trace in particles.iter_mut() {
///     trace.push(VarName::scalar("mu"), 0.5, Arc::new(Normal::standard()), Owners::none())?;
/// }
///
/// // Keep the first two particles, twice each
/// particles.resample(&[0, 0, 1, 1])?;
/// assert_eq!(particles.len(), 4);
/// # Ok::<(), tracestore::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Particles {
    traces: Vec<Trace>,
    config: TraceConfig,
}

impl Particles {
    /// Create a builder for particle-set configuration.
    pub fn builder() -> ParticlesBuilder {
        ParticlesBuilder::new()
    }

    /// Number of particles
    pub fn len(&self) -> usize {
        self.traces.len()
    }

    /// Always false for a built set
    pub fn is_empty(&self) -> bool {
        self.traces.is_empty()
    }

    /// Configuration every particle was created with
    pub fn config(&self) -> &TraceConfig {
        &self.config
    }

    /// Particle `i`
    pub fn get(&self, i: usize) -> Option<&Trace> {
        self.traces.get(i)
    }

    /// Particle `i`, mutably
    pub fn get_mut(&mut self, i: usize) -> Option<&mut Trace> {
        self.traces.get_mut(i)
    }

    /// Iterate over the particles
    pub fn iter(&self) -> std::slice::Iter<'_, Trace> {
        self.traces.iter()
    }

    /// Iterate over the particles mutably
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Trace> {
        self.traces.iter_mut()
    }

    /// Replace the set with deep copies of the given ancestors
    ///
    /// The new set has one particle per entry of `ancestors`.
    ///
    /// # Errors
    ///
    /// `InvalidInput` if an index is out of range or `ancestors` is empty;
    /// the set is left unchanged.
    pub fn resample(&mut self, ancestors: &[usize]) -> Result<()> {
        if ancestors.is_empty() {
            return Err(Error::InvalidInput("no ancestors given".to_string()));
        }
        if let Some(&bad) = ancestors.iter().find(|&&a| a >= self.traces.len()) {
            return Err(Error::InvalidInput(format!(
                "ancestor {} out of range for {} particles",
                bad,
                self.traces.len()
            )));
        }
        let next: Vec<Trace> = ancestors.iter().map(|&a| self.traces[a].clone()).collect();
        debug!(from = self.traces.len(), to = next.len(), "resampled particles");
        self.traces = next;
        Ok(())
    }

    /// Run retention pruning on every particle
    ///
    /// Returns the total number of slots flagged.
    pub fn mark_stale_for_deletion(&mut self, selector: &Selector) -> usize {
        self.traces
            .iter_mut()
            .map(|t| t.mark_stale_for_deletion(selector))
            .sum()
    }

    /// Forward the end-of-execution hook to every particle
    ///
    /// Returns how many particles were specialized by this call.
    pub fn end_of_execution(&mut self) -> usize {
        self.traces
            .iter_mut()
            .map(|t| t.end_of_execution())
            .filter(|&specialized| specialized)
            .count()
    }

    /// JSON rendering of particle `i`'s named values
    pub fn export_json(&self, i: usize) -> Result<String> {
        let trace = self
            .traces
            .get(i)
            .ok_or_else(|| Error::NotFound(format!("particle {}", i)))?;
        export_json(trace)
    }
}

impl<'a> IntoIterator for &'a Particles {
    type Item = &'a Trace;
    type IntoIter = std::slice::Iter<'a, Trace>;

    fn into_iter(self) -> Self::IntoIter {
        self.traces.iter()
    }
}

/// JSON rendering of a trace's named values
pub fn export_json(trace: &Trace) -> Result<String> {
    Ok(serde_json::to_string(&trace.export_named_values())?)
}

/// Builder for [`Particles`].
///
/// # Example
///
/// ```
/// use tracestore::Particles;
///
/// let particles = Particles::builder()
///     .count(8)
///     .config_toml("auto_specialize = true")?
///     .build()?;
/// assert!(particles.config().auto_specialize);
/// # Ok::<(), tracestore::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct ParticlesBuilder {
    count: usize,
    config: TraceConfig,
}

impl ParticlesBuilder {
    /// Create a new builder with a single particle and default configuration.
    pub fn new() -> Self {
        Self {
            count: 1,
            config: TraceConfig::default(),
        }
    }

    /// Number of particles.
    pub fn count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    /// Trace configuration applied to every particle.
    pub fn config(mut self, config: TraceConfig) -> Self {
        self.config = config;
        self
    }

    /// Parse the trace configuration from TOML.
    pub fn config_toml(mut self, input: &str) -> Result<Self> {
        self.config = TraceConfig::from_toml_str(input)?;
        Ok(self)
    }

    /// Build the particle set.
    pub fn build(self) -> Result<Particles> {
        if self.count == 0 {
            return Err(Error::InvalidInput("particle count must be positive".to_string()));
        }
        let traces = (0..self.count)
            .map(|_| Trace::with_config(self.config.clone()))
            .collect();
        Ok(Particles {
            traces,
            config: self.config,
        })
    }
}

impl Default for ParticlesBuilder {
    fn default() -> Self {
        Self::new()
    }
}
