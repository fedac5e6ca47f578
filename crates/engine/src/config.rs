//! Trace configuration
//!
//! Traces work with defaults; a [`TraceConfig`] only tunes allocation and
//! diagnostics. It can be built in code with [`TraceConfigBuilder`] or parsed
//! from a TOML table:
//!
//! ```toml
//! capacity_hint = 128
//! values_capacity_hint = 512
//! warn_on_redundant_transform = false
//! auto_specialize = true
//! ```
//!
//! Nothing here is read from the environment or disk by the library itself.

use serde::{Deserialize, Serialize};
use tracestore_core::{Result, TraceError};

/// Tuning knobs for a trace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceConfig {
    /// Expected number of slots (pre-allocates columns)
    pub capacity_hint: usize,
    /// Expected flat value length (pre-allocates the value buffer)
    pub values_capacity_hint: usize,
    /// Log redundant link/invlink requests at `warn` (otherwise `debug`)
    pub warn_on_redundant_transform: bool,
    /// Partition the trace at the end of its first non-empty execution
    pub auto_specialize: bool,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            capacity_hint: 0,
            values_capacity_hint: 0,
            warn_on_redundant_transform: true,
            auto_specialize: false,
        }
    }
}

impl TraceConfig {
    /// Create a builder starting from defaults
    pub fn builder() -> TraceConfigBuilder {
        TraceConfigBuilder::new()
    }

    /// Parse a TOML table; missing keys take their defaults
    ///
    /// # Errors
    ///
    /// `Config` if the input is not valid TOML or has mistyped keys
    pub fn from_toml_str(input: &str) -> Result<Self> {
        toml::from_str(input).map_err(|e| TraceError::Config(e.to_string()))
    }
}

/// Builder for [`TraceConfig`]
///
/// # Example
///
/// ```
/// use tracestore_engine::TraceConfig;
///
/// let config = TraceConfig::builder()
///     .capacity_hint(64)
///     .auto_specialize(true)
///     .build();
/// assert_eq!(config.capacity_hint, 64);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TraceConfigBuilder {
    config: TraceConfig,
}

impl TraceConfigBuilder {
    /// Create a builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Expected number of slots
    pub fn capacity_hint(mut self, slots: usize) -> Self {
        self.config.capacity_hint = slots;
        self
    }

    /// Expected flat value length
    pub fn values_capacity_hint(mut self, values: usize) -> Self {
        self.config.values_capacity_hint = values;
        self
    }

    /// Log level for redundant transforms: `warn` when true, `debug` when false
    pub fn warn_on_redundant_transform(mut self, warn: bool) -> Self {
        self.config.warn_on_redundant_transform = warn;
        self
    }

    /// Partition automatically at the end of the first execution
    pub fn auto_specialize(mut self, enabled: bool) -> Self {
        self.config.auto_specialize = enabled;
        self
    }

    /// Finish building
    pub fn build(self) -> TraceConfig {
        self.config
    }
}
