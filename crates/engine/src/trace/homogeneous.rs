use tracestore_core::{Result, Symbol, VarName};
use tracestore_storage::MetadataStore;

use super::{TraceOps, TraceState};
use crate::config::TraceConfig;

/// Trace backed by one store for every symbol
///
/// Distribution families may differ from slot to slot; consistency within a
/// group is checked at runtime by the operations that care.
#[derive(Debug, Clone)]
pub struct HomogeneousTrace {
    store: [MetadataStore; 1],
    state: TraceState,
}

impl HomogeneousTrace {
    /// Create an empty trace with default configuration
    pub fn new() -> Self {
        Self::with_config(TraceConfig::default())
    }

    /// Create an empty trace, pre-allocating from the config hints
    pub fn with_config(config: TraceConfig) -> Self {
        let store = MetadataStore::with_capacity(config.capacity_hint, config.values_capacity_hint);
        Self {
            store: [store],
            state: TraceState::with_config(config),
        }
    }

    /// The single backing store
    pub fn store(&self) -> &MetadataStore {
        &self.store[0]
    }
}

impl Default for HomogeneousTrace {
    fn default() -> Self {
        Self::new()
    }
}

impl TraceOps for HomogeneousTrace {
    fn stores(&self) -> &[MetadataStore] {
        &self.store
    }

    fn stores_mut(&mut self) -> &mut [MetadataStore] {
        &mut self.store
    }

    fn store_symbol(&self, _store: usize) -> Option<&Symbol> {
        None
    }

    fn store_for_push(&mut self, _symbol: &Symbol) -> usize {
        0
    }

    #[inline]
    fn locate(&self, name: &VarName) -> Result<(usize, usize)> {
        Ok((0, self.store[0].lookup(name)?))
    }

    fn is_partitioned(&self) -> bool {
        false
    }

    fn state(&self) -> &TraceState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut TraceState {
        &mut self.state
    }
}
