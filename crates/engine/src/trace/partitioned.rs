//! Symbol-partitioned trace
//!
//! One [`MetadataStore`] per symbol. Within a store every slot shares the
//! symbol and (in well-formed models) the distribution family, so group
//! operations touch one store instead of filtering a mixed one.

use rustc_hash::FxHashMap;
use tracestore_core::{Result, Space, Symbol, TraceError, VarName};
use tracestore_storage::MetadataStore;

use super::{HomogeneousTrace, TraceOps, TraceState};

/// Trace backed by one store per symbol
#[derive(Debug, Clone)]
pub struct PartitionedTrace {
    symbols: Vec<Symbol>,
    stores: Vec<MetadataStore>,
    index: FxHashMap<Symbol, usize>,
    state: TraceState,
}

impl PartitionedTrace {
    /// Regroup a homogeneous trace by symbol
    ///
    /// Symbols keep their first-appearance order; slots keep registration
    /// order within their symbol.
    pub fn from_homogeneous(trace: &HomogeneousTrace) -> Self {
        let groups = trace.grouped_slots(&Space::all(), |_, _| true);
        let mut out = Self {
            symbols: Vec::with_capacity(groups.len()),
            stores: Vec::with_capacity(groups.len()),
            index: FxHashMap::with_capacity_and_hasher(groups.len(), Default::default()),
            state: trace.state().clone(),
        };
        for group in groups {
            let store = trace.store().subset(&group.slots);
            out.index.insert(group.symbol.clone(), out.stores.len());
            out.symbols.push(group.symbol);
            out.stores.push(store);
        }
        out
    }

    /// Store dedicated to `symbol`, if any
    pub fn store_of(&self, symbol: &Symbol) -> Option<&MetadataStore> {
        self.index.get(symbol).map(|&k| &self.stores[k])
    }
}

impl TraceOps for PartitionedTrace {
    fn stores(&self) -> &[MetadataStore] {
        &self.stores
    }

    fn stores_mut(&mut self) -> &mut [MetadataStore] {
        &mut self.stores
    }

    fn store_symbol(&self, store: usize) -> Option<&Symbol> {
        self.symbols.get(store)
    }

    fn store_for_push(&mut self, symbol: &Symbol) -> usize {
        if let Some(&k) = self.index.get(symbol) {
            return k;
        }
        let k = self.stores.len();
        self.stores.push(MetadataStore::new());
        self.symbols.push(symbol.clone());
        self.index.insert(symbol.clone(), k);
        k
    }

    fn locate(&self, name: &VarName) -> Result<(usize, usize)> {
        let k = *self
            .index
            .get(name.symbol())
            .ok_or_else(|| TraceError::UnknownVariable { name: name.clone() })?;
        Ok((k, self.stores[k].lookup(name)?))
    }

    fn is_partitioned(&self) -> bool {
        true
    }

    fn state(&self) -> &TraceState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut TraceState {
        &mut self.state
    }
}
