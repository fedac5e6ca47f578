//! Execution traces
//!
//! A trace records every variable sampled during one model execution (or one
//! particle). It comes in two representations with identical observable
//! behaviour:
//!
//! - [`HomogeneousTrace`]: a single [`MetadataStore`] for every symbol, with
//!   distribution families checked at runtime. Every trace starts here.
//! - [`PartitionedTrace`]: one store per symbol, built once by
//!   [`Trace::specialize`] after the symbol set is known.
//!
//! Both implement [`TraceOps`]. Implementors provide store routing and the
//! scalar state; every public operation is a provided method on top of that,
//! so the two forms cannot drift apart. [`Trace`] wraps either form and owns
//! the one-way conversion between them.
//!
//! ## Ordering
//!
//! "Stable order" means store order, then slot order. For a homogeneous
//! trace that is registration order; for a partitioned trace it is symbol
//! first-appearance order, then registration order within the symbol.

mod homogeneous;
mod partitioned;

pub use homogeneous::HomogeneousTrace;
pub use partitioned::PartitionedTrace;

use rustc_hash::FxHashMap;
use std::ops::Range;
use tracestore_core::{
    check_len, DistHandle, Owners, Result, Space, Symbol, TraceError, Value, VarName,
};
use tracestore_storage::{MetadataStore, VariableRecord, DEL};
use tracing::{debug, trace};

use crate::config::TraceConfig;

/// Scalar state carried alongside the stores
#[derive(Debug, Clone, Default)]
pub struct TraceState {
    pub(crate) log_prob: f64,
    pub(crate) produce_count: usize,
    pub(crate) config: TraceConfig,
}

impl TraceState {
    pub(crate) fn with_config(config: TraceConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Configuration in effect
    pub fn config(&self) -> &TraceConfig {
        &self.config
    }
}

/// Slots of one symbol inside one store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolGroup {
    /// The shared symbol
    pub symbol: Symbol,
    /// Index of the store holding the slots
    pub store: usize,
    /// Slot indices in registration order; the first is the representative
    pub slots: Vec<usize>,
}

/// Operations shared by both trace representations
pub trait TraceOps {
    // ========================================================================
    // Required: routing and state
    // ========================================================================

    /// Underlying stores in stable order
    fn stores(&self) -> &[MetadataStore];

    /// Underlying stores, mutably
    fn stores_mut(&mut self) -> &mut [MetadataStore];

    /// Symbol a store is dedicated to (partitioned form only)
    fn store_symbol(&self, store: usize) -> Option<&Symbol>;

    /// Store that receives new slots of `symbol`, creating it if needed
    fn store_for_push(&mut self, symbol: &Symbol) -> usize;

    /// `(store, slot)` of a registered name
    fn locate(&self, name: &VarName) -> Result<(usize, usize)>;

    /// Whether this is the partitioned form
    fn is_partitioned(&self) -> bool;

    /// Scalar state
    fn state(&self) -> &TraceState;

    /// Scalar state, mutably
    fn state_mut(&mut self) -> &mut TraceState;

    // ========================================================================
    // Registration
    // ========================================================================

    /// Register a newly sampled variable
    ///
    /// `value` is in constrained space. The current produce count becomes
    /// the slot's order.
    ///
    /// # Errors
    ///
    /// - `DuplicateVariable` if `name` is registered anywhere in the trace
    /// - `ShapeMismatch` if the flattened value does not match `dist.dim()`
    fn push(
        &mut self,
        name: VarName,
        value: impl Into<Value>,
        dist: DistHandle,
        owners: Owners,
    ) -> Result<()>
    where
        Self: Sized,
    {
        if self.contains(&name) {
            return Err(TraceError::DuplicateVariable { name });
        }
        let value = value.into();
        check_len(&name, dist.dim(), value.len())?;

        trace!(name = %name, family = dist.family(), "push");
        let order = self.state().produce_count;
        let store = self.store_for_push(name.symbol());
        self.stores_mut()[store].register(name, value.as_flat(), dist, owners, order)?;
        Ok(())
    }

    /// Re-sample a variable that was flagged for deletion
    ///
    /// Stores the constrained `value` (linking it first if the slot is
    /// currently transformed), clears `del`, and stamps the current produce
    /// count as the slot's order.
    fn renew(&mut self, name: &VarName, value: impl Into<Value>) -> Result<()>
    where
        Self: Sized,
    {
        let (k, slot) = self.locate(name)?;
        let order = self.state().produce_count;
        let value = value.into();
        let store = &mut self.stores_mut()[k];
        let flat = if store.record_at(slot).trans {
            store.dist_at(slot).link(value.as_flat())
        } else {
            value.flatten()
        };
        store.set_slice_at(slot, &flat)?;
        store.set_flag_at(DEL, slot, false);
        store.set_order_at(slot, order);
        Ok(())
    }

    // ========================================================================
    // Reads and writes
    // ========================================================================

    /// Value of `name` in constrained space and natural shape
    fn read(&self, name: &VarName) -> Result<Value> {
        let (k, slot) = self.locate(name)?;
        let store = &self.stores()[k];
        Ok(store.dist_at(slot).reshape(&store.constrained_at(slot)))
    }

    /// Concatenated constrained values of several names
    ///
    /// # Errors
    ///
    /// `InconsistentGroup` if the names differ in transform state or
    /// distribution family.
    fn read_many(&self, names: &[VarName]) -> Result<Vec<f64>> {
        let mut out = Vec::new();
        let mut first: Option<(&VarName, bool, &'static str)> = None;
        for name in names {
            let (k, slot) = self.locate(name)?;
            let store = &self.stores()[k];
            let rec = store.record_at(slot);
            let family = rec.dist.family();
            match first {
                None => first = Some((name, rec.trans, family)),
                Some((lead, trans, fam)) => {
                    if trans != rec.trans {
                        return Err(TraceError::InconsistentGroup {
                            reason: format!("{} and {} differ in transform state", lead, name),
                        });
                    }
                    if fam != family {
                        return Err(TraceError::InconsistentGroup {
                            reason: format!("{} is {} but {} is {}", lead, fam, name, family),
                        });
                    }
                }
            }
            out.extend(store.constrained_at(slot));
        }
        Ok(out)
    }

    /// Store a flat value verbatim, without any transform
    ///
    /// # Errors
    ///
    /// `ShapeMismatch` if the length differs from the slot's range
    fn write(&mut self, name: &VarName, value: &[f64]) -> Result<()> {
        let (k, slot) = self.locate(name)?;
        self.stores_mut()[k].set_slice_at(slot, value)
    }

    /// The whole flat buffer in stable order
    fn all_values(&self) -> Vec<f64> {
        self.stores()
            .iter()
            .flat_map(|s| s.values().iter().copied())
            .collect()
    }

    /// Overwrite the whole flat buffer in stable order
    ///
    /// # Errors
    ///
    /// `ShapeMismatch` if `values` is not exactly as long as the buffer
    fn set_all_values(&mut self, values: &[f64]) -> Result<()> {
        let total: usize = self.stores().iter().map(|s| s.values().len()).sum();
        check_len("all values", total, values.len())?;
        let mut offset = 0;
        for store in self.stores_mut() {
            let buf = store.values_mut();
            let end = offset + buf.len();
            buf.copy_from_slice(&values[offset..end]);
            offset = end;
        }
        Ok(())
    }

    // ========================================================================
    // Log-probability and produce count
    // ========================================================================

    /// Accumulated log-probability
    fn log_prob(&self) -> f64 {
        self.state().log_prob
    }

    /// Replace the accumulated log-probability
    fn set_log_prob(&mut self, log_prob: f64) {
        self.state_mut().log_prob = log_prob;
    }

    /// Add to the accumulated log-probability
    fn add_log_prob(&mut self, delta: f64) {
        self.state_mut().log_prob += delta;
    }

    /// Reset the accumulator to zero
    fn reset_log_prob(&mut self) {
        self.state_mut().log_prob = 0.0;
    }

    /// Observe events executed so far
    fn produce_count(&self) -> usize {
        self.state().produce_count
    }

    /// Record one observe event
    fn increment_produce_count(&mut self) {
        self.state_mut().produce_count += 1;
    }

    /// Set the observe-event counter (replay positioning)
    fn set_produce_count(&mut self, count: usize) {
        self.state_mut().produce_count = count;
    }

    /// Reset the observe-event counter to zero
    fn reset_produce_count(&mut self) {
        self.state_mut().produce_count = 0;
    }

    /// Empty every store and zero the scalar state
    ///
    /// A partitioned trace keeps its symbol mapping; only the contents go.
    fn clear(&mut self) {
        debug!(slots = self.len(), partitioned = self.is_partitioned(), "clearing trace");
        for store in self.stores_mut() {
            store.clear();
        }
        let state = self.state_mut();
        state.log_prob = 0.0;
        state.produce_count = 0;
    }

    // ========================================================================
    // Inspection
    // ========================================================================

    /// True iff every store has zero slots
    fn is_empty(&self) -> bool {
        self.stores().iter().all(MetadataStore::is_empty)
    }

    /// Total slot count
    fn len(&self) -> usize {
        self.stores().iter().map(MetadataStore::len).sum()
    }

    /// Whether `name` is registered
    fn contains(&self, name: &VarName) -> bool {
        self.locate(name).is_ok()
    }

    /// Every registered name in stable order
    fn keys(&self) -> Vec<VarName> {
        self.stores()
            .iter()
            .flat_map(|s| s.names().iter().cloned())
            .collect()
    }

    /// Symbols with at least one slot, in first-appearance order
    fn symbols(&self) -> Vec<Symbol> {
        self.grouped_slots(&Space::all(), |_, _| true)
            .into_iter()
            .map(|g| g.symbol)
            .collect()
    }

    /// Offset of a store's buffer within [`TraceOps::all_values`]
    fn store_offset(&self, store: usize) -> usize {
        self.stores()[..store].iter().map(|s| s.values().len()).sum()
    }

    /// Range of `name` within [`TraceOps::all_values`]
    fn range(&self, name: &VarName) -> Result<Range<usize>> {
        let (k, slot) = self.locate(name)?;
        let offset = self.store_offset(k);
        let r = self.stores()[k].range_at(slot);
        Ok(r.start + offset..r.end + offset)
    }

    /// Record view of `name`
    fn record(&self, name: &VarName) -> Result<VariableRecord<'_>> {
        let (k, slot) = self.locate(name)?;
        Ok(self.stores()[k].record_at(slot))
    }

    /// Distribution of `name`
    fn distribution(&self, name: &VarName) -> Result<&DistHandle> {
        let (k, slot) = self.locate(name)?;
        Ok(self.stores()[k].dist_at(slot))
    }

    /// Owners of `name`
    fn owners(&self, name: &VarName) -> Result<&Owners> {
        let (k, slot) = self.locate(name)?;
        Ok(self.stores()[k].owners_at(slot))
    }

    /// Order of `name`
    fn order(&self, name: &VarName) -> Result<usize> {
        let (k, slot) = self.locate(name)?;
        Ok(self.stores()[k].order_at(slot))
    }

    /// Set the order of `name`
    fn set_order(&mut self, name: &VarName, order: usize) -> Result<()> {
        let (k, slot) = self.locate(name)?;
        self.stores_mut()[k].set_order_at(slot, order);
        Ok(())
    }

    /// Read a flag of `name`
    fn flag(&self, name: &VarName, key: &str) -> Result<bool> {
        let (k, slot) = self.locate(name)?;
        Ok(self.stores()[k].flag_at(key, slot))
    }

    /// Set a flag of `name`, creating the key if needed
    fn set_flag(&mut self, name: &VarName, key: &str, value: bool) -> Result<()> {
        let (k, slot) = self.locate(name)?;
        self.stores_mut()[k].set_flag_at(key, slot, value);
        Ok(())
    }

    /// Group slots passing `keep` by symbol, in first-appearance order
    ///
    /// Stores dedicated to a symbol outside `space` are skipped wholesale;
    /// `keep` is responsible for any finer space filtering.
    fn grouped_slots<F>(&self, space: &Space, mut keep: F) -> Vec<SymbolGroup>
    where
        F: FnMut(&MetadataStore, usize) -> bool,
    {
        let mut groups: Vec<SymbolGroup> = Vec::new();
        let mut position: FxHashMap<Symbol, usize> = FxHashMap::default();
        for (k, store) in self.stores().iter().enumerate() {
            if let Some(sym) = self.store_symbol(k) {
                if !space.may_contain_symbol(sym) {
                    continue;
                }
            }
            for slot in 0..store.len() {
                if !keep(store, slot) {
                    continue;
                }
                let sym = store.name_at(slot).symbol();
                let g = match position.get(sym) {
                    Some(&g) => g,
                    None => {
                        position.insert(sym.clone(), groups.len());
                        groups.push(SymbolGroup {
                            symbol: sym.clone(),
                            store: k,
                            slots: Vec::new(),
                        });
                        groups.len() - 1
                    }
                };
                groups[g].slots.push(slot);
            }
        }
        groups
    }
}

/// A trace in either representation
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use tracestore_core::{Normal, Owners, VarName};
/// use tracestore_engine::{Trace, TraceOps};
///
/// let mut trace = Trace::new();
/// let dist = Arc::new(Normal::standard());
/// trace.push(VarName::from("x[1]"), 2.0, dist.clone(), Owners::none())?;
/// trace.push(VarName::from("x[2]"), 3.0, dist, Owners::none())?;
/// trace.specialize();
/// assert!(trace.is_partitioned());
/// assert_eq!(trace.all_values(), vec![2.0, 3.0]);
/// # Ok::<(), tracestore_core::TraceError>(())
/// ```
#[derive(Debug, Clone)]
pub enum Trace {
    /// Single heterogeneous store
    Homogeneous(HomogeneousTrace),
    /// One store per symbol
    Partitioned(PartitionedTrace),
}

impl Trace {
    /// Create an empty homogeneous trace with default configuration
    pub fn new() -> Self {
        Trace::Homogeneous(HomogeneousTrace::new())
    }

    /// Create an empty homogeneous trace
    pub fn with_config(config: TraceConfig) -> Self {
        Trace::Homogeneous(HomogeneousTrace::with_config(config))
    }

    /// Convert to the partitioned form
    ///
    /// Slots are regrouped by symbol in first-appearance order with fresh
    /// contiguous ranges; values, flags, owners, orders, log-probability and
    /// produce count carry over. No-op on an already partitioned trace.
    pub fn specialize(&mut self) {
        if let Trace::Homogeneous(h) = self {
            let partitioned = PartitionedTrace::from_homogeneous(h);
            debug!(
                symbols = partitioned.stores().len(),
                slots = partitioned.len(),
                "specialized trace"
            );
            *self = Trace::Partitioned(partitioned);
        }
    }

    /// Hook for the evaluator at the end of an execution
    ///
    /// Partitions the trace when `auto_specialize` is configured and the
    /// trace has seen at least one variable. Returns true if it did.
    pub fn end_of_execution(&mut self) -> bool {
        if self.state().config.auto_specialize && !self.is_partitioned() && !self.is_empty() {
            self.specialize();
            return true;
        }
        false
    }

    /// Configuration in effect
    pub fn config(&self) -> &TraceConfig {
        &self.state().config
    }
}

impl Default for Trace {
    fn default() -> Self {
        Self::new()
    }
}

impl From<HomogeneousTrace> for Trace {
    fn from(t: HomogeneousTrace) -> Self {
        Trace::Homogeneous(t)
    }
}

impl From<PartitionedTrace> for Trace {
    fn from(t: PartitionedTrace) -> Self {
        Trace::Partitioned(t)
    }
}

impl TraceOps for Trace {
    fn stores(&self) -> &[MetadataStore] {
        match self {
            Trace::Homogeneous(t) => t.stores(),
            Trace::Partitioned(t) => t.stores(),
        }
    }

    fn stores_mut(&mut self) -> &mut [MetadataStore] {
        match self {
            Trace::Homogeneous(t) => t.stores_mut(),
            Trace::Partitioned(t) => t.stores_mut(),
        }
    }

    fn store_symbol(&self, store: usize) -> Option<&Symbol> {
        match self {
            Trace::Homogeneous(t) => t.store_symbol(store),
            Trace::Partitioned(t) => t.store_symbol(store),
        }
    }

    fn store_for_push(&mut self, symbol: &Symbol) -> usize {
        match self {
            Trace::Homogeneous(t) => t.store_for_push(symbol),
            Trace::Partitioned(t) => t.store_for_push(symbol),
        }
    }

    fn locate(&self, name: &VarName) -> Result<(usize, usize)> {
        match self {
            Trace::Homogeneous(t) => t.locate(name),
            Trace::Partitioned(t) => t.locate(name),
        }
    }

    fn is_partitioned(&self) -> bool {
        matches!(self, Trace::Partitioned(_))
    }

    fn state(&self) -> &TraceState {
        match self {
            Trace::Homogeneous(t) => t.state(),
            Trace::Partitioned(t) => t.state(),
        }
    }

    fn state_mut(&mut self) -> &mut TraceState {
        match self {
            Trace::Homogeneous(t) => t.state_mut(),
            Trace::Partitioned(t) => t.state_mut(),
        }
    }
}
