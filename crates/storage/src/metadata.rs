//! Columnar metadata store
//!
//! One [`MetadataStore`] holds the slots of a trace (or, once a trace is
//! partitioned, the slots of a single symbol).
//!
//! # Design
//!
//! - Append-only columns, all indexed by slot: names, ranges, distributions,
//!   owners, orders, flags
//! - One flat `Vec<f64>` value buffer; slot `i` owns `values[ranges[i]]`
//! - FxHashMap name index: O(1) lookup, `names[idcs[n]] == n`
//! - Slots are never removed or reused until [`MetadataStore::clear`]
//!
//! Ranges are assigned by monotonically increasing offset at registration
//! time, so they are contiguous and never overlap.

use rustc_hash::FxHashMap;
use std::fmt;
use std::ops::Range;
use tracing::debug;
use tracestore_core::{
    check_len, DistHandle, Owners, Result, Selector, Space, TraceError, VarName,
};

use crate::flags::{FlagTable, DEL, TRANS};

/// Read-only view of one slot's metadata
#[derive(Debug, Clone, Copy)]
pub struct VariableRecord<'a> {
    /// Variable identity
    pub name: &'a VarName,
    /// Range into the store's value buffer
    pub range: &'a Range<usize>,
    /// Originating distribution
    pub dist: &'a DistHandle,
    /// Selectors that claimed this variable
    pub owners: &'a Owners,
    /// Observe events executed before it was sampled
    pub order: usize,
    /// Value stored in unconstrained space
    pub trans: bool,
    /// Marked for deletion
    pub del: bool,
}

/// Append-only columnar table of variable records
#[derive(Clone)]
pub struct MetadataStore {
    idcs: FxHashMap<VarName, usize>,
    names: Vec<VarName>,
    ranges: Vec<Range<usize>>,
    values: Vec<f64>,
    dists: Vec<DistHandle>,
    owners: Vec<Owners>,
    orders: Vec<usize>,
    flags: FlagTable,
}

impl MetadataStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::with_capacity(0, 0)
    }

    /// Create a store with pre-allocated slot and value capacity
    pub fn with_capacity(slots: usize, values: usize) -> Self {
        Self {
            idcs: FxHashMap::with_capacity_and_hasher(slots, Default::default()),
            names: Vec::with_capacity(slots),
            ranges: Vec::with_capacity(slots),
            values: Vec::with_capacity(values),
            dists: Vec::with_capacity(slots),
            owners: Vec::with_capacity(slots),
            orders: Vec::with_capacity(slots),
            flags: FlagTable::new(),
        }
    }

    /// Number of slots
    #[inline]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// True when no slot has been registered
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Whether `name` is registered
    #[inline]
    pub fn contains(&self, name: &VarName) -> bool {
        self.idcs.contains_key(name)
    }

    // ========================================================================
    // Registration
    // ========================================================================

    /// Append a new slot
    ///
    /// The value is the flattened constrained sample; its length must equal
    /// the distribution's dimensionality. Both mandatory flags (and every
    /// other defined flag) start false.
    ///
    /// # Errors
    ///
    /// - `DuplicateVariable` if `name` is already registered
    /// - `ShapeMismatch` if `value.len() != dist.dim()`
    pub fn register(
        &mut self,
        name: VarName,
        value: &[f64],
        dist: DistHandle,
        owners: Owners,
        order: usize,
    ) -> Result<usize> {
        if self.idcs.contains_key(&name) {
            return Err(TraceError::DuplicateVariable { name });
        }
        check_len(&name, dist.dim(), value.len())?;

        let slot = self.names.len();
        let start = self.values.len();
        self.values.extend_from_slice(value);
        self.ranges.push(start..self.values.len());
        self.idcs.insert(name.clone(), slot);
        self.names.push(name);
        self.dists.push(dist);
        self.owners.push(owners);
        self.orders.push(order);
        self.flags.push_slot();
        Ok(slot)
    }

    /// Build a fresh store from a subset of this one's slots
    ///
    /// Slots are copied in the given order with recomputed contiguous ranges.
    /// Values, owners, orders and every flag carry over unchanged.
    pub fn subset(&self, slots: &[usize]) -> Self {
        let values_len = slots.iter().map(|&i| self.ranges[i].len()).sum();
        let mut out = Self::with_capacity(slots.len(), values_len);
        let keys = self.flags.keys();
        for &key in &keys {
            out.flags.ensure(key);
        }
        for &i in slots {
            let j = out.names.len();
            let start = out.values.len();
            out.values.extend_from_slice(&self.values[self.ranges[i].clone()]);
            out.ranges.push(start..out.values.len());
            out.idcs.insert(self.names[i].clone(), j);
            out.names.push(self.names[i].clone());
            out.dists.push(self.dists[i].clone());
            out.owners.push(self.owners[i].clone());
            out.orders.push(self.orders[i]);
            out.flags.push_slot();
            for &key in &keys {
                if self.flags.get(key, i) {
                    out.flags.set(key, j, true);
                }
            }
        }
        out
    }

    /// Empty every column
    pub fn clear(&mut self) {
        debug!(slots = self.len(), values = self.values.len(), "clearing metadata store");
        self.idcs.clear();
        self.names.clear();
        self.ranges.clear();
        self.values.clear();
        self.dists.clear();
        self.owners.clear();
        self.orders.clear();
        self.flags.clear();
    }

    // ========================================================================
    // Name-based access
    // ========================================================================

    /// Slot index of `name`
    ///
    /// # Errors
    ///
    /// `UnknownVariable` if `name` was never registered
    #[inline]
    pub fn lookup(&self, name: &VarName) -> Result<usize> {
        self.idcs
            .get(name)
            .copied()
            .ok_or_else(|| TraceError::UnknownVariable { name: name.clone() })
    }

    /// Stored flat value (verbatim, possibly unconstrained)
    pub fn get_value(&self, name: &VarName) -> Result<&[f64]> {
        Ok(self.slice_at(self.lookup(name)?))
    }

    /// Replace the stored flat value verbatim
    ///
    /// # Errors
    ///
    /// `ShapeMismatch` if the length differs from the slot's range
    pub fn set_value(&mut self, name: &VarName, value: &[f64]) -> Result<()> {
        let slot = self.lookup(name)?;
        self.set_slice_at(slot, value)
    }

    /// Distribution of `name`
    pub fn distribution(&self, name: &VarName) -> Result<&DistHandle> {
        Ok(&self.dists[self.lookup(name)?])
    }

    /// Owners of `name`
    pub fn owners(&self, name: &VarName) -> Result<&Owners> {
        Ok(&self.owners[self.lookup(name)?])
    }

    /// Add `selector` to the owners of `name`
    ///
    /// Returns false if it was already an owner.
    pub fn add_owner(&mut self, name: &VarName, selector: Selector) -> Result<bool> {
        let slot = self.lookup(name)?;
        Ok(self.owners[slot].insert(selector))
    }

    /// Order of `name`
    pub fn order(&self, name: &VarName) -> Result<usize> {
        Ok(self.orders[self.lookup(name)?])
    }

    /// Set the order of `name`
    pub fn set_order(&mut self, name: &VarName, order: usize) -> Result<()> {
        let slot = self.lookup(name)?;
        self.orders[slot] = order;
        Ok(())
    }

    /// Read a flag of `name`
    pub fn flag(&self, name: &VarName, key: &str) -> Result<bool> {
        Ok(self.flags.get(key, self.lookup(name)?))
    }

    /// Set a flag of `name`, creating the key if needed
    pub fn set_flag(&mut self, name: &VarName, key: &str, value: bool) -> Result<()> {
        let slot = self.lookup(name)?;
        self.flags.set(key, slot, value);
        Ok(())
    }

    /// Range of `name` in the value buffer
    pub fn range(&self, name: &VarName) -> Result<Range<usize>> {
        Ok(self.ranges[self.lookup(name)?].clone())
    }

    /// Record view of `name`
    pub fn record(&self, name: &VarName) -> Result<VariableRecord<'_>> {
        Ok(self.record_at(self.lookup(name)?))
    }

    // ========================================================================
    // Selection
    // ========================================================================

    /// Slots a query under `selector` restricted to `space` covers
    ///
    /// A slot matches when the selector claimed it or nobody did, and its
    /// name is in the space (every name is in the empty space). Ascending.
    pub fn select_indices(&self, selector: &Selector, space: &Space) -> Vec<usize> {
        (0..self.names.len())
            .filter(|&i| self.owners[i].admits(selector) && space.contains(&self.names[i]))
            .collect()
    }

    // ========================================================================
    // Slot-based access (callers hold indices from lookup/select_indices)
    // ========================================================================

    /// Name at `slot`
    #[inline]
    pub fn name_at(&self, slot: usize) -> &VarName {
        &self.names[slot]
    }

    /// Range at `slot`
    #[inline]
    pub fn range_at(&self, slot: usize) -> Range<usize> {
        self.ranges[slot].clone()
    }

    /// Stored flat value at `slot`
    #[inline]
    pub fn slice_at(&self, slot: usize) -> &[f64] {
        &self.values[self.ranges[slot].clone()]
    }

    /// Replace the flat value at `slot` verbatim
    pub fn set_slice_at(&mut self, slot: usize, value: &[f64]) -> Result<()> {
        let range = self.ranges[slot].clone();
        check_len(&self.names[slot], range.len(), value.len())?;
        self.values[range].copy_from_slice(value);
        Ok(())
    }

    /// Distribution at `slot`
    #[inline]
    pub fn dist_at(&self, slot: usize) -> &DistHandle {
        &self.dists[slot]
    }

    /// Owners at `slot`
    #[inline]
    pub fn owners_at(&self, slot: usize) -> &Owners {
        &self.owners[slot]
    }

    /// Order at `slot`
    #[inline]
    pub fn order_at(&self, slot: usize) -> usize {
        self.orders[slot]
    }

    /// Set order at `slot`
    #[inline]
    pub fn set_order_at(&mut self, slot: usize, order: usize) {
        self.orders[slot] = order;
    }

    /// Flag at `slot`
    #[inline]
    pub fn flag_at(&self, key: &str, slot: usize) -> bool {
        self.flags.get(key, slot)
    }

    /// Set flag at `slot`
    #[inline]
    pub fn set_flag_at(&mut self, key: &str, slot: usize, value: bool) {
        self.flags.set(key, slot, value);
    }

    /// Record view at `slot`
    pub fn record_at(&self, slot: usize) -> VariableRecord<'_> {
        VariableRecord {
            name: &self.names[slot],
            range: &self.ranges[slot],
            dist: &self.dists[slot],
            owners: &self.owners[slot],
            order: self.orders[slot],
            trans: self.flags.get(TRANS, slot),
            del: self.flags.get(DEL, slot),
        }
    }

    /// Map the value at `slot` into unconstrained space and set `trans`
    ///
    /// Does not consult the current flag; group logic decides whether to call.
    pub fn link_at(&mut self, slot: usize) -> Result<()> {
        let linked = self.dists[slot].link(self.slice_at(slot));
        self.set_slice_at(slot, &linked)?;
        self.flags.set(TRANS, slot, true);
        Ok(())
    }

    /// Map the value at `slot` back to constrained space and clear `trans`
    pub fn invlink_at(&mut self, slot: usize) -> Result<()> {
        let constrained = self.dists[slot].invlink(self.slice_at(slot));
        self.set_slice_at(slot, &constrained)?;
        self.flags.set(TRANS, slot, false);
        Ok(())
    }

    /// Value at `slot` in constrained space, inverting if `trans` is set
    pub fn constrained_at(&self, slot: usize) -> Vec<f64> {
        let raw = self.slice_at(slot);
        if self.flags.get(TRANS, slot) {
            self.dists[slot].invlink(raw)
        } else {
            raw.to_vec()
        }
    }

    // ========================================================================
    // Whole-store access
    // ========================================================================

    /// Names in slot order
    pub fn names(&self) -> &[VarName] {
        &self.names
    }

    /// The flat value buffer
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// The flat value buffer, mutably; ranges are fixed
    pub fn values_mut(&mut self) -> &mut [f64] {
        &mut self.values
    }

    /// Defined flag keys, sorted
    pub fn flag_keys(&self) -> Vec<&str> {
        self.flags.keys()
    }
}

impl Default for MetadataStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MetadataStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetadataStore")
            .field("slots", &self.len())
            .field("values", &self.values.len())
            .field("flags", &self.flags.keys())
            .finish()
    }
}
