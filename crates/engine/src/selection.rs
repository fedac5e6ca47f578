//! Ownership queries
//!
//! Samplers composed Gibbs-style each own a subset of the trace. A slot is
//! owned by a [`Selector`] when the selector claimed it, or when nobody did
//! (empty owners match every query).
//!
//! ## Shape of results
//!
//! - Homogeneous traces yield [`SlotSelection::Flat`]: ascending slots of the
//!   single store.
//! - Partitioned traces yield [`SlotSelection::Grouped`]: one group per
//!   symbol store, skipping stores whose symbol cannot be in the space.
//!
//! Ranges returned by [`Selection::owned_ranges`] are offsets into
//! [`TraceOps::all_values`] in both forms.

use std::ops::Range;
use tracestore_core::{Result, Selector, Space, VarName};
use tracestore_storage::MetadataStore;

use crate::trace::{SymbolGroup, TraceOps};

/// Slots owned by a selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotSelection {
    /// Slot indices of the single store
    Flat(Vec<usize>),
    /// Per-symbol groups of a partitioned trace
    Grouped(Vec<SymbolGroup>),
}

impl SlotSelection {
    /// Number of selected slots
    pub fn len(&self) -> usize {
        match self {
            SlotSelection::Flat(slots) => slots.len(),
            SlotSelection::Grouped(groups) => groups.iter().map(|g| g.slots.len()).sum(),
        }
    }

    /// True when nothing was selected
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `(store, slot)` pairs in stable order
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let (flat, grouped) = match self {
            SlotSelection::Flat(slots) => (Some(slots), None),
            SlotSelection::Grouped(groups) => (None, Some(groups)),
        };
        let flat = flat.into_iter().flat_map(|slots| slots.iter().map(|&i| (0, i)));
        let grouped = grouped.into_iter().flat_map(|groups| {
            groups
                .iter()
                .flat_map(|g| g.slots.iter().map(move |&i| (g.store, i)))
        });
        flat.chain(grouped)
    }
}

fn owned_by(store: &MetadataStore, slot: usize, selector: &Selector, space: &Space) -> bool {
    store.owners_at(slot).admits(selector) && space.contains(store.name_at(slot))
}

/// Read-only ownership queries, plus claiming
pub trait Selection: TraceOps {
    /// Slots owned by `selector` within `space`
    fn owned_slots(&self, selector: &Selector, space: &Space) -> SlotSelection {
        if self.is_partitioned() {
            SlotSelection::Grouped(self.owned_groups(selector, space))
        } else {
            let slots = self
                .stores()
                .first()
                .map(|s| s.select_indices(selector, space))
                .unwrap_or_default();
            SlotSelection::Flat(slots)
        }
    }

    /// Owned slots grouped by symbol, in first-appearance order
    ///
    /// Homogeneous traces are grouped too, so group operations behave the
    /// same in both forms.
    fn owned_groups(&self, selector: &Selector, space: &Space) -> Vec<SymbolGroup> {
        self.grouped_slots(space, |store, slot| owned_by(store, slot, selector, space))
    }

    /// Names of the owned slots in stable order
    fn owned_names(&self, selector: &Selector, space: &Space) -> Vec<VarName> {
        let stores = self.stores();
        self.owned_slots(selector, space)
            .iter()
            .map(|(k, slot)| stores[k].name_at(slot).clone())
            .collect()
    }

    /// Ranges of the owned slots within the whole flat buffer
    fn owned_ranges(&self, selector: &Selector, space: &Space) -> Vec<Range<usize>> {
        let stores = self.stores();
        self.owned_slots(selector, space)
            .iter()
            .map(|(k, slot)| {
                let offset = self.store_offset(k);
                let r = stores[k].range_at(slot);
                r.start + offset..r.end + offset
            })
            .collect()
    }

    /// Add `selector` to the owners of `name`
    ///
    /// Returns false if it already owned the slot.
    fn claim(&mut self, name: &VarName, selector: Selector) -> Result<bool> {
        let (k, _) = self.locate(name)?;
        self.stores_mut()[k].add_owner(name, selector)
    }
}

impl<T: TraceOps> Selection for T {}
