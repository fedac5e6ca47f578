//! Retention pruning for sequential Monte Carlo
//!
//! Between passes a particle keeps the prefix of its trace that the next
//! replay will reach and flags the rest `del`, so the evaluator resamples it.
//! A slot's `order` is the number of observe events executed before it was
//! sampled; anything ordered after the current produce count is stale.

use tracestore_core::{Selector, Space, VarName};
use tracestore_storage::DEL;
use tracing::debug;

use crate::selection::Selection;
use crate::trace::TraceOps;

/// Staleness marking
pub trait Retention: Selection {
    /// Flag stale slots owned by `selector` for deletion
    ///
    /// With a zero produce count every owned slot is flagged, in reverse of the
    /// stable slot order (store by store for a partitioned trace).
    /// Otherwise only owned slots whose order exceeds the produce count are
    /// flagged. Returns the number of slots flagged.
    fn mark_stale_for_deletion(&mut self, selector: &Selector) -> usize {
        let produce_count = self.produce_count();
        let owned: Vec<(usize, usize)> = self.owned_slots(selector, &Space::all()).iter().collect();

        let stale: Vec<(usize, usize)> = if produce_count == 0 {
            owned.into_iter().rev().collect()
        } else {
            let stores = self.stores();
            owned
                .into_iter()
                .filter(|&(k, slot)| stores[k].order_at(slot) > produce_count)
                .collect()
        };

        let stores = self.stores_mut();
        for &(k, slot) in &stale {
            stores[k].set_flag_at(DEL, slot, true);
        }
        debug!(selector = %selector, produce_count, flagged = stale.len(), "marked stale slots");
        stale.len()
    }

    /// Names currently flagged for deletion, in stable order
    fn flagged_for_deletion(&self) -> Vec<VarName> {
        self.stores()
            .iter()
            .flat_map(|store| {
                (0..store.len())
                    .filter(move |&slot| store.flag_at(DEL, slot))
                    .map(move |slot| store.name_at(slot).clone())
            })
            .collect()
    }
}

impl<T: TraceOps> Retention for T {}
