//! Constrained / unconstrained value transforms
//!
//! Samplers that work in unconstrained space (gradient-based ones in
//! particular) link their slots before a proposal step and invlink after.
//! Transforms apply per symbol group: the group's representative (its first
//! owned slot) decides whether the group is already in the target space.
//!
//! Redundant requests are never errors. They leave values untouched, log a
//! notice, and are listed in the returned [`TransformReport`].

use tracestore_core::{Result, Selector, Space, Symbol, TransformWarning, VarName};
use tracestore_storage::{MetadataStore, TRANS};
use tracing::{debug, warn};

use crate::selection::Selection;
use crate::trace::TraceOps;

/// Outcome of a group transform
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransformReport {
    /// Symbols whose slots were transformed
    pub transformed: Vec<Symbol>,
    /// Groups left untouched because they were already in the target space
    pub warnings: Vec<TransformWarning>,
}

impl TransformReport {
    /// True when no group was redundant
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Link,
    Invlink,
}

impl Direction {
    /// Value of `trans` once the transform has been applied
    fn target(self) -> bool {
        matches!(self, Direction::Link)
    }

    fn apply(self, store: &mut MetadataStore, slot: usize) -> Result<()> {
        match self {
            Direction::Link => store.link_at(slot),
            Direction::Invlink => store.invlink_at(slot),
        }
    }

    fn redundant(self, target: String) -> TransformWarning {
        match self {
            Direction::Link => TransformWarning::AlreadyTransformed { target },
            Direction::Invlink => TransformWarning::NotTransformed { target },
        }
    }
}

fn notify<T: TraceOps + ?Sized>(trace: &T, warning: &TransformWarning) {
    if trace.state().config().warn_on_redundant_transform {
        warn!(target_name = warning.target(), "{}", warning);
    } else {
        debug!(target_name = warning.target(), "{}", warning);
    }
}

fn transform_groups<T: Selection + ?Sized>(
    trace: &mut T,
    selector: &Selector,
    space: &Space,
    direction: Direction,
) -> Result<TransformReport> {
    let mut report = TransformReport::default();
    for group in trace.owned_groups(selector, space) {
        if trace.stores()[group.store].flag_at(TRANS, group.slots[0]) == direction.target() {
            let warning = direction.redundant(group.symbol.to_string());
            notify(trace, &warning);
            report.warnings.push(warning);
            continue;
        }
        let store = &mut trace.stores_mut()[group.store];
        for &slot in &group.slots {
            direction.apply(store, slot)?;
        }
        report.transformed.push(group.symbol);
    }
    debug!(
        selector = %selector,
        transformed = report.transformed.len(),
        skipped = report.warnings.len(),
        ?direction,
        "group transform"
    );
    Ok(report)
}

fn transform_var<T: TraceOps + ?Sized>(
    trace: &mut T,
    name: &VarName,
    direction: Direction,
) -> Result<Option<TransformWarning>> {
    let (k, slot) = trace.locate(name)?;
    if trace.stores()[k].flag_at(TRANS, slot) == direction.target() {
        let warning = direction.redundant(name.to_string());
        notify(trace, &warning);
        return Ok(Some(warning));
    }
    direction.apply(&mut trace.stores_mut()[k], slot)?;
    Ok(None)
}

/// Link/invlink over owned symbol groups
pub trait Transform: Selection {
    /// Map every owned group not yet transformed into unconstrained space
    ///
    /// # Errors
    ///
    /// Only `ShapeMismatch`, if a distribution's link changes dimension.
    fn link_group(&mut self, selector: &Selector, space: &Space) -> Result<TransformReport> {
        transform_groups(self, selector, space, Direction::Link)
    }

    /// Map every owned transformed group back into constrained space
    fn invlink_group(&mut self, selector: &Selector, space: &Space) -> Result<TransformReport> {
        transform_groups(self, selector, space, Direction::Invlink)
    }

    /// Whether any owned group's representative is transformed
    fn is_linked(&self, selector: &Selector, space: &Space) -> bool {
        let stores = self.stores();
        self.owned_groups(selector, space)
            .iter()
            .any(|g| stores[g.store].flag_at(TRANS, g.slots[0]))
    }

    /// Link a single variable
    ///
    /// Returns the warning if it was already transformed.
    fn link_var(&mut self, name: &VarName) -> Result<Option<TransformWarning>> {
        transform_var(self, name, Direction::Link)
    }

    /// Invlink a single variable
    ///
    /// Returns the warning if it was not transformed.
    fn invlink_var(&mut self, name: &VarName) -> Result<Option<TransformWarning>> {
        transform_var(self, name, Direction::Invlink)
    }
}

impl<T: TraceOps> Transform for T {}
