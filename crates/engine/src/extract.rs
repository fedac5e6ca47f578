//! Named export of constrained values
//!
//! Downstream consumers (chain storage, summaries) want values keyed by the
//! rendered variable name, grouped by symbol, in constrained space whatever
//! the trace currently stores.

use serde::Serialize;
use tracestore_core::{Space, Symbol, Value};

use crate::trace::TraceOps;

/// Values of one symbol in registration order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SymbolValues {
    /// The shared symbol
    pub symbol: Symbol,
    /// Rendered names, e.g. `x[1]`
    pub names: Vec<String>,
    /// Constrained values, aligned with `names`
    pub values: Vec<Value>,
}

/// Every symbol's values in first-appearance order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct NamedValues {
    groups: Vec<SymbolValues>,
}

impl NamedValues {
    /// `(values, names)` of `symbol`
    pub fn get(&self, symbol: &str) -> Option<(&[Value], &[String])> {
        self.groups
            .iter()
            .find(|g| g.symbol.as_str() == symbol)
            .map(|g| (g.values.as_slice(), g.names.as_slice()))
    }

    /// Concatenated flat values of `symbol`
    pub fn flat_values(&self, symbol: &str) -> Option<Vec<f64>> {
        self.get(symbol)
            .map(|(values, _)| values.iter().flat_map(|v| v.as_flat().iter().copied()).collect())
    }

    /// Symbol groups in order
    pub fn groups(&self) -> &[SymbolValues] {
        &self.groups
    }

    /// Number of symbols
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// True when the trace had no variables
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Export of constrained values
pub trait Extract: TraceOps {
    /// Every variable, grouped by symbol, inverting stored transforms
    fn export_named_values(&self) -> NamedValues {
        let stores = self.stores();
        let groups = self
            .grouped_slots(&Space::all(), |_, _| true)
            .into_iter()
            .map(|g| {
                let store = &stores[g.store];
                let names = g.slots.iter().map(|&s| store.name_at(s).to_string()).collect();
                let values = g
                    .slots
                    .iter()
                    .map(|&s| store.dist_at(s).reshape(&store.constrained_at(s)))
                    .collect();
                SymbolValues {
                    symbol: g.symbol,
                    names,
                    values,
                }
            })
            .collect();
        NamedValues { groups }
    }
}

impl<T: TraceOps> Extract for T {}
