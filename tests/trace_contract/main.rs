//! Trace Contract Test Suite
//!
//! Every behaviour is checked against both trace representations:
//! - Basic operations (push, read, write, log-prob, produce count)
//! - Ownership selection
//! - Group transforms
//! - Retention pruning
//! - Specialization equivalence (including random op sequences)
//! - End-to-end scenarios and particle sets
//! - Configuration

use std::sync::{Arc, Once};
use tracestore::prelude::*;

mod basic_ops;
mod config;
mod retention;
mod scenarios;
mod transform;

static TRACING: Once = Once::new();

/// Install a test-writer subscriber once per test binary
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    });
}

/// Run `f` on a homogeneous trace built by `setup`, then on a copy that was
/// specialized after `setup`
pub fn across_trace_modes<S, F>(setup: S, f: F)
where
    S: Fn(&mut Trace),
    F: Fn(&mut Trace),
{
    init_tracing();

    let mut homogeneous = Trace::new();
    setup(&mut homogeneous);
    assert!(!homogeneous.is_partitioned());
    f(&mut homogeneous);

    let mut partitioned = Trace::new();
    setup(&mut partitioned);
    partitioned.specialize();
    assert!(partitioned.is_partitioned());
    f(&mut partitioned);
}

pub fn normal() -> DistHandle {
    Arc::new(Normal::standard())
}

pub fn exponential() -> DistHandle {
    Arc::new(Exponential::new(1.0))
}

pub fn handle<D: Distribution + 'static>(dist: D) -> DistHandle {
    Arc::new(dist)
}

pub fn rendered(names: &[VarName]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

pub fn assert_close(a: &[f64], b: &[f64]) {
    assert_eq!(a.len(), b.len(), "length differs: {:?} vs {:?}", a, b);
    for (x, y) in a.iter().zip(b) {
        assert!((x - y).abs() < 1e-9, "{:?} vs {:?}", a, b);
    }
}
