//! Retention Pruning Tests

use crate::*;

/// Three variables sampled after 0, 1 and 2 observe events
fn three_steps(t: &mut Trace) {
    for name in ["a", "b", "c"] {
        t.push(VarName::scalar(name), 0.0, normal(), Owners::none()).unwrap();
        t.increment_produce_count();
    }
}

fn flagged(t: &Trace) -> Vec<String> {
    rendered(&t.flagged_for_deletion())
}

#[test]
fn test_prunes_orders_after_produce_count() {
    across_trace_modes(three_steps, |t| {
        t.set_produce_count(1);
        assert_eq!(t.mark_stale_for_deletion(&Selector::new("smc")), 1);
        assert_eq!(flagged(t), vec!["c"]);
        assert!(!t.flag(&VarName::scalar("b"), DEL).unwrap());
    });
}

#[test]
fn test_zero_produce_count_flags_all_owned() {
    across_trace_modes(three_steps, |t| {
        t.reset_produce_count();
        assert_eq!(t.mark_stale_for_deletion(&Selector::new("smc")), 3);
        assert_eq!(flagged(t), vec!["a", "b", "c"]);
    });
}

#[test]
fn test_only_owned_slots_are_pruned() {
    let smc = Selector::new("smc");
    let hmc = Selector::new("hmc");
    across_trace_modes(
        |t| {
            t.push(VarName::scalar("kept"), 0.0, normal(), Owners::one(hmc.clone())).unwrap();
            t.increment_produce_count();
            t.increment_produce_count();
            t.push(VarName::scalar("late"), 0.0, normal(), Owners::one(hmc.clone())).unwrap();
            t.push(VarName::scalar("mine"), 0.0, normal(), Owners::one(smc.clone())).unwrap();
        },
        |t| {
            t.set_produce_count(1);
            assert_eq!(t.mark_stale_for_deletion(&smc), 1);
            assert_eq!(flagged(t), vec!["mine"]);
        },
    );
}

#[test]
fn test_renew_after_prune() {
    across_trace_modes(three_steps, |t| {
        t.set_produce_count(1);
        t.mark_stale_for_deletion(&Selector::new("smc"));

        // replay reaches the third variable after two observes
        t.set_produce_count(2);
        let c = VarName::scalar("c");
        t.renew(&c, 4.5).unwrap();
        assert!(t.flagged_for_deletion().is_empty());
        assert_eq!(t.read(&c).unwrap(), Value::Scalar(4.5));
        assert_eq!(t.order(&c).unwrap(), 2);
    });
}

#[test]
fn test_particle_set_prunes_every_particle() {
    init_tracing();
    let mut particles = Particles::builder().count(3).build().unwrap();
    for t in particles.iter_mut() {
        three_steps(t);
        t.set_produce_count(1);
    }
    assert_eq!(particles.mark_stale_for_deletion(&Selector::new("smc")), 3);
    for t in &particles {
        assert_eq!(flagged(t), vec!["c"]);
    }
}
