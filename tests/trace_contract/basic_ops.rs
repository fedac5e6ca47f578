//! Basic Operations Tests
//!
//! - push / read / read_many / write
//! - all_values / set_all_values
//! - log-probability and produce count
//! - clear

use crate::*;

fn mixed(t: &mut Trace) {
    t.push(VarName::from("x[1]"), 2.0, normal(), Owners::none()).unwrap();
    t.push(VarName::scalar("sigma"), 0.5, exponential(), Owners::none()).unwrap();
    t.push(
        VarName::scalar("v"),
        vec![1.0, 2.0, 3.0],
        Arc::new(Iid::new(Normal::standard(), 3)),
        Owners::none(),
    )
    .unwrap();
    t.push(VarName::from("x[2]"), 3.0, normal(), Owners::none()).unwrap();
}

#[test]
fn test_push_then_contains() {
    across_trace_modes(mixed, |t| {
        assert_eq!(t.len(), 4);
        assert!(t.contains(&VarName::from("x[2]")));
        assert!(!t.contains(&VarName::from("x[3]")));
        assert_eq!(t.symbols().len(), 3);
    });
}

#[test]
fn test_duplicate_push_rejected_in_both_forms() {
    across_trace_modes(mixed, |t| {
        let before = t.all_values();
        let err = t
            .push(VarName::scalar("sigma"), 1.0, exponential(), Owners::none())
            .unwrap_err();
        assert!(err.is_duplicate());
        assert_eq!(t.all_values(), before);
    });
}

#[test]
fn test_unknown_lookups_fail() {
    across_trace_modes(mixed, |t| {
        let ghost = VarName::scalar("ghost");
        assert!(t.read(&ghost).unwrap_err().is_unknown());
        assert!(t.write(&ghost, &[0.0]).unwrap_err().is_unknown());
        assert!(t.flag(&ghost, DEL).unwrap_err().is_unknown());
        assert!(t.range(&ghost).unwrap_err().is_unknown());
    });
}

#[test]
fn test_read_natural_shape() {
    across_trace_modes(mixed, |t| {
        assert_eq!(t.read(&VarName::from("x[1]")).unwrap(), Value::Scalar(2.0));
        assert_eq!(
            t.read(&VarName::scalar("v")).unwrap(),
            Value::Vector(vec![1.0, 2.0, 3.0])
        );
    });
}

#[test]
fn test_write_then_read_untransformed() {
    across_trace_modes(mixed, |t| {
        let v = VarName::scalar("v");
        t.write(&v, &[4.0, 5.0, 6.0]).unwrap();
        assert_eq!(t.read(&v).unwrap().as_flat(), &[4.0, 5.0, 6.0]);
        let err = t.write(&v, &[1.0]).unwrap_err();
        assert!(err.is_shape_mismatch());
    });
}

#[test]
fn test_read_many_requires_consistent_group() {
    across_trace_modes(mixed, |t| {
        let xs = [VarName::from("x[1]"), VarName::from("x[2]")];
        assert_eq!(t.read_many(&xs).unwrap(), vec![2.0, 3.0]);

        t.link_var(&xs[0]).unwrap();
        assert!(matches!(
            t.read_many(&xs).unwrap_err(),
            TraceError::InconsistentGroup { .. }
        ));
    });
}

#[test]
fn test_set_all_values_length_checked() {
    across_trace_modes(mixed, |t| {
        let n = t.all_values().len();
        assert_eq!(n, 6);
        let fresh: Vec<f64> = (0..n).map(|i| i as f64 * 10.0).collect();
        t.set_all_values(&fresh).unwrap();
        assert_eq!(t.all_values(), fresh);

        let err = t.set_all_values(&fresh[..n - 1]).unwrap_err();
        assert!(err.is_shape_mismatch());
        assert_eq!(t.all_values(), fresh);
    });
}

#[test]
fn test_log_prob_accumulates() {
    across_trace_modes(mixed, |t| {
        assert_eq!(t.log_prob(), 0.0);
        t.add_log_prob(-0.25);
        t.add_log_prob(-0.75);
        assert_eq!(t.log_prob(), -1.0);
        t.reset_log_prob();
        assert_eq!(t.log_prob(), 0.0);
    });
}

#[test]
fn test_produce_count_ops() {
    across_trace_modes(
        |_| {},
        |t| {
            t.increment_produce_count();
            t.increment_produce_count();
            assert_eq!(t.produce_count(), 2);
            t.push(VarName::scalar("late"), 0.0, normal(), Owners::none()).unwrap();
            assert_eq!(t.order(&VarName::scalar("late")).unwrap(), 2);
            t.reset_produce_count();
            assert_eq!(t.produce_count(), 0);
        },
    );
}

#[test]
fn test_custom_flags() {
    across_trace_modes(mixed, |t| {
        let x1 = VarName::from("x[1]");
        assert!(!t.flag(&x1, "visited").unwrap());
        t.set_flag(&x1, "visited", true).unwrap();
        assert!(t.flag(&x1, "visited").unwrap());
        assert!(!t.flag(&VarName::from("x[2]"), "visited").unwrap());
    });
}

#[test]
fn test_clear_then_reuse() {
    across_trace_modes(mixed, |t| {
        t.add_log_prob(-3.0);
        t.clear();
        assert!(t.is_empty());
        assert_eq!(t.log_prob(), 0.0);
        t.push(VarName::from("x[1]"), 9.0, normal(), Owners::none()).unwrap();
        assert_eq!(t.all_values(), vec![9.0]);
    });
}

#[test]
fn test_keys_stable_order() {
    let mut t = Trace::new();
    mixed(&mut t);
    assert_eq!(rendered(&t.keys()), vec!["x[1]", "sigma", "v", "x[2]"]);
    t.specialize();
    assert_eq!(rendered(&t.keys()), vec!["x[1]", "x[2]", "sigma", "v"]);
}
