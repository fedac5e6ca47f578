//! Transform Lifecycle Tests
//!
//! - link/invlink round trip per distribution and per group
//! - idempotence with reported warnings
//! - representative flag stays in sync with every member

use crate::*;

fn positive(t: &mut Trace) {
    t.push(VarName::from("rate[1]"), 0.7, exponential(), Owners::none()).unwrap();
    t.push(VarName::from("p[1]"), 0.2, Arc::new(Beta::new(2.0, 3.0)), Owners::none())
        .unwrap();
    t.push(VarName::from("rate[2]"), 2.5, exponential(), Owners::none()).unwrap();
    t.push(
        VarName::scalar("w"),
        0.3,
        Arc::new(Uniform::new(-1.0, 1.0)),
        Owners::none(),
    )
    .unwrap();
    t.push(
        VarName::scalar("scales"),
        vec![0.5, 1.5],
        Arc::new(Iid::new(LogNormal::new(0.0, 1.0), 2)),
        Owners::none(),
    )
    .unwrap();
}

#[test]
fn test_link_invlink_group_round_trip() {
    across_trace_modes(positive, |t| {
        let sel = Selector::new("hmc");
        let before = t.all_values();

        let report = t.link_group(&sel, &Space::all()).unwrap();
        assert!(report.is_clean());
        assert_eq!(report.transformed.len(), 4);
        assert!(t.is_linked(&sel, &Space::all()));

        // Constrained reads are unaffected by the stored representation
        assert_close(t.read(&VarName::from("rate[2]")).unwrap().as_flat(), &[2.5]);

        t.invlink_group(&sel, &Space::all()).unwrap();
        assert!(!t.is_linked(&sel, &Space::all()));
        assert_close(&t.all_values(), &before);
    });
}

#[test]
fn test_per_distribution_round_trip() {
    let cases: Vec<(DistHandle, Vec<f64>)> = vec![
        (normal(), vec![-3.2]),
        (exponential(), vec![0.01]),
        (handle(LogNormal::new(1.0, 0.5)), vec![7.0]),
        (handle(Uniform::new(2.0, 5.0)), vec![4.9]),
        (handle(Beta::new(0.5, 0.5)), vec![0.999]),
        (handle(Iid::new(Exponential::new(3.0), 3)), vec![0.1, 1.0, 10.0]),
    ];
    for (dist, value) in cases {
        let back = dist.invlink(&dist.link(&value));
        assert_close(&back, &value);
    }
}

#[test]
fn test_link_is_idempotent() {
    across_trace_modes(positive, |t| {
        let sel = Selector::new("hmc");
        t.link_group(&sel, &Space::all()).unwrap();
        let once = t.all_values();

        let report = t.link_group(&sel, &Space::all()).unwrap();
        assert!(report.transformed.is_empty());
        assert_eq!(report.warnings.len(), 4);
        assert!(report
            .warnings
            .iter()
            .all(|w| matches!(w, TransformWarning::AlreadyTransformed { .. })));
        assert_eq!(t.all_values(), once);
    });
}

#[test]
fn test_invlink_untransformed_is_noop() {
    across_trace_modes(positive, |t| {
        let before = t.all_values();
        let report = t.invlink_group(&Selector::default(), &Space::all()).unwrap();
        assert_eq!(report.warnings.len(), 4);
        assert_eq!(t.all_values(), before);
    });
}

#[test]
fn test_member_flags_follow_representative() {
    across_trace_modes(positive, |t| {
        let sel = Selector::new("hmc");
        let space = Space::symbols(["rate"]);
        t.link_group(&sel, &space).unwrap();
        assert!(t.flag(&VarName::from("rate[1]"), TRANS).unwrap());
        assert!(t.flag(&VarName::from("rate[2]"), TRANS).unwrap());
        assert!(!t.flag(&VarName::from("p[1]"), TRANS).unwrap());

        t.invlink_group(&sel, &space).unwrap();
        for name in t.keys() {
            assert!(!t.flag(&name, TRANS).unwrap(), "{} left transformed", name);
        }
    });
}

#[test]
fn test_ownership_limits_transforms() {
    let hmc = Selector::new("hmc");
    let mh = Selector::new("mh");
    across_trace_modes(
        |t| {
            t.push(VarName::scalar("a"), 1.0, exponential(), Owners::one(hmc.clone())).unwrap();
            t.push(VarName::scalar("b"), 1.0, exponential(), Owners::one(mh.clone())).unwrap();
        },
        |t| {
            t.link_group(&hmc, &Space::all()).unwrap();
            assert!(t.flag(&VarName::scalar("a"), TRANS).unwrap());
            assert!(!t.flag(&VarName::scalar("b"), TRANS).unwrap());
            assert!(!t.is_linked(&mh, &Space::all()));
        },
    );
}

#[test]
fn test_link_var_reports_redundancy() {
    across_trace_modes(positive, |t| {
        let w = VarName::scalar("w");
        assert!(t.link_var(&w).unwrap().is_none());
        let warning = t.link_var(&w).unwrap().expect("second link warns");
        assert_eq!(warning.target(), "w");
        assert_close(t.read(&w).unwrap().as_flat(), &[0.3]);
    });
}
