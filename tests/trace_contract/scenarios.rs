//! End-to-End Scenarios
//!
//! Evaluator-shaped flows through the public API: a full execution, clone
//! isolation between branches, particle resampling, and JSON export.

use crate::*;

#[test]
fn test_execution_then_export() {
    across_trace_modes(
        |_| {},
        |t| {
            let x1 = VarName::from("x[1]");
            let x2 = VarName::from("x[2]");
            t.push(x1, 2.0, normal(), Owners::none()).unwrap();
            t.add_log_prob(-1.5);
            t.push(x2, 3.0, normal(), Owners::none()).unwrap();
            t.add_log_prob(-1.5);

            assert_eq!(t.log_prob(), -3.0);
            let named = t.export_named_values();
            let (values, names) = named.get("x").unwrap();
            assert_eq!(values, &[Value::Scalar(2.0), Value::Scalar(3.0)]);
            assert_eq!(names, &["x[1]".to_string(), "x[2]".to_string()]);
        },
    );
}

#[test]
fn test_gibbs_sweep() {
    init_tracing();
    let hmc = Selector::new("hmc");
    let mh = Selector::new("mh");
    let mut t = Trace::new();
    t.push(VarName::scalar("sigma"), 1.5, exponential(), Owners::one(hmc.clone())).unwrap();
    t.push(VarName::scalar("mu"), 0.0, normal(), Owners::one(mh.clone())).unwrap();
    t.specialize();

    // hmc works in unconstrained space on its own block
    t.link_group(&hmc, &Space::all()).unwrap();
    let ranges = t.owned_ranges(&hmc, &Space::all());
    let mut theta = t.all_values();
    for r in &ranges {
        for v in &mut theta[r.clone()] {
            *v += 0.1;
        }
    }
    t.set_all_values(&theta).unwrap();
    t.invlink_group(&hmc, &Space::all()).unwrap();

    let sigma = t.read(&VarName::scalar("sigma")).unwrap().as_scalar().unwrap();
    assert!((sigma - 1.5 * 0.1f64.exp()).abs() < 1e-9);

    // mh block untouched
    assert_eq!(t.read(&VarName::scalar("mu")).unwrap(), Value::Scalar(0.0));
    assert!(!t.is_linked(&mh, &Space::all()));
}

#[test]
fn test_clone_isolation() {
    across_trace_modes(
        |t| {
            t.push(VarName::scalar("a"), 1.0, exponential(), Owners::none()).unwrap();
            t.add_log_prob(-1.0);
        },
        |t| {
            let mut proposal = t.clone();
            proposal.write(&VarName::scalar("a"), &[5.0]).unwrap();
            proposal.link_var(&VarName::scalar("a")).unwrap();
            proposal.set_flag(&VarName::scalar("a"), DEL, true).unwrap();
            proposal.add_log_prob(-2.0);

            assert_eq!(t.all_values(), vec![1.0]);
            assert!(!t.flag(&VarName::scalar("a"), TRANS).unwrap());
            assert!(!t.flag(&VarName::scalar("a"), DEL).unwrap());
            assert_eq!(t.log_prob(), -1.0);
            assert_eq!(proposal.log_prob(), -3.0);
        },
    );
}

#[test]
fn test_parallel_traces_on_threads() {
    let base = {
        let mut t = Trace::new();
        t.push(VarName::scalar("mu"), 0.0, normal(), Owners::none()).unwrap();
        t
    };
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let mut t = base.clone();
            std::thread::spawn(move || {
                t.write(&VarName::scalar("mu"), &[i as f64]).unwrap();
                t.all_values()
            })
        })
        .collect();
    for (i, h) in handles.into_iter().enumerate() {
        assert_eq!(h.join().unwrap(), vec![i as f64]);
    }
    assert_eq!(base.all_values(), vec![0.0]);
}

#[test]
fn test_particle_resampling_round() {
    init_tracing();
    let smc = Selector::new("smc");
    let mut particles = Particles::builder().count(3).build().unwrap();
    for (i, t) in particles.iter_mut().enumerate() {
        t.push(VarName::scalar("z0"), i as f64, normal(), Owners::none()).unwrap();
        t.increment_produce_count();
        t.push(VarName::scalar("z1"), 10.0 + i as f64, normal(), Owners::none()).unwrap();
        t.add_log_prob(-(i as f64));
    }

    particles.resample(&[1, 1, 2]).unwrap();
    for t in particles.iter_mut() {
        t.reset_produce_count();
        t.increment_produce_count();
    }
    assert_eq!(particles.mark_stale_for_deletion(&smc), 0);

    for t in particles.iter_mut() {
        t.set_produce_count(0);
    }
    assert_eq!(particles.mark_stale_for_deletion(&smc), 6);

    let first = particles.get(0).unwrap();
    assert_eq!(first.read(&VarName::scalar("z0")).unwrap(), Value::Scalar(1.0));
    assert_eq!(particles.get(2).unwrap().log_prob(), -2.0);
}

#[test]
fn test_json_export_shape() {
    let mut t = Trace::new();
    t.push(VarName::from("x[1]"), 2.0, normal(), Owners::none()).unwrap();
    t.push(
        VarName::scalar("v"),
        vec![1.0, 2.0],
        handle(Iid::new(Normal::standard(), 2)),
        Owners::none(),
    )
    .unwrap();

    let exported = tracestore::export_json(&t).unwrap();
    let json: serde_json::Value = serde_json::from_str(&exported).unwrap();
    assert_eq!(json[0]["symbol"], "x");
    assert_eq!(json[0]["names"][0], "x[1]");
    assert_eq!(json[0]["values"][0]["Scalar"], 2.0);
    assert_eq!(json[1]["values"][0]["Vector"][1], 2.0);
}
