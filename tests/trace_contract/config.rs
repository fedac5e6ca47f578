//! Configuration Tests

use crate::*;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct SamplerSettings {
    particles: usize,
    trace: TraceConfig,
}

#[test]
fn test_config_embeds_in_larger_document() {
    let settings: SamplerSettings = toml::from_str(
        r#"
        particles = 16

        [trace]
        capacity_hint = 32
        auto_specialize = true
        "#,
    )
    .unwrap();
    assert_eq!(settings.particles, 16);
    assert_eq!(settings.trace.capacity_hint, 32);
    assert!(settings.trace.auto_specialize);
    assert!(settings.trace.warn_on_redundant_transform);

    let particles = Particles::builder()
        .count(settings.particles)
        .config(settings.trace)
        .build()
        .unwrap();
    assert_eq!(particles.len(), 16);
}

#[test]
fn test_auto_specialize_across_executions() {
    let config = TraceConfig::builder().auto_specialize(true).build();
    let mut particles = Particles::builder().count(2).config(config).build().unwrap();

    // nothing sampled yet: stays homogeneous
    assert_eq!(particles.end_of_execution(), 0);

    for t in particles.iter_mut() {
        t.push(VarName::from("x[1]"), 0.0, normal(), Owners::none()).unwrap();
    }
    assert_eq!(particles.end_of_execution(), 2);
    assert!(particles.iter().all(|t| t.is_partitioned()));

    // second execution reuses the partitioned layout
    for t in particles.iter_mut() {
        t.clear();
        t.push(VarName::from("x[1]"), 1.0, normal(), Owners::none()).unwrap();
    }
    assert_eq!(particles.end_of_execution(), 0);
    assert!(particles.iter().all(|t| t.is_partitioned()));
}

#[test]
fn test_capacity_hints_do_not_change_behaviour() {
    let config = TraceConfig::builder()
        .capacity_hint(64)
        .values_capacity_hint(256)
        .build();
    let mut t = Trace::with_config(config.clone());
    assert_eq!(t.config(), &config);
    t.push(VarName::scalar("a"), 1.0, normal(), Owners::none()).unwrap();
    assert_eq!(t.all_values(), vec![1.0]);
}

#[test]
fn test_invalid_config_is_reported() {
    let err = Particles::builder()
        .config_toml("auto_specialize = \"yes\"")
        .unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}
