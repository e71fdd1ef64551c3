//! Checkpoint Tests - Save/Load Engine State
//!
//! Critical invariants tested:
//! - Determinism: a restored engine produces identical results
//! - Config matching: state from a different config is rejected
//! - Integrity: malformed snapshots are rejected

use economy_simulator_core_rs::{EngineConfig, SimulationEngine, SimulationError};

fn create_test_config() -> EngineConfig {
    EngineConfig::new(0.05, 8, [0.45, 0.55], [120.0, 90.0]).with_seed(4242)
}

#[test]
fn test_restore_continues_identically() {
    let _ = env_logger::try_init();

    let mut original = SimulationEngine::new(create_test_config()).unwrap();
    for _ in 0..13 {
        original.step(None, None);
    }

    let json = original.save_state().unwrap();
    let mut restored = SimulationEngine::load_state(create_test_config(), &json).unwrap();

    assert_eq!(restored.current_tick(), 13);
    assert_eq!(restored.history_len(), original.history_len());
    assert!(restored.history_snapshot().eq(original.history_snapshot()));

    for t in 0..20 {
        let overrides = if t % 5 == 0 { (Some(0.3), None) } else { (None, None) };
        let a = original.step(overrides.0, overrides.1);
        let b = restored.step(overrides.0, overrides.1);
        assert_eq!(a, b, "tick {} diverged after restore", a.tick);
    }
    assert!(restored.history_snapshot().eq(original.history_snapshot()));
}

#[test]
fn test_restore_fresh_engine() {
    let engine = SimulationEngine::new(create_test_config()).unwrap();
    let json = engine.save_state().unwrap();

    let restored = SimulationEngine::load_state(create_test_config(), &json).unwrap();
    assert_eq!(restored.current_tick(), 0);
    assert_eq!(restored.history_len(), 1);
    assert_eq!(restored.get_matrix(), engine.get_matrix());
}

#[test]
fn test_config_mismatch_rejected() {
    let engine = SimulationEngine::new(create_test_config()).unwrap();
    let json = engine.save_state().unwrap();

    let other = create_test_config().with_seed(1);
    match SimulationEngine::load_state(other, &json) {
        Err(SimulationError::ConfigMismatch { expected, actual }) => assert_ne!(expected, actual),
        Err(e) => panic!("unexpected error: {}", e),
        Ok(_) => panic!("config mismatch must be rejected"),
    }
}

#[test]
fn test_malformed_json_rejected() {
    let result = SimulationEngine::load_state(create_test_config(), "{not json");
    assert!(matches!(result, Err(SimulationError::DeserializationError(_))));
}

#[test]
fn test_overlong_history_rejected() {
    let mut engine = SimulationEngine::new(create_test_config()).unwrap();
    for _ in 0..20 {
        engine.step(None, None);
    }

    let mut snapshot = engine.snapshot().unwrap();
    let extra = snapshot.history[0].clone();
    snapshot.history.insert(0, extra);

    let result = SimulationEngine::from_snapshot(create_test_config(), snapshot);
    assert!(matches!(result, Err(SimulationError::StateValidationError(_))));
}

#[test]
fn test_invalid_config_rejected_on_load() {
    let engine = SimulationEngine::new(create_test_config()).unwrap();
    let json = engine.save_state().unwrap();

    let mut bad = create_test_config();
    bad.memory = 1;
    assert!(matches!(
        SimulationEngine::load_state(bad, &json),
        Err(SimulationError::InvalidParameter(_))
    ));
}

#[test]
fn test_restore_after_non_finite_override() {
    let mut original = SimulationEngine::new(create_test_config()).unwrap();
    original.step(Some(f64::NAN), None);
    original.step(None, Some(f64::INFINITY));

    assert!(original.latest().alpha().is_finite());
    assert!(original.latest().rho().is_finite());

    let json = original.save_state().unwrap();
    let mut restored = SimulationEngine::load_state(create_test_config(), &json).unwrap();
    assert!(restored.history_snapshot().eq(original.history_snapshot()));
    assert_eq!(restored.step(None, None), original.step(None, None));
}

#[test]
fn test_max_tick_checkpoint_does_not_panic() {
    let engine = SimulationEngine::new(create_test_config()).unwrap();
    let json = engine
        .save_state()
        .unwrap()
        .replace("\"current_tick\":0", &format!("\"current_tick\":{}", usize::MAX));
    assert!(json.contains(&usize::MAX.to_string()));

    let mut restored = SimulationEngine::load_state(create_test_config(), &json).unwrap();
    assert_eq!(restored.current_tick(), usize::MAX);

    let result = restored.step(None, None);
    assert_eq!(result.tick, usize::MAX);
}
