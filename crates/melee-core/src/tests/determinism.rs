//! Determinism tests.
//!
//! The engine promises that identical inputs produce identical battles,
//! observable at every round boundary. These tests run simulations in
//! lockstep, compare stepped execution against `run`, and resume a
//! serialized battle mid-fight.

use super::helpers::{sim_from, BATTLE_ONE, BATTLE_SIX, BATTLE_THREE};
use crate::simulation::{CombatStatus, Simulation};

#[test]
fn lockstep_runs_agree_at_every_round() {
    let mut a = sim_from(BATTLE_ONE);
    let mut b = sim_from(BATTLE_ONE);

    while !a.is_over() {
        assert_eq!(a.state_hash(), b.state_hash());
        assert_eq!(a.battlefield().to_string(), b.battlefield().to_string());
        a.advance_round();
        b.advance_round();
    }

    assert_eq!(b.status(), CombatStatus::Ended);
    assert_eq!(a.outcome(), b.outcome());
    assert_eq!(a.state_hash(), b.state_hash());
}

#[test]
fn stepping_matches_run_to_completion() {
    let mut stepped = sim_from(BATTLE_THREE);
    while stepped.advance_round() == CombatStatus::InProgress {}

    let mut whole = sim_from(BATTLE_THREE);
    let report = whole.run();

    assert_eq!(stepped.outcome(), Some(report));
    assert_eq!(stepped.state_hash(), whole.state_hash());
    assert_eq!(
        stepped.battlefield().to_string(),
        whole.battlefield().to_string()
    );
}

#[test]
fn repeated_runs_produce_identical_reports() {
    for map in [BATTLE_ONE, BATTLE_THREE, BATTLE_SIX] {
        let first = sim_from(map).run();
        let second = sim_from(map).run();
        assert_eq!(first, second);
    }
}

#[test]
fn serialized_battles_resume_identically() {
    let mut original = sim_from(BATTLE_SIX);
    for _ in 0..10 {
        original.advance_round();
    }
    assert!(!original.is_over(), "snapshot must be taken mid-battle");

    let snapshot = serde_json::to_string(&original).unwrap();
    let mut restored: Simulation = serde_json::from_str(&snapshot).unwrap();
    assert_eq!(restored.state_hash(), original.state_hash());

    let resumed = restored.run();
    let finished = original.run();
    assert_eq!(resumed, finished);
    assert_eq!(restored.state_hash(), original.state_hash());
}
