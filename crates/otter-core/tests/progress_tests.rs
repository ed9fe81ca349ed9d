// Host-side tests for node progress and the next-node gate.

use otter_core::entity::PathChoice;
use otter_core::progress::{balance_fill, AffordanceGate, GateChange, ProgressState, WinCondition};

#[test]
fn balance_gate_is_live_both_ways() {
    let mut gate = AffordanceGate::new(WinCondition::balance());
    let mut p = ProgressState::default();

    p.trees = 2;
    assert_eq!(gate.update(&p), GateChange::Unchanged);
    p.trees = 3;
    assert_eq!(gate.update(&p), GateChange::Shown);
    assert!(gate.is_shown());
    assert_eq!(gate.update(&p), GateChange::Unchanged);

    p.buildings = 1;
    assert_eq!(gate.update(&p), GateChange::Hidden);
    assert!(!gate.is_shown());

    p.trees = 4;
    assert_eq!(gate.update(&p), GateChange::Shown);
}

#[test]
fn other_gates_latch_once_shown() {
    let mut gate = AffordanceGate::new(WinCondition::ExitReached);
    let mut p = ProgressState {
        exit_reached: true,
        ..ProgressState::default()
    };
    assert_eq!(gate.update(&p), GateChange::Shown);

    p.exit_reached = false;
    assert_eq!(gate.update(&p), GateChange::Unchanged);
    assert!(gate.is_shown());

    gate.reset();
    assert!(!gate.is_shown());
}

#[test]
fn immediate_gate_opens_on_first_update() {
    let mut gate = AffordanceGate::new(WinCondition::Immediate);
    assert_eq!(gate.update(&ProgressState::default()), GateChange::Shown);
}

#[test]
fn path_gate_needs_the_right_choice() {
    let cond = WinCondition::PathChosen(PathChoice::Natural);
    let mut p = ProgressState::default();
    assert!(!cond.is_met(&p));
    p.path_choice = Some(PathChoice::Polluted);
    assert!(!cond.is_met(&p));
    p.path_choice = Some(PathChoice::Natural);
    assert!(cond.is_met(&p));
}

#[test]
fn collection_needs_every_item() {
    let mut p = ProgressState::default();
    // Nothing to collect is not the same as all collected
    assert!(!p.all_collected());

    p.total_items = 5;
    for n in 1..=4 {
        assert_eq!(p.collect(), n);
        assert!(!WinCondition::AllCollected.is_met(&p));
    }
    p.collect();
    assert!(WinCondition::AllCollected.is_met(&p));
}

#[test]
fn obstacle_health_bottoms_out_at_zero() {
    let mut p = ProgressState::default();
    assert_eq!(p.hit_obstacle(), None);

    p.obstacle_health = Some(3);
    assert_eq!(p.hit_obstacle(), Some(2));
    assert_eq!(p.hit_obstacle(), Some(1));
    assert!(!p.obstacle_cleared());
    assert_eq!(p.hit_obstacle(), Some(0));
    assert!(p.obstacle_cleared());
    assert_eq!(p.hit_obstacle(), Some(0));
}

#[test]
fn balance_fill_is_clamped() {
    assert_eq!(balance_fill(3, 0, 3), 1.0);
    assert_eq!(balance_fill(9, 0, 3), 1.0);
    assert!((balance_fill(2, 1, 3) - 1.0 / 3.0).abs() < 1e-6);
    assert_eq!(balance_fill(0, 5, 3), 0.0);
    assert_eq!(balance_fill(0, 0, 0), 1.0);
}

#[test]
fn journey_and_puzzle_conditions() {
    let mut p = ProgressState::default();
    assert!(!WinCondition::JourneyEnded.is_met(&p));
    assert!(!WinCondition::PuzzleSolved.is_met(&p));
    p.journey_ended = true;
    p.puzzle_solved = true;
    assert!(WinCondition::JourneyEnded.is_met(&p));
    assert!(WinCondition::PuzzleSolved.is_met(&p));
    assert!(!WinCondition::JourneyEnded.is_live());
}
