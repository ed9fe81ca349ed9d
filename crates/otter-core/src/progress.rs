//! Per-node progress counters and the gate on the "next node" affordance.

use crate::constants::BALANCE_THRESHOLD;
use crate::entity::PathChoice;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProgressState {
    pub collected: u32,
    pub total_items: u32,
    pub obstacle_health: Option<u32>,
    pub trees: u32,
    pub buildings: u32,
    pub exit_reached: bool,
    pub puzzle_solved: bool,
    pub path_choice: Option<PathChoice>,
    pub journey_ended: bool,
}

impl ProgressState {
    pub fn collect(&mut self) -> u32 {
        self.collected += 1;
        self.collected
    }

    pub fn all_collected(&self) -> bool {
        self.total_items > 0 && self.collected >= self.total_items
    }

    /// One tap on the obstacle. Returns the remaining health.
    pub fn hit_obstacle(&mut self) -> Option<u32> {
        let health = self.obstacle_health.as_mut()?;
        *health = health.saturating_sub(1);
        Some(*health)
    }

    pub fn obstacle_cleared(&self) -> bool {
        self.obstacle_health == Some(0)
    }

    pub fn balance_net(&self) -> u32 {
        balance_net(self.trees, self.buildings)
    }
}

/// `max(trees - buildings, 0)`.
#[inline]
pub fn balance_net(trees: u32, buildings: u32) -> u32 {
    trees.saturating_sub(buildings)
}

/// Balance bar fill in `[0, 1]`.
#[inline]
pub fn balance_fill(trees: u32, buildings: u32, threshold: u32) -> f32 {
    if threshold == 0 {
        return 1.0;
    }
    (balance_net(trees, buildings) as f32 / threshold as f32).min(1.0)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WinCondition {
    /// Shown as soon as the node is active.
    Immediate,
    ExitReached,
    AllCollected,
    ObstacleCleared,
    PathChosen(PathChoice),
    PuzzleSolved,
    /// Live: tracks the tree/building balance both ways.
    Balance { threshold: u32 },
    JourneyEnded,
}

impl WinCondition {
    pub fn balance() -> Self {
        WinCondition::Balance {
            threshold: BALANCE_THRESHOLD,
        }
    }

    pub fn is_met(&self, p: &ProgressState) -> bool {
        match *self {
            WinCondition::Immediate => true,
            WinCondition::ExitReached => p.exit_reached,
            WinCondition::AllCollected => p.all_collected(),
            WinCondition::ObstacleCleared => p.obstacle_cleared(),
            WinCondition::PathChosen(choice) => p.path_choice == Some(choice),
            WinCondition::PuzzleSolved => p.puzzle_solved,
            WinCondition::Balance { threshold } => p.balance_net() >= threshold,
            WinCondition::JourneyEnded => p.journey_ended,
        }
    }

    /// Live gates may hide again; all others latch.
    pub fn is_live(&self) -> bool {
        matches!(self, WinCondition::Balance { .. })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateChange {
    Unchanged,
    Shown,
    Hidden,
}

#[derive(Clone, Copy, Debug)]
pub struct AffordanceGate {
    condition: WinCondition,
    shown: bool,
}

impl AffordanceGate {
    pub fn new(condition: WinCondition) -> Self {
        Self {
            condition,
            shown: false,
        }
    }

    pub fn condition(&self) -> WinCondition {
        self.condition
    }

    pub fn is_shown(&self) -> bool {
        self.shown
    }

    pub fn update(&mut self, progress: &ProgressState) -> GateChange {
        let met = self.condition.is_met(progress);
        match (self.shown, met) {
            (false, true) => {
                self.shown = true;
                GateChange::Shown
            }
            (true, false) if self.condition.is_live() => {
                self.shown = false;
                GateChange::Hidden
            }
            _ => GateChange::Unchanged,
        }
    }

    pub fn reset(&mut self) {
        self.shown = false;
    }
}
