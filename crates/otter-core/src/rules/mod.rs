//! Per-node behaviour on top of the shared session loop.
//!
//! Each node type implements [`NodeRule`]; every hook has a no-op default so
//! a rule only spells out the events it cares about.

mod balance;
mod feeding;
mod hazards;
mod journey;
mod obstacle;
mod path;
mod rebuild;
mod trust;

use std::ops::{Deref, DerefMut};

pub use balance::Balance;
pub use feeding::Feeding;
pub use hazards::{Noise, Trash};
pub use journey::{HoltRelease, ReturnHome};
pub use obstacle::Obstacle;
pub use path::{PathChoiceNode, PathStage};
pub use rebuild::Rebuild;
pub use trust::Trust;

use crate::entity::EntityKey;
use crate::error::PuzzleError;
use crate::geometry::Ray;
use crate::nodes::{NodeConfig, NodeRules};
use crate::session::{NodeContext, ResetKind};
use crate::ui::{ActionButton, UiAction};
use crate::zones::FiredEffect;

pub trait NodeRule {
    /// Whether the session places the otter at the placement pose.
    fn places_avatar(&self) -> bool {
        true
    }

    /// Spawn the node's own content right after placement.
    fn populate(&mut self, ctx: &mut NodeContext);

    /// Required assets have settled and the node is live.
    fn on_activate(&mut self, _ctx: &mut NodeContext) {}

    fn on_tap(&mut self, _ctx: &mut NodeContext, _ray: &Ray) {}

    /// Returns `true` when the pointer grabbed something.
    fn on_pointer_down(&mut self, _ctx: &mut NodeContext, _ray: &Ray) -> Result<bool, PuzzleError> {
        Ok(false)
    }

    fn on_pointer_move(&mut self, _ctx: &mut NodeContext, _ray: &Ray) {}

    fn on_pointer_up(&mut self, _ctx: &mut NodeContext) {}

    fn on_ui(&mut self, _ctx: &mut NodeContext, _action: UiAction) {}

    /// Runs before the avatar moves.
    fn animate(&mut self, _ctx: &mut NodeContext, _dt: f32) {}

    fn on_arrived(&mut self, _ctx: &mut NodeContext) {}

    fn on_despawned(&mut self, _ctx: &mut NodeContext) {}

    fn on_zone(&mut self, _ctx: &mut NodeContext, _effect: FiredEffect) {}

    /// The model behind `key` failed to load and the entity is already gone.
    fn on_asset_failed(&mut self, _ctx: &mut NodeContext, _key: EntityKey) {}

    /// Runs after zones have been evaluated.
    fn update(&mut self, _ctx: &mut NodeContext, _dt: f32) {}

    fn on_narration_done(&mut self, _ctx: &mut NodeContext) {}

    fn reset_kind(&self) -> ResetKind {
        ResetKind::Full
    }

    /// Rebuild content for a [`ResetKind::Repopulate`] retry.
    fn repopulate(&mut self, _ctx: &mut NodeContext) {}

    fn ripple_scale(&self) -> Option<f32> {
        None
    }

    /// Extra buttons while the node is running.
    fn actions(&self) -> Vec<ActionButton> {
        Vec::new()
    }
}

pub enum RuleState {
    HoltRelease(HoltRelease),
    PathChoice(PathChoiceNode),
    Feeding(Feeding),
    Trust(Trust),
    Obstacle(Obstacle),
    Trash(Trash),
    Noise(Noise),
    Rebuild(Rebuild),
    Balance(Balance),
    ReturnHome(ReturnHome),
}

impl RuleState {
    pub fn for_config(config: &'static NodeConfig) -> Self {
        match &config.rules {
            NodeRules::HoltRelease(p) => RuleState::HoltRelease(HoltRelease::new(p)),
            NodeRules::PathChoice(p) => RuleState::PathChoice(PathChoiceNode::new(p)),
            NodeRules::Feeding(p) => RuleState::Feeding(Feeding::new(p)),
            NodeRules::Trust(p) => RuleState::Trust(Trust::new(p)),
            NodeRules::Obstacle(p) => RuleState::Obstacle(Obstacle::new(p)),
            NodeRules::Trash(p) => RuleState::Trash(Trash::new(p)),
            NodeRules::Noise(p) => RuleState::Noise(Noise::new(p)),
            NodeRules::Puzzle(p) => RuleState::Rebuild(Rebuild::new(p)),
            NodeRules::Balance(p) => RuleState::Balance(Balance::new(p)),
            NodeRules::ReturnHome(p) => RuleState::ReturnHome(ReturnHome::new(p)),
        }
    }
}

impl Deref for RuleState {
    type Target = dyn NodeRule;

    fn deref(&self) -> &Self::Target {
        match self {
            RuleState::HoltRelease(r) => r,
            RuleState::PathChoice(r) => r,
            RuleState::Feeding(r) => r,
            RuleState::Trust(r) => r,
            RuleState::Obstacle(r) => r,
            RuleState::Trash(r) => r,
            RuleState::Noise(r) => r,
            RuleState::Rebuild(r) => r,
            RuleState::Balance(r) => r,
            RuleState::ReturnHome(r) => r,
        }
    }
}

impl DerefMut for RuleState {
    fn deref_mut(&mut self) -> &mut Self::Target {
        match self {
            RuleState::HoltRelease(r) => r,
            RuleState::PathChoice(r) => r,
            RuleState::Feeding(r) => r,
            RuleState::Trust(r) => r,
            RuleState::Obstacle(r) => r,
            RuleState::Trash(r) => r,
            RuleState::Noise(r) => r,
            RuleState::Rebuild(r) => r,
            RuleState::Balance(r) => r,
            RuleState::ReturnHome(r) => r,
        }
    }
}
