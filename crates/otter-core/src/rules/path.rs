//! Fork in the river: a slow natural path or a fast polluted one.

use glam::Vec3;

use crate::entity::{EntityKey, EntityRole, PathChoice, Visual};
use crate::geometry::{Pose, Ray, Transform};
use crate::nodes::{ChoiceSpec, PathChoiceRules, BOTTLE_MODEL};
use crate::session::{AudioCue, NodeContext, ResetKind};

use super::NodeRule;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PathStage {
    /// Walking up to the fork while the narration plays.
    Approaching,
    Choosing,
    Chosen(PathChoice),
}

pub struct PathChoiceNode {
    params: &'static PathChoiceRules,
    stage: PathStage,
    start: Vec3,
    walked: bool,
    narrated: bool,
    choices: Vec<EntityKey>,
    bottles: Vec<(EntityKey, Vec3)>,
    pollution: Option<EntityKey>,
}

impl PathChoiceNode {
    pub fn new(params: &'static PathChoiceRules) -> Self {
        Self {
            params,
            stage: PathStage::Approaching,
            start: Vec3::ZERO,
            walked: false,
            narrated: false,
            choices: Vec::new(),
            bottles: Vec::new(),
            pollution: None,
        }
    }

    pub fn stage(&self) -> PathStage {
        self.stage
    }

    fn maybe_offer(&mut self, ctx: &mut NodeContext) {
        if self.stage == PathStage::Approaching && self.walked && self.narrated {
            self.offer(ctx);
            ctx.set_prompt(self.params.choose_prompt, None);
        }
    }

    fn offer(&mut self, ctx: &mut NodeContext) {
        let base = ctx.avatar.position();
        for spec in &self.params.choices {
            let at = base + Vec3::new(spec.offset_x, 0.0, -self.params.choice_ahead);
            self.choices.push(ctx.spawn(
                EntityRole::Choice(spec.choice),
                Visual::Model(spec.model),
                Transform::at(at).with_scale(spec.scale),
                Some(self.params.pick_size),
                true,
            ));
        }
        self.stage = PathStage::Choosing;
    }

    fn choose(&mut self, ctx: &mut NodeContext, spec: &ChoiceSpec) {
        log::info!("[path] chose {:?}", spec.choice);
        for key in self.choices.drain(..) {
            ctx.entities.despawn(key);
        }
        self.stage = PathStage::Chosen(spec.choice);
        ctx.prompt = None;
        ctx.response = Some(spec.response);
        ctx.retry = Some(self.params.retry_label);
        ctx.progress.path_choice = Some(spec.choice);
        ctx.play(AudioCue::Clip(spec.audio));

        let here = ctx.avatar.position();
        match spec.choice {
            PathChoice::Natural => {
                let ahead = here - Vec3::Z * self.params.stroll_distance;
                if let Err(e) = ctx.avatar.command_target(ahead) {
                    log::warn!("[path] {}", e);
                }
            }
            PathChoice::Polluted => {
                for (i, (dx, dz)) in self.params.bottle_offsets.iter().enumerate() {
                    let at = here + Vec3::new(*dx, 0.05, *dz);
                    let key = ctx.spawn(
                        EntityRole::Bottle(i),
                        Visual::Model(BOTTLE_MODEL),
                        Transform::at(at).with_scale(self.params.bottle_scale),
                        None,
                        true,
                    );
                    self.bottles.push((key, at));
                }
                self.pollution = Some(ctx.spawn(
                    EntityRole::Pollution,
                    Visual::Particles {
                        count: self.params.pollution_particles,
                        color: 0x00ff00,
                        size: 0.02,
                        opacity: 0.35,
                        extent: Vec3::new(0.6, 0.4, 1.2),
                        rise: 1.0,
                    },
                    Transform::at(self.start + Vec3::Y * 0.2),
                    None,
                    true,
                ));
            }
        }
    }
}

impl NodeRule for PathChoiceNode {
    fn populate(&mut self, ctx: &mut NodeContext) {
        self.start = ctx.avatar.position();
    }

    fn on_activate(&mut self, ctx: &mut NodeContext) {
        match self.stage {
            PathStage::Approaching => {
                ctx.avatar.set_speed(self.params.walk_speed);
                let fork = self.start - Vec3::Z * self.params.walk_distance;
                if let Err(e) = ctx.avatar.command_target(fork) {
                    log::warn!("[path] {}", e);
                }
            }
            PathStage::Choosing => ctx.set_prompt(self.params.choose_prompt, None),
            PathStage::Chosen(_) => {}
        }
    }

    fn on_tap(&mut self, ctx: &mut NodeContext, ray: &Ray) {
        if self.stage != PathStage::Choosing {
            return;
        }
        let picked = ctx
            .entities
            .pick(ray, |r| matches!(r, EntityRole::Choice(_)))
            .and_then(|k| ctx.entities.get(k))
            .map(|e| e.role);
        let Some(EntityRole::Choice(choice)) = picked else {
            return;
        };
        let params = self.params;
        if let Some(spec) = params.choices.iter().find(|c| c.choice == choice) {
            self.choose(ctx, spec);
        }
    }

    fn animate(&mut self, ctx: &mut NodeContext, _dt: f32) {
        if self.stage != PathStage::Chosen(PathChoice::Polluted) {
            return;
        }
        let t = ctx.elapsed * 2.0;
        for (i, (key, base)) in self.bottles.iter().enumerate() {
            let y = base.y + (t + i as f32).sin() * 0.01;
            ctx.entities.set_position(*key, Vec3::new(base.x, y, base.z));
        }
    }

    fn on_arrived(&mut self, ctx: &mut NodeContext) {
        if self.stage == PathStage::Approaching {
            self.walked = true;
            self.maybe_offer(ctx);
        }
    }

    fn on_asset_failed(&mut self, _ctx: &mut NodeContext, key: EntityKey) {
        self.choices.retain(|k| *k != key);
        self.bottles.retain(|(k, _)| *k != key);
    }

    fn on_narration_done(&mut self, ctx: &mut NodeContext) {
        self.narrated = true;
        self.maybe_offer(ctx);
    }

    fn reset_kind(&self) -> ResetKind {
        ResetKind::Repopulate
    }

    fn repopulate(&mut self, ctx: &mut NodeContext) {
        for key in self.choices.drain(..) {
            ctx.entities.despawn(key);
        }
        for (key, _) in self.bottles.drain(..) {
            ctx.entities.despawn(key);
        }
        if let Some(key) = self.pollution.take() {
            ctx.entities.despawn(key);
        }
        ctx.avatar.reposition(&Pose::new(self.start));
        self.offer(ctx);
    }
}
