//! The first and last nodes: the otter leaves its holt, and comes back to it.

use std::f32::consts::PI;
use std::time::Duration;

use glam::Vec3;

use crate::constants::PICK_SPHERE_RADIUS;
use crate::entity::{EntityKey, EntityRole, Visual};
use crate::geometry::{Ray, Transform};
use crate::nodes::{HoltReleaseRules, ReturnHomeRules};
use crate::session::NodeContext;
use crate::zones::{FiredEffect, TriggerZone, ZoneId, ZoneKind};

use super::NodeRule;

const CONTINUE_RING: Visual = Visual::Ring {
    inner: 0.25,
    outer: 0.3,
    color: 0x00ff00,
    opacity: 1.0,
};

pub struct HoltRelease {
    params: &'static HoltReleaseRules,
    holt: Option<EntityKey>,
    holt_at: Vec3,
    exit: Option<ZoneId>,
    released: bool,
}

impl HoltRelease {
    pub fn new(params: &'static HoltReleaseRules) -> Self {
        Self {
            params,
            holt: None,
            holt_at: Vec3::ZERO,
            exit: None,
            released: false,
        }
    }

    fn release(&mut self, ctx: &mut NodeContext) {
        let at = self.holt_at;
        if let Err(e) = ctx.spawn_avatar(at) {
            log::warn!("[holt] {}", e);
            return;
        }
        self.released = true;
        log::info!("[holt] otter released");

        let exit_at = at + self.params.continue_offset;
        ctx.entities
            .spawn(EntityRole::ExitMarker, CONTINUE_RING, Transform::at(exit_at));
        self.exit = Some(ctx.zones.register(TriggerZone::new(
            "continue",
            exit_at,
            self.params.continue_radius,
            ZoneKind::Exit,
        )));

        match ctx.config.prompt {
            Some(p) => ctx.set_prompt(p.text, p.duration),
            None => ctx.prompt = None,
        }
        ctx.start_narration();
    }
}

impl NodeRule for HoltRelease {
    fn places_avatar(&self) -> bool {
        false
    }

    fn populate(&mut self, ctx: &mut NodeContext) {
        let at = ctx.origin_point() + self.params.holt_offset;
        self.holt_at = at;
        self.holt = Some(ctx.spawn(
            EntityRole::Holt,
            Visual::Model(self.params.holt),
            Transform::at(at)
                .with_yaw(PI)
                .with_scale(self.params.holt_scale),
            Some(PICK_SPHERE_RADIUS),
            true,
        ));
    }

    /// Without a holt to tap the otter comes straight out.
    fn on_asset_failed(&mut self, ctx: &mut NodeContext, key: EntityKey) {
        if self.holt == Some(key) && !self.released {
            self.holt = None;
            self.release(ctx);
        }
    }

    fn on_activate(&mut self, ctx: &mut NodeContext) {
        if !self.released {
            ctx.set_prompt(self.params.tap_holt_prompt, None);
        }
    }

    fn on_tap(&mut self, ctx: &mut NodeContext, ray: &Ray) {
        if self.released {
            ctx.steer(ray);
            return;
        }
        let picked = ctx.entities.pick(ray, |r| *r == EntityRole::Holt);
        if picked.is_some() && picked == self.holt {
            self.release(ctx);
        }
    }

    fn on_zone(&mut self, ctx: &mut NodeContext, effect: FiredEffect) {
        if let FiredEffect::ExitReached { zone } = effect {
            if Some(zone) == self.exit {
                ctx.progress.exit_reached = true;
            }
        }
    }
}

pub struct ReturnHome {
    params: &'static ReturnHomeRules,
    home: Option<ZoneId>,
}

impl ReturnHome {
    pub fn new(params: &'static ReturnHomeRules) -> Self {
        Self { params, home: None }
    }
}

impl NodeRule for ReturnHome {
    fn populate(&mut self, ctx: &mut NodeContext) {
        let at = ctx.origin_point() + self.params.holt_offset;
        ctx.spawn(
            EntityRole::Holt,
            Visual::Model(self.params.holt),
            Transform::at(at)
                .with_yaw(PI)
                .with_scale(self.params.holt_scale),
            None,
            true,
        );
        self.home = Some(ctx.zones.register(TriggerZone::new(
            "holt",
            at,
            self.params.home_radius,
            ZoneKind::Exit,
        )));
    }

    fn on_tap(&mut self, ctx: &mut NodeContext, ray: &Ray) {
        ctx.steer(ray);
    }

    fn on_zone(&mut self, ctx: &mut NodeContext, effect: FiredEffect) {
        let FiredEffect::ExitReached { zone } = effect else {
            return;
        };
        if Some(zone) != self.home {
            return;
        }
        log::info!("[holt] otter is home");
        ctx.prompt = None;
        if let Err(e) = ctx
            .avatar
            .fade_out_and_despawn(Duration::from_millis(self.params.fade_ms))
        {
            log::warn!("[holt] {}", e);
        }
    }

    fn on_despawned(&mut self, ctx: &mut NodeContext) {
        ctx.progress.journey_ended = true;
    }
}
