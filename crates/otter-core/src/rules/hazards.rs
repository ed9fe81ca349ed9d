//! Nodes where the otter has to find a way past trouble to an exit ring:
//! litter that traps it, and city noise it should stay out of.

use fnv::FnvHashSet;
use glam::{Vec2, Vec3};
use rand::Rng;

use crate::constants::{GROUND_SIZE, RIPPLE_GROWTH_PER_SEC, RIPPLE_MAX_SCALE, RIPPLE_MIN_SCALE};
use crate::entity::{EntityKey, EntityRole, Visual};
use crate::geometry::{Ray, Transform};
use crate::nodes::{NoiseRules, TrashRules};
use crate::session::{AudioCue, NodeContext, Timed};
use crate::zones::{clear_of, FiredEffect, SampleRect, TriggerZone, ZoneId, ZoneKind};

use super::NodeRule;

pub struct Trash {
    params: &'static TrashRules,
    litter: Vec<(EntityKey, ZoneId)>,
    exit: Option<ZoneId>,
    stuck_in: Option<ZoneId>,
    out: bool,
}

impl Trash {
    pub fn new(params: &'static TrashRules) -> Self {
        Self {
            params,
            litter: Vec::new(),
            exit: None,
            stuck_in: None,
            out: false,
        }
    }
}

impl NodeRule for Trash {
    fn populate(&mut self, ctx: &mut NodeContext) {
        let p = self.params;
        let origin = ctx.origin_point();
        let rect = SampleRect::around(origin, p.scatter_x, p.scatter_z);
        for i in 0..p.count {
            let xz = ctx.sampler.uniform(rect);
            let at = Vec3::new(xz.x, origin.y, xz.y);
            let key = ctx.spawn(
                EntityRole::Trash(i),
                Visual::Model(p.model),
                Transform::at(at).with_scale(p.scale),
                None,
                true,
            );
            let zone = ctx.zones.register(TriggerZone::new(
                "trash",
                at,
                p.hazard_radius,
                ZoneKind::Hazard {
                    blocks_movement: true,
                },
            ));
            self.litter.push((key, zone));
        }

        let exit_at = origin + p.exit_offset;
        ctx.spawn(
            EntityRole::ExitMarker,
            Visual::Ring {
                inner: 0.12,
                outer: 0.18,
                color: 0x00ff00,
                opacity: 1.0,
            },
            Transform::at(exit_at),
            None,
            true,
        );
        self.exit = Some(ctx.zones.register(TriggerZone::new(
            "clean water",
            exit_at,
            p.exit_radius,
            ZoneKind::Exit,
        )));
    }

    fn on_tap(&mut self, ctx: &mut NodeContext, ray: &Ray) {
        if !self.out {
            ctx.steer(ray);
        }
    }

    fn on_asset_failed(&mut self, ctx: &mut NodeContext, key: EntityKey) {
        if let Some(i) = self.litter.iter().position(|(k, _)| *k == key) {
            let (_, zone) = self.litter.remove(i);
            ctx.zones.unregister(zone);
            if self.stuck_in == Some(zone) {
                self.stuck_in = None;
            }
        }
    }

    fn on_zone(&mut self, ctx: &mut NodeContext, effect: FiredEffect) {
        if self.out {
            return;
        }
        match effect {
            FiredEffect::HazardActive {
                zone,
                blocking: true,
            } if self.stuck_in != Some(zone) => {
                log::info!("[trash] otter caught in litter");
                self.stuck_in = Some(zone);
                ctx.show_warning(self.params.warning);
                ctx.retry = Some(self.params.retry_label);
            }
            FiredEffect::HazardCleared { zone } if self.stuck_in == Some(zone) => {
                self.stuck_in = None;
            }
            FiredEffect::ExitReached { zone } if Some(zone) == self.exit => {
                self.out = true;
                ctx.avatar.stop();
                ctx.progress.exit_reached = true;
            }
            _ => {}
        }
    }
}

const NOISE_RING: Visual = Visual::Ring {
    inner: 0.2,
    outer: 0.4,
    color: 0xff0000,
    opacity: 0.4,
};

pub struct Noise {
    params: &'static NoiseRules,
    pulsing: Vec<EntityKey>,
    exit: Option<ZoneId>,
    inside: FnvHashSet<ZoneId>,
    scale: f32,
    out: bool,
}

impl Noise {
    pub fn new(params: &'static NoiseRules) -> Self {
        Self {
            params,
            pulsing: Vec::new(),
            exit: None,
            inside: FnvHashSet::default(),
            scale: RIPPLE_MIN_SCALE,
            out: false,
        }
    }

    fn quiet(&mut self, ctx: &mut NodeContext) {
        if !self.inside.is_empty() {
            self.inside.clear();
            ctx.play(AudioCue::LoopStop(self.params.noise_audio));
        }
        ctx.warning = None;
    }
}

impl NodeRule for Noise {
    fn populate(&mut self, ctx: &mut NodeContext) {
        let p = self.params;
        let origin = ctx.origin_point();
        let lift = Vec3::Y * 0.01;
        let rect = SampleRect::around(origin, p.scatter_x, p.scatter_z);

        let mut sources = Vec::with_capacity(p.count);
        for i in 0..p.count {
            let xz = ctx.sampler.uniform(rect);
            let at = Vec3::new(xz.x, origin.y, xz.y) + lift;
            self.pulsing.push(ctx.spawn(
                EntityRole::NoiseRipple(i),
                NOISE_RING,
                Transform::at(at),
                None,
                true,
            ));
            ctx.zones.register(TriggerZone::new(
                "noise",
                at,
                p.noise_radius,
                ZoneKind::Hazard {
                    blocks_movement: false,
                },
            ));
            sources.push(xz);
        }

        let half = ctx
            .ground
            .map(|g| g.half_extent())
            .unwrap_or(GROUND_SIZE * 0.5);
        let (xz, clear) = ctx.sampler.sample_with(
            |rng| {
                let side = if rng.gen::<bool>() { 1.0 } else { -1.0 };
                let x = (origin.x + side * p.exit_dx).clamp(origin.x - half, origin.x + half);
                Vec2::new(x, origin.z + p.exit_dz)
            },
            |c| clear_of(c, &sources, p.exit_clearance),
        );
        if !clear {
            log::warn!("[noise] exit placed within {} of a noise source", p.exit_clearance);
        }
        let exit_at = Vec3::new(xz.x, origin.y, xz.y) + lift;
        self.pulsing.push(ctx.spawn(
            EntityRole::ExitMarker,
            Visual::Ring {
                inner: 0.25,
                outer: 0.5,
                color: 0x00ff00,
                opacity: 0.4,
            },
            Transform::at(exit_at),
            None,
            true,
        ));
        self.exit = Some(ctx.zones.register(TriggerZone::new(
            "quiet spot",
            exit_at,
            p.exit_radius,
            ZoneKind::Exit,
        )));
    }

    fn on_tap(&mut self, ctx: &mut NodeContext, ray: &Ray) {
        if !self.out {
            ctx.steer(ray);
        }
    }

    fn ripple_scale(&self) -> Option<f32> {
        Some(self.scale)
    }

    fn animate(&mut self, ctx: &mut NodeContext, dt: f32) {
        self.scale += dt * RIPPLE_GROWTH_PER_SEC;
        if self.scale > RIPPLE_MAX_SCALE {
            self.scale = RIPPLE_MIN_SCALE;
        }
        for key in &self.pulsing {
            if let Some(t) = ctx.entities.get(*key).map(|e| e.transform) {
                ctx.entities.set_transform(*key, t.with_scale(self.scale));
            }
        }
    }

    fn on_zone(&mut self, ctx: &mut NodeContext, effect: FiredEffect) {
        if self.out {
            return;
        }
        match effect {
            FiredEffect::HazardActive { zone, .. } => {
                if self.inside.insert(zone) && self.inside.len() == 1 {
                    log::debug!("[noise] entered noisy zone");
                    ctx.play(AudioCue::LoopStart(self.params.noise_audio));
                }
                ctx.warning = Some(Timed::sticky(self.params.warning));
            }
            FiredEffect::HazardCleared { zone } => {
                if self.inside.remove(&zone) && self.inside.is_empty() {
                    ctx.play(AudioCue::LoopStop(self.params.noise_audio));
                    ctx.warning = None;
                }
            }
            FiredEffect::ExitReached { zone } if Some(zone) == self.exit => {
                self.out = true;
                self.quiet(ctx);
                ctx.avatar.stop();
                ctx.progress.exit_reached = true;
            }
            _ => {}
        }
    }
}
