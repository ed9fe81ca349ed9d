//! A wall across the otter's path, knocked down a tap at a time.

use glam::Vec3;

use crate::entity::{EntityKey, EntityRole, Visual};
use crate::geometry::{Ray, Transform};
use crate::nodes::ObstacleRules;
use crate::session::NodeContext;
use crate::ui::Popup;

use super::NodeRule;

pub struct Obstacle {
    params: &'static ObstacleRules,
    wall: Option<EntityKey>,
    wall_at: Vec3,
}

impl Obstacle {
    pub fn new(params: &'static ObstacleRules) -> Self {
        Self {
            params,
            wall: None,
            wall_at: Vec3::ZERO,
        }
    }

    pub fn wall_position(&self) -> Option<Vec3> {
        self.wall.map(|_| self.wall_at)
    }

    fn clear(&mut self, ctx: &mut NodeContext) {
        if let Some(key) = self.wall.take() {
            ctx.entities.despawn(key);
        }
        log::info!("[obstacle] wall cleared");
        ctx.prompt = None;
        ctx.popup = Some(Popup::from_card(&self.params.impact));
        if let Err(e) = ctx.avatar.command_target(self.wall_at + self.params.walk_past) {
            log::warn!("[obstacle] {}", e);
        }
    }
}

impl NodeRule for Obstacle {
    /// A wall that never showed up is not in the way.
    fn on_asset_failed(&mut self, ctx: &mut NodeContext, key: EntityKey) {
        if self.wall == Some(key) {
            ctx.progress.obstacle_health = Some(0);
            self.clear(ctx);
        }
    }

    fn populate(&mut self, ctx: &mut NodeContext) {
        let forward = ctx.flat_forward();
        self.wall_at = ctx.avatar.position() + forward * self.params.distance + Vec3::Y * self.params.lift;
        let yaw = forward.x.atan2(forward.z);
        self.wall = Some(ctx.spawn(
            EntityRole::Obstacle,
            Visual::Model(self.params.model),
            Transform::at(self.wall_at)
                .with_yaw(yaw)
                .with_scale_xyz(self.params.scale),
            Some(self.params.pick_radius),
            true,
        ));
        ctx.progress.obstacle_health = Some(self.params.health);
    }

    fn on_tap(&mut self, ctx: &mut NodeContext, ray: &Ray) {
        let Some(wall) = self.wall else {
            return;
        };
        if ctx.entities.pick(ray, |r| *r == EntityRole::Obstacle) != Some(wall) {
            return;
        }
        match ctx.progress.hit_obstacle() {
            Some(0) => self.clear(ctx),
            Some(left) => log::debug!("[obstacle] hit, {} left", left),
            None => {}
        }
    }
}
