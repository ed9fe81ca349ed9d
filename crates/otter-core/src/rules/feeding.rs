//! Food scattered across the riverbed; the otter eats by swimming over it.

use std::f32::consts::TAU;

use glam::{Vec2, Vec3};

use crate::constants::{BOB_AMPLITUDE, BOB_RATE};
use crate::entity::{EntityKey, EntityRole, Visual};
use crate::geometry::{Ray, Transform};
use crate::nodes::{FeedingRules, FoodItem};
use crate::session::{AudioCue, NodeContext};
use crate::ui::Popup;
use crate::zones::{FiredEffect, SampleRect, TriggerZone, ZoneId, ZoneKind};

use super::NodeRule;

struct Food {
    key: EntityKey,
    zone: ZoneId,
    base: Vec3,
    phase: f32,
}

pub struct Feeding {
    params: &'static FeedingRules,
    foods: Vec<Option<Food>>,
}

impl Feeding {
    pub fn new(params: &'static FeedingRules) -> Self {
        Self {
            params,
            foods: Vec::new(),
        }
    }

    /// Items still waiting to be eaten.
    pub fn remaining(&self) -> usize {
        self.foods.iter().flatten().count()
    }

    /// World position of an uneaten item's resting point.
    pub fn food_position(&self, item: usize) -> Option<Vec3> {
        self.foods.get(item)?.as_ref().map(|f| f.base)
    }
}

fn food_popup(item: &FoodItem) -> Popup {
    Popup {
        title: item.name.to_string(),
        paragraphs: vec![item.info.to_string()],
        images: vec![item.image.to_string()],
        link: None,
        anchor: None,
    }
}

impl NodeRule for Feeding {
    fn populate(&mut self, ctx: &mut NodeContext) {
        let p = self.params;
        let origin = ctx.origin_point();
        let center = Vec2::new(origin.x, origin.z);
        let rect = SampleRect::around(origin, p.scatter_x, p.scatter_z);
        let bounds = SampleRect::around(
            origin,
            (-p.half_extent, p.half_extent),
            (-p.half_extent, p.half_extent),
        );

        ctx.progress.total_items = p.foods.len() as u32;
        for (i, item) in p.foods.iter().enumerate() {
            let (xz, ok) = ctx.sampler.sample_in(rect, |c| {
                c.distance(center) >= p.min_origin_distance && bounds.contains(c)
            });
            if !ok {
                log::warn!("[feeding] no clear spot for {}", item.name);
            }
            let base = Vec3::new(xz.x, origin.y, xz.y);
            let phase = ctx.sampler.unit() * TAU;
            let key = ctx.spawn(
                EntityRole::Food(i),
                Visual::Model(item.model),
                Transform::at(base).with_scale(item.scale),
                None,
                true,
            );
            let zone = ctx.zones.register(TriggerZone::new(
                item.name,
                base,
                p.collect_radius,
                ZoneKind::Collect { item: i },
            ));
            self.foods.push(Some(Food {
                key,
                zone,
                base,
                phase,
            }));
        }
    }

    fn on_tap(&mut self, ctx: &mut NodeContext, ray: &Ray) {
        ctx.steer(ray);
    }

    fn on_asset_failed(&mut self, ctx: &mut NodeContext, key: EntityKey) {
        let Some(food) = self
            .foods
            .iter_mut()
            .find(|f| f.as_ref().is_some_and(|f| f.key == key))
            .and_then(Option::take)
        else {
            return;
        };
        ctx.zones.unregister(food.zone);
        ctx.progress.total_items = ctx.progress.total_items.saturating_sub(1);
    }

    fn animate(&mut self, ctx: &mut NodeContext, _dt: f32) {
        let t = ctx.elapsed * BOB_RATE;
        for food in self.foods.iter().flatten() {
            let y = food.base.y + (t + food.phase).sin() * BOB_AMPLITUDE;
            ctx.entities
                .set_position(food.key, Vec3::new(food.base.x, y, food.base.z));
        }
    }

    fn on_zone(&mut self, ctx: &mut NodeContext, effect: FiredEffect) {
        let FiredEffect::Collected { item, .. } = effect else {
            return;
        };
        let Some(food) = self.foods.get_mut(item).and_then(Option::take) else {
            return;
        };
        ctx.entities.despawn(food.key);
        let count = ctx.progress.collect();
        log::info!("[feeding] ate item {} ({}/{})", item, count, ctx.progress.total_items);

        if let Some(info) = self.params.foods.get(item) {
            ctx.popup = Some(food_popup(info));
        }
        ctx.play(AudioCue::Element(self.params.find_sound));

        if ctx.progress.all_collected() {
            ctx.prompt = None;
            ctx.info_box = false;
            ctx.show_toast(self.params.toast);
        }
    }
}
