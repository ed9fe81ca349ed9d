//! The otter warms to a viewer who comes close and keeps still.

use glam::Vec3;

use crate::entity::{EntityKey, EntityRole, Visual};
use crate::nodes::TrustRules;
use crate::session::{AudioCue, NodeContext};
use crate::ui::Popup;

use super::NodeRule;

pub struct Trust {
    params: &'static TrustRules,
    alt: Option<EntityKey>,
    trusting: bool,
}

impl Trust {
    pub fn new(params: &'static TrustRules) -> Self {
        Self {
            params,
            alt: None,
            trusting: false,
        }
    }

    pub fn is_trusting(&self) -> bool {
        self.trusting
    }

    fn swap(&mut self, ctx: &mut NodeContext, trusting: bool) {
        self.trusting = trusting;
        let Some(alt) = self.alt else {
            return;
        };
        if let Some(key) = ctx.avatar_key {
            ctx.entities.set_visible(key, !trusting);
        }
        ctx.entities.set_transform(alt, ctx.avatar.transform());
        ctx.entities.set_visible(alt, trusting);
    }
}

impl NodeRule for Trust {
    fn on_asset_failed(&mut self, _ctx: &mut NodeContext, key: EntityKey) {
        if self.alt == Some(key) {
            self.alt = None;
        }
    }

    fn populate(&mut self, ctx: &mut NodeContext) {
        self.alt = Some(ctx.spawn(
            EntityRole::AvatarAlt,
            Visual::Model(self.params.trusting_model),
            ctx.avatar.transform(),
            None,
            false,
        ));
    }

    fn update(&mut self, ctx: &mut NodeContext, _dt: f32) {
        let Some(viewer) = ctx.viewer else {
            return;
        };
        if !ctx.avatar.is_placed() {
            return;
        }
        let at = ctx.avatar.position();
        let d = viewer.distance(at);

        if !self.trusting && d < self.params.near {
            log::info!("[trust] viewer close ({:.2}), otter trusts", d);
            self.swap(ctx, true);
            let anchor = at + Vec3::Y * self.params.popup_lift;
            ctx.popup = Some(Popup::from_card(&self.params.thought).anchored(anchor));
            ctx.prompt = None;
            ctx.play(AudioCue::Element(self.params.trust_audio));
        } else if self.trusting && d > self.params.far {
            log::info!("[trust] viewer left ({:.2})", d);
            self.swap(ctx, false);
            ctx.popup = None;
        }
    }
}
