//! Trees on the left bank, buildings on the right; the otter needs more
//! green than concrete.

use glam::Vec3;

use crate::entity::{EntityRole, Visual};
use crate::geometry::Transform;
use crate::nodes::BalanceRules;
use crate::session::NodeContext;
use crate::ui::{ActionButton, UiAction};

use super::NodeRule;

pub struct Balance {
    params: &'static BalanceRules,
}

impl Balance {
    pub fn new(params: &'static BalanceRules) -> Self {
        Self { params }
    }

    /// Drop a tree (`side < 0`) or a building (`side > 0`) somewhere on that
    /// side of the otter.
    fn scatter(&self, ctx: &mut NodeContext, side: f32) -> Vec3 {
        let p = self.params;
        let origin = ctx.origin_point();
        let x = origin.x + side * (p.inner_x + ctx.sampler.unit() * p.spread_x);
        let z = origin.z + p.base_z.0 - ctx.sampler.unit() * p.base_z.1 - ctx.sampler.unit() * p.spread_z;
        Vec3::new(
            x.clamp(origin.x - p.bounds, origin.x + p.bounds),
            origin.y + p.lift,
            z.clamp(origin.z - p.bounds, origin.z + p.bounds),
        )
    }
}

impl NodeRule for Balance {
    fn populate(&mut self, _ctx: &mut NodeContext) {}

    fn on_ui(&mut self, ctx: &mut NodeContext, action: UiAction) {
        let (role, model, at) = match action {
            UiAction::AddTree => {
                ctx.progress.trees += 1;
                let at = self.scatter(ctx, -1.0);
                (EntityRole::Tree(ctx.progress.trees), self.params.tree, at)
            }
            UiAction::AddBuilding => {
                ctx.progress.buildings += 1;
                let at = self.scatter(ctx, 1.0);
                (EntityRole::Building(ctx.progress.buildings), self.params.building, at)
            }
            _ => return,
        };
        ctx.spawn(
            role,
            Visual::Model(model),
            Transform::at(at).with_scale(self.params.scale),
            None,
            true,
        );
        log::debug!(
            "[balance] trees={} buildings={} net={}",
            ctx.progress.trees,
            ctx.progress.buildings,
            ctx.progress.balance_net()
        );
    }

    fn actions(&self) -> Vec<ActionButton> {
        vec![
            ActionButton {
                label: "Add Tree",
                action: UiAction::AddTree,
            },
            ActionButton {
                label: "Add Building",
                action: UiAction::AddBuilding,
            },
        ]
    }
}
