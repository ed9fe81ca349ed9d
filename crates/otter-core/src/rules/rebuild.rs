//! Drag the scattered habitat pieces back into their slots; once the last
//! one locks the otter heads for the exit.

use glam::Vec3;

use crate::entity::{EntityKey, EntityRole, Visual};
use crate::error::PuzzleError;
use crate::geometry::{ray_sphere, Ray, Transform};
use crate::nodes::PuzzleRules;
use crate::puzzle::{arc_targets, DragPuzzle};
use crate::session::NodeContext;
use crate::zones::{TriggerZone, ZoneId, ZoneKind};

use super::NodeRule;

pub struct Rebuild {
    params: &'static PuzzleRules,
    puzzle: DragPuzzle,
    pieces: Vec<EntityKey>,
    slots: Vec<(EntityKey, ZoneId)>,
    exit_at: Vec3,
    heading_out: bool,
}

impl Rebuild {
    pub fn new(params: &'static PuzzleRules) -> Self {
        Self {
            params,
            puzzle: DragPuzzle::new([]),
            pieces: Vec::new(),
            slots: Vec::new(),
            exit_at: Vec3::ZERO,
            heading_out: false,
        }
    }

    pub fn puzzle(&self) -> &DragPuzzle {
        &self.puzzle
    }

    pub fn exit_position(&self) -> Vec3 {
        self.exit_at
    }

    fn piece_index(&self, key: EntityKey) -> Option<usize> {
        self.pieces.iter().position(|k| *k == key)
    }
}

impl NodeRule for Rebuild {
    fn populate(&mut self, ctx: &mut NodeContext) {
        let p = self.params;
        let origin = ctx.origin_point();
        let slots = arc_targets(
            origin + Vec3::Y * p.slot_lift,
            p.arc_radius,
            p.arc_start_deg,
            p.arc_end_deg,
            p.pieces.len(),
        );

        let layout: Vec<(Vec3, Vec3)> = slots
            .iter()
            .map(|t| (Vec3::new(t.x, origin.y + p.piece_lift, t.z + p.piece_start_dz), *t))
            .collect();

        for (i, slot) in slots.iter().enumerate() {
            let outline = ctx.spawn(
                EntityRole::PuzzleTarget(i),
                Visual::Outline {
                    size: Vec3::new(0.3, 0.02, 0.3),
                    color: 0xffffff,
                },
                Transform::at(*slot),
                None,
                true,
            );
            let zone = ctx.zones.register(TriggerZone::new(
                "slot",
                *slot,
                p.snap_radius,
                ZoneKind::PuzzleTarget { piece: i },
            ));
            self.slots.push((outline, zone));
        }
        for (i, (model, (start, _))) in p.pieces.iter().zip(&layout).enumerate() {
            self.pieces.push(ctx.spawn(
                EntityRole::PuzzlePiece(i),
                Visual::Model(*model),
                Transform::at(*start).with_scale(p.scale),
                Some(p.pick_radius),
                true,
            ));
        }
        self.puzzle = DragPuzzle::new(layout);

        self.exit_at = origin + p.exit_offset;
        ctx.spawn(
            EntityRole::ExitMarker,
            Visual::Ring {
                inner: 0.2,
                outer: 0.3,
                color: 0x00ff00,
                opacity: 0.5,
            },
            Transform::at(self.exit_at),
            None,
            true,
        );
    }

    fn on_pointer_down(&mut self, ctx: &mut NodeContext, ray: &Ray) -> Result<bool, PuzzleError> {
        let Some(key) = ctx
            .entities
            .pick(ray, |r| matches!(r, EntityRole::PuzzlePiece(_)))
        else {
            return Ok(false);
        };
        let (Some(index), Some(entity)) = (self.piece_index(key), ctx.entities.get(key)) else {
            return Ok(false);
        };
        let center = entity.transform.position;
        let t = ray_sphere(ray.origin, ray.direction, center, self.params.pick_radius).unwrap_or(0.0);
        self.puzzle.pointer_down(index, ray.at(t))?;
        log::debug!("[rebuild] grabbed piece {}", index);
        Ok(true)
    }

    fn on_pointer_move(&mut self, ctx: &mut NodeContext, ray: &Ray) {
        if self.puzzle.dragging().is_none() {
            return;
        }
        let Some(point) = ctx.ground_point(ray) else {
            return;
        };
        if let Some((index, position)) = self.puzzle.pointer_move(point) {
            if let Some(key) = self.pieces.get(index) {
                ctx.entities.set_position(*key, position);
            }
        }
    }

    fn on_pointer_up(&mut self, ctx: &mut NodeContext) {
        let zones = &ctx.zones;
        let Some(drop) = self
            .puzzle
            .release(|piece| zones.in_puzzle_target(piece.index, piece.position))
        else {
            return;
        };
        if let Some(key) = self.pieces.get(drop.index) {
            ctx.entities.set_position(*key, drop.position);
        }
        if drop.solved_now {
            ctx.progress.puzzle_solved = true;
            ctx.prompt = None;
            self.heading_out = true;
            if let Err(e) = ctx.avatar.command_target(self.exit_at) {
                log::warn!("[rebuild] {}", e);
            }
        }
    }

    /// A piece that never loaded leaves the puzzle along with its slot.
    fn on_asset_failed(&mut self, ctx: &mut NodeContext, key: EntityKey) {
        let Some(index) = self.piece_index(key) else {
            return;
        };
        if !self.puzzle.remove_piece(index) {
            return;
        }
        log::warn!("[rebuild] piece {} missing", index);
        if let Some((outline, zone)) = self.slots.get(index).copied() {
            ctx.entities.despawn(outline);
            ctx.zones.unregister(zone);
        }
    }

    fn on_arrived(&mut self, ctx: &mut NodeContext) {
        if self.heading_out {
            log::info!("[rebuild] otter reached the exit");
            ctx.progress.exit_reached = true;
        }
    }
}
