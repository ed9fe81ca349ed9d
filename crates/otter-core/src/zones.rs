//! Proximity trigger zones evaluated against the avatar every frame, plus the
//! rejection sampler used to lay them out.

use fnv::{FnvHashMap, FnvHashSet};
use glam::{Vec2, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use smallvec::SmallVec;

use crate::constants::MAX_PLACEMENT_ATTEMPTS;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ZoneId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZoneKind {
    /// Pick-up; `item` indexes the node's item table.
    Collect { item: usize },
    /// Re-fires every frame while occupied. Blocking hazards hold the avatar.
    Hazard { blocks_movement: bool },
    Exit,
    /// Snap slot for a puzzle piece; never fired by proximity.
    PuzzleTarget { piece: usize },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TriggerZone {
    pub name: &'static str,
    pub center: Vec3,
    pub radius: f32,
    pub kind: ZoneKind,
}

impl TriggerZone {
    pub fn new(name: &'static str, center: Vec3, radius: f32, kind: ZoneKind) -> Self {
        Self {
            name,
            center,
            radius,
            kind,
        }
    }

    #[inline]
    pub fn contains(&self, p: Vec3) -> bool {
        self.center.distance(p) < self.radius
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FiredEffect {
    Collected { zone: ZoneId, item: usize },
    HazardActive { zone: ZoneId, blocking: bool },
    HazardCleared { zone: ZoneId },
    ExitReached { zone: ZoneId },
}

pub type FiredEffects = SmallVec<[FiredEffect; 4]>;

#[derive(Debug, Default)]
pub struct TriggerZoneRegistry {
    next: u32,
    zones: FnvHashMap<ZoneId, TriggerZone>,
    occupied: FnvHashSet<ZoneId>,
    exits_fired: FnvHashSet<ZoneId>,
}

impl TriggerZoneRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, zone: TriggerZone) -> ZoneId {
        self.next += 1;
        let id = ZoneId(self.next);
        log::debug!("[zones] register {} {:?} r={}", zone.name, zone.kind, zone.radius);
        self.zones.insert(id, zone);
        id
    }

    pub fn unregister(&mut self, id: ZoneId) -> Option<TriggerZone> {
        self.occupied.remove(&id);
        self.exits_fired.remove(&id);
        self.zones.remove(&id)
    }

    pub fn get(&self, id: ZoneId) -> Option<&TriggerZone> {
        self.zones.get(&id)
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    pub fn clear(&mut self) {
        self.zones.clear();
        self.occupied.clear();
        self.exits_fired.clear();
    }

    /// Zones matching a predicate, in registration order.
    pub fn ids_where(&self, mut pred: impl FnMut(&TriggerZone) -> bool) -> Vec<ZoneId> {
        let mut ids: Vec<_> = self
            .zones
            .iter()
            .filter(|(_, z)| pred(z))
            .map(|(id, _)| *id)
            .collect();
        ids.sort();
        ids
    }

    pub fn centers_where(&self, pred: impl FnMut(&TriggerZone) -> bool) -> Vec<Vec3> {
        self.ids_where(pred)
            .into_iter()
            .filter_map(|id| self.zones.get(&id).map(|z| z.center))
            .collect()
    }

    /// Would a blocking hazard hold an avatar standing at `p`?
    pub fn blocking_hazard_at(&self, p: Vec3) -> bool {
        self.zones.values().any(|z| {
            matches!(z.kind, ZoneKind::Hazard { blocks_movement: true }) && z.contains(p)
        })
    }

    /// Is `p` inside the snap slot registered for `piece`?
    pub fn in_puzzle_target(&self, piece: usize, p: Vec3) -> bool {
        self.zones
            .values()
            .any(|z| z.kind == ZoneKind::PuzzleTarget { piece } && z.contains(p))
    }

    pub fn exit_fired(&self, id: ZoneId) -> bool {
        self.exits_fired.contains(&id)
    }

    /// Evaluate every zone against the avatar position. Collect zones are
    /// removed as they fire.
    pub fn evaluate(&mut self, avatar: Vec3) -> FiredEffects {
        let mut fired = FiredEffects::new();
        let mut ids: Vec<_> = self.zones.keys().copied().collect();
        ids.sort();

        for id in ids {
            let Some(zone) = self.zones.get(&id).copied() else {
                continue;
            };
            let inside = zone.contains(avatar);
            match zone.kind {
                ZoneKind::Collect { item } => {
                    if inside {
                        self.zones.remove(&id);
                        log::debug!("[zones] collected {} (item {})", zone.name, item);
                        fired.push(FiredEffect::Collected { zone: id, item });
                    }
                }
                ZoneKind::Hazard { blocks_movement } => {
                    if inside {
                        self.occupied.insert(id);
                        fired.push(FiredEffect::HazardActive {
                            zone: id,
                            blocking: blocks_movement,
                        });
                    } else if self.occupied.remove(&id) {
                        fired.push(FiredEffect::HazardCleared { zone: id });
                    }
                }
                ZoneKind::Exit => {
                    if inside && self.exits_fired.insert(id) {
                        log::debug!("[zones] exit {} reached", zone.name);
                        fired.push(FiredEffect::ExitReached { zone: id });
                    }
                }
                ZoneKind::PuzzleTarget { .. } => {}
            }
        }
        fired
    }
}

/// Axis-aligned XZ rectangle, in world coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SampleRect {
    pub min: Vec2,
    pub max: Vec2,
}

impl SampleRect {
    pub fn new(min_x: f32, max_x: f32, min_z: f32, max_z: f32) -> Self {
        Self {
            min: Vec2::new(min_x, min_z),
            max: Vec2::new(max_x, max_z),
        }
    }

    /// Rectangle given as offsets from `origin`.
    pub fn around(origin: Vec3, x: (f32, f32), z: (f32, f32)) -> Self {
        Self::new(origin.x + x.0, origin.x + x.1, origin.z + z.0, origin.z + z.1)
    }

    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    #[inline]
    pub fn clamp(&self, p: Vec2) -> Vec2 {
        p.clamp(self.min, self.max)
    }
}

/// Seeded rejection sampler for zone layouts. Candidates are XZ points
/// (`Vec2::y` is world z).
#[derive(Debug)]
pub struct PlacementSampler {
    rng: StdRng,
    max_attempts: usize,
}

impl PlacementSampler {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            max_attempts: MAX_PLACEMENT_ATTEMPTS,
        }
    }

    pub fn with_max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Uniform `[0, 1)` draw from the sampler's stream.
    pub fn unit(&mut self) -> f32 {
        self.rng.gen::<f32>()
    }

    /// Uniform point in `rect`, no constraints.
    pub fn uniform(&mut self, rect: SampleRect) -> Vec2 {
        let x = self.rng.gen_range(rect.min.x..=rect.max.x);
        let z = self.rng.gen_range(rect.min.y..=rect.max.y);
        Vec2::new(x, z)
    }

    /// Draw candidates until one is accepted. After `max_attempts` the last
    /// candidate is returned anyway, flagged `false`.
    pub fn sample_with(
        &mut self,
        mut generate: impl FnMut(&mut StdRng) -> Vec2,
        mut accept: impl FnMut(Vec2) -> bool,
    ) -> (Vec2, bool) {
        let mut candidate = generate(&mut self.rng);
        for attempt in 1..=self.max_attempts {
            if accept(candidate) {
                return (candidate, true);
            }
            if attempt == self.max_attempts {
                break;
            }
            candidate = generate(&mut self.rng);
        }
        log::debug!("[zones] placement exhausted, accepting {:?}", candidate);
        (candidate, false)
    }

    pub fn sample_in(&mut self, rect: SampleRect, accept: impl FnMut(Vec2) -> bool) -> (Vec2, bool) {
        self.sample_with(
            |rng| {
                Vec2::new(
                    rng.gen_range(rect.min.x..=rect.max.x),
                    rng.gen_range(rect.min.y..=rect.max.y),
                )
            },
            accept,
        )
    }
}

/// True when `p` keeps at least `min` from every point in `others` (XZ).
pub fn clear_of(p: Vec2, others: &[Vec2], min: f32) -> bool {
    others.iter().all(|o| o.distance(p) >= min)
}
