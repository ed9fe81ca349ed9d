//! Placed entities and the command stream that mirrors them into the 3D
//! engine.
//!
//! The session never touches the renderer. It edits [`EntityStore`], which
//! queues [`SceneCommand`]s; the front-end drains and applies them once per
//! frame.

use fnv::FnvHashMap;
use glam::Vec3;

use crate::assets::AssetRequest;
use crate::geometry::{ray_sphere, GroundSurface, Ray, Transform};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityKey(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PathChoice {
    Natural,
    Polluted,
}

/// What an entity is for, from the node's point of view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityRole {
    Ground,
    Avatar,
    /// Alternate avatar model swapped in by the trust encounter.
    AvatarAlt,
    Holt,
    Obstacle,
    Food(usize),
    Trash(usize),
    NoiseRipple(usize),
    ExitMarker,
    PuzzlePiece(usize),
    PuzzleTarget(usize),
    Choice(PathChoice),
    Bottle(usize),
    Tree(u32),
    Building(u32),
    /// Drifting particle cloud over the polluted path.
    Pollution,
}

/// How the engine should draw an entity.
#[derive(Clone, Debug, PartialEq)]
pub enum Visual {
    Model(AssetRequest),
    Ground {
        surface: GroundSurface,
        texture: Option<AssetRequest>,
    },
    /// Flat ring lying on the ground (exit markers, noise ripples).
    Ring {
        inner: f32,
        outer: f32,
        color: u32,
        opacity: f32,
    },
    /// Wireframe box outlining a puzzle slot.
    Outline { size: Vec3, color: u32 },
    /// Point cloud filling a box of `extent` centred on the transform; the
    /// engine lifts each point by up to `rise` before wrapping it back down.
    Particles {
        count: u32,
        color: u32,
        size: f32,
        opacity: f32,
        extent: Vec3,
        rise: f32,
    },
}

impl Visual {
    /// Procedural visuals are built synchronously by the engine.
    pub fn needs_load(&self) -> bool {
        matches!(self, Visual::Model(_) | Visual::Ground { .. })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlacedEntity {
    pub key: EntityKey,
    pub role: EntityRole,
    pub visual: Visual,
    pub transform: Transform,
    pub visible: bool,
    pub opacity: f32,
    pub loaded: bool,
    /// Tappable entities carry a pick-sphere radius.
    pub pick_radius: Option<f32>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SceneCommand {
    Spawn {
        key: EntityKey,
        visual: Visual,
        transform: Transform,
        visible: bool,
    },
    SetTransform {
        key: EntityKey,
        transform: Transform,
    },
    SetVisible {
        key: EntityKey,
        visible: bool,
    },
    SetOpacity {
        key: EntityKey,
        opacity: f32,
    },
    Despawn {
        key: EntityKey,
    },
}

#[derive(Debug, Default)]
pub struct EntityStore {
    next: u32,
    entities: FnvHashMap<EntityKey, PlacedEntity>,
    commands: Vec<SceneCommand>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, role: EntityRole, visual: Visual, transform: Transform) -> EntityKey {
        self.spawn_with(role, visual, transform, None, true)
    }

    pub fn spawn_with(
        &mut self,
        role: EntityRole,
        visual: Visual,
        transform: Transform,
        pick_radius: Option<f32>,
        visible: bool,
    ) -> EntityKey {
        self.next += 1;
        let key = EntityKey(self.next);
        let loaded = !visual.needs_load();
        self.commands.push(SceneCommand::Spawn {
            key,
            visual: visual.clone(),
            transform,
            visible,
        });
        self.entities.insert(
            key,
            PlacedEntity {
                key,
                role,
                visual,
                transform,
                visible,
                opacity: 1.0,
                loaded,
                pick_radius,
            },
        );
        key
    }

    pub fn get(&self, key: EntityKey) -> Option<&PlacedEntity> {
        self.entities.get(&key)
    }

    pub fn contains(&self, key: EntityKey) -> bool {
        self.entities.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn find(&self, role: EntityRole) -> Option<EntityKey> {
        self.entities
            .values()
            .find(|e| e.role == role)
            .map(|e| e.key)
    }

    pub fn keys_where(&self, mut pred: impl FnMut(&EntityRole) -> bool) -> Vec<EntityKey> {
        let mut keys: Vec<_> = self
            .entities
            .values()
            .filter(|e| pred(&e.role))
            .map(|e| e.key)
            .collect();
        keys.sort();
        keys
    }

    /// Mark an entity's asset as resolved. Returns `false` when the entity
    /// has already been despawned.
    pub fn mark_loaded(&mut self, key: EntityKey) -> bool {
        match self.entities.get_mut(&key) {
            Some(e) => {
                e.loaded = true;
                true
            }
            None => false,
        }
    }

    pub fn set_transform(&mut self, key: EntityKey, transform: Transform) {
        if let Some(e) = self.entities.get_mut(&key) {
            if e.transform != transform {
                e.transform = transform;
                self.commands
                    .push(SceneCommand::SetTransform { key, transform });
            }
        }
    }

    pub fn set_position(&mut self, key: EntityKey, position: Vec3) {
        if let Some(t) = self.get(key).map(|e| e.transform) {
            self.set_transform(key, Transform { position, ..t });
        }
    }

    pub fn set_visible(&mut self, key: EntityKey, visible: bool) {
        if let Some(e) = self.entities.get_mut(&key) {
            if e.visible != visible {
                e.visible = visible;
                self.commands.push(SceneCommand::SetVisible { key, visible });
            }
        }
    }

    pub fn set_opacity(&mut self, key: EntityKey, opacity: f32) {
        if let Some(e) = self.entities.get_mut(&key) {
            if (e.opacity - opacity).abs() > f32::EPSILON {
                e.opacity = opacity;
                self.commands.push(SceneCommand::SetOpacity { key, opacity });
            }
        }
    }

    pub fn despawn(&mut self, key: EntityKey) -> bool {
        if self.entities.remove(&key).is_some() {
            self.commands.push(SceneCommand::Despawn { key });
            true
        } else {
            false
        }
    }

    pub fn despawn_where(&mut self, pred: impl FnMut(&EntityRole) -> bool) {
        for key in self.keys_where(pred) {
            self.despawn(key);
        }
    }

    pub fn clear(&mut self) {
        self.despawn_where(|_| true);
    }

    /// Nearest visible, tappable entity hit by the ray.
    pub fn pick(&self, ray: &Ray, mut filter: impl FnMut(&EntityRole) -> bool) -> Option<EntityKey> {
        let mut best: Option<(EntityKey, f32)> = None;
        for e in self.entities.values() {
            let Some(radius) = e.pick_radius else {
                continue;
            };
            if !e.visible || !filter(&e.role) {
                continue;
            }
            if let Some(t) = ray_sphere(ray.origin, ray.direction, e.transform.position, radius) {
                match best {
                    Some((_, bt)) if t >= bt => {}
                    _ => best = Some((e.key, t)),
                }
            }
        }
        best.map(|(k, _)| k)
    }

    pub fn drain_commands(&mut self) -> Vec<SceneCommand> {
        std::mem::take(&mut self.commands)
    }
}
