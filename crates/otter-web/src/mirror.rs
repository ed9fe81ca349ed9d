//! Applies the session's [`SceneCommand`]s to the engine.
//!
//! Model and ground spawns load asynchronously. Until a load lands the
//! mirror only records the latest transform, visibility and opacity, then
//! replays them onto the object when it is attached. Loads for entities
//! despawned in the meantime are dropped.

use std::cell::RefCell;
use std::rc::Rc;

use fnv::FnvHashMap;
use otter_core::assets::{AssetRequest, AssetSource};
use otter_core::entity::{EntityKey, SceneCommand, Visual};
use otter_core::geometry::{GroundSurface, Transform};
use otter_core::session::NodeSession;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::spawn_local;

use crate::assets::EngineAssets;
use crate::bridge::OtterEngine;

#[derive(Clone, Copy, Debug)]
struct Mirrored {
    transform: Transform,
    visible: bool,
    opacity: f32,
    attached: bool,
}

pub struct SceneMirror {
    engine: OtterEngine,
    assets: Rc<EngineAssets>,
    session: Rc<RefCell<NodeSession>>,
    entities: Rc<RefCell<FnvHashMap<EntityKey, Mirrored>>>,
}

impl SceneMirror {
    pub fn new(engine: OtterEngine, session: Rc<RefCell<NodeSession>>) -> Self {
        Self {
            assets: Rc::new(EngineAssets::new(engine.clone())),
            engine,
            session,
            entities: Rc::new(RefCell::new(FnvHashMap::default())),
        }
    }

    pub fn apply(&self, commands: Vec<SceneCommand>) {
        for command in commands {
            match command {
                SceneCommand::Spawn {
                    key,
                    visual,
                    transform,
                    visible,
                } => self.spawn(key, visual, transform, visible),
                SceneCommand::SetTransform { key, transform } => {
                    if let Some(m) = self.entities.borrow_mut().get_mut(&key) {
                        m.transform = transform;
                        if m.attached {
                            self.engine.apply_transform(key.0, &transform);
                        }
                    }
                }
                SceneCommand::SetVisible { key, visible } => {
                    if let Some(m) = self.entities.borrow_mut().get_mut(&key) {
                        m.visible = visible;
                        if m.attached {
                            self.engine.set_visible(key.0, visible);
                        }
                    }
                }
                SceneCommand::SetOpacity { key, opacity } => {
                    if let Some(m) = self.entities.borrow_mut().get_mut(&key) {
                        m.opacity = opacity;
                        if m.attached {
                            self.engine.set_opacity(key.0, opacity);
                        }
                    }
                }
                SceneCommand::Despawn { key } => {
                    if let Some(m) = self.entities.borrow_mut().remove(&key) {
                        if m.attached {
                            self.engine.remove(key.0);
                        }
                    }
                }
            }
        }
    }

    fn spawn(&self, key: EntityKey, visual: Visual, transform: Transform, visible: bool) {
        self.entities.borrow_mut().insert(
            key,
            Mirrored {
                transform,
                visible,
                opacity: 1.0,
                attached: false,
            },
        );
        match visual {
            Visual::Model(request) => self.load_model(key, request),
            Visual::Ground { surface, texture } => self.load_ground(key, surface, texture),
            Visual::Ring {
                inner,
                outer,
                color,
                opacity,
            } => {
                self.engine.add_ring(key.0, inner, outer, color, opacity);
                attach(&self.engine, &self.entities, key);
            }
            Visual::Outline { size, color } => {
                self.engine.add_outline(key.0, &size.to_array(), color);
                attach(&self.engine, &self.entities, key);
            }
            Visual::Particles {
                count,
                color,
                size,
                opacity,
                extent,
                rise,
            } => {
                self.engine
                    .add_particles(key.0, count, color, size, opacity, &extent.to_array(), rise);
                attach(&self.engine, &self.entities, key);
            }
        }
    }

    fn load_model(&self, key: EntityKey, request: AssetRequest) {
        let engine = self.engine.clone();
        let assets = self.assets.clone();
        let session = self.session.clone();
        let entities = self.entities.clone();
        spawn_local(async move {
            let result = assets.load(&request).await;
            if !entities.borrow().contains_key(&key) {
                log::debug!("[mirror] {:?} despawned before {} loaded", key, request.path);
                return;
            }
            let ok = match result {
                Ok(asset) => {
                    engine.add_object(key.0, &asset.root);
                    if let Some(clip) = asset.animations.first() {
                        engine.play_animation(key.0, clip);
                    }
                    attach(&engine, &entities, key);
                    true
                }
                Err(e) => {
                    log::warn!("[mirror] skipping {:?}: {}", key, e);
                    entities.borrow_mut().remove(&key);
                    false
                }
            };
            session.borrow_mut().asset_settled(key, ok);
        });
    }

    /// The sheet is built even when its texture fails; it is just left
    /// untextured.
    fn load_ground(&self, key: EntityKey, surface: GroundSurface, texture: Option<AssetRequest>) {
        let engine = self.engine.clone();
        let assets = self.assets.clone();
        let session = self.session.clone();
        let entities = self.entities.clone();
        spawn_local(async move {
            let (handle, ok) = match texture {
                Some(request) => match assets.load(&request).await {
                    Ok(asset) => (asset.root, true),
                    Err(e) => {
                        log::warn!("[mirror] ground left untextured: {}", e);
                        (JsValue::NULL, false)
                    }
                },
                None => (JsValue::NULL, true),
            };
            if !entities.borrow().contains_key(&key) {
                return;
            }
            let vertices: Vec<f32> = surface
                .local_vertices()
                .iter()
                .flat_map(|v| v.to_array())
                .collect();
            engine.add_ground(key.0, &vertices, surface.segments.max(1), surface.size, &handle);
            attach(&engine, &entities, key);
            session.borrow_mut().asset_settled(key, ok);
        });
    }
}

/// Push the recorded state onto a freshly added object.
fn attach(engine: &OtterEngine, entities: &RefCell<FnvHashMap<EntityKey, Mirrored>>, key: EntityKey) {
    if let Some(m) = entities.borrow_mut().get_mut(&key) {
        m.attached = true;
        engine.apply_transform(key.0, &m.transform);
        engine.set_visible(key.0, m.visible);
        if m.opacity < 1.0 {
            engine.set_opacity(key.0, m.opacity);
        }
    }
}
