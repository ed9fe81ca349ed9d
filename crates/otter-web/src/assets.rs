use js_sys::{Array, Reflect};
use otter_core::assets::{AssetKind, AssetRequest, AssetSource, LoadFuture, SceneAsset};
use otter_core::error::AssetError;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;

use crate::bridge::OtterEngine;
use crate::dom::describe;

/// Loads through the engine's model, texture and video loaders.
pub struct EngineAssets {
    engine: OtterEngine,
}

impl EngineAssets {
    pub fn new(engine: OtterEngine) -> Self {
        Self { engine }
    }
}

impl AssetSource for EngineAssets {
    type Handle = JsValue;

    fn load(&self, request: &AssetRequest) -> LoadFuture<'_, JsValue> {
        let request = *request;
        let promise = match request.kind {
            AssetKind::Model => self.engine.load_model(request.path),
            AssetKind::Texture => self.engine.load_texture(request.path),
            AssetKind::Video => self.engine.load_video(request.path),
        };
        Box::pin(async move {
            let loaded = JsFuture::from(promise).await.map_err(|e| AssetError::Fetch {
                path: request.path.to_string(),
                reason: describe(&e),
            })?;
            if request.kind != AssetKind::Model {
                return Ok(SceneAsset {
                    request,
                    root: loaded,
                    animations: Vec::new(),
                });
            }
            let root = Reflect::get(&loaded, &JsValue::from_str("root"))
                .ok()
                .filter(|v| !v.is_undefined() && !v.is_null())
                .ok_or_else(|| AssetError::Decode {
                    path: request.path.to_string(),
                    reason: "no scene root".to_string(),
                })?;
            let animations = Reflect::get(&loaded, &JsValue::from_str("animations"))
                .ok()
                .filter(Array::is_array)
                .map(|v| {
                    Array::from(&v)
                        .iter()
                        .filter_map(|name| name.as_string())
                        .collect()
                })
                .unwrap_or_default();
            Ok(SceneAsset {
                request,
                root,
                animations,
            })
        })
    }
}
