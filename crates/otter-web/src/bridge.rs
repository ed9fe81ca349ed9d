//! Bindings to the page's 3D engine, installed as `window.otterEngine`.
//!
//! The engine owns the renderer, camera, loaders and the WebXR session
//! plumbing (it calls back once per frame with the `XRFrame`). Objects are
//! addressed by the numeric [`EntityKey`](otter_core::EntityKey) the session
//! hands out; calls for unknown keys are ignored on the JS side.

use glam::Vec3;
use js_sys::{Array, Object, Promise, Reflect};
use otter_core::geometry::Transform;
use otter_core::scene::SceneConfig;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys as web;

use crate::constants::ENGINE_GLOBAL;
use crate::dom::js_err;

#[wasm_bindgen]
extern "C" {
    #[derive(Clone, Debug)]
    pub type OtterEngine;

    /// Lights, sky and renderer setup from [`scene_options`].
    #[wasm_bindgen(method, catch)]
    pub fn init(this: &OtterEngine, options: &JsValue) -> Result<(), JsValue>;

    /// Request an `immersive-ar` session; resolves to the `XRSession`.
    #[wasm_bindgen(method, js_name = startAr)]
    pub fn start_ar(
        this: &OtterEngine,
        required: &Array,
        optional: &Array,
        overlay_root: Option<&web::Element>,
    ) -> Promise;

    #[wasm_bindgen(method, js_name = referenceSpace)]
    pub fn reference_space(this: &OtterEngine) -> Option<web::XrReferenceSpace>;

    /// `callback(time, xrFrame | undefined)` before every render.
    #[wasm_bindgen(method, js_name = setAnimationLoop)]
    pub fn set_animation_loop(this: &OtterEngine, callback: Option<&js_sys::Function>);

    #[wasm_bindgen(method, js_name = viewProjection)]
    pub fn view_projection(this: &OtterEngine) -> Vec<f32>;

    #[wasm_bindgen(method)]
    pub fn resize(this: &OtterEngine, width: f64, height: f64, pixel_ratio: f64);

    // Loaders. Models resolve to `{ root, animations: string[] }`, textures
    // and videos to the texture object.
    #[wasm_bindgen(method, js_name = loadModel)]
    pub fn load_model(this: &OtterEngine, url: &str) -> Promise;

    #[wasm_bindgen(method, js_name = loadTexture)]
    pub fn load_texture(this: &OtterEngine, url: &str) -> Promise;

    #[wasm_bindgen(method, js_name = loadVideo)]
    pub fn load_video(this: &OtterEngine, url: &str) -> Promise;

    #[wasm_bindgen(method, js_name = playVideo)]
    pub fn play_video(this: &OtterEngine, url: &str) -> Promise;

    // Scene graph
    #[wasm_bindgen(method, js_name = addObject)]
    pub fn add_object(this: &OtterEngine, key: u32, root: &JsValue);

    /// Plane grid built from sheet-local vertices (row-major, `segments + 1`
    /// per row); the engine lays it flat.
    #[wasm_bindgen(method, js_name = addGround)]
    pub fn add_ground(this: &OtterEngine, key: u32, vertices: &[f32], segments: u32, size: f32, texture: &JsValue);

    #[wasm_bindgen(method, js_name = addRing)]
    pub fn add_ring(this: &OtterEngine, key: u32, inner: f32, outer: f32, color: u32, opacity: f32);

    #[wasm_bindgen(method, js_name = addOutline)]
    pub fn add_outline(this: &OtterEngine, key: u32, size: &[f32], color: u32);

    #[wasm_bindgen(method, js_name = addParticles)]
    pub fn add_particles(
        this: &OtterEngine,
        key: u32,
        count: u32,
        color: u32,
        size: f32,
        opacity: f32,
        extent: &[f32],
        rise: f32,
    );

    #[wasm_bindgen(method, js_name = playAnimation)]
    pub fn play_animation(this: &OtterEngine, key: u32, clip: &str);

    /// `position` xyz, `yaw` about +Y, `scale` xyz.
    #[wasm_bindgen(method, js_name = setTransform)]
    pub fn set_transform(this: &OtterEngine, key: u32, position: &[f32], yaw: f32, scale: &[f32]);

    #[wasm_bindgen(method, js_name = setVisible)]
    pub fn set_visible(this: &OtterEngine, key: u32, visible: bool);

    #[wasm_bindgen(method, js_name = setOpacity)]
    pub fn set_opacity(this: &OtterEngine, key: u32, opacity: f32);

    #[wasm_bindgen(method)]
    pub fn remove(this: &OtterEngine, key: u32);

    #[wasm_bindgen(method, js_name = setReticle)]
    pub fn set_reticle(this: &OtterEngine, matrix: &[f32]);

    #[wasm_bindgen(method, js_name = hideReticle)]
    pub fn hide_reticle(this: &OtterEngine);
}

impl OtterEngine {
    pub fn apply_transform(&self, key: u32, t: &Transform) {
        self.set_transform(key, &t.position.to_array(), t.yaw, &t.scale.to_array());
    }
}

/// The engine the page installed, or an error if the script is missing.
pub fn engine() -> anyhow::Result<OtterEngine> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let value = Reflect::get(&window, &JsValue::from_str(ENGINE_GLOBAL)).map_err(js_err)?;
    if value.is_undefined() || value.is_null() {
        anyhow::bail!("missing window.{}", ENGINE_GLOBAL);
    }
    Ok(value.unchecked_into())
}

/// Plain JS object from key/value pairs.
pub fn js_object(entries: &[(&str, JsValue)]) -> Object {
    let obj = Object::new();
    for (key, value) in entries {
        let _ = Reflect::set(&obj, &JsValue::from_str(key), value);
    }
    obj
}

pub fn js_numbers(values: &[f64]) -> Array {
    values.iter().map(|v| JsValue::from_f64(*v)).collect()
}

fn vec3(v: Vec3) -> JsValue {
    js_numbers(&[v.x as f64, v.y as f64, v.z as f64]).into()
}

/// Renderer options for `init`: lights, sky and pixel ratio.
pub fn scene_options(config: &SceneConfig) -> JsValue {
    let ambient = js_object(&[
        ("skyColor", config.ambient.sky_color.into()),
        ("groundColor", config.ambient.ground_color.into()),
        ("intensity", config.ambient.intensity.into()),
        ("position", vec3(config.ambient.position)),
    ]);
    let directional = config.directional.map_or(JsValue::NULL, |d| {
        js_object(&[
            ("color", d.color.into()),
            ("intensity", d.intensity.into()),
            ("position", vec3(d.position)),
        ])
        .into()
    });
    let sky = config.sky.map_or(JsValue::NULL, |s| {
        js_object(&[
            ("scale", s.scale.into()),
            ("turbidity", s.turbidity.into()),
            ("rayleigh", s.rayleigh.into()),
            ("mieCoefficient", s.mie_coefficient.into()),
            ("mieDirectionalG", s.mie_directional_g.into()),
            ("sunDirection", vec3(s.sun_direction())),
        ])
        .into()
    });
    let pixel_ratio = config.pixel_ratio.map_or(JsValue::NULL, JsValue::from_f64);
    js_object(&[
        ("ambient", ambient.into()),
        ("directional", directional),
        ("sky", sky),
        ("pixelRatio", pixel_ratio),
    ])
    .into()
}
