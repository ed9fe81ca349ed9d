//! Scene bootstrap description and the per-frame callback hub.
//!
//! The renderer, camera and XR session themselves live in the front-end (an
//! external 3D engine reached through a bridge). This module holds what the
//! front-end needs to build them and the single frame callback it drives.

use std::time::Duration;

use glam::Vec3;

use crate::geometry::Pose;

/// WebXR session features.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum XrFeature {
    HitTest,
    DomOverlay,
    LocalFloor,
}

impl XrFeature {
    pub fn as_str(&self) -> &'static str {
        match self {
            XrFeature::HitTest => "hit-test",
            XrFeature::DomOverlay => "dom-overlay",
            XrFeature::LocalFloor => "local-floor",
        }
    }
}

/// Hemisphere ambient light (sky colour from above, ground colour from below).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AmbientLight {
    pub sky_color: u32,
    pub ground_color: u32,
    pub intensity: f32,
    pub position: Vec3,
}

impl Default for AmbientLight {
    fn default() -> Self {
        Self {
            sky_color: 0xffffff,
            ground_color: 0xbbbbff,
            intensity: 1.0,
            position: Vec3::new(0.5, 1.0, 0.25),
        }
    }
}

/// Extra directional fill (the night-time moonlight of the last node).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DirectionalLight {
    pub color: u32,
    pub intensity: f32,
    pub position: Vec3,
}

/// Procedural atmospheric sky, installed when the AR session starts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SkyConfig {
    pub scale: f32,
    pub turbidity: f32,
    pub rayleigh: f32,
    pub mie_coefficient: f32,
    pub mie_directional_g: f32,
    pub sun_elevation_deg: f32,
    pub sun_azimuth_deg: f32,
}

impl SkyConfig {
    /// Unit sun direction from elevation above the horizon and azimuth.
    pub fn sun_direction(&self) -> Vec3 {
        let phi = (90.0 - self.sun_elevation_deg).to_radians();
        let theta = self.sun_azimuth_deg.to_radians();
        Vec3::new(phi.sin() * theta.sin(), phi.cos(), phi.sin() * theta.cos())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SceneConfig {
    pub required_features: Vec<XrFeature>,
    pub optional_features: Vec<XrFeature>,
    /// `None` follows the device pixel ratio.
    pub pixel_ratio: Option<f64>,
    pub ambient: AmbientLight,
    pub sky: Option<SkyConfig>,
    pub directional: Option<DirectionalLight>,
    pub ar_button_label: Option<&'static str>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            required_features: vec![XrFeature::HitTest],
            optional_features: Vec::new(),
            pixel_ratio: None,
            ambient: AmbientLight::default(),
            sky: None,
            directional: None,
            ar_button_label: None,
        }
    }
}

/// What the AR runtime sensed this frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct XrFrameData {
    /// First hit of the viewer-forward hit-test source, if the source exists
    /// and something was hit.
    pub hit: Option<Pose>,
    /// Viewer (camera) position in the reference space.
    pub viewer_position: Option<Vec3>,
    /// Unit view direction of the camera.
    pub viewer_forward: Option<Vec3>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameInput {
    pub dt: Duration,
    /// `None` while no AR session is running.
    pub xr: Option<XrFrameData>,
}

impl FrameInput {
    pub fn new(dt: Duration, xr: Option<XrFrameData>) -> Self {
        Self { dt, xr }
    }

    #[inline]
    pub fn dt_sec(&self) -> f32 {
        self.dt.as_secs_f32()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    pub pixel_ratio: f64,
}

impl Viewport {
    /// Backing-store size in device pixels.
    pub fn backing_size(&self) -> (u32, u32) {
        let w = (self.width as f64 * self.pixel_ratio) as u32;
        let h = (self.height as f64 * self.pixel_ratio) as u32;
        (w.max(1), h.max(1))
    }
}

pub type FrameCallback = Box<dyn FnMut(&FrameInput)>;

/// Holds the scene configuration and the single per-frame callback.
pub struct SceneHandle {
    pub config: SceneConfig,
    viewport: Viewport,
    frame_callback: Option<FrameCallback>,
    frames: u64,
}

impl SceneHandle {
    pub fn initialize(config: SceneConfig) -> Self {
        log::debug!(
            "[scene] init required={:?} sky={}",
            config.required_features,
            config.sky.is_some()
        );
        Self {
            config,
            viewport: Viewport::default(),
            frame_callback: None,
            frames: 0,
        }
    }

    /// Install the frame callback. A later call replaces the earlier one.
    pub fn on_frame(&mut self, callback: impl FnMut(&FrameInput) + 'static) {
        self.frame_callback = Some(Box::new(callback));
    }

    pub fn dispatch_frame(&mut self, input: &FrameInput) {
        self.frames += 1;
        if let Some(cb) = self.frame_callback.as_mut() {
            cb(input);
        }
    }

    pub fn frames_dispatched(&self) -> u64 {
        self.frames
    }

    /// Record a viewport change; returns the new backing size so the caller
    /// can resize the renderer.
    pub fn resize(&mut self, width: u32, height: u32, device_pixel_ratio: f64) -> (u32, u32) {
        self.viewport = Viewport {
            width,
            height,
            pixel_ratio: self.config.pixel_ratio.unwrap_or(device_pixel_ratio),
        };
        self.viewport.backing_size()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }
}
