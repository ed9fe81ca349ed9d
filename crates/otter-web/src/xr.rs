//! WebXR session lifecycle and per-frame sensing.
//!
//! The engine opens the `immersive-ar` session; this module wires its
//! `select`/`end` events, acquires the viewer-space hit-test source when the
//! reticle asks for one and reads the hit and viewer poses each frame.

use std::rc::Rc;

use js_sys::Array;
use otter_core::geometry::{Pose, Ray};
use otter_core::scene::{XrFeature, XrFrameData};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

use crate::camera::{matrix16, viewer_from_matrix};
use crate::dom::{add_listener, describe, js_err};
use crate::page::NodePage;

#[derive(Default)]
pub struct XrState {
    pub session: Option<web::XrSession>,
    pub viewer_space: Option<web::XrReferenceSpace>,
    pub hit_source: Option<web::XrHitTestSource>,
}

impl XrState {
    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }
}

fn features(list: &[XrFeature]) -> Array {
    list.iter().map(|f| JsValue::from_str(f.as_str())).collect()
}

/// Start AR from the button's click (a user gesture).
pub async fn start(page: Rc<NodePage>) -> anyhow::Result<()> {
    if page.xr.borrow().is_active() {
        return Ok(());
    }
    let (required, optional) = {
        let scene = page.scene.borrow();
        (
            features(&scene.config.required_features),
            features(&scene.config.optional_features),
        )
    };
    let overlay = page.document.body().map(web::Element::from);
    let value = JsFuture::from(page.engine.start_ar(&required, &optional, overlay.as_ref()))
        .await
        .map_err(js_err)?;
    let session: web::XrSession = value.dyn_into().map_err(js_err)?;
    log::info!("[xr] session started");

    {
        let page = page.clone();
        add_listener(&session, "select", move |_: web::Event| page.select());
    }
    {
        let page = page.clone();
        add_listener(&session, "end", move |_: web::Event| ended(&page));
    }
    page.xr.borrow_mut().session = Some(session);
    page.ui.borrow().show_ar_button(false);
    Ok(())
}

fn ended(page: &NodePage) {
    {
        let mut xr = page.xr.borrow_mut();
        if let Some(source) = xr.hit_source.take() {
            source.cancel();
        }
        xr.viewer_space = None;
        xr.session = None;
    }
    page.session.borrow_mut().reticle_mut().session_ended();
    page.ui.borrow().show_ar_button(true);
    log::info!("[xr] session ended");
}

/// Ask for a hit-test source along the viewer's forward ray. The outcome is
/// reported to the reticle; a source that arrives after its session ended is
/// cancelled.
pub fn request_hit_test_source(page: Rc<NodePage>, session: web::XrSession) {
    spawn_local(async move {
        let result = async {
            let space: web::XrReferenceSpace = JsFuture::from(
                session.request_reference_space(web::XrReferenceSpaceType::Viewer),
            )
            .await?
            .dyn_into()?;
            let options = web::XrHitTestOptionsInit::new(&space);
            let source: web::XrHitTestSource =
                JsFuture::from(session.request_hit_test_source(&options))
                    .await?
                    .dyn_into()?;
            Ok::<_, JsValue>((space, source))
        }
        .await;

        let current = page.xr.borrow().session.clone();
        if current.as_ref() != Some(&session) {
            if let Ok((_, source)) = result {
                source.cancel();
            }
            return;
        }
        match result {
            Ok((space, source)) => {
                {
                    let mut xr = page.xr.borrow_mut();
                    xr.viewer_space = Some(space);
                    xr.hit_source = Some(source);
                }
                page.session.borrow_mut().reticle_mut().source_ready();
                log::debug!("[xr] hit-test source ready");
            }
            Err(e) => {
                log::warn!("[xr] hit-test source rejected: {}", describe(&e));
                page.session.borrow_mut().reticle_mut().source_rejected();
            }
        }
    });
}

/// Hit and viewer poses for this frame, in the engine's reference space.
pub fn read_frame(xr: &XrState, frame: &web::XrFrame, reference: &web::XrReferenceSpace) -> XrFrameData {
    let hit = xr.hit_source.as_ref().and_then(|source| {
        let result: web::XrHitTestResult = frame.get_hit_test_results(source).get(0).dyn_into().ok()?;
        let pose = result.get_pose(reference)?;
        matrix16(&pose.transform().matrix()).map(|m| Pose::from_matrix(&m))
    });
    let (viewer_position, viewer_forward) = frame
        .get_viewer_pose(reference)
        .and_then(|pose| matrix16(&pose.transform().matrix()))
        .map(|m| viewer_from_matrix(&m))
        .unzip();
    XrFrameData {
        hit,
        viewer_position,
        viewer_forward,
    }
}

/// Screen-centre ray, used for select events that come without a pointer.
pub fn gaze_ray(data: &XrFrameData) -> Option<Ray> {
    data.viewer_position
        .zip(data.viewer_forward)
        .map(|(origin, dir)| Ray::new(origin, dir))
}
