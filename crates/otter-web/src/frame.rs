use std::rc::Rc;
use std::time::Duration;

use glam::Mat4;
use instant::Instant;
use otter_core::scene::FrameInput;
use otter_core::session::SessionEvent;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

use crate::camera::matrix16;
use crate::constants::MAX_FRAME_DT;
use crate::dom::describe;
use crate::page::NodePage;
use crate::xr;

/// Hand the per-frame callback to the engine's animation loop, which runs
/// both before and during the AR session.
pub fn start_loop(page: Rc<NodePage>) {
    let engine = page.engine.clone();
    let mut last = Instant::now();
    let closure = Closure::wrap(Box::new(move |_time: f64, frame: JsValue| {
        let now = Instant::now();
        let dt = now.duration_since(last).min(MAX_FRAME_DT);
        last = now;
        tick(&page, dt, frame.dyn_into::<web::XrFrame>().ok());
    }) as Box<dyn FnMut(f64, JsValue)>);
    engine.set_animation_loop(Some(closure.as_ref().unchecked_ref()));
    closure.forget();
}

fn tick(page: &Rc<NodePage>, dt: Duration, frame: Option<web::XrFrame>) {
    let xr_session = page.xr.borrow().session.clone();
    let wants_source = page
        .session
        .borrow_mut()
        .reticle_mut()
        .needs_source_request(xr_session.is_some());
    if let (true, Some(session)) = (wants_source, xr_session) {
        xr::request_hit_test_source(page.clone(), session);
    }

    let data = frame
        .zip(page.engine.reference_space())
        .map(|(frame, reference)| xr::read_frame(&page.xr.borrow(), &frame, &reference));
    if let Some(data) = &data {
        page.gaze.set(xr::gaze_ray(data));
    }
    page.scene.borrow_mut().dispatch_frame(&FrameInput::new(dt, data));

    let (commands, events, view) = {
        let mut session = page.session.borrow_mut();
        (session.drain_commands(), session.drain_events(), session.view())
    };
    page.mirror.apply(commands);
    for event in events {
        handle_event(page, event);
    }

    match view.reticle {
        Some(pose) => page.engine.set_reticle(&pose.to_matrix().to_cols_array()),
        None => page.engine.hide_reticle(),
    }
    let view_proj = matrix16(&page.engine.view_projection()).map(|m| Mat4::from_cols_array(&m));
    page.ui.borrow_mut().render(&view, view_proj);
}

fn handle_event(page: &NodePage, event: SessionEvent) {
    match event {
        SessionEvent::Audio(cue) => page.audio.play(cue),
        SessionEvent::PlayVideo(url) => {
            let promise = page.engine.play_video(url);
            spawn_local(async move {
                if let Err(e) = JsFuture::from(promise).await {
                    log::warn!("[video] {} did not play, ground stays untextured: {}", url, describe(&e));
                }
            });
        }
        SessionEvent::PhaseChanged(phase) => log::debug!("[frame] phase {:?}", phase),
        SessionEvent::GateChanged(change) => log::debug!("[frame] next button {:?}", change),
    }
}
