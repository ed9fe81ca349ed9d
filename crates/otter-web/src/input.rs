use std::rc::Rc;

use glam::{Mat4, Vec2};
use otter_core::geometry::Ray;
use wasm_bindgen::JsCast;
use web_sys as web;

use crate::bridge::OtterEngine;
use crate::camera::{client_to_ndc, matrix16, ndc_to_ray};
use crate::constants::UI_SELECTOR;
use crate::dom::{add_listener, viewport_css};
use crate::page::NodePage;

/// Camera ray under a pointer. The AR view always fills the viewport.
pub fn pointer_ray(window: &web::Window, engine: &OtterEngine, ev: &web::PointerEvent) -> Option<Ray> {
    let (w, h) = viewport_css(window);
    let ndc = client_to_ndc(
        Vec2::new(ev.client_x() as f32, ev.client_y() as f32),
        [0.0, 0.0, w as f32, h as f32],
    );
    let view_proj = Mat4::from_cols_array(&matrix16(&engine.view_projection())?);
    ndc_to_ray(view_proj.inverse(), ndc)
}

/// Presses on buttons and panels belong to the UI, not the scene.
fn over_ui(ev: &web::PointerEvent) -> bool {
    ev.target()
        .and_then(|t| t.dyn_into::<web::Element>().ok())
        .and_then(|el| el.closest(UI_SELECTOR).ok().flatten())
        .is_some()
}

pub fn bind_pointer(document: &web::Document, page: Rc<NodePage>) -> anyhow::Result<()> {
    let body = document.body().ok_or_else(|| anyhow::anyhow!("no body"))?;
    {
        let page = page.clone();
        add_listener(&body, "pointerdown", move |ev: web::PointerEvent| {
            if over_ui(&ev) {
                return;
            }
            if let Some(ray) = pointer_ray(&page.window, &page.engine, &ev) {
                page.pointer_down(ray);
            }
        });
    }
    {
        let page = page.clone();
        add_listener(&body, "pointermove", move |ev: web::PointerEvent| {
            if !page.is_dragging() {
                return;
            }
            if let Some(ray) = pointer_ray(&page.window, &page.engine, &ev) {
                page.pointer_move(ray);
            }
        });
    }
    for event in ["pointerup", "pointercancel"] {
        let page = page.clone();
        add_listener(&body, event, move |_: web::PointerEvent| page.pointer_up());
    }
    Ok(())
}
