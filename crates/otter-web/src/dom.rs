use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn js_err(e: JsValue) -> anyhow::Error {
    anyhow::anyhow!(format!("{:?}", e))
}

/// Best-effort message out of a rejected promise or thrown value.
pub fn describe(e: &JsValue) -> String {
    e.as_string()
        .or_else(|| e.dyn_ref::<js_sys::Error>().map(|err| String::from(err.message())))
        .unwrap_or_else(|| format!("{:?}", e))
}

#[inline]
pub fn add_click_listener(
    document: &web::Document,
    element_id: &str,
    mut handler: impl FnMut() + 'static,
) {
    if let Some(el) = document.get_element_by_id(element_id) {
        let closure = Closure::wrap(Box::new(move || handler()) as Box<dyn FnMut()>);
        let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

pub fn add_listener<E: JsCast + 'static>(
    target: &web::EventTarget,
    event: &str,
    mut handler: impl FnMut(E) + 'static,
) {
    let closure = Closure::wrap(Box::new(move |ev: web::Event| {
        if let Ok(ev) = ev.dyn_into::<E>() {
            handler(ev);
        }
    }) as Box<dyn FnMut(web::Event)>);
    let _ = target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
    closure.forget();
}

/// Append a `<tag id=...>` under `parent`, reusing an existing element with
/// that id.
pub fn ensure_child(
    document: &web::Document,
    parent: &web::Element,
    tag: &str,
    id: &str,
) -> anyhow::Result<web::Element> {
    if let Some(el) = document.get_element_by_id(id) {
        return Ok(el);
    }
    let el = document.create_element(tag).map_err(js_err)?;
    el.set_id(id);
    parent.append_child(&el).map_err(js_err)?;
    Ok(el)
}

#[inline]
pub fn set_shown(el: &web::Element, shown: bool) {
    if let Some(html) = el.dyn_ref::<web::HtmlElement>() {
        let _ = html
            .style()
            .set_property("display", if shown { "" } else { "none" });
    }
}

/// Show `el` with `text`, or hide it.
pub fn set_text_slot(el: &web::Element, text: Option<&str>) {
    el.set_text_content(text);
    set_shown(el, text.is_some());
}

/// Show `el` with `html`, hiding it when the markup is empty.
pub fn set_html_slot(el: &web::Element, html: &str) {
    el.set_inner_html(html);
    set_shown(el, !html.is_empty());
}

/// Viewport size in CSS pixels.
pub fn viewport_css(window: &web::Window) -> (f64, f64) {
    let w = window
        .inner_width()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(1.0);
    let h = window
        .inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(1.0);
    (w.max(1.0), h.max(1.0))
}

pub fn navigate(href: &str) {
    if let Some(w) = web::window() {
        if let Err(e) = w.location().set_href(href) {
            log::error!("navigation to {} failed: {:?}", href, e);
        }
    }
}
