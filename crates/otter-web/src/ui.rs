//! Renders [`ViewState`] into the page.
//!
//! Each frame's view is diffed against the last one so the DOM is only
//! touched when something changed.

use glam::{Mat4, Vec2};
use otter_core::ui::{UiAction, ViewState};
use wasm_bindgen::JsCast;
use web_sys as web;

use crate::camera::{ndc_to_client, world_to_ndc};
use crate::constants::*;
use crate::dom::{self, add_listener, ensure_child, set_html_slot, set_shown, set_text_slot};
use crate::markup;

pub struct ViewRenderer {
    window: web::Window,
    info_box: Option<web::Element>,
    narration: Option<web::Element>,
    facts: Option<web::Element>,
    popup: Option<web::Element>,
    popup_text: Option<web::Element>,
    ar_button: web::Element,
    prompt: web::Element,
    warning: web::Element,
    toast: web::Element,
    progress: web::Element,
    balance: web::Element,
    actions: web::Element,
    retry: web::Element,
    nav: web::Element,
    last: Option<ViewState>,
}

impl ViewRenderer {
    pub fn new(window: web::Window, document: &web::Document, ar_label: &str) -> anyhow::Result<Self> {
        let body = document.body().ok_or_else(|| anyhow::anyhow!("no body"))?;
        let root = ensure_child(document, &body, "div", UI_ROOT_ID)?;
        let slot = |id: &str| {
            let el = ensure_child(document, &root, "div", id)?;
            set_shown(&el, false);
            Ok::<_, anyhow::Error>(el)
        };
        let ar_button = ensure_child(document, &root, "button", AR_BUTTON_ID)?;
        ar_button.set_text_content(Some(ar_label.trim()));

        let renderer = Self {
            info_box: document.get_element_by_id(INFO_BOX_ID),
            narration: document.get_element_by_id(NARRATION_TEXT_ID),
            facts: document.get_element_by_id(EXTRA_BUTTONS_ID),
            popup: document.get_element_by_id(POPUP_OVERLAY_ID),
            popup_text: document.get_element_by_id(POPUP_TEXT_ID),
            ar_button,
            prompt: slot(PROMPT_ID)?,
            warning: slot(WARNING_ID)?,
            toast: slot(TOAST_ID)?,
            progress: slot(PROGRESS_ID)?,
            balance: slot(BALANCE_ID)?,
            actions: slot(ACTIONS_ID)?,
            retry: slot(RETRY_ID)?,
            nav: slot(NAV_ID)?,
            window,
            last: None,
        };
        if let Some(popup) = &renderer.popup {
            set_shown(popup, false);
        }
        Ok(renderer)
    }

    pub fn ar_button(&self) -> &web::Element {
        &self.ar_button
    }

    pub fn show_ar_button(&self, shown: bool) {
        set_shown(&self.ar_button, shown);
    }

    pub fn ar_unavailable(&self) {
        self.ar_button.set_text_content(Some(AR_UNSUPPORTED_LABEL));
        let _ = self.ar_button.set_attribute("disabled", "");
    }

    pub fn render(&mut self, view: &ViewState, view_proj: Option<Mat4>) {
        let prev = self.last.as_ref();

        if prev.map(|p| p.prompt) != Some(view.prompt) {
            set_text_slot(&self.prompt, view.prompt);
        }
        if prev.map(|p| p.warning) != Some(view.warning) {
            set_text_slot(&self.warning, view.warning);
        }
        if prev.map(|p| p.toast) != Some(view.toast) {
            set_text_slot(&self.toast, view.toast);
        }
        if prev.map(|p| p.info_box) != Some(view.info_box) {
            if let Some(el) = &self.info_box {
                set_shown(el, view.info_box);
            }
        }
        if prev.map(|p| p.narration.as_str()) != Some(view.narration.as_str()) {
            if let Some(el) = &self.narration {
                el.set_text_content(Some(view.narration.as_str()));
            }
        }
        if prev.map(|p| &p.facts) != Some(&view.facts) {
            if let Some(el) = &self.facts {
                set_html_slot(el, &markup::buttons_html(&view.facts));
            }
        }
        if prev.map(|p| &p.popup) != Some(&view.popup) {
            if let Some(el) = &self.popup_text {
                el.set_inner_html(&view.popup.as_ref().map(markup::popup_html).unwrap_or_default());
            }
            if let Some(el) = &self.popup {
                set_shown(el, view.popup.is_some());
                if view.popup.as_ref().map_or(true, |p| p.anchor.is_none()) {
                    clear_position(el);
                }
            }
        }
        if prev.map(|p| p.progress) != Some(view.progress) {
            set_html_slot(&self.progress, &view.progress.map(markup::progress_html).unwrap_or_default());
        }
        if prev.map(|p| p.balance_fill) != Some(view.balance_fill) {
            set_html_slot(&self.balance, &view.balance_fill.map(markup::balance_html).unwrap_or_default());
        }
        if prev.map(|p| &p.actions) != Some(&view.actions) {
            set_html_slot(&self.actions, &markup::buttons_html(&view.actions));
        }
        if prev.map(|p| p.retry) != Some(view.retry) {
            set_html_slot(&self.retry, &markup::buttons_html(&view.retry.into_iter().collect::<Vec<_>>()));
        }
        if prev.map(|p| (p.back, p.next)) != Some((view.back, view.next)) {
            set_html_slot(&self.nav, &markup::nav_html(view.back, view.next));
        }

        // Anchored popups follow the camera every frame
        if let (Some(anchor), Some(view_proj), Some(el)) = (
            view.popup.as_ref().and_then(|p| p.anchor),
            view_proj,
            &self.popup,
        ) {
            let (w, h) = dom::viewport_css(&self.window);
            let rect = [0.0, 0.0, w as f32, h as f32];
            if let Some(ndc) = world_to_ndc(view_proj, anchor) {
                place_at(el, ndc_to_client(ndc, rect));
            }
        }

        self.last = Some(view.clone());
    }
}

fn place_at(el: &web::Element, px: Vec2) {
    if let Some(html) = el.dyn_ref::<web::HtmlElement>() {
        let style = html.style();
        let _ = style.set_property("position", "fixed");
        let _ = style.set_property("left", &format!("{:.0}px", px.x));
        let _ = style.set_property("top", &format!("{:.0}px", px.y));
        let _ = style.set_property("transform", "translate(-50%, -100%)");
    }
}

fn clear_position(el: &web::Element) {
    if let Some(html) = el.dyn_ref::<web::HtmlElement>() {
        let style = html.style();
        for prop in ["position", "left", "top", "transform"] {
            let _ = style.remove_property(prop);
        }
    }
}

/// One delegated click handler for every generated button: `data-action`
/// becomes a [`UiAction`], `data-href` a page navigation. The page's own
/// popup close button maps to [`UiAction::ClosePopup`].
pub fn bind_actions(
    document: &web::Document,
    handler: impl Fn(UiAction) + 'static,
) -> anyhow::Result<()> {
    let handler = std::rc::Rc::new(handler);
    {
        let handler = handler.clone();
        dom::add_click_listener(document, POPUP_CLOSE_ID, move || handler(UiAction::ClosePopup));
    }
    let body = document.body().ok_or_else(|| anyhow::anyhow!("no body"))?;
    add_listener(&body, "click", move |ev: web::MouseEvent| {
        let Some(target) = ev.target().and_then(|t| t.dyn_into::<web::Element>().ok()) else {
            return;
        };
        let Ok(Some(button)) = target.closest("[data-action], [data-href]") else {
            return;
        };
        if let Some(href) = button.get_attribute("data-href") {
            dom::navigate(&href);
        } else if let Some(action) = button
            .get_attribute("data-action")
            .and_then(|key| markup::parse_action(&key))
        {
            handler(action);
        }
    });
    Ok(())
}
