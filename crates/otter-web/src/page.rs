//! A node page: the session plus everything on the web side that feeds it.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use otter_core::geometry::Ray;
use otter_core::nodes::NodeConfig;
use otter_core::scene::SceneHandle;
use otter_core::session::NodeSession;
use otter_core::ui::UiAction;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

use crate::audio::AudioBus;
use crate::bridge::{self, OtterEngine};
use crate::constants::DEFAULT_AR_LABEL;
use crate::dom::{self, js_err};
use crate::mirror::SceneMirror;
use crate::ui::{self, ViewRenderer};
use crate::xr::{self, XrState};
use crate::{frame, input};

pub struct NodePage {
    pub window: web::Window,
    pub document: web::Document,
    pub engine: OtterEngine,
    pub session: Rc<RefCell<NodeSession>>,
    pub scene: RefCell<SceneHandle>,
    pub mirror: SceneMirror,
    pub xr: RefCell<XrState>,
    pub ui: RefCell<ViewRenderer>,
    pub audio: AudioBus,
    /// Ray of the last scene press, consumed by the next `select`.
    pending_ray: Cell<Option<Ray>>,
    /// Latest screen-centre ray, the fallback for `select`.
    pub gaze: Cell<Option<Ray>>,
    dragging: Cell<bool>,
}

impl NodePage {
    pub fn ui_action(&self, action: UiAction) {
        if let Err(e) = self.session.borrow_mut().ui(action) {
            log::debug!("[page] {:?} ignored: {}", action, e);
        }
    }

    /// XR `select`: places the scene, or taps along the last pressed ray.
    pub fn select(&self) {
        let ray = self.pending_ray.take().or(self.gaze.get());
        if let Err(e) = self.session.borrow_mut().select(ray) {
            log::debug!("[page] select ignored: {}", e);
        }
    }

    pub fn pointer_down(&self, ray: Ray) {
        self.pending_ray.set(Some(ray));
        match self.session.borrow_mut().pointer_down(&ray) {
            Ok(grabbed) => self.dragging.set(grabbed),
            Err(e) => log::debug!("[page] press ignored: {}", e),
        }
    }

    pub fn pointer_move(&self, ray: Ray) {
        self.session.borrow_mut().pointer_move(&ray);
    }

    pub fn pointer_up(&self) {
        if self.dragging.replace(false) {
            self.session.borrow_mut().pointer_up();
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging.get()
    }

    fn resize(&self) {
        let (width, height) = dom::viewport_css(&self.window);
        let dpr = self.window.device_pixel_ratio();
        let mut scene = self.scene.borrow_mut();
        let (bw, bh) = scene.resize(width as u32, height as u32, dpr);
        self.engine.resize(width, height, scene.viewport().pixel_ratio);
        log::debug!("[page] viewport {}x{} backing {}x{}", width, height, bw, bh);
    }
}

pub fn mount(config: &'static NodeConfig) -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let engine = bridge::engine()?;
    let scene_config = config.scene_config();
    engine.init(&bridge::scene_options(&scene_config)).map_err(js_err)?;

    let session = Rc::new(RefCell::new(NodeSession::new(config, rand::random())));
    let mut scene = SceneHandle::initialize(scene_config);
    {
        let session = session.clone();
        scene.on_frame(move |input| session.borrow_mut().frame(input));
    }

    let ar_label = config.ar_button_label.unwrap_or(DEFAULT_AR_LABEL);
    let page = Rc::new(NodePage {
        ui: RefCell::new(ViewRenderer::new(window.clone(), &document, ar_label)?),
        audio: AudioBus::new(document.clone(), session.clone()),
        mirror: SceneMirror::new(engine.clone(), session.clone()),
        scene: RefCell::new(scene),
        xr: RefCell::new(XrState::default()),
        pending_ray: Cell::new(None),
        gaze: Cell::new(None),
        dragging: Cell::new(false),
        window,
        document,
        engine,
        session,
    });

    page.resize();
    {
        let page_resize = page.clone();
        let resize_closure = Closure::wrap(Box::new(move || page_resize.resize()) as Box<dyn FnMut()>);
        page.window
            .add_event_listener_with_callback("resize", resize_closure.as_ref().unchecked_ref())
            .ok();
        resize_closure.forget();
    }

    {
        let page_ui = page.clone();
        ui::bind_actions(&page.document, move |action| page_ui.ui_action(action))?;
    }
    input::bind_pointer(&page.document, page.clone())?;

    {
        let page_ar = page.clone();
        let closure = Closure::wrap(Box::new(move || {
            let page = page_ar.clone();
            spawn_local(async move {
                if let Err(e) = xr::start(page.clone()).await {
                    log::warn!("[xr] AR unavailable: {:?}", e);
                    page.ui.borrow().ar_unavailable();
                }
            });
        }) as Box<dyn FnMut()>);
        let _ = page
            .ui
            .borrow()
            .ar_button()
            .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    frame::start_loop(page.clone());
    log::info!("[page] node {} ready: {}", config.id, config.title);
    Ok(())
}
