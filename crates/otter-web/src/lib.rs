#![cfg(target_arch = "wasm32")]
use otter_core::map::MapConfig;
use otter_core::nodes::{node, PageKind};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod assets;
mod audio;
mod bridge;
mod camera;
mod constants;
mod dom;
mod frame;
mod input;
mod map;
mod markup;
mod mirror;
mod page;
mod ui;
mod xr;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log_level()).ok();
    log::info!("otter-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

fn log_level() -> log::Level {
    let debug = web::window()
        .and_then(|w| w.location().search().ok())
        .map_or(false, |q| markup::debug_requested(&q));
    if debug {
        log::Level::Debug
    } else {
        log::Level::Info
    }
}

async fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let path = window.location().pathname().map_err(dom::js_err)?;
    match PageKind::from_path(&path) {
        Some(PageKind::Map) => map::mount(&MapConfig::default()).await,
        Some(PageKind::Node(n)) => {
            let config = node(n).ok_or_else(|| anyhow::anyhow!("no node {}", n))?;
            page::mount(config)
        }
        None => {
            log::warn!("no page for {}", path);
            Ok(())
        }
    }
}
