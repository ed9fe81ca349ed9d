//! The launcher page: a Leaflet map of the ten nodes along the Lee.

use js_sys::{Array, Object};
use otter_core::map::{waypoints, MapConfig, RouteStyle};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

use crate::bridge::{js_numbers, js_object};
use crate::dom::{self, js_err};

#[wasm_bindgen]
extern "C" {
    type LeafletMap;
    type Layer;

    #[wasm_bindgen(catch, js_namespace = L, js_name = map)]
    fn leaflet_map(container_id: &str) -> Result<LeafletMap, JsValue>;

    #[wasm_bindgen(method, js_name = setView)]
    fn set_view(this: &LeafletMap, center: &Array, zoom: u8) -> LeafletMap;

    #[wasm_bindgen(js_namespace = L, js_name = tileLayer)]
    fn tile_layer(url_template: &str, options: &Object) -> Layer;

    #[wasm_bindgen(js_namespace = L, js_name = icon)]
    fn icon(options: &Object) -> JsValue;

    #[wasm_bindgen(js_namespace = L, js_name = marker)]
    fn marker(lat_lng: &Array, options: &Object) -> Layer;

    #[wasm_bindgen(js_namespace = L, js_name = geoJSON)]
    fn geo_json(data: &JsValue, options: &Object) -> Layer;

    #[wasm_bindgen(method, js_name = addTo)]
    fn add_to(this: &Layer, map: &LeafletMap) -> Layer;

    #[wasm_bindgen(method, js_name = bindTooltip)]
    fn bind_tooltip(this: &Layer, content: &str, options: &Object) -> Layer;

    #[wasm_bindgen(method)]
    fn on(this: &Layer, event: &str, handler: &js_sys::Function) -> Layer;
}

fn pair_i32(v: [i32; 2]) -> JsValue {
    js_numbers(&[v[0] as f64, v[1] as f64]).into()
}

pub async fn mount(config: &MapConfig) -> anyhow::Result<()> {
    let map = leaflet_map(config.container_id)
        .map_err(js_err)?
        .set_view(&js_numbers(&config.center), config.zoom);

    tile_layer(
        config.tiles.url_template,
        &js_object(&[("attribution", config.tiles.attribution.into())]),
    )
    .add_to(&map);

    let pin = icon(&js_object(&[
        ("iconUrl", config.icon.url.into()),
        (
            "iconSize",
            js_numbers(&[config.icon.size[0] as f64, config.icon.size[1] as f64]).into(),
        ),
        ("iconAnchor", pair_i32(config.icon.anchor)),
        ("popupAnchor", pair_i32(config.icon.popup_anchor)),
    ]));
    let tooltip = js_object(&[
        ("permanent", config.tooltip.permanent.into()),
        ("direction", config.tooltip.direction.into()),
        ("offset", pair_i32(config.tooltip.offset)),
        ("className", config.tooltip.class_name.into()),
    ]);

    for point in waypoints() {
        let layer = marker(
            &js_numbers(&[point.lat, point.lng]),
            &js_object(&[("icon", pin.clone()), ("title", point.title.into())]),
        )
        .add_to(&map);
        layer.bind_tooltip(point.title, &tooltip);
        let href = point.href();
        let click = Closure::wrap(Box::new(move || dom::navigate(&href)) as Box<dyn FnMut()>);
        layer.on("click", click.as_ref().unchecked_ref());
        click.forget();
    }
    log::info!("[map] {} waypoints", waypoints().len());

    // The pins stay usable without the river overlay
    if let Err(e) = draw_route(&map, &config.route).await {
        log::error!("Failed to load river GeoJSON: {:?}", e);
    }
    Ok(())
}

async fn draw_route(map: &LeafletMap, route: &RouteStyle) -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let response: web::Response = JsFuture::from(window.fetch_with_str(route.source))
        .await
        .map_err(js_err)?
        .dyn_into()
        .map_err(js_err)?;
    if !response.ok() {
        anyhow::bail!("{} returned HTTP {}", route.source, response.status());
    }
    let data = JsFuture::from(response.json().map_err(js_err)?)
        .await
        .map_err(js_err)?;
    let style = js_object(&[
        ("color", route.color.into()),
        ("weight", route.weight.into()),
        ("opacity", route.opacity.into()),
        ("className", route.class_name.into()),
    ]);
    geo_json(&data, &js_object(&[("style", style.into())])).add_to(map);
    Ok(())
}
