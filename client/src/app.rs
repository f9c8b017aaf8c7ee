use std::cell::RefCell;

use plotmap_shared::Payload;
use serde::Serialize;
use wasm_bindgen::JsValue;

use crate::config::MapConfig;
use crate::dom::{self, Anchors};
use crate::error::MapError;
use crate::leaflet;
use crate::legend;
use crate::markers::{self, MarkerLayer};
use crate::ready;
use crate::viewport;

/// Keeps the map and its marker listeners alive for the page's lifetime.
struct MapBinding {
    _map: leaflet::Map,
    _markers: MarkerLayer,
}

thread_local! {
    static MAP_BINDING: RefCell<Option<MapBinding>> = const { RefCell::new(None) };
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TileLayerOptions<'a> {
    attribution: &'a str,
    max_zoom: u8,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MapOptions {
    max_zoom: u8,
    scroll_wheel_zoom: bool,
}

/// Page-load entry point. The widget is best-effort: every failure is logged
/// and leaves the page as the server rendered it.
pub async fn boot() {
    if let Err(err) = run().await {
        web_sys::console::warn_1(&format!("Property map disabled: {err}").into());
    }
}

async fn run() -> Result<(), MapError> {
    let window = web_sys::window().ok_or(MapError::NoDocument)?;
    let document = window.document().ok_or(MapError::NoDocument)?;
    ready::dom_ready(&document).await?;

    let anchors = Anchors::locate(&document)?;
    let config = MapConfig::default().with_overrides(|name| anchors.holder.get_attribute(name));

    let properties_json = anchors.properties_json();
    let colors_json = anchors.category_colors_json();
    let (payload, errors) = Payload::parse(properties_json.as_deref(), colors_json.as_deref());
    for err in &errors {
        web_sys::console::warn_1(&format!("Property map data: {err}; using empty data").into());
    }
    if payload.skipped_entries > 0 {
        web_sys::console::warn_1(
            &format!(
                "Property map data: skipped {} unusable entries",
                payload.skipped_entries
            )
            .into(),
        );
    }

    legend::render(anchors.legend.clone(), &payload.colors);

    ready::wait_for_leaflet(&window, &config.ready_event, config.ready_timeout_ms).await?;
    let container = dom::element_by_id(&document, &config.map_id)?;

    let map = leaflet::new_map(
        &config.map_id,
        &serde_wasm_bindgen::to_value(&MapOptions {
            max_zoom: config.max_zoom,
            scroll_wheel_zoom: true,
        })?,
    )?;
    leaflet::new_tile_layer(
        &config.tile_url,
        &serde_wasm_bindgen::to_value(&TileLayerOptions {
            attribution: &config.tile_attribution,
            max_zoom: config.max_zoom,
        })?,
    )
    .add_to(&map);

    let layer = markers::place_markers(&map, &payload, &config)?;
    let unplaced = payload.properties.len() - layer.len();
    web_sys::console::info_1(&JsValue::from_str(&format!(
        "Property map: placed {} markers ({unplaced} without coordinates)",
        layer.len()
    )));

    viewport::fit_to_markers(&map, &container, layer.positions(), config.max_zoom);

    MAP_BINDING.with(|slot| {
        *slot.borrow_mut() = Some(MapBinding {
            _map: map,
            _markers: layer,
        });
    });
    Ok(())
}
