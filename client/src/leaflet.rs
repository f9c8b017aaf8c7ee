//! Bindings to the subset of Leaflet's global `L` namespace the widget uses.

use js_sys::{Array, Function, Reflect};
use wasm_bindgen::prelude::*;

use plotmap_shared::{Bounds, LatLng};

#[wasm_bindgen]
extern "C" {
    #[derive(Clone)]
    pub type Map;

    #[wasm_bindgen(catch, js_namespace = L, js_name = map)]
    pub fn new_map(container_id: &str, options: &JsValue) -> Result<Map, JsValue>;

    #[wasm_bindgen(method, js_name = setView)]
    pub fn set_view(this: &Map, center: &JsValue, zoom: f64) -> Map;

    #[wasm_bindgen(method, js_name = fitBounds)]
    pub fn fit_bounds(this: &Map, bounds: &JsValue) -> Map;

    #[wasm_bindgen(method, js_name = getBoundsZoom)]
    pub fn get_bounds_zoom(this: &Map, bounds: &JsValue) -> f64;

    #[wasm_bindgen(method, js_name = invalidateSize)]
    pub fn invalidate_size(this: &Map) -> Map;

    #[wasm_bindgen(method, js_name = closePopup)]
    pub fn close_popup(this: &Map) -> Map;

    #[wasm_bindgen(method, js_name = on)]
    pub fn on(this: &Map, event: &str, handler: &Function) -> Map;
}

#[wasm_bindgen]
extern "C" {
    pub type TileLayer;

    #[wasm_bindgen(js_namespace = L, js_name = tileLayer)]
    pub fn new_tile_layer(url_template: &str, options: &JsValue) -> TileLayer;

    #[wasm_bindgen(method, js_name = addTo)]
    pub fn add_to(this: &TileLayer, map: &Map) -> TileLayer;
}

#[wasm_bindgen]
extern "C" {
    pub type DivIcon;

    #[wasm_bindgen(js_namespace = L, js_name = divIcon)]
    pub fn new_div_icon(options: &JsValue) -> DivIcon;
}

#[wasm_bindgen]
extern "C" {
    pub type Marker;

    #[wasm_bindgen(js_namespace = L, js_name = marker)]
    pub fn new_marker(position: &JsValue, options: &JsValue) -> Marker;

    #[wasm_bindgen(method, js_name = addTo)]
    pub fn add_to(this: &Marker, map: &Map) -> Marker;

    #[wasm_bindgen(method, js_name = bindPopup)]
    pub fn bind_popup(this: &Marker, content: &str, options: &JsValue) -> Marker;

    #[wasm_bindgen(method, js_name = openPopup)]
    pub fn open_popup(this: &Marker) -> Marker;

    #[wasm_bindgen(method, js_name = closePopup)]
    pub fn close_popup(this: &Marker) -> Marker;

    #[wasm_bindgen(method, js_name = isPopupOpen)]
    pub fn is_popup_open(this: &Marker) -> bool;

    #[wasm_bindgen(method, js_name = getPopup)]
    pub fn get_popup(this: &Marker) -> Option<Popup>;

    #[wasm_bindgen(method, js_name = on)]
    pub fn on(this: &Marker, event: &str, handler: &Function) -> Marker;
}

#[wasm_bindgen]
extern "C" {
    pub type Popup;

    #[wasm_bindgen(method, js_name = getElement)]
    pub fn get_element(this: &Popup) -> Option<web_sys::HtmlElement>;
}

/// `[lat, lng]`, which Leaflet accepts anywhere a `LatLng` is expected.
pub fn lat_lng(p: LatLng) -> JsValue {
    Array::of2(&JsValue::from_f64(p.lat), &JsValue::from_f64(p.lng)).into()
}

/// `[[south, west], [north, east]]`.
pub fn lat_lng_bounds(b: &Bounds) -> JsValue {
    Array::of2(&lat_lng(b.south_west()), &lat_lng(b.north_east())).into()
}

/// True once the Leaflet script has defined a usable `L.map`.
pub fn is_available(window: &web_sys::Window) -> bool {
    let Ok(namespace) = Reflect::get(window.as_ref(), &JsValue::from_str("L")) else {
        return false;
    };
    if namespace.is_undefined() || namespace.is_null() {
        return false;
    }
    Reflect::get(&namespace, &JsValue::from_str("map"))
        .map(|f| f.is_function())
        .unwrap_or(false)
}
