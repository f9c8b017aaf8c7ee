use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum MapError {
    #[error("browser window or document is unavailable")]
    NoDocument,
    #[error("element #{0} not found")]
    MissingElement(String),
    #[error("Leaflet did not load within {0}ms")]
    LibraryTimeout(u32),
    #[error("ready signal fired but Leaflet is not defined")]
    LibraryUnavailable,
    #[error("javascript error: {0}")]
    Js(String),
}

impl From<JsValue> for MapError {
    fn from(value: JsValue) -> Self {
        let message = value
            .as_string()
            .or_else(|| {
                js_sys::Reflect::get(&value, &JsValue::from_str("message"))
                    .ok()
                    .and_then(|m| m.as_string())
            })
            .unwrap_or_else(|| format!("{value:?}"));
        Self::Js(message)
    }
}

impl From<serde_wasm_bindgen::Error> for MapError {
    fn from(err: serde_wasm_bindgen::Error) -> Self {
        Self::Js(err.to_string())
    }
}
