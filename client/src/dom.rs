use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement};

use crate::config::{CATEGORY_COLORS_ATTR, DATA_HOLDER_ID, LEGEND_ID, PROPERTIES_ATTR};
use crate::error::MapError;

/// Server-rendered elements the widget hangs off.
pub struct Anchors {
    pub holder: Element,
    pub legend: HtmlElement,
}

impl Anchors {
    pub fn locate(document: &Document) -> Result<Self, MapError> {
        let holder = element_by_id(document, DATA_HOLDER_ID)?;
        let legend = element_by_id(document, LEGEND_ID)?
            .dyn_into::<HtmlElement>()
            .map_err(|_| MapError::MissingElement(LEGEND_ID.to_string()))?;
        Ok(Self { holder, legend })
    }

    pub fn properties_json(&self) -> Option<String> {
        self.holder.get_attribute(PROPERTIES_ATTR)
    }

    pub fn category_colors_json(&self) -> Option<String> {
        self.legend.get_attribute(CATEGORY_COLORS_ATTR)
    }
}

pub fn element_by_id(document: &Document, id: &str) -> Result<Element, MapError> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| MapError::MissingElement(id.to_string()))
}
