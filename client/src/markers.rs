use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use js_sys::{Function, Reflect};
use serde::Serialize;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use plotmap_shared::{CloseTicket, HoverCommand, HoverState, LatLng, MarkerIndex, Payload};

use crate::config::MapConfig;
use crate::error::MapError;
use crate::leaflet::{self, Marker};

const PIN_SIZE: u32 = 32;
const PIN_GLYPH_SIZE: u32 = 16;
const POPUP_MIN_WIDTH: u32 = 280;
const POPUP_MAX_WIDTH: u32 = 320;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DivIconOptions {
    class_name: &'static str,
    html: String,
    icon_size: [u32; 2],
    icon_anchor: [u32; 2],
    popup_anchor: [i32; 2],
}

impl DivIconOptions {
    fn pin(color: &str) -> Self {
        Self {
            class_name: "plotmap-marker",
            html: pin_html(color),
            icon_size: [PIN_SIZE, PIN_SIZE],
            icon_anchor: [PIN_SIZE / 2, PIN_SIZE / 2],
            popup_anchor: [0, -(PIN_SIZE as i32) / 2],
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MarkerOptions<'a> {
    title: &'a str,
    alt: &'a str,
    rise_on_hover: bool,
}

/// The widget opens and closes popups itself, so Leaflet's own close paths are off.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PopupOptions {
    close_button: bool,
    auto_close: bool,
    close_on_click: bool,
    min_width: u32,
    max_width: u32,
    class_name: &'static str,
}

impl Default for PopupOptions {
    fn default() -> Self {
        Self {
            close_button: false,
            auto_close: false,
            close_on_click: false,
            min_width: POPUP_MIN_WIDTH,
            max_width: POPUP_MAX_WIDTH,
            class_name: "plotmap-popup-container",
        }
    }
}

/// Circular badge in the category color with a white pin glyph.
/// `color` must already be a validated CSS color.
pub fn pin_html(color: &str) -> String {
    format!(
        r##"<div class="plotmap-pin" style="background-color:{color};width:{PIN_SIZE}px;height:{PIN_SIZE}px;border-radius:50%;border:2px solid #fff;box-shadow:0 1px 4px rgba(0,0,0,0.4);display:flex;align-items:center;justify-content:center;box-sizing:border-box;"><svg viewBox="0 0 24 24" width="{PIN_GLYPH_SIZE}" height="{PIN_GLYPH_SIZE}" fill="#fff" aria-hidden="true"><path d="M12 2C8.13 2 5 5.13 5 9c0 5.25 7 13 7 13s7-7.75 7-13c0-3.87-3.13-7-7-7zm0 9.5a2.5 2.5 0 1 1 0-5 2.5 2.5 0 0 1 0 5z"/></svg></div>"##
    )
}

type Handler = Closure<dyn FnMut(JsValue)>;

/// Placed markers plus the hover state that drives their popups.
pub struct MarkerLayer {
    controller: Rc<HoverController>,
    positions: Vec<LatLng>,
    _map_click: Handler,
}

impl MarkerLayer {
    pub fn positions(&self) -> &[LatLng] {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.controller.markers.len()
    }
}

/// Build one marker per geolocated property and wire hover behavior.
pub fn place_markers(
    map: &leaflet::Map,
    payload: &Payload,
    config: &MapConfig,
) -> Result<MarkerLayer, MapError> {
    let popup_options = serde_wasm_bindgen::to_value(&PopupOptions::default())?;
    let icon_key = JsValue::from_str("icon");

    let mut markers = Vec::new();
    let mut positions = Vec::new();
    for (property, position) in payload.geolocated() {
        let color = payload.colors.color_for(&property.property_type);
        let icon = leaflet::new_div_icon(&serde_wasm_bindgen::to_value(&DivIconOptions::pin(
            color,
        ))?);
        let options = serde_wasm_bindgen::to_value(&MarkerOptions {
            title: &property.name,
            alt: &property.name,
            rise_on_hover: true,
        })?;
        Reflect::set(&options, &icon_key, icon.as_ref())?;

        let marker = leaflet::new_marker(&leaflet::lat_lng(position), &options);
        marker.bind_popup(&config.popup.render(property), &popup_options);
        marker.add_to(map);
        markers.push(marker);
        positions.push(position);
    }

    let controller = Rc::new(HoverController::new(markers, config.grace_ms));
    for index in 0..controller.markers.len() {
        controller.wire_marker(index);
    }

    let weak = Rc::downgrade(&controller);
    let map_click = Handler::new(move |_: JsValue| {
        if let Some(controller) = weak.upgrade() {
            controller.on_background_click();
        }
    });
    map.on("click", map_click.as_ref().unchecked_ref());

    Ok(MarkerLayer {
        controller,
        positions,
        _map_click: map_click,
    })
}

struct HoverController {
    markers: Vec<Marker>,
    state: RefCell<HoverState>,
    grace_ms: u32,
    pending_close: RefCell<Option<Timeout>>,
    popup_wired: Vec<Cell<bool>>,
    handlers: RefCell<Vec<Handler>>,
}

impl HoverController {
    fn new(markers: Vec<Marker>, grace_ms: u32) -> Self {
        let popup_wired = markers.iter().map(|_| Cell::new(false)).collect();
        Self {
            markers,
            state: RefCell::new(HoverState::new()),
            grace_ms,
            pending_close: RefCell::new(None),
            popup_wired,
            handlers: RefCell::new(Vec::new()),
        }
    }

    fn wire_marker(self: &Rc<Self>, index: MarkerIndex) {
        let marker = &self.markers[index];
        marker.on("mouseover", &self.listener(index, Self::on_marker_enter));
        marker.on("mouseout", &self.listener(index, Self::on_marker_leave));
        marker.on("popupopen", &self.listener(index, Self::on_popup_opened));
        marker.on("popupclose", &self.listener(index, Self::on_popup_closed));
    }

    /// Attach pointer listeners to the popup's DOM once; Leaflet reuses the
    /// container across openings.
    fn wire_popup(self: &Rc<Self>, index: MarkerIndex) {
        if self.popup_wired[index].get() {
            return;
        }
        let Some(element) = self.markers[index]
            .get_popup()
            .and_then(|popup| popup.get_element())
        else {
            return;
        };
        for (event, action) in [
            ("mouseenter", Self::on_popup_enter as fn(&Rc<Self>, MarkerIndex)),
            ("mouseleave", Self::on_popup_leave),
        ] {
            let listener = self.listener(index, action);
            if element
                .add_event_listener_with_callback(event, &listener)
                .is_err()
            {
                web_sys::console::warn_1(
                    &format!("Could not attach {event} listener to popup {index}").into(),
                );
            }
        }
        self.popup_wired[index].set(true);
    }

    /// A listener that forwards to `action` while the controller is alive.
    /// The closure is retained by the controller; only the JS function escapes.
    fn listener(
        self: &Rc<Self>,
        index: MarkerIndex,
        action: fn(&Rc<Self>, MarkerIndex),
    ) -> Function {
        let weak = Rc::downgrade(self);
        let handler = Handler::new(move |_: JsValue| {
            if let Some(controller) = weak.upgrade() {
                action(&controller, index);
            }
        });
        let function = handler.as_ref().unchecked_ref::<Function>().clone();
        self.handlers.borrow_mut().push(handler);
        function
    }

    fn on_marker_enter(self: &Rc<Self>, index: MarkerIndex) {
        let commands = self.state.borrow_mut().marker_enter(index);
        self.apply(commands);
    }

    fn on_marker_leave(self: &Rc<Self>, index: MarkerIndex) {
        let ticket = self.state.borrow_mut().marker_leave(index);
        self.schedule_close(ticket);
    }

    fn on_popup_enter(self: &Rc<Self>, index: MarkerIndex) {
        self.state.borrow_mut().popup_enter(index);
    }

    fn on_popup_leave(self: &Rc<Self>, index: MarkerIndex) {
        let ticket = self.state.borrow_mut().popup_leave(index);
        self.schedule_close(ticket);
    }

    fn on_popup_opened(self: &Rc<Self>, index: MarkerIndex) {
        let command = self.state.borrow_mut().popup_opened(index);
        self.apply(command);
        self.wire_popup(index);
    }

    fn on_popup_closed(self: &Rc<Self>, index: MarkerIndex) {
        self.state.borrow_mut().popup_closed(index);
    }

    fn on_background_click(self: &Rc<Self>) {
        let command = self.state.borrow_mut().background_click();
        self.apply(command);
    }

    /// Replacing the pending timeout cancels it; any ticket it carried is
    /// already stale by the time a newer one is issued.
    fn schedule_close(self: &Rc<Self>, ticket: Option<CloseTicket>) {
        let Some(ticket) = ticket else {
            return;
        };
        let weak = Rc::downgrade(self);
        let timeout = Timeout::new(self.grace_ms, move || {
            if let Some(controller) = weak.upgrade() {
                let command = controller.state.borrow_mut().grace_elapsed(ticket);
                controller.apply(command);
            }
        });
        self.pending_close.replace(Some(timeout));
    }

    /// Leaflet fires `popupopen`/`popupclose` synchronously from these calls,
    /// so no `state` borrow may be held here.
    fn apply(&self, commands: impl IntoIterator<Item = HoverCommand>) {
        for command in commands {
            match command {
                HoverCommand::Open(index) => {
                    if let Some(marker) = self.markers.get(index) {
                        marker.open_popup();
                    }
                }
                HoverCommand::Close(index) => {
                    if let Some(marker) = self.markers.get(index)
                        && marker.is_popup_open()
                    {
                        marker.close_popup();
                    }
                }
            }
        }
    }
}
