use std::cell::RefCell;
use std::rc::Rc;

use futures::channel::oneshot;
use futures::future::{self, Either};
use gloo_timers::future::TimeoutFuture;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, EventTarget, Window};

use crate::config::READY_POLL_MS;
use crate::error::MapError;
use crate::leaflet;

/// Resolves on the first dispatch of `event` on `target`. The listener is
/// removed when the returned guard is dropped.
struct EventOnce {
    target: EventTarget,
    event: String,
    receiver: Option<oneshot::Receiver<()>>,
    handler: Closure<dyn FnMut(web_sys::Event)>,
}

impl EventOnce {
    fn listen(target: &EventTarget, event: &str) -> Result<Self, MapError> {
        let (sender, receiver) = oneshot::channel::<()>();
        let sender = Rc::new(RefCell::new(Some(sender)));
        let handler = Closure::<dyn FnMut(web_sys::Event)>::new(move |_: web_sys::Event| {
            if let Some(sender) = sender.borrow_mut().take() {
                let _ = sender.send(());
            }
        });
        target.add_event_listener_with_callback(event, handler.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            event: event.to_string(),
            receiver: Some(receiver),
            handler,
        })
    }

    async fn fired(&mut self) {
        if let Some(receiver) = self.receiver.take() {
            let _ = receiver.await;
        }
    }
}

impl Drop for EventOnce {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(&self.event, self.handler.as_ref().unchecked_ref());
    }
}

/// Wait until the document has been parsed so server-rendered anchors exist.
pub async fn dom_ready(document: &Document) -> Result<(), MapError> {
    if document.ready_state() != "loading" {
        return Ok(());
    }
    let mut loaded = EventOnce::listen(document.as_ref(), "DOMContentLoaded")?;
    loaded.fired().await;
    Ok(())
}

/// Wait for the Leaflet global.
///
/// Resolves immediately when `L` is already defined. Otherwise the host page
/// is expected to dispatch `ready_event` on `window` from the Leaflet script's
/// `onload`; a slow poll covers pages that load the script without doing so.
/// Both are bounded by `timeout_ms`.
pub async fn wait_for_leaflet(
    window: &Window,
    ready_event: &str,
    timeout_ms: u32,
) -> Result<(), MapError> {
    if leaflet::is_available(window) {
        return Ok(());
    }

    let mut signal = EventOnce::listen(window.as_ref(), ready_event)?;
    let signalled = Box::pin(signal.fired());
    let polled = Box::pin(async {
        loop {
            TimeoutFuture::new(READY_POLL_MS).await;
            if leaflet::is_available(window) {
                break;
            }
        }
    });
    let ready = future::select(signalled, polled);

    let outcome = future::select(ready, Box::pin(TimeoutFuture::new(timeout_ms))).await;
    match outcome {
        Either::Left(_) if leaflet::is_available(window) => Ok(()),
        Either::Left(_) => Err(MapError::LibraryUnavailable),
        Either::Right(_) => Err(MapError::LibraryTimeout(timeout_ms)),
    }
}
