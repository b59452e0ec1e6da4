//! Pin Subscription
//!
//! Opens the collection as an `EventSource` and forwards decoded events in
//! delivery order.

use std::rc::Rc;

use pin_sync::{FeedStatus, PinError, StreamEvent};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{EventSource, MessageEvent};

use crate::config::StoreConfig;

fn stream_error(e: JsValue) -> PinError {
    PinError::Stream(format!("{:?}", e))
}

/// Subscribe to the pin collection.
///
/// Handlers live as long as the page; the browser reconnects on its own after
/// network errors and the server resends the full collection on reconnect.
/// A `cancel` or `auth_revoked` event closes the source for good.
pub fn subscribe_pins(
    store: &StoreConfig,
    on_event: impl Fn(StreamEvent) + 'static,
    on_status: impl Fn(FeedStatus) + 'static,
) -> Result<EventSource, PinError> {
    let source = EventSource::new(&store.collection_url()).map_err(stream_error)?;

    let on_event = Rc::new(on_event);
    for event_type in StreamEvent::EVENT_TYPES {
        let on_event = on_event.clone();
        let event_source = source.clone();
        let listener = Closure::<dyn FnMut(MessageEvent)>::new(move |msg: MessageEvent| {
            let payload = msg.data().as_string().unwrap_or_default();
            match StreamEvent::parse(event_type, &payload) {
                Ok(event) => {
                    // Reconnecting would only be rejected again
                    let terminal = matches!(event, StreamEvent::Cancel(_) | StreamEvent::AuthRevoked);
                    on_event(event);
                    if terminal {
                        log::warn!("pin stream ended by the server");
                        event_source.close();
                    }
                }
                Err(e) => log::warn!("{}", e),
            }
        });
        source
            .add_event_listener_with_callback(event_type, listener.as_ref().unchecked_ref())
            .map_err(stream_error)?;
        listener.forget();
    }

    let on_status = Rc::new(on_status);
    let open_status = on_status.clone();
    let on_open = Closure::<dyn FnMut(web_sys::Event)>::new(move |_: web_sys::Event| {
        open_status(FeedStatus::Live);
    });
    source.set_onopen(Some(on_open.as_ref().unchecked_ref()));
    on_open.forget();

    let error_source = source.clone();
    let on_error = Closure::<dyn FnMut(web_sys::Event)>::new(move |_: web_sys::Event| {
        if error_source.ready_state() == EventSource::CLOSED {
            on_status(FeedStatus::Closed("connection closed".to_string()));
        } else {
            on_status(FeedStatus::Reconnecting);
        }
    });
    source.set_onerror(Some(on_error.as_ref().unchecked_ref()));
    on_error.forget();

    log::info!("subscribed to {}/{}", store.database_url, store.collection);
    Ok(source)
}
