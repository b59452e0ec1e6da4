//! Map View Component
//!
//! Mounts the Leaflet map once its container exists, then wires the pin feed
//! into the marker view.

use gloo_timers::future::TimeoutFuture;
use leptos::html::Div;
use leptos::prelude::*;
use leptos::task::spawn_local;
use pin_sync::{Coords, FeedStatus, PinFeedAdapter, PinId, ViewStateStore};
use web_sys::HtmlElement;

use crate::config::MapConfig;
use crate::context::{use_map_context, MapContext};
use crate::leaflet::{mount_map, on_map_click, LeafletSurface, PinActions};
use crate::remote::{subscribe_pins, RemotePinStore};
use crate::store::{use_app_store, AppStateStoreFields};

/// Delay before Leaflet re-measures its container after first layout
const RESIZE_DELAY_MS: u32 = 80;

fn start_map(ctx: MapContext, element: &HtmlElement, config: &MapConfig) {
    let map = match mount_map(element, config) {
        Ok(map) => map,
        Err(e) => {
            log::error!("could not create map: {:?}", e);
            return;
        }
    };

    let actions = PinActions {
        on_move: Callback::new(move |(id, coords): (PinId, Coords)| ctx.move_pin(&id, coords)),
        on_save_note: Callback::new(move |(id, note): (PinId, String)| ctx.save_note(&id, &note)),
        on_delete: Callback::new(move |id: PinId| ctx.delete_pin(&id)),
    };
    on_map_click(&map, move |coords| ctx.map_click(coords));

    let resized = map.clone();
    spawn_local(async move {
        TimeoutFuture::new(RESIZE_DELAY_MS).await;
        resized.invalidate_size();
    });

    ctx.attach(
        ViewStateStore::new(LeafletSurface::new(map, actions)),
        PinFeedAdapter::new(RemotePinStore::new(config.store.clone())),
    );

    // The listeners hold their own handle to the source
    let subscribed = subscribe_pins(
        &config.store,
        move |event| ctx.handle_event(event),
        move |status| ctx.handle_status(status),
    );
    if let Err(e) = subscribed {
        log::error!("{}", e);
        ctx.handle_status(FeedStatus::Closed(e.to_string()));
    }
}

#[component]
pub fn MapView(config: MapConfig) -> impl IntoView {
    let ctx = use_map_context();
    let store = use_app_store();
    let container = NodeRef::<Div>::new();
    let config = StoredValue::new(config);

    Effect::new(move |_| {
        let Some(element) = container.get() else {
            return;
        };
        if ctx.is_attached() {
            return;
        }
        config.with_value(|config| start_map(ctx, &element, config));
    });

    let map_class = move || {
        if store.add_mode().get().is_armed() {
            "map add-pin-mode"
        } else {
            "map"
        }
    };

    view! {
        <div id="map" class=map_class node_ref=container></div>
    }
}
