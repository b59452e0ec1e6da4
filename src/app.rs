//! Wild West Map App
//!
//! Loads the map configuration, provides shared state and lays out the
//! toolbar, map, notes sidebar and creation modal.

use leptos::prelude::*;
use leptos::task::spawn_local;
use reactive_stores::Store;

use crate::components::{MapView, NotesSidebar, PinModal, Toolbar};
use crate::config::{load_config, MapConfig};
use crate::context::MapContext;
use crate::store::{AppState, AppStore};

#[component]
pub fn App() -> impl IntoView {
    let store: AppStore = Store::new(AppState::new());
    provide_context(store);
    provide_context(MapContext::new(store));

    let (config, set_config) = signal::<Option<MapConfig>>(None);

    // Load config once on mount
    spawn_local(async move {
        let loaded = load_config().await;
        log::debug!("map image {} ({}x{})", loaded.image_url, loaded.image_width, loaded.image_height);
        set_config.set(Some(loaded));
    });

    view! {
        <div class="app-layout">
            <Toolbar />
            <main class="map-area">
                {move || match config.get() {
                    Some(config) => view! { <MapView config=config /> }.into_any(),
                    None => view! { <p class="map-loading">"Unrolling the map..."</p> }.into_any(),
                }}
                <NotesSidebar />
            </main>
            <PinModal />
        </div>
    }
}
