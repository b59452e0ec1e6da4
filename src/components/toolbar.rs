//! Toolbar Component
//!
//! Add-pin toggle, notes toggle and the feed status indicator.

use leptos::prelude::*;

use crate::context::use_map_context;
use crate::store::{store_toggle_sidebar, use_app_store, AppStateStoreFields};

#[component]
pub fn Toolbar() -> impl IntoView {
    let ctx = use_map_context();
    let store = use_app_store();

    let add_class = move || {
        if store.add_mode().get().is_armed() {
            "western-button add-pin active"
        } else {
            "western-button add-pin"
        }
    };
    let notes_class = move || {
        if store.sidebar_open().get() {
            "western-button toggle-notes active"
        } else {
            "western-button toggle-notes"
        }
    };
    let status_class = move || {
        if store.feed_status().get().is_live() {
            "feed-status live"
        } else {
            "feed-status"
        }
    };

    view! {
        <header class="toolbar">
            <h1 class="map-title">"Wild West Map"</h1>
            <button class=add_class on:click=move |_| ctx.toggle_add_mode()>
                <i class="fas fa-map-pin"></i>
                " Add Pin"
            </button>
            <button class=notes_class on:click=move |_| store_toggle_sidebar(&store)>
                <i class="fas fa-book"></i>
                " Notes"
            </button>
            <span class=status_class>{move || store.feed_status().get().label()}</span>
        </header>
    }
}
