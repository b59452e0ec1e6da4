//! Notes Sidebar Component
//!
//! Lists every pin with its note; clicking a row focuses the pin on the map.

use leptos::prelude::*;
use pin_sync::SidebarEntry;

use crate::context::use_map_context;
use crate::store::{use_app_store, AppStateStoreFields};

#[component]
fn NoteRow(entry: SidebarEntry) -> impl IntoView {
    let ctx = use_map_context();
    let id = entry.id.clone();

    view! {
        <li
            class="note-item"
            data-category=entry.category.as_str()
            on:click=move |_| ctx.focus(&id)
        >
            <i class=entry.glyph></i>
            <div class="note-text">
                <strong>{entry.title}</strong>
                <p>{entry.note}</p>
            </div>
        </li>
    }
}

#[component]
pub fn NotesSidebar() -> impl IntoView {
    let store = use_app_store();

    let sidebar_class = move || {
        if store.sidebar_open().get() {
            "notes-sidebar open"
        } else {
            "notes-sidebar"
        }
    };

    view! {
        <aside class=sidebar_class>
            <h2>"Trail Notes"</h2>
            <Show when=move || store.sidebar().read().is_empty()>
                <p class="empty-notes">"No pins on the map yet."</p>
            </Show>
            <ul class="note-list">
                // Whole entry as key so an edited note re-renders its row
                <For
                    each=move || store.sidebar().get()
                    key=|entry| entry.clone()
                    children=move |entry| view! { <NoteRow entry=entry /> }
                />
            </ul>
        </aside>
    }
}
