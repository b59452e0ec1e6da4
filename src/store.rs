//! Global Application State Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity.

use leptos::prelude::*;
use reactive_stores::Store;
use pin_sync::{AddPinMode, FeedStatus, SidebarEntry};

/// Reactive UI state; the markers themselves live in `MapContext`
#[derive(Clone, Debug, Default, Store)]
pub struct AppState {
    /// Sidebar rows, in store order
    pub sidebar: Vec<SidebarEntry>,
    /// Whether the notes sidebar is shown
    pub sidebar_open: bool,
    /// Add-pin interaction state
    pub add_mode: AddPinMode,
    /// Connection state of the pin feed
    pub feed_status: FeedStatus,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Type alias for the store
pub type AppStore = Store<AppState>;

/// Get the app store from context
pub fn use_app_store() -> AppStore {
    expect_context::<AppStore>()
}

// ========================
// Store Helper Functions
// ========================

/// Replace the sidebar rows after a reconcile
pub fn store_set_sidebar(store: &AppStore, entries: Vec<SidebarEntry>) {
    *store.sidebar().write() = entries;
}

pub fn store_toggle_sidebar(store: &AppStore) {
    store.sidebar_open().update(|open| *open = !*open);
}

pub fn store_set_status(store: &AppStore, status: FeedStatus) {
    *store.feed_status().write() = status;
}
