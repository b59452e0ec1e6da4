//! Map Context
//!
//! Owns the marker view and the pin feed once the map is mounted, and routes
//! UI intents and stream events through them. Provided via Leptos Context API.

use leptos::prelude::*;
use pin_sync::{
    FeedStatus, Panning, PinDraft, PinFeedAdapter, PinId, PinResult, Coords, StreamEvent, ViewStateStore,
};

use crate::leaflet::LeafletSurface;
use crate::remote::RemotePinStore;
use crate::store::{store_set_sidebar, store_set_status, AppStateStoreFields, AppStore};

pub type PinView = ViewStateStore<LeafletSurface>;
pub type PinFeed = PinFeedAdapter<RemotePinStore>;

/// Handles to the live map; both slots are empty until `attach`
#[derive(Clone, Copy)]
pub struct MapContext {
    view: StoredValue<Option<PinView>, LocalStorage>,
    feed: StoredValue<Option<PinFeed>, LocalStorage>,
    store: AppStore,
}

impl MapContext {
    pub fn new(store: AppStore) -> Self {
        Self {
            view: StoredValue::new_local(None),
            feed: StoredValue::new_local(None),
            store,
        }
    }

    pub fn attach(&self, view: PinView, feed: PinFeed) {
        self.view.set_value(Some(view));
        self.feed.set_value(Some(feed));
    }

    pub fn is_attached(&self) -> bool {
        self.view.with_value(|view| view.is_some())
    }

    /// Stream event: fold into the mirror, then redraw from the new snapshot
    pub fn handle_event(&self, event: StreamEvent) {
        let mut update = None;
        self.feed.update_value(|feed| {
            if let Some(feed) = feed {
                update = Some(feed.ingest(event));
            }
        });
        let Some(update) = update else {
            return;
        };

        if let Some(status) = update.status {
            store_set_status(&self.store, status);
        }
        if let Some(snapshot) = update.snapshot {
            let mut entries = None;
            self.view.update_value(|view| {
                if let Some(view) = view {
                    view.reconcile(snapshot);
                    entries = Some(view.sidebar_entries());
                }
            });
            if let Some(entries) = entries {
                store_set_sidebar(&self.store, entries);
            }
        }
    }

    /// Transport status (open, error) from the subscription
    pub fn handle_status(&self, status: FeedStatus) {
        let mut changed = None;
        self.feed.update_value(|feed| {
            if let Some(feed) = feed {
                changed = feed.set_status(status);
            }
        });
        if let Some(status) = changed {
            store_set_status(&self.store, status);
        }
    }

    /// Sidebar click: center on the pin and open its popup
    pub fn focus(&self, id: &PinId) {
        let found = self.view.with_value(|view| view.as_ref().is_some_and(|v| v.focus(id)));
        if !found {
            log::debug!("focus on unknown pin {}", id);
        }
    }

    fn apply_panning(&self, panning: Option<Panning>) {
        if let Some(panning) = panning {
            self.view.with_value(|view| {
                if let Some(view) = view {
                    view.set_panning(panning.enabled());
                }
            });
        }
    }

    // ========================
    // Add-pin flow
    // ========================

    pub fn toggle_add_mode(&self) {
        self.store.add_mode().update(|mode| mode.toggle());
    }

    pub fn map_click(&self, coords: Coords) {
        let mut panning = None;
        self.store.add_mode().update(|mode| panning = mode.map_click(coords));
        self.apply_panning(panning);
    }

    pub fn cancel_new_pin(&self) {
        let mut panning = None;
        self.store.add_mode().update(|mode| panning = mode.cancel());
        self.apply_panning(panning);
    }

    /// Save the creation form; the form stays open on error
    pub fn save_new_pin(&self, draft: &PinDraft) -> PinResult<()> {
        let mut mode = self.store.add_mode().get_untracked();
        let mut result = Ok(None);
        self.feed.with_value(|feed| match feed {
            Some(feed) => result = mode.save(feed, draft),
            None => log::warn!("pin form saved before the map was ready"),
        });
        let panning = result?;
        *self.store.add_mode().write() = mode;
        self.apply_panning(panning);
        Ok(())
    }

    // ========================
    // Marker actions
    // ========================

    pub fn move_pin(&self, id: &PinId, coords: Coords) {
        self.feed.with_value(|feed| {
            if let Some(feed) = feed {
                feed.move_pin(id, coords);
            }
        });
    }

    pub fn save_note(&self, id: &PinId, note: &str) {
        self.feed.with_value(|feed| {
            if let Some(feed) = feed {
                feed.update_pin_note(id, note);
            }
        });
    }

    pub fn delete_pin(&self, id: &PinId) {
        self.feed.with_value(|feed| {
            if let Some(feed) = feed {
                feed.delete_pin(id);
            }
        });
    }
}

/// Get the map context
pub fn use_map_context() -> MapContext {
    expect_context::<MapContext>()
}
