//! Pin Feed Adapter
//!
//! Outbound: turns UI intents into store writes. Inbound: turns stream events
//! into snapshots for the view.

use crate::error::{PinError, PinResult};
use crate::model::{Category, Coords, NewPin, PinId, PinPatch};
use crate::snapshot::PinSnapshot;
use crate::stream::{CollectionMirror, FeedStatus, StreamEvent};

/// Write access to the remote store.
///
/// Writes are fire-and-forget: implementations report failures through the
/// log and never block the caller. The resulting change comes back through
/// the stream like any other client's write.
pub trait PinWriter {
    /// Create a record under a store-generated id
    fn push(&self, record: NewPin);

    /// Merge the set fields of `patch` into the record
    fn update(&self, id: &PinId, patch: PinPatch);

    /// Delete the whole record
    fn remove(&self, id: &PinId);
}

/// What a single stream event changed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedUpdate {
    /// Full collection, if the data changed
    pub snapshot: Option<PinSnapshot>,
    /// New connection status, if it changed
    pub status: Option<FeedStatus>,
}

pub struct PinFeedAdapter<W: PinWriter> {
    writer: W,
    mirror: CollectionMirror,
    status: FeedStatus,
    loaded: bool,
}

impl<W: PinWriter> PinFeedAdapter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            mirror: CollectionMirror::new(),
            status: FeedStatus::Connecting,
            loaded: false,
        }
    }

    /// Create a pin. An empty title is rejected before anything is written.
    pub fn create_pin(&self, coords: Coords, title: &str, note: &str, category: Category) -> PinResult<()> {
        let title = title.trim();
        if title.is_empty() {
            return Err(PinError::InvalidInput("a pin needs a title".to_string()));
        }
        self.writer.push(NewPin {
            coords,
            title: title.to_string(),
            note: note.trim().to_string(),
            category,
        });
        Ok(())
    }

    /// Replace only the note of a pin
    pub fn update_pin_note(&self, id: &PinId, note: &str) {
        self.writer.update(id, PinPatch::note(note));
    }

    /// Replace only the coordinates of a pin (drag release)
    pub fn move_pin(&self, id: &PinId, coords: Coords) {
        self.writer.update(id, PinPatch::coords(coords));
    }

    /// Delete a pin; its marker goes away when the removal comes back
    pub fn delete_pin(&self, id: &PinId) {
        self.writer.remove(id);
    }

    /// Fold one stream event into the local copy of the collection
    pub fn ingest(&mut self, event: StreamEvent) -> FeedUpdate {
        let mut update = FeedUpdate::default();

        let status = match &event {
            StreamEvent::Cancel(reason) => FeedStatus::Closed(reason.clone()),
            StreamEvent::AuthRevoked => FeedStatus::Closed("credential expired".to_string()),
            _ => FeedStatus::Live,
        };
        update.status = self.set_status(status);

        // The first put is the initial load; publish it even when empty
        let first_load = !self.loaded && matches!(event, StreamEvent::Put { .. });
        if first_load {
            self.loaded = true;
        }
        if self.mirror.apply(&event) || first_load {
            update.snapshot = Some(self.mirror.snapshot());
        }
        update
    }

    /// Record a status change. `Closed` is final: the subscription has been
    /// shut and nothing reopens it.
    pub fn set_status(&mut self, status: FeedStatus) -> Option<FeedStatus> {
        if status == self.status || self.is_closed() {
            return None;
        }
        log::info!("pin feed status: {:?}", status);
        self.status = status.clone();
        Some(status)
    }

    pub fn status(&self) -> &FeedStatus {
        &self.status
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.status, FeedStatus::Closed(_))
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Pin;
    use crate::testing::{MemoryStore, RecordingSurface, StoreWrite};
    use crate::view_state::ViewStateStore;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_create_with_empty_title_writes_nothing() {
        let feed = PinFeedAdapter::new(MemoryStore::default());
        let mut view = ViewStateStore::new(RecordingSurface::default());

        let result = feed.create_pin(Coords::new(1.0, 1.0), "   ", "note", Category::Quest);

        assert!(matches!(result, Err(PinError::InvalidInput(_))));
        assert!(feed.writer().writes.borrow().is_empty());
        view.reconcile(feed.writer().snapshot());
        assert!(view.is_empty());
    }

    #[test]
    fn test_create_trims_and_pushes() {
        let feed = PinFeedAdapter::new(MemoryStore::default());
        feed.create_pin(Coords::new(5.0, 6.0), "  Mine ", " gold? ", Category::Clue).unwrap();

        let id = feed.writer().last_id().unwrap();
        assert_eq!(
            feed.writer().record(&id).unwrap(),
            json!({"coords": {"lat": 5.0, "lng": 6.0}, "title": "Mine", "note": "gold?", "category": "clue"})
        );
    }

    #[test]
    fn test_note_update_leaves_other_fields() {
        let feed = PinFeedAdapter::new(MemoryStore::default());
        let mut view = ViewStateStore::new(RecordingSurface::default());
        feed.create_pin(Coords::new(3.0, 4.0), "Bank", "", Category::Hostile).unwrap();
        let id = feed.writer().last_id().unwrap();
        view.reconcile(feed.writer().snapshot());
        let before = view.snapshot().get(&id).cloned().unwrap();

        feed.update_pin_note(&id, "x");
        view.reconcile(feed.writer().snapshot());

        let after = view.snapshot().get(&id).cloned().unwrap();
        assert_eq!(after.note, "x");
        assert_eq!(after.coords, before.coords);
        assert_eq!(after.category, before.category);
        assert_eq!(after.title, before.title);
        assert_eq!(
            feed.writer().writes.borrow().last(),
            Some(&StoreWrite::Update(id.clone(), json!({"note": "x"})))
        );
    }

    #[test]
    fn test_move_only_sends_coords() {
        let feed = PinFeedAdapter::new(MemoryStore::default());
        feed.create_pin(Coords::new(0.0, 0.0), "Well", "dry", Category::Safe).unwrap();
        let id = feed.writer().last_id().unwrap();

        feed.move_pin(&id, Coords::new(10.0, 5.0));

        let pin = Pin::from_value(&feed.writer().record(&id).unwrap()).unwrap();
        assert_eq!(pin, Pin::new(Coords::new(10.0, 5.0), "Well", "dry", Category::Safe));
        assert_eq!(
            feed.writer().writes.borrow().last(),
            Some(&StoreWrite::Update(id, json!({"coords": {"lat": 10.0, "lng": 5.0}})))
        );
    }

    #[test]
    fn test_delete_waits_for_notification() {
        let mut feed = PinFeedAdapter::new(MemoryStore::default());
        let mut view = ViewStateStore::new(RecordingSurface::default());
        let initial = feed.ingest(StreamEvent::Put {
            path: "/".to_string(),
            data: json!({"-N1": {"coords": {"lat": 0, "lng": 0}, "title": "Saloon"}}),
        });
        view.reconcile(initial.snapshot.unwrap());
        assert_eq!(view.len(), 1);

        feed.delete_pin(&PinId::from("-N1"));
        assert_eq!(view.len(), 1);

        let update = feed.ingest(StreamEvent::Put { path: "/-N1".to_string(), data: serde_json::Value::Null });
        view.reconcile(update.snapshot.unwrap());
        assert!(view.is_empty());
    }

    #[test]
    fn test_ingest_reports_status_and_snapshots() {
        let mut feed = PinFeedAdapter::new(MemoryStore::default());

        let first = feed.ingest(StreamEvent::Put { path: "/".to_string(), data: serde_json::Value::Null });
        assert_eq!(first.status, Some(FeedStatus::Live));
        assert_eq!(first.snapshot, Some(PinSnapshot::new()));

        let keep_alive = feed.ingest(StreamEvent::KeepAlive);
        assert_eq!(keep_alive, FeedUpdate::default());

        let cancelled = feed.ingest(StreamEvent::Cancel("Permission denied".to_string()));
        assert_eq!(cancelled.status, Some(FeedStatus::Closed("Permission denied".to_string())));
        assert_eq!(cancelled.snapshot, None);
    }

    #[test]
    fn test_closed_feed_stays_closed() {
        let mut feed = PinFeedAdapter::new(MemoryStore::default());
        feed.ingest(StreamEvent::Put { path: "/".to_string(), data: serde_json::Value::Null });

        let revoked = feed.ingest(StreamEvent::AuthRevoked);
        assert_eq!(revoked.status, Some(FeedStatus::Closed("credential expired".to_string())));

        assert_eq!(feed.set_status(FeedStatus::Reconnecting), None);
        assert_eq!(feed.ingest(StreamEvent::KeepAlive).status, None);
        assert_eq!(feed.set_status(FeedStatus::Live), None);
        assert!(feed.is_closed());
        assert_eq!(feed.status(), &FeedStatus::Closed("credential expired".to_string()));
    }

    #[test]
    fn test_set_status_deduplicates() {
        let mut feed = PinFeedAdapter::new(MemoryStore::default());
        assert_eq!(feed.set_status(FeedStatus::Connecting), None);
        assert_eq!(feed.set_status(FeedStatus::Reconnecting), Some(FeedStatus::Reconnecting));
        assert_eq!(feed.status(), &FeedStatus::Reconnecting);
    }
}
