//! View State Store
//!
//! Keeps the markers on the map in step with the latest pin snapshot. The
//! store is the only owner of marker handles; the map surface does the
//! drawing.

use std::collections::HashMap;

use crate::icon::MarkerIcon;
use crate::model::{Category, Pin, PinId};
use crate::snapshot::PinSnapshot;

/// What the view needs from the map widget
pub trait MapSurface {
    /// Handle to a marker placed on the map
    type Marker: Clone + PartialEq + std::fmt::Debug;

    /// Place a new marker with its popup and interaction handlers; `None`
    /// if nothing could be drawn
    fn place_marker(&mut self, id: &PinId, pin: &Pin, icon: &MarkerIcon) -> Option<Self::Marker>;

    /// Reposition and refresh an existing marker without replacing it
    fn update_marker(&mut self, marker: &Self::Marker, pin: &Pin, icon: &MarkerIcon);

    fn remove_marker(&mut self, marker: Self::Marker);

    /// Open the marker's popup and pan it into view
    fn focus_marker(&self, marker: &Self::Marker);

    /// Enable or disable panning the map by drag
    fn set_panning(&self, enabled: bool);
}

/// One row of the notes sidebar
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SidebarEntry {
    pub id: PinId,
    pub title: String,
    pub note: String,
    pub category: Category,
    pub glyph: &'static str,
}

/// Marker mutations made by one reconcile
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconcileOutcome {
    pub created: Vec<PinId>,
    pub updated: Vec<PinId>,
    pub removed: Vec<PinId>,
}

impl ReconcileOutcome {
    pub fn is_noop(&self) -> bool {
        self.created.is_empty() && self.updated.is_empty() && self.removed.is_empty()
    }
}

/// Markers by pin id plus the snapshot they were built from
pub struct ViewStateStore<S: MapSurface> {
    surface: S,
    markers_by_id: HashMap<PinId, S::Marker>,
    last_snapshot: PinSnapshot,
}

impl<S: MapSurface> ViewStateStore<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            markers_by_id: HashMap::new(),
            last_snapshot: PinSnapshot::new(),
        }
    }

    /// Make the markers match `snapshot` exactly.
    ///
    /// Surviving markers are patched in place so open popups keep their
    /// state; pins identical to the previous snapshot are left alone.
    pub fn reconcile(&mut self, snapshot: PinSnapshot) -> ReconcileOutcome {
        let mut outcome = ReconcileOutcome::default();

        let gone: Vec<PinId> = self
            .markers_by_id
            .keys()
            .filter(|id| !snapshot.contains(id))
            .cloned()
            .collect();
        for id in gone {
            if let Some(marker) = self.markers_by_id.remove(&id) {
                self.surface.remove_marker(marker);
            }
            outcome.removed.push(id);
        }

        for (id, pin) in snapshot.iter() {
            match self.markers_by_id.get(id) {
                Some(marker) => {
                    if self.last_snapshot.get(id) == Some(pin) {
                        continue;
                    }
                    let icon = MarkerIcon::for_category(pin.category);
                    self.surface.update_marker(marker, pin, &icon);
                    outcome.updated.push(id.clone());
                }
                None => {
                    let icon = MarkerIcon::for_category(pin.category);
                    // Left unrecorded so the next reconcile tries again
                    let Some(marker) = self.surface.place_marker(id, pin, &icon) else {
                        continue;
                    };
                    self.markers_by_id.insert(id.clone(), marker);
                    outcome.created.push(id.clone());
                }
            }
        }

        self.last_snapshot = snapshot;

        if !outcome.is_noop() {
            log::debug!(
                "reconciled {} pins: {} created, {} updated, {} removed",
                self.last_snapshot.len(),
                outcome.created.len(),
                outcome.updated.len(),
                outcome.removed.len()
            );
        }
        outcome
    }

    /// Sidebar rows in snapshot order
    pub fn sidebar_entries(&self) -> Vec<SidebarEntry> {
        self.last_snapshot
            .iter()
            .map(|(id, pin)| SidebarEntry {
                id: id.clone(),
                title: pin.title.clone(),
                note: pin.note.clone(),
                category: pin.category,
                glyph: pin.category.glyph(),
            })
            .collect()
    }

    /// Bring a pin's marker into view; returns false for unknown ids
    pub fn focus(&self, id: &PinId) -> bool {
        match self.markers_by_id.get(id) {
            Some(marker) => {
                self.surface.focus_marker(marker);
                true
            }
            None => false,
        }
    }

    pub fn set_panning(&self, enabled: bool) {
        self.surface.set_panning(enabled);
    }

    pub fn marker(&self, id: &PinId) -> Option<&S::Marker> {
        self.markers_by_id.get(id)
    }

    pub fn snapshot(&self) -> &PinSnapshot {
        &self.last_snapshot
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn len(&self) -> usize {
        self.markers_by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers_by_id.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Coords;
    use crate::testing::{RecordingSurface, SurfaceCall};
    use pretty_assertions::assert_eq;
    use std::collections::BTreeSet;

    fn pin(lat: f64, lng: f64, title: &str, category: Category) -> Pin {
        Pin::new(Coords::new(lat, lng), title, "", category)
    }

    fn snapshot(pins: &[(&str, Pin)]) -> PinSnapshot {
        pins.iter()
            .map(|(id, pin)| (PinId::from(*id), pin.clone()))
            .collect()
    }

    fn marker_ids(view: &ViewStateStore<RecordingSurface>) -> BTreeSet<PinId> {
        view.markers_by_id.keys().cloned().collect()
    }

    #[test]
    fn test_first_pin_creates_marker_and_sidebar_entry() {
        let mut view = ViewStateStore::new(RecordingSurface::default());
        view.reconcile(PinSnapshot::new());
        assert!(view.is_empty());

        let outcome = view.reconcile(snapshot(&[("p1", pin(0.0, 0.0, "Saloon", Category::Safe))]));

        assert_eq!(outcome.created, vec![PinId::from("p1")]);
        assert_eq!(view.len(), 1);
        let placed = view.surface().placed(&PinId::from("p1")).unwrap();
        assert_eq!(placed.coords, Coords::new(0.0, 0.0));
        assert_eq!(placed.glyph, "fas fa-star");

        let entries = view.sidebar_entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "Saloon");
        assert_eq!(entries[0].glyph, "fas fa-star");
    }

    #[test]
    fn test_move_keeps_marker_identity() {
        let mut view = ViewStateStore::new(RecordingSurface::default());
        view.reconcile(snapshot(&[("p1", pin(0.0, 0.0, "Saloon", Category::Safe))]));
        let before = view.marker(&PinId::from("p1")).cloned().unwrap();

        let outcome = view.reconcile(snapshot(&[("p1", pin(10.0, 5.0, "Saloon", Category::Safe))]));

        assert_eq!(outcome.created, Vec::<PinId>::new());
        assert_eq!(outcome.removed, Vec::<PinId>::new());
        assert_eq!(outcome.updated, vec![PinId::from("p1")]);
        assert_eq!(view.marker(&PinId::from("p1")), Some(&before));
        assert_eq!(
            view.surface().placed(&PinId::from("p1")).unwrap().coords,
            Coords::new(10.0, 5.0)
        );
        assert_eq!(view.surface().live_markers(), 1);
    }

    #[test]
    fn test_delete_removes_marker_and_sidebar_entry() {
        let mut view = ViewStateStore::new(RecordingSurface::default());
        view.reconcile(snapshot(&[("p1", pin(0.0, 0.0, "Saloon", Category::Safe))]));

        let outcome = view.reconcile(PinSnapshot::new());

        assert_eq!(outcome.removed, vec![PinId::from("p1")]);
        assert!(view.is_empty());
        assert!(view.sidebar_entries().is_empty());
        assert_eq!(view.surface().live_markers(), 0);
    }

    #[test]
    fn test_markers_match_snapshot_keys() {
        let mut view = ViewStateStore::new(RecordingSurface::default());
        let sequence = [
            snapshot(&[("a", pin(1.0, 1.0, "A", Category::Quest)), ("b", pin(2.0, 2.0, "B", Category::Clue))]),
            snapshot(&[("b", pin(2.0, 3.0, "B", Category::Clue)), ("c", pin(3.0, 3.0, "C", Category::Hostile))]),
            snapshot(&[]),
            snapshot(&[("a", pin(1.0, 1.0, "A again", Category::Default))]),
        ];
        for next in sequence {
            let expected: BTreeSet<PinId> = next.ids().cloned().collect();
            view.reconcile(next);
            assert_eq!(marker_ids(&view), expected);
            assert_eq!(view.surface().live_markers(), expected.len());
        }
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let mut view = ViewStateStore::new(RecordingSurface::default());
        let pins = snapshot(&[
            ("a", pin(1.0, 1.0, "A", Category::Quest)),
            ("b", pin(2.0, 2.0, "B", Category::Safe)),
        ]);

        view.reconcile(pins.clone());
        let markers_after_first: Vec<_> = pins.ids().map(|id| view.marker(id).cloned()).collect();
        let calls_after_first = view.surface().calls.len();

        let second = view.reconcile(pins.clone());

        assert!(second.is_noop());
        assert_eq!(view.surface().calls.len(), calls_after_first);
        let markers_after_second: Vec<_> = pins.ids().map(|id| view.marker(id).cloned()).collect();
        assert_eq!(markers_after_first, markers_after_second);
        assert_eq!(view.snapshot(), &pins);
    }

    #[test]
    fn test_category_change_refreshes_icon() {
        let mut view = ViewStateStore::new(RecordingSurface::default());
        view.reconcile(snapshot(&[("p1", pin(0.0, 0.0, "Camp", Category::Safe))]));
        view.reconcile(snapshot(&[("p1", pin(0.0, 0.0, "Camp", Category::Hostile))]));

        let placed = view.surface().placed(&PinId::from("p1")).unwrap();
        assert_eq!(placed.glyph, "fas fa-skull");
        assert_eq!(placed.class_name, "custom-div-icon hostile");
    }

    #[test]
    fn test_sidebar_follows_snapshot_order() {
        let mut view = ViewStateStore::new(RecordingSurface::default());
        view.reconcile(snapshot(&[
            ("-N3", pin(0.0, 0.0, "Third", Category::Quest)),
            ("-N1", pin(0.0, 0.0, "First", Category::Quest)),
            ("-N2", pin(0.0, 0.0, "Second", Category::Quest)),
        ]));
        let titles: Vec<String> = view.sidebar_entries().into_iter().map(|e| e.title).collect();
        assert_eq!(titles, vec!["First", "Second", "Third"]);
    }

    #[test]
    fn test_sidebar_orders_integer_keys_numerically() {
        let mut view = ViewStateStore::new(RecordingSurface::default());
        let mut records = vec![serde_json::Value::Null];
        for n in 1..=11 {
            records.push(serde_json::json!({"coords": {"lat": n, "lng": n}, "title": format!("P{}", n)}));
        }
        view.reconcile(PinSnapshot::from_value(&serde_json::Value::Array(records)));

        let titles: Vec<String> = view.sidebar_entries().into_iter().map(|e| e.title).collect();
        let expected: Vec<String> = (1..=11).map(|n| format!("P{}", n)).collect();
        assert_eq!(titles, expected);
    }

    #[test]
    fn test_failed_placement_is_retried() {
        let mut surface = RecordingSurface::default();
        surface.failing_places = 1;
        let mut view = ViewStateStore::new(surface);
        let pins = snapshot(&[("p1", pin(0.0, 0.0, "Saloon", Category::Safe))]);

        let first = view.reconcile(pins.clone());
        assert!(first.created.is_empty());
        assert!(view.marker(&PinId::from("p1")).is_none());

        let second = view.reconcile(pins);
        assert_eq!(second.created, vec![PinId::from("p1")]);
        assert_eq!(view.surface().live_markers(), 1);
    }

    #[test]
    fn test_focus_and_panning_reach_surface() {
        let mut view = ViewStateStore::new(RecordingSurface::default());
        view.reconcile(snapshot(&[("p1", pin(0.0, 0.0, "Saloon", Category::Safe))]));

        assert!(view.focus(&PinId::from("p1")));
        assert!(!view.focus(&PinId::from("missing")));
        view.set_panning(false);

        let surface = view.surface();
        assert_eq!(surface.focused.borrow().as_slice(), &[PinId::from("p1")]);
        assert_eq!(surface.panning.get(), Some(false));
        assert!(matches!(surface.calls.last(), Some(SurfaceCall::Place(_))));
    }
}
