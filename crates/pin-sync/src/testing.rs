//! Test doubles for the map surface and the remote store.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};

use serde_json::{Map, Value};

use crate::feed::PinWriter;
use crate::icon::MarkerIcon;
use crate::model::{Coords, NewPin, Pin, PinId, PinPatch};
use crate::snapshot::PinSnapshot;
use crate::view_state::MapSurface;

#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCall {
    Place(PinId),
    Update(PinId),
    Remove(PinId),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedMarker {
    pub id: PinId,
    pub coords: Coords,
    pub title: String,
    pub note: String,
    pub glyph: &'static str,
    pub class_name: String,
}

impl PlacedMarker {
    fn new(id: &PinId, pin: &Pin, icon: &MarkerIcon) -> Self {
        Self {
            id: id.clone(),
            coords: pin.coords,
            title: pin.title.clone(),
            note: pin.note.clone(),
            glyph: icon.glyph,
            class_name: icon.class_name.clone(),
        }
    }
}

/// Map surface that records what it was asked to draw
#[derive(Default)]
pub struct RecordingSurface {
    next_handle: u32,
    markers: HashMap<u32, PlacedMarker>,
    pub calls: Vec<SurfaceCall>,
    pub focused: RefCell<Vec<PinId>>,
    pub panning: Cell<Option<bool>>,
    /// Number of upcoming placements that fail
    pub failing_places: usize,
}

impl RecordingSurface {
    pub fn placed(&self, id: &PinId) -> Option<&PlacedMarker> {
        self.markers.values().find(|m| &m.id == id)
    }

    pub fn live_markers(&self) -> usize {
        self.markers.len()
    }
}

impl MapSurface for RecordingSurface {
    type Marker = u32;

    fn place_marker(&mut self, id: &PinId, pin: &Pin, icon: &MarkerIcon) -> Option<u32> {
        if self.failing_places > 0 {
            self.failing_places -= 1;
            return None;
        }
        self.next_handle += 1;
        self.markers.insert(self.next_handle, PlacedMarker::new(id, pin, icon));
        self.calls.push(SurfaceCall::Place(id.clone()));
        Some(self.next_handle)
    }

    fn update_marker(&mut self, marker: &u32, pin: &Pin, icon: &MarkerIcon) {
        if let Some(placed) = self.markers.get_mut(marker) {
            let id = placed.id.clone();
            *placed = PlacedMarker::new(&id, pin, icon);
            self.calls.push(SurfaceCall::Update(id));
        }
    }

    fn remove_marker(&mut self, marker: u32) {
        if let Some(placed) = self.markers.remove(&marker) {
            self.calls.push(SurfaceCall::Remove(placed.id));
        }
    }

    fn focus_marker(&self, marker: &u32) {
        if let Some(placed) = self.markers.get(marker) {
            self.focused.borrow_mut().push(placed.id.clone());
        }
    }

    fn set_panning(&self, enabled: bool) {
        self.panning.set(Some(enabled));
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StoreWrite {
    Push(PinId),
    Update(PinId, Value),
    Remove(PinId),
}

/// In-memory store applying writes the way the database does
#[derive(Default)]
pub struct MemoryStore {
    next_id: Cell<u32>,
    records: RefCell<BTreeMap<PinId, Value>>,
    pub writes: RefCell<Vec<StoreWrite>>,
}

impl MemoryStore {
    pub fn snapshot(&self) -> PinSnapshot {
        let collection: Map<String, Value> = self
            .records
            .borrow()
            .iter()
            .map(|(id, record)| (id.to_string(), record.clone()))
            .collect();
        PinSnapshot::from_value(&Value::Object(collection))
    }

    pub fn record(&self, id: &PinId) -> Option<Value> {
        self.records.borrow().get(id).cloned()
    }

    pub fn last_id(&self) -> Option<PinId> {
        self.records.borrow().keys().next_back().cloned()
    }
}

impl PinWriter for MemoryStore {
    fn push(&self, record: NewPin) {
        self.next_id.set(self.next_id.get() + 1);
        let id = PinId::new(format!("-P{:04}", self.next_id.get()));
        let value = serde_json::to_value(&record).unwrap();
        self.records.borrow_mut().insert(id.clone(), value);
        self.writes.borrow_mut().push(StoreWrite::Push(id));
    }

    fn update(&self, id: &PinId, patch: PinPatch) {
        let patch = serde_json::to_value(&patch).unwrap();
        let mut records = self.records.borrow_mut();
        let record = records
            .entry(id.clone())
            .or_insert_with(|| Value::Object(Map::new()));
        if let (Some(target), Some(fields)) = (record.as_object_mut(), patch.as_object()) {
            for (key, value) in fields {
                target.insert(key.clone(), value.clone());
            }
        }
        self.writes.borrow_mut().push(StoreWrite::Update(id.clone(), patch));
    }

    fn remove(&self, id: &PinId) {
        self.records.borrow_mut().remove(id);
        self.writes.borrow_mut().push(StoreWrite::Remove(id.clone()));
    }
}
