//! Full view of the pin collection as last seen from the store.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::model::{Pin, PinId};

/// Pins keyed by id, iterated in store key order (see `PinId`'s ordering)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PinSnapshot {
    pins: BTreeMap<PinId, Pin>,
}

impl PinSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode the whole collection value.
    ///
    /// Records that cannot be placed are left out and logged; they reappear as
    /// soon as a later write makes them valid.
    pub fn from_value(value: &Value) -> Self {
        let mut snapshot = Self::new();
        match value {
            Value::Null => {}
            Value::Object(children) => {
                for (key, child) in children {
                    snapshot.decode_child(PinId::from(key.as_str()), child);
                }
            }
            // The database returns objects with small integer keys as arrays
            Value::Array(children) => {
                for (index, child) in children.iter().enumerate() {
                    if !child.is_null() {
                        snapshot.decode_child(PinId::new(index.to_string()), child);
                    }
                }
            }
            other => log::warn!("ignoring non-collection pins value: {}", other),
        }
        snapshot
    }

    fn decode_child(&mut self, id: PinId, child: &Value) {
        match Pin::from_value(child) {
            Ok(pin) => {
                self.pins.insert(id, pin);
            }
            Err(e) => log::warn!("skipping pin {}: {}", id, e),
        }
    }

    pub fn insert(&mut self, id: PinId, pin: Pin) -> Option<Pin> {
        self.pins.insert(id, pin)
    }

    pub fn get(&self, id: &PinId) -> Option<&Pin> {
        self.pins.get(id)
    }

    pub fn contains(&self, id: &PinId) -> bool {
        self.pins.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PinId, &Pin)> {
        self.pins.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &PinId> {
        self.pins.keys()
    }

    pub fn len(&self) -> usize {
        self.pins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pins.is_empty()
    }
}

impl FromIterator<(PinId, Pin)> for PinSnapshot {
    fn from_iter<I: IntoIterator<Item = (PinId, Pin)>>(iter: I) -> Self {
        Self {
            pins: iter.into_iter().collect(),
        }
    }
}
