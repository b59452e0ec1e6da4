//! Pin Entity
//!
//! The only entity of the board, plus the record shapes written to the store.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{PinError, PinResult};

/// Title shown for pins stored without one
pub const UNTITLED: &str = "Untitled";

/// Store-generated pin key.
///
/// Ordered the way the database orders keys: 32-bit integer keys first, by
/// value, then everything else by string. Push ids sort in creation order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PinId(String);

impl PinId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric value of a canonical integer key ("7", not "07")
    fn as_index(&self) -> Option<i32> {
        let n: i32 = self.0.parse().ok()?;
        (n.to_string() == self.0).then_some(n)
    }
}

impl Ord for PinId {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        match (self.as_index(), other.as_index()) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for PinId {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl From<&str> for PinId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for PinId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for PinId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A point in the map image's own coordinate space (`lat` = y, `lng` = x)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coords {
    pub lat: f64,
    pub lng: f64,
}

impl Coords {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    fn from_value(value: &Value) -> Option<Self> {
        let lat = value.get("lat")?.as_f64()?;
        let lng = value.get("lng")?.as_f64()?;
        Some(Self { lat, lng })
    }
}

/// Pin category, drives the marker glyph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Quest,
    Hostile,
    Clue,
    Safe,
    /// Absent or unrecognised category
    #[default]
    Default,
}

impl Category {
    /// Categories a user can pick when creating a pin, in form order
    pub const SELECTABLE: [Category; 4] = [
        Category::Quest,
        Category::Hostile,
        Category::Clue,
        Category::Safe,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Quest => "quest",
            Category::Hostile => "hostile",
            Category::Clue => "clue",
            Category::Safe => "safe",
            Category::Default => "default",
        }
    }

    /// Lenient parse: anything unknown becomes `Default`
    pub fn from_str(s: &str) -> Self {
        match s {
            "quest" => Category::Quest,
            "hostile" => Category::Hostile,
            "clue" => Category::Clue,
            "safe" => Category::Safe,
            _ => Category::Default,
        }
    }

    pub fn from_opt(s: Option<&str>) -> Self {
        s.map(Category::from_str).unwrap_or_default()
    }

    /// Label for the creation form
    pub fn label(&self) -> &'static str {
        match self {
            Category::Quest => "Quest",
            Category::Hostile => "Hostile",
            Category::Clue => "Clue",
            Category::Safe => "Safe Haven",
            Category::Default => "Other",
        }
    }
}

/// A pin as held by the view, with every optional field already defaulted
#[derive(Debug, Clone, PartialEq)]
pub struct Pin {
    pub coords: Coords,
    pub title: String,
    pub note: String,
    pub category: Category,
}

impl Pin {
    pub fn new(coords: Coords, title: impl Into<String>, note: impl Into<String>, category: Category) -> Self {
        Self {
            coords,
            title: title.into(),
            note: note.into(),
            category,
        }
    }

    /// Decode a raw store record.
    ///
    /// The store enforces no schema: a missing or non-string title, note or
    /// category is defaulted here. Only a record without usable coordinates is
    /// rejected, since it cannot be placed.
    pub fn from_value(value: &Value) -> PinResult<Self> {
        if !value.is_object() {
            return Err(PinError::Malformed(format!("expected an object, got {}", value)));
        }
        let coords = value
            .get("coords")
            .and_then(Coords::from_value)
            .ok_or_else(|| PinError::Malformed("missing or invalid coords".to_string()))?;

        let title = value
            .get("title")
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
            .unwrap_or(UNTITLED)
            .to_string();
        let note = value
            .get("note")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let category = Category::from_opt(value.get("category").and_then(Value::as_str));

        Ok(Self { coords, title, note, category })
    }
}

/// Record written when a pin is created
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewPin {
    pub coords: Coords,
    pub title: String,
    pub note: String,
    pub category: Category,
}

/// Partial update; only the fields that are set are sent
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PinPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coords: Option<Coords>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl PinPatch {
    pub fn note(note: impl Into<String>) -> Self {
        Self {
            note: Some(note.into()),
            ..Default::default()
        }
    }

    pub fn coords(coords: Coords) -> Self {
        Self {
            coords: Some(coords),
            ..Default::default()
        }
    }
}
