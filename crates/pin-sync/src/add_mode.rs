//! Add-pin interaction mode
//!
//! `Idle` → toggle → `Armed` → map click → `ModalOpen` → save/cancel → `Idle`.

use crate::error::PinResult;
use crate::feed::{PinFeedAdapter, PinWriter};
use crate::model::{Category, Coords};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum AddPinMode {
    #[default]
    Idle,
    /// Next map click drops a pin
    Armed,
    /// Coordinates captured, waiting for the creation form
    ModalOpen { coords: Coords },
}

/// Panning change the map must apply after a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panning {
    Enable,
    Disable,
}

impl Panning {
    pub fn enabled(self) -> bool {
        self == Panning::Enable
    }
}

/// Fields of the creation form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PinDraft {
    pub title: String,
    pub note: String,
    pub category: Category,
}

impl AddPinMode {
    pub fn is_armed(&self) -> bool {
        matches!(self, AddPinMode::Armed)
    }

    pub fn is_modal_open(&self) -> bool {
        matches!(self, AddPinMode::ModalOpen { .. })
    }

    /// Toolbar button
    pub fn toggle(&mut self) {
        *self = match *self {
            AddPinMode::Idle => AddPinMode::Armed,
            AddPinMode::Armed => AddPinMode::Idle,
            open @ AddPinMode::ModalOpen { .. } => open,
        };
    }

    /// Map click; only acts while armed
    pub fn map_click(&mut self, coords: Coords) -> Option<Panning> {
        if !self.is_armed() {
            return None;
        }
        *self = AddPinMode::ModalOpen { coords };
        Some(Panning::Disable)
    }

    /// Close the form without writing anything
    pub fn cancel(&mut self) -> Option<Panning> {
        if !self.is_modal_open() {
            return None;
        }
        *self = AddPinMode::Idle;
        Some(Panning::Enable)
    }

    /// Commit the form. On a validation error the form stays open.
    pub fn save<W: PinWriter>(&mut self, feed: &PinFeedAdapter<W>, draft: &PinDraft) -> PinResult<Option<Panning>> {
        let AddPinMode::ModalOpen { coords } = *self else {
            return Ok(None);
        };
        feed.create_pin(coords, &draft.title, &draft.note, draft.category)?;
        *self = AddPinMode::Idle;
        Ok(Some(Panning::Enable))
    }
}
