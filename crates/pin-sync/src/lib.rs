//! Pin Sync
//!
//! Everything stateful about the map board, free of any browser types:
//! - model: pins as decoded from the store
//! - view_state: markers kept in step with the latest snapshot
//! - feed: UI intents to store writes, stream events to snapshots
//! - add_mode: the click-to-place interaction

mod add_mode;
mod error;
mod feed;
mod icon;
mod model;
mod snapshot;
mod stream;
mod view_state;

#[cfg(test)]
mod testing;

pub use add_mode::{AddPinMode, Panning, PinDraft};
pub use error::{PinError, PinResult};
pub use feed::{FeedUpdate, PinFeedAdapter, PinWriter};
pub use icon::{icon_for, MarkerIcon};
pub use model::{Category, Coords, NewPin, Pin, PinId, PinPatch, UNTITLED};
pub use snapshot::PinSnapshot;
pub use stream::{CollectionMirror, FeedStatus, StreamEvent};
pub use view_state::{MapSurface, ReconcileOutcome, SidebarEntry, ViewStateStore};
