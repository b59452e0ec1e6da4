//! UI Components
//!
//! Leptos components around the map.

mod map_view;
mod notes_sidebar;
mod pin_modal;
mod toolbar;

pub use map_view::MapView;
pub use notes_sidebar::NotesSidebar;
pub use pin_modal::PinModal;
pub use toolbar::Toolbar;
