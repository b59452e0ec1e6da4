//! Realtime Database Bindings
//!
//! REST writes and the streaming subscription for the pin collection.

mod writes;
mod subscription;

pub use writes::*;
pub use subscription::*;
