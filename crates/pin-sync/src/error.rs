//! Error type shared by the pin board.

use serde::{Deserialize, Serialize};

/// Common result type for pin operations
pub type PinResult<T> = Result<T, PinError>;

/// Everything that can go wrong between the UI, the map and the store.
///
/// None of these are fatal: at worst the view stays out of date until the
/// next notification arrives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PinError {
    /// Rejected before any write (e.g. empty title)
    InvalidInput(String),
    /// A store write failed
    Write(String),
    /// A stored record that cannot be turned into a pin
    Malformed(String),
    /// A realtime stream event that could not be decoded
    Stream(String),
    /// Configuration could not be loaded
    Config(String),
}

impl std::fmt::Display for PinError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PinError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            PinError::Write(msg) => write!(f, "Write failed: {}", msg),
            PinError::Malformed(msg) => write!(f, "Malformed record: {}", msg),
            PinError::Stream(msg) => write!(f, "Stream error: {}", msg),
            PinError::Config(msg) => write!(f, "Config error: {}", msg),
        }
    }
}

impl std::error::Error for PinError {}
