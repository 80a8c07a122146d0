//! # WKVP Common Library (wkvp-common)
//!
//! Shared types for the WKVP overlay and progress engine.
//!
//! **Purpose:** Overlay entry and progress record types, engine parameters,
//! the player event bus, and common error types used by wkvp-player.

pub mod error;
pub mod events;
pub mod params;
pub mod types;

pub use error::{Error, Result};
pub use events::{ErrorKind, EventBus, PlayerEvent};
pub use params::EngineParams;
pub use types::{LaneKind, OverlayEntry, OverlaySubmission, ProgressRecord, ProgressUpdate};
