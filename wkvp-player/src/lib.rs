//! # WKVP Player Engine (wkvp-player)
//!
//! Time-synchronized overlay (danmaku) scheduling and playback-progress
//! persistence for a video player.
//!
//! **Purpose:** Track the media clock across normal advance and arbitrary
//! seeks, decide exactly once which overlay entries to surface for any clock
//! interval, render and retire transient visuals without accumulation, and
//! persist playback position with debouncing and completion semantics.
//!
//! **Architecture:** Single `PlayerSession` per player instance owning all
//! mutable state; rendering is abstracted behind the [`OverlaySurface`]
//! capability so the engine runs without any browser-equivalent runtime.

pub mod client;
pub mod error;
pub mod playback;
pub mod store;

pub use client::HttpStoreClient;
pub use error::{Error, Result};
pub use playback::lifecycle::{OverlayHandle, OverlaySurface, SpawnSpec};
pub use playback::session::{MediaEvent, PlayerSession};
pub use store::{OverlayStore, ProgressStore};
