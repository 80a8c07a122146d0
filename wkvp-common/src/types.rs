//! Core data types for the overlay and progress engine
//!
//! These are the wire types exchanged with the external REST store and the
//! in-memory representation used by the scheduler. Entries are immutable once
//! created; the collection for a media target is discarded on unmount or when
//! the target changes.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lane placement kind for an overlay entry
///
/// Opaque to the scheduler; passed through to the rendering surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LaneKind {
    /// Right-to-left traversal at a random vertical offset
    Scroll,
    /// Pinned near the top of the viewport
    Top,
    /// Pinned above the control-bar margin
    Bottom,
}

impl Default for LaneKind {
    fn default() -> Self {
        LaneKind::Scroll
    }
}

/// A timestamped overlay annotation (danmaku)
///
/// Due for display when the media clock reaches `timestamp`. The id is
/// server-assigned and stable across the entry's lifetime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayEntry {
    /// Server-assigned unique identifier
    pub id: Uuid,

    /// Display content, 1..=100 characters
    pub text: String,

    /// Media-clock position in seconds (>= 0) at which the entry is due
    pub timestamp: f64,

    /// Display color (CSS-style string, opaque to the engine)
    #[serde(default = "default_color")]
    pub color: String,

    /// Font size in pixels (opaque to the engine)
    #[serde(default = "default_font_size")]
    pub font_size: u32,

    /// Lane placement kind
    #[serde(default)]
    pub lane: LaneKind,
}

fn default_color() -> String {
    "#FFFFFF".to_string()
}

fn default_font_size() -> u32 {
    20
}

/// Request body for `POST /overlays`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverlaySubmission {
    pub media_id: Uuid,
    pub user_id: Uuid,
    pub text: String,
    pub timestamp: f64,
    pub color: String,
    pub font_size: u32,
    pub lane: LaneKind,
}

/// Stored playback progress for a (user, media) pair
///
/// `completed` becomes true once position/duration reaches the completion
/// ratio (default 0.9) or on stream end; completed records are never offered
/// for restore.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub position_secs: f64,
    pub duration_secs: f64,
    pub completed: bool,
}

/// Request body for `POST /progress`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressUpdate {
    pub user_id: Uuid,
    pub media_id: Uuid,
    pub position_secs: f64,
    pub duration_secs: f64,
}
