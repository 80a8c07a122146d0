//! Event system for the WKVP player engine
//!
//! The engine communicates upward with the embedding UI through a broadcast
//! EventBus rather than direct callbacks:
//! - **EventBus** (tokio::broadcast): one-to-many event fan-out
//! - Emission is non-blocking and lossy-tolerant; a slow subscriber never
//!   gates playback

use crate::types::OverlayEntry;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Error classification carried by [`PlayerEvent::EngineError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    /// Overlay text rejected before any network call
    Validation,
    /// Store submission or persistence failed (retryable)
    Network,
    /// An internal consistency check fired
    Invariant,
}

/// Events emitted by the player engine
///
/// Broadcast via EventBus; serializable so the embedder can forward them
/// over SSE or IPC unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerEvent {
    /// A freshly authored overlay was accepted by the store and displayed
    OverlaySubmitted {
        /// Canonical entry as returned by the store
        entry: OverlayEntry,
        /// When the submission completed
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Stored progress was restored; the embedder must seek the media element
    ///
    /// The engine has already reset its clock to this position, so the
    /// subsequent seek events do not flood-display skipped overlays.
    RestoreApplied {
        /// Position in seconds to seek to
        position_secs: f64,
        /// When the restore read completed
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A progress persistence call was issued
    ProgressSaved {
        /// Persisted position in seconds
        position_secs: f64,
        /// Whether this persist marked the stream completed
        completed: bool,
        /// When the persist was issued
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// The media stream ended and the completed persist was issued
    PlaybackCompleted {
        /// Media target that completed
        media_id: Uuid,
        /// When the stream ended
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A failure the UI may want to surface (submission errors are also
    /// returned synchronously to the caller)
    EngineError {
        kind: ErrorKind,
        detail: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}

/// Broadcast event bus for player events
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<PlayerEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new EventBus with the specified channel capacity
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    ///
    /// Events emitted before subscription are not received.
    pub fn subscribe(&self) -> broadcast::Receiver<PlayerEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns `Ok(subscriber_count)` if at least one subscriber exists,
    /// `Err` otherwise.
    #[allow(clippy::result_large_err)]
    pub fn emit(
        &self,
        event: PlayerEvent,
    ) -> std::result::Result<usize, broadcast::error::SendError<PlayerEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, ignoring the absence of subscribers
    ///
    /// Used on hot paths where "nobody is listening" is not an error.
    pub fn emit_lossy(&self, event: PlayerEvent) {
        let _ = self.tx.send(event);
    }

    /// Channel capacity this bus was created with
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}
