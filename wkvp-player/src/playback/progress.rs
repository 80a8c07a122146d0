//! Progress persistence coordination
//!
//! Debounces frequent clock updates into infrequent persistence calls, with
//! an explicit replaceable timer slot: each advance tick aborts the pending
//! timer and arms a fresh one carrying the latest position, so N ticks
//! within one debounce window collapse into exactly one persist. Stream end
//! persists immediately and unconditionally with completed semantics.
//!
//! Persistence failures are logged and swallowed; they never interrupt
//! playback.

use crate::store::ProgressStore;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;
use wkvp_common::events::{EventBus, PlayerEvent};
use wkvp_common::types::ProgressUpdate;

/// Debounced persistence of playback position for one (user, media) pair
pub struct ProgressCoordinator<P: ProgressStore + 'static> {
    store: Arc<P>,
    user_id: Uuid,
    media_id: Uuid,
    bus: EventBus,

    /// Pending debounce timer; replaced on every advance tick
    pending: Arc<Mutex<Option<JoinHandle<()>>>>,

    /// Cleared by shutdown; gates the debounce callback
    alive: Arc<AtomicBool>,

    debounce: Duration,
    restore_min_secs: f64,

    /// position/duration at or above this counts as completed
    completion_ratio: f64,
}

impl<P: ProgressStore + 'static> ProgressCoordinator<P> {
    pub fn new(
        store: Arc<P>,
        user_id: Uuid,
        media_id: Uuid,
        bus: EventBus,
        debounce_secs: f64,
        restore_min_secs: f64,
        completion_ratio: f64,
    ) -> Self {
        Self {
            store,
            user_id,
            media_id,
            bus,
            pending: Arc::new(Mutex::new(None)),
            alive: Arc::new(AtomicBool::new(true)),
            debounce: Duration::from_secs_f64(debounce_secs),
            restore_min_secs,
            completion_ratio,
        }
    }

    /// Record the latest position; persists once the debounce window closes
    ///
    /// Called on every advance classification, which can be tens of Hz.
    pub fn note_position(&self, position_secs: f64, duration_secs: f64) {
        let store = Arc::clone(&self.store);
        let alive = Arc::clone(&self.alive);
        let bus = self.bus.clone();
        let update = ProgressUpdate {
            user_id: self.user_id,
            media_id: self.media_id,
            position_secs,
            duration_secs,
        };
        let debounce = self.debounce;
        // The store derives the completed flag the same way; the event
        // mirrors what the record will say
        let completed = duration_secs > 0.0
            && position_secs / duration_secs >= self.completion_ratio;

        let task = tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            if !alive.load(Ordering::SeqCst) {
                return;
            }
            match store.save(&update).await {
                Ok(()) => {
                    debug!(position = update.position_secs, "progress persisted");
                    bus.emit_lossy(PlayerEvent::ProgressSaved {
                        position_secs: update.position_secs,
                        completed,
                        timestamp: chrono::Utc::now(),
                    });
                }
                // Swallowed: persistence must never interrupt playback
                Err(e) => warn!("progress persist failed: {}", e),
            }
        });

        if let Some(prev) = self.pending.lock().unwrap().replace(task) {
            prev.abort();
        }
    }

    /// Unconditional, non-debounced persist on stream end
    ///
    /// Persists position == duration; the store marks the record completed.
    pub fn finish(&self, duration_secs: f64) {
        if let Some(prev) = self.pending.lock().unwrap().take() {
            prev.abort();
        }

        let store = Arc::clone(&self.store);
        let bus = self.bus.clone();
        let update = ProgressUpdate {
            user_id: self.user_id,
            media_id: self.media_id,
            position_secs: duration_secs,
            duration_secs,
        };

        // Fire-and-forget: resolution never gates playback
        tokio::spawn(async move {
            match store.save(&update).await {
                Ok(()) => {
                    info!("completion persisted at {}s", update.duration_secs);
                    bus.emit_lossy(PlayerEvent::ProgressSaved {
                        position_secs: update.position_secs,
                        completed: true,
                        timestamp: chrono::Utc::now(),
                    });
                }
                Err(e) => warn!("completion persist failed: {}", e),
            }
        });
    }

    /// One restore read on mount
    ///
    /// Returns the stored position only when the record exists, is not
    /// completed, and exceeds the minimum threshold (trivial positions are
    /// not worth restoring). Read failures degrade to a fresh start.
    pub async fn restore(&self) -> Option<f64> {
        match self.store.load(self.media_id, self.user_id).await {
            Ok(Some(record)) => {
                if !record.completed && record.position_secs > self.restore_min_secs {
                    info!(position = record.position_secs, "restoring playback position");
                    Some(record.position_secs)
                } else {
                    None
                }
            }
            Ok(None) => None,
            Err(e) => {
                warn!("progress restore failed, starting from zero: {}", e);
                None
            }
        }
    }

    /// Cancel any pending debounce timer; no persist fires after this
    pub fn shutdown(&self) {
        self.alive.store(false, Ordering::SeqCst);
        if let Some(prev) = self.pending.lock().unwrap().take() {
            prev.abort();
        }
    }
}

impl<P: ProgressStore + 'static> Drop for ProgressCoordinator<P> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
