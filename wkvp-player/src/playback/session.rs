//! Player session: one instance per mounted player
//!
//! Owns every piece of engine state explicitly (clock, timeline, scheduler,
//! lifecycle, progress coordinator) instead of scattering it across event
//! handler closures. The embedder feeds media-element events in through
//! [`PlayerSession::handle_event`] and listens on the [`EventBus`] for
//! upward-facing events.
//!
//! Classification and scheduling for a tick complete synchronously inside
//! `handle_event` before it returns; there is no await point between
//! classifying a position update and handing entries to the lifecycle
//! manager, so events are never reentrant within the engine.

use crate::error::{Error, Result};
use crate::playback::clock::{ClockTracker, ClockTransition};
use crate::playback::lifecycle::{OverlayLifecycle, OverlaySurface};
use crate::playback::progress::ProgressCoordinator;
use crate::playback::scheduler::OverlayScheduler;
use crate::playback::timeline::OverlayTimeline;
use crate::store::{OverlayStore, ProgressStore};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;
use wkvp_common::events::{ErrorKind, EventBus, PlayerEvent};
use wkvp_common::params::EngineParams;
use wkvp_common::types::{LaneKind, OverlayEntry, OverlaySubmission};

/// Media-element events the session reacts to
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MediaEvent {
    /// Periodic position report (timeupdate; can be tens of Hz)
    TimeUpdate { position: f64 },
    /// The player entered a seek; scheduling is suspended until completion
    SeekStarted,
    /// The seek finished at this position
    SeekCompleted { position: f64 },
    /// Stream duration became known; triggers the one-time restore read
    MetadataLoaded { duration: f64 },
    /// The stream played to its end
    Ended,
}

/// Per-player-instance engine state
///
/// Owns its collections exclusively; no cross-session sharing.
pub struct PlayerSession<S, O, P>
where
    S: OverlaySurface,
    O: OverlayStore,
    P: ProgressStore + 'static,
{
    params: EngineParams,
    user_id: Uuid,
    media_id: Uuid,

    clock: ClockTracker,
    timeline: OverlayTimeline,
    scheduler: OverlayScheduler,
    lifecycle: OverlayLifecycle<S>,
    progress: ProgressCoordinator<P>,

    overlay_store: Arc<O>,
    progress_store: Arc<P>,
    bus: EventBus,

    /// Known once metadata loads; progress persists are skipped before that
    duration_secs: Option<f64>,

    /// When disabled, the clock and progress keep running but nothing is
    /// displayed
    overlays_enabled: bool,

    /// The restore read runs at most once per media target
    restore_done: bool,

    /// Fetched entry lists per media target, avoiding refetch when the
    /// embedder flips between targets
    overlay_cache: HashMap<Uuid, Vec<OverlayEntry>>,
}

impl<S, O, P> PlayerSession<S, O, P>
where
    S: OverlaySurface,
    O: OverlayStore,
    P: ProgressStore + 'static,
{
    pub fn new(
        params: EngineParams,
        user_id: Uuid,
        media_id: Uuid,
        surface: Arc<S>,
        overlay_store: Arc<O>,
        progress_store: Arc<P>,
        bus: EventBus,
    ) -> Self {
        let clock = ClockTracker::new(params.continuity_threshold_secs, params.epsilon_secs);
        let scheduler = OverlayScheduler::new(params.seek_tolerance_secs);
        let lifecycle = OverlayLifecycle::new(
            surface,
            params.scroll_duration_secs,
            params.bottom_margin_px,
        );
        let progress = ProgressCoordinator::new(
            Arc::clone(&progress_store),
            user_id,
            media_id,
            bus.clone(),
            params.persist_debounce_secs,
            params.restore_min_secs,
            params.completion_ratio,
        );

        Self {
            params,
            user_id,
            media_id,
            clock,
            timeline: OverlayTimeline::default(),
            scheduler,
            lifecycle,
            progress,
            overlay_store,
            progress_store,
            bus,
            duration_secs: None,
            overlays_enabled: true,
            restore_done: false,
            overlay_cache: HashMap::new(),
        }
    }

    /// Fetch the entry collection for the current media target
    ///
    /// Consumed once per target; later calls for the same target are served
    /// from the session cache.
    pub async fn load_overlays(&mut self) -> Result<()> {
        if let Some(cached) = self.overlay_cache.get(&self.media_id) {
            debug!(media_id = %self.media_id, count = cached.len(), "overlays served from cache");
            self.timeline.replace(cached.clone());
            return Ok(());
        }

        match self.overlay_store.fetch_for_media(self.media_id).await {
            Ok(entries) => {
                debug!(media_id = %self.media_id, count = entries.len(), "overlays loaded");
                self.overlay_cache.insert(self.media_id, entries.clone());
                self.timeline.replace(entries);
                Ok(())
            }
            Err(e) => {
                warn!("overlay fetch failed: {}", e);
                self.bus.emit_lossy(PlayerEvent::EngineError {
                    kind: ErrorKind::Network,
                    detail: e.to_string(),
                    timestamp: chrono::Utc::now(),
                });
                Err(e)
            }
        }
    }

    /// React to one media-element event
    pub async fn handle_event(&mut self, event: MediaEvent) {
        match event {
            MediaEvent::TimeUpdate { position } => self.on_time_update(position),
            MediaEvent::SeekStarted => {
                self.clock.begin_seek();
                // Cleared here so entries skipped over become eligible again
                self.scheduler.clear_displayed();
            }
            MediaEvent::SeekCompleted { position } => {
                // Landing position is recorded directly, never replayed
                // through advance logic; entries within the tolerance
                // window around the landing point become due now
                let transition = self.clock.complete_seek(position);
                if self.overlays_enabled {
                    for entry in self.scheduler.collect_due(transition, &self.timeline) {
                        self.lifecycle.display(&entry);
                    }
                }
            }
            MediaEvent::MetadataLoaded { duration } => {
                self.duration_secs = Some(duration);
                self.try_restore().await;
            }
            MediaEvent::Ended => {
                let duration = self.duration_secs.unwrap_or(self.clock.last_position());
                self.progress.finish(duration);
                self.bus.emit_lossy(PlayerEvent::PlaybackCompleted {
                    media_id: self.media_id,
                    timestamp: chrono::Utc::now(),
                });
            }
        }
    }

    /// Classification and scheduling for one tick, fully synchronous
    fn on_time_update(&mut self, position: f64) {
        let transition = self.clock.observe(position);

        if let ClockTransition::Advance { to, .. } = transition {
            if let Some(duration) = self.duration_secs {
                self.progress.note_position(to, duration);
            }
        }

        if !self.overlays_enabled {
            return;
        }

        for entry in self.scheduler.collect_due(transition, &self.timeline) {
            self.lifecycle.display(&entry);
        }
    }

    /// One-time restore read once metadata is available
    async fn try_restore(&mut self) {
        if self.restore_done {
            return;
        }
        self.restore_done = true;

        if let Some(position) = self.progress.restore().await {
            // Reset the clock before the embedder seeks: otherwise the next
            // tick would sweep [0, position] as one giant advance and
            // flood-display every overlay in between
            self.clock.force_position(position);
            self.bus.emit_lossy(PlayerEvent::RestoreApplied {
                position_secs: position,
                timestamp: chrono::Utc::now(),
            });
        }
    }

    /// Author a new overlay at the current clock position
    ///
    /// On success the entry joins the timeline (sorted) and is displayed
    /// immediately, bypassing the DisplayedSet entirely: it was authored at
    /// the current position and has never been scheduled before. On store
    /// rejection the timeline is not mutated and the error is returned so
    /// the UI can offer a retry.
    pub async fn submit_overlay(&mut self, text: &str, position: f64) -> Result<OverlayEntry> {
        let trimmed = text.trim();
        let char_count = trimmed.chars().count();
        if char_count == 0 || char_count > self.params.max_text_chars {
            let err = Error::Validation(format!(
                "overlay text must be 1..={} characters, got {}",
                self.params.max_text_chars, char_count
            ));
            self.bus.emit_lossy(PlayerEvent::EngineError {
                kind: ErrorKind::Validation,
                detail: err.to_string(),
                timestamp: chrono::Utc::now(),
            });
            return Err(err);
        }

        let submission = OverlaySubmission {
            media_id: self.media_id,
            user_id: self.user_id,
            text: trimmed.to_string(),
            timestamp: position,
            color: "#FFFFFF".to_string(),
            font_size: 20,
            lane: LaneKind::Scroll,
        };

        let entry = match self.overlay_store.submit(&submission).await {
            Ok(entry) => entry,
            Err(e) => {
                warn!("overlay submission failed: {}", e);
                self.bus.emit_lossy(PlayerEvent::EngineError {
                    kind: ErrorKind::Network,
                    detail: e.to_string(),
                    timestamp: chrono::Utc::now(),
                });
                return Err(e);
            }
        };

        self.timeline.insert(entry.clone());
        if let Some(cached) = self.overlay_cache.get_mut(&self.media_id) {
            cached.push(entry.clone());
        }

        // Instant feedback for the author, ahead of any scheduling tick
        self.lifecycle.display(&entry);

        self.bus.emit_lossy(PlayerEvent::OverlaySubmitted {
            entry: entry.clone(),
            timestamp: chrono::Utc::now(),
        });
        Ok(entry)
    }

    /// Switch to a new media target
    ///
    /// Discards the timeline, DisplayedSet, and every live overlay, rebuilds
    /// the progress coordinator for the new pair, and fetches the new entry
    /// collection.
    pub async fn change_media(&mut self, media_id: Uuid) -> Result<()> {
        self.lifecycle.shutdown();
        self.lifecycle.restart();
        self.scheduler.reset();
        self.timeline = OverlayTimeline::default();

        self.progress.shutdown();
        self.progress = ProgressCoordinator::new(
            Arc::clone(&self.progress_store),
            self.user_id,
            media_id,
            self.bus.clone(),
            self.params.persist_debounce_secs,
            self.params.restore_min_secs,
            self.params.completion_ratio,
        );

        self.media_id = media_id;
        self.duration_secs = None;
        self.restore_done = false;
        self.clock = ClockTracker::new(
            self.params.continuity_threshold_secs,
            self.params.epsilon_secs,
        );

        self.load_overlays().await
    }

    /// Toggle overlay display; the clock and progress keep running
    pub fn set_overlays_enabled(&mut self, enabled: bool) {
        self.overlays_enabled = enabled;
    }

    /// Cancel all pending timers and remove all live overlays (unmount)
    pub fn shutdown(&self) {
        self.lifecycle.shutdown();
        self.progress.shutdown();
    }

    pub fn media_id(&self) -> Uuid {
        self.media_id
    }

    pub fn last_position(&self) -> f64 {
        self.clock.last_position()
    }

    /// True while the entry is animating on screen
    pub fn is_overlay_active(&self, id: Uuid) -> bool {
        self.lifecycle.is_active(id)
    }

    /// Number of overlays currently animating
    pub fn active_overlay_count(&self) -> usize {
        self.lifecycle.active_count()
    }

    /// The sorted entry collection (for inspection by the embedder)
    pub fn timeline(&self) -> &OverlayTimeline {
        &self.timeline
    }

    /// Subscribe to upward-facing player events
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<PlayerEvent> {
        self.bus.subscribe()
    }
}
