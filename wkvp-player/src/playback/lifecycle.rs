//! Overlay lifecycle: spawn, animate, retire
//!
//! Instantiates one transient visual per displayed entry through the
//! [`OverlaySurface`] capability, schedules its retirement after exactly one
//! traversal, and bounds the number of concurrently live visuals via the
//! ActiveSet. The engine never touches a rendering runtime directly, so all
//! of this is unit-testable with a recording fake surface.
//!
//! Every retirement timer is guarded by a liveness flag: a timer firing
//! after [`OverlayLifecycle::shutdown`] is a no-op.

use rand::Rng;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;
use uuid::Uuid;
use wkvp_common::types::{LaneKind, OverlayEntry};

/// Opaque handle to one rendered overlay element, issued by the surface
pub type OverlayHandle = u64;

/// Everything a surface needs to render one overlay traversal
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnSpec {
    pub text: String,
    pub color: String,
    pub font_size_px: u32,
    pub lane: LaneKind,
    /// Vertical offset from the viewport top (pixels)
    pub top_px: u32,
    /// Traversal duration; the element is removed when it elapses
    pub duration: Duration,
}

/// Rendering capability the embedder provides
///
/// `spawn` returns `None` when the container is not mounted (player torn
/// down mid-animation); the engine treats that as a silent no-op rather
/// than an error.
pub trait OverlaySurface: Send + Sync + 'static {
    /// Instantiate a visual element; `None` if the surface is unmounted
    fn spawn(&self, entry: &OverlayEntry, spec: &SpawnSpec) -> Option<OverlayHandle>;

    /// Tear down a previously spawned element. Must tolerate handles whose
    /// element is already gone.
    fn remove(&self, handle: OverlayHandle);

    /// Current viewport height in pixels (for lane placement)
    fn viewport_height(&self) -> u32;
}

/// Manages the ActiveSet and retirement timers for live overlays
pub struct OverlayLifecycle<S: OverlaySurface> {
    surface: Arc<S>,

    /// Entries currently animating, with the handle needed for forced
    /// removal on shutdown. An id is present at most once.
    active: Arc<Mutex<HashMap<Uuid, OverlayHandle>>>,

    /// Pending retirement timers, aborted on shutdown
    retire_tasks: Arc<Mutex<HashMap<Uuid, JoinHandle<()>>>>,

    /// Cleared by shutdown; gates every timer callback
    alive: Arc<AtomicBool>,

    /// Traversal duration for every spawned overlay
    duration: Duration,

    /// Pixels reserved above the control bar
    bottom_margin_px: u32,
}

impl<S: OverlaySurface> OverlayLifecycle<S> {
    pub fn new(surface: Arc<S>, traversal_secs: f64, bottom_margin_px: u32) -> Self {
        Self {
            surface,
            active: Arc::new(Mutex::new(HashMap::new())),
            retire_tasks: Arc::new(Mutex::new(HashMap::new())),
            alive: Arc::new(AtomicBool::new(true)),
            duration: Duration::from_secs_f64(traversal_secs),
            bottom_margin_px,
        }
    }

    /// Display one entry for exactly one traversal
    ///
    /// Returns false without side effects when the entry is already
    /// animating (duplicate concurrent display of the same id indicates the
    /// scheduler was invoked twice for one tick) or when the surface is
    /// unmounted.
    pub fn display(&self, entry: &OverlayEntry) -> bool {
        if !self.alive.load(Ordering::SeqCst) {
            return false;
        }

        {
            let active = self.active.lock().unwrap();
            if active.contains_key(&entry.id) {
                debug!(id = %entry.id, "overlay already animating, duplicate display rejected");
                return false;
            }
        }

        let spec = SpawnSpec {
            text: entry.text.clone(),
            color: entry.color.clone(),
            font_size_px: entry.font_size,
            lane: entry.lane,
            top_px: self.pick_top_offset(entry.font_size),
            duration: self.duration,
        };

        let handle = match self.surface.spawn(entry, &spec) {
            Some(h) => h,
            None => {
                debug!(id = %entry.id, "surface unmounted, overlay dropped");
                return false;
            }
        };

        self.active.lock().unwrap().insert(entry.id, handle);
        self.schedule_retirement(entry.id);
        true
    }

    /// Vertical placement avoiding the control-bar region
    fn pick_top_offset(&self, font_size_px: u32) -> u32 {
        let element_height = font_size_px + 4;
        let max_top = self
            .surface
            .viewport_height()
            .saturating_sub(element_height + self.bottom_margin_px);
        if max_top == 0 {
            0
        } else {
            rand::thread_rng().gen_range(0..max_top)
        }
    }

    fn schedule_retirement(&self, id: Uuid) {
        let alive = Arc::clone(&self.alive);
        let active = Arc::clone(&self.active);
        let retire_tasks = Arc::clone(&self.retire_tasks);
        let surface = Arc::clone(&self.surface);
        let duration = self.duration;

        let task = tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            if !alive.load(Ordering::SeqCst) {
                return;
            }
            if let Some(handle) = active.lock().unwrap().remove(&id) {
                surface.remove(handle);
            }
            retire_tasks.lock().unwrap().remove(&id);
        });

        self.retire_tasks.lock().unwrap().insert(id, task);
    }

    /// True while the entry is animating
    pub fn is_active(&self, id: Uuid) -> bool {
        self.active.lock().unwrap().contains_key(&id)
    }

    /// Number of concurrently live overlays
    pub fn active_count(&self) -> usize {
        self.active.lock().unwrap().len()
    }

    /// Cancel all pending retirement timers and remove every live element
    ///
    /// Used on unmount and on media-target change. No timer fires after
    /// this returns, and no element leaks.
    pub fn shutdown(&self) {
        self.alive.store(false, Ordering::SeqCst);

        for (_, task) in self.retire_tasks.lock().unwrap().drain() {
            task.abort();
        }
        for (_, handle) in self.active.lock().unwrap().drain() {
            self.surface.remove(handle);
        }
    }

    /// Re-arm after a media-target change (the session calls shutdown first)
    pub fn restart(&self) {
        self.alive.store(true, Ordering::SeqCst);
    }
}

impl<S: OverlaySurface> Drop for OverlayLifecycle<S> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
