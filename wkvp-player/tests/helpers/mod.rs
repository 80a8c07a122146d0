//! Shared test fixtures: a recording surface and in-memory stores
//!
//! These fakes stand in for the rendering runtime and the external REST
//! store so session behavior is observable without a browser-equivalent
//! runtime or a network.

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use uuid::Uuid;
use wkvp_common::types::{
    LaneKind, OverlayEntry, OverlaySubmission, ProgressRecord, ProgressUpdate,
};
use wkvp_common::{EngineParams, EventBus};
use wkvp_player::{
    Error, OverlayHandle, OverlayStore, OverlaySurface, ProgressStore, Result, SpawnSpec,
};

/// Build a test overlay entry with a fresh id
pub fn entry(text: &str, timestamp: f64) -> OverlayEntry {
    OverlayEntry {
        id: Uuid::new_v4(),
        text: text.to_string(),
        timestamp,
        color: "#FFFFFF".to_string(),
        font_size: 20,
        lane: LaneKind::Scroll,
    }
}

pub fn test_params() -> EngineParams {
    EngineParams::default()
}

pub fn test_bus() -> EventBus {
    EventBus::new(64)
}

/// Initialize tracing output for debugging failing tests
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wkvp_player=debug".into()),
        )
        .with_test_writer()
        .try_init();
}

/// Surface fake that records spawn/remove calls
pub struct RecordingSurface {
    next_handle: AtomicU64,
    pub mounted: AtomicBool,
    pub spawned: Mutex<Vec<(Uuid, SpawnSpec)>>,
    pub removed: Mutex<Vec<OverlayHandle>>,
    height: u32,
}

impl RecordingSurface {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            next_handle: AtomicU64::new(1),
            mounted: AtomicBool::new(true),
            spawned: Mutex::new(Vec::new()),
            removed: Mutex::new(Vec::new()),
            height: 400,
        })
    }

    pub fn spawned_texts(&self) -> Vec<String> {
        self.spawned
            .lock()
            .unwrap()
            .iter()
            .map(|(_, spec)| spec.text.clone())
            .collect()
    }

    pub fn spawned_count(&self) -> usize {
        self.spawned.lock().unwrap().len()
    }
}

impl OverlaySurface for RecordingSurface {
    fn spawn(&self, entry: &OverlayEntry, spec: &SpawnSpec) -> Option<OverlayHandle> {
        if !self.mounted.load(Ordering::SeqCst) {
            return None;
        }
        let handle = self.next_handle.fetch_add(1, Ordering::SeqCst);
        self.spawned.lock().unwrap().push((entry.id, spec.clone()));
        Some(handle)
    }

    fn remove(&self, handle: OverlayHandle) {
        self.removed.lock().unwrap().push(handle);
    }

    fn viewport_height(&self) -> u32 {
        self.height
    }
}

/// In-memory overlay store
pub struct MockOverlayStore {
    pub entries: Mutex<Vec<OverlayEntry>>,
    pub submissions: Mutex<Vec<OverlaySubmission>>,
    pub fetch_count: AtomicU64,
    pub reject_submissions: AtomicBool,
}

impl MockOverlayStore {
    pub fn new(entries: Vec<OverlayEntry>) -> Arc<Self> {
        Arc::new(Self {
            entries: Mutex::new(entries),
            submissions: Mutex::new(Vec::new()),
            fetch_count: AtomicU64::new(0),
            reject_submissions: AtomicBool::new(false),
        })
    }
}

#[async_trait]
impl OverlayStore for MockOverlayStore {
    async fn fetch_for_media(&self, _media_id: Uuid) -> Result<Vec<OverlayEntry>> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);
        Ok(self.entries.lock().unwrap().clone())
    }

    async fn submit(&self, submission: &OverlaySubmission) -> Result<OverlayEntry> {
        if self.reject_submissions.load(Ordering::SeqCst) {
            return Err(Error::Store {
                status: 422,
                message: "rejected".to_string(),
            });
        }
        self.submissions.lock().unwrap().push(submission.clone());
        Ok(OverlayEntry {
            id: Uuid::new_v4(),
            text: submission.text.clone(),
            timestamp: submission.timestamp,
            color: submission.color.clone(),
            font_size: submission.font_size,
            lane: submission.lane,
        })
    }
}

/// In-memory progress store
pub struct MockProgressStore {
    pub saves: Mutex<Vec<ProgressUpdate>>,
    pub record: Mutex<Option<ProgressRecord>>,
}

impl MockProgressStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            saves: Mutex::new(Vec::new()),
            record: Mutex::new(None),
        })
    }

    pub fn with_record(record: ProgressRecord) -> Arc<Self> {
        let store = Self::new();
        *store.record.lock().unwrap() = Some(record);
        store
    }

    pub fn save_count(&self) -> usize {
        self.saves.lock().unwrap().len()
    }

    pub fn last_save(&self) -> Option<ProgressUpdate> {
        self.saves.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl ProgressStore for MockProgressStore {
    async fn save(&self, update: &ProgressUpdate) -> Result<()> {
        self.saves.lock().unwrap().push(update.clone());
        Ok(())
    }

    async fn load(&self, _media_id: Uuid, _user_id: Uuid) -> Result<Option<ProgressRecord>> {
        Ok(self.record.lock().unwrap().clone())
    }
}
