//! Store traits for the external REST collaborators
//!
//! The engine never talks HTTP directly; it goes through these traits so
//! tests can substitute recording fakes. [`crate::client::HttpStoreClient`]
//! is the production implementation.

use crate::Result;
use async_trait::async_trait;
use uuid::Uuid;
use wkvp_common::types::{OverlayEntry, OverlaySubmission, ProgressRecord, ProgressUpdate};

/// Read and create overlay entries for a media target
#[async_trait]
pub trait OverlayStore: Send + Sync {
    /// Fetch all entries for a media target, ordered by timestamp
    ///
    /// Consumed once per media-target change.
    async fn fetch_for_media(&self, media_id: Uuid) -> Result<Vec<OverlayEntry>>;

    /// Submit a freshly authored entry; returns the canonical entry with
    /// its server-assigned id
    async fn submit(&self, submission: &OverlaySubmission) -> Result<OverlayEntry>;
}

/// Persist and restore playback progress
#[async_trait]
pub trait ProgressStore: Send + Sync {
    /// Fire-and-forget progress persist; failures are the caller's to swallow
    async fn save(&self, update: &ProgressUpdate) -> Result<()>;

    /// Restore read; `Ok(None)` when no record exists for the pair
    async fn load(&self, media_id: Uuid, user_id: Uuid) -> Result<Option<ProgressRecord>>;
}
