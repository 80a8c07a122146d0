//! Overlay timeline: the sorted entry collection
//!
//! Maintains overlay entries sorted by timestamp and answers inclusive range
//! queries in O(log n + k). A sorted structure is required here: the
//! scheduler queries on every timeupdate tick, which fires many times per
//! second.
//!
//! Entries sharing a timestamp keep their original collection order (the
//! sort is stable and insertion places new entries after existing equals).

use uuid::Uuid;
use wkvp_common::types::OverlayEntry;

/// Sorted collection of overlay entries for one media target
#[derive(Debug, Clone, Default)]
pub struct OverlayTimeline {
    /// Entries sorted by timestamp ascending, stable on ties
    entries: Vec<OverlayEntry>,
}

impl OverlayTimeline {
    /// Create a timeline from entries (sorted on construction, stable)
    pub fn new(mut entries: Vec<OverlayEntry>) -> Self {
        entries.sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));
        Self { entries }
    }

    /// Entries with `lo <= timestamp <= hi`, in timeline order
    ///
    /// Both bounds inclusive: an entry exactly at either end is included.
    pub fn range(&self, lo: f64, hi: f64) -> &[OverlayEntry] {
        if lo > hi || self.entries.is_empty() {
            return &[];
        }
        let start = self.entries.partition_point(|e| e.timestamp < lo);
        let end = self.entries.partition_point(|e| e.timestamp <= hi);
        &self.entries[start..end]
    }

    /// Entries within `tolerance` of `center` on either side, inclusive
    pub fn around(&self, center: f64, tolerance: f64) -> &[OverlayEntry] {
        self.range(center - tolerance, center + tolerance)
    }

    /// Insert a freshly authored entry, keeping sort order
    ///
    /// Placed after existing entries with an equal timestamp, so scheduling
    /// order stays stable for everything already in the collection.
    pub fn insert(&mut self, entry: OverlayEntry) {
        let idx = self
            .entries
            .partition_point(|e| e.timestamp <= entry.timestamp);
        self.entries.insert(idx, entry);
    }

    /// Replace the whole collection (media-target change)
    pub fn replace(&mut self, entries: Vec<OverlayEntry>) {
        *self = Self::new(entries);
    }

    /// Look up an entry by id (linear; off the hot path)
    pub fn get(&self, id: Uuid) -> Option<&OverlayEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries in timeline order
    pub fn entries(&self) -> &[OverlayEntry] {
        &self.entries
    }
}
