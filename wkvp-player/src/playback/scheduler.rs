//! Overlay scheduling: which entries are due for a clock transition
//!
//! Owns the DisplayedSet, the de-duplication record of entries already shown
//! during the current monotonic run. An id in the set is never re-scheduled
//! until the set is cleared, which happens on any seek (classified or
//! signaled) or on a media-target change. Ordinary forward advance never
//! clears it.

use super::clock::ClockTransition;
use super::timeline::OverlayTimeline;
use std::collections::HashSet;
use uuid::Uuid;
use wkvp_common::types::OverlayEntry;

/// Selects the exact set of entries to (re)display for a clock transition
#[derive(Debug)]
pub struct OverlayScheduler {
    /// Entries already surfaced during the current monotonic run
    displayed: HashSet<Uuid>,

    /// Symmetric window around a seek landing point (seconds)
    seek_tolerance: f64,
}

impl OverlayScheduler {
    pub fn new(seek_tolerance: f64) -> Self {
        Self {
            displayed: HashSet::new(),
            seek_tolerance,
        }
    }

    /// Entries due for this transition, in timeline order
    ///
    /// - **Advance:** every entry with `from <= t <= to` not yet displayed.
    /// - **Seek (either direction):** the DisplayedSet is cleared, then every
    ///   entry within the tolerance window around the landing point. Seeks
    ///   have no meaningful "range since last tick," so only entries close
    ///   to the landing point are due.
    ///
    /// Selected entries are marked displayed before being returned. Freshly
    /// authored entries bypass this path entirely (see the submission
    /// gateway): they are handed straight to the lifecycle manager without a
    /// DisplayedSet check or marking.
    pub fn collect_due(
        &mut self,
        transition: ClockTransition,
        timeline: &OverlayTimeline,
    ) -> Vec<OverlayEntry> {
        let window = match transition {
            ClockTransition::None => return Vec::new(),
            ClockTransition::Advance { from, to } => timeline.range(from, to),
            ClockTransition::SeekForward { to } | ClockTransition::SeekBackward { to } => {
                self.displayed.clear();
                timeline.around(to, self.seek_tolerance)
            }
        };

        let mut due = Vec::new();
        for entry in window {
            if self.displayed.insert(entry.id) {
                due.push(entry.clone());
            }
        }
        due
    }

    /// Clear the DisplayedSet (seek-start signal)
    pub fn clear_displayed(&mut self) {
        self.displayed.clear();
    }

    /// Reset for a new media target
    pub fn reset(&mut self) {
        self.displayed.clear();
    }

    /// Number of entries marked displayed in the current run
    pub fn displayed_count(&self) -> usize {
        self.displayed.len()
    }
}
