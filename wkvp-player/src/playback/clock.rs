//! Media clock tracking and transition classification
//!
//! Observes the media element's reported position and classifies each update
//! as an advance, a seek-forward, or a seek-backward relative to the last
//! observed position. While an explicit seek is in progress (the player
//! reported `seeking`), classification is suspended entirely: updates in that
//! window are ignored, not deferred.

/// Classification of one clock update relative to the previous position
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClockTransition {
    /// No meaningful movement (within epsilon) or classification suspended
    None,

    /// Normal forward playback between two nearby ticks
    Advance {
        /// Previous observed position (seconds)
        from: f64,
        /// New observed position (seconds)
        to: f64,
    },

    /// Discontinuous jump forward (beyond the continuity threshold)
    SeekForward {
        /// Landing position (seconds)
        to: f64,
    },

    /// Jump backward to an earlier position
    SeekBackward {
        /// Landing position (seconds)
        to: f64,
    },
}

impl ClockTransition {
    /// True for either seek direction
    pub fn is_seek(&self) -> bool {
        matches!(
            self,
            ClockTransition::SeekForward { .. } | ClockTransition::SeekBackward { .. }
        )
    }
}

/// Tracks the last observed media position and classifies updates
///
/// One tracker per player session. All methods are synchronous; the
/// single-threaded event model serializes every mutation.
#[derive(Debug)]
pub struct ClockTracker {
    /// Position recorded at the previous classification step (seconds)
    last_position: f64,

    /// True between seek-start and seek-complete signals
    seeking: bool,

    /// Forward deltas up to this are normal playback (seconds)
    continuity_threshold: f64,

    /// Deltas within this are treated as no movement (seconds)
    epsilon: f64,
}

impl ClockTracker {
    pub fn new(continuity_threshold: f64, epsilon: f64) -> Self {
        Self {
            last_position: 0.0,
            seeking: false,
            continuity_threshold,
            epsilon,
        }
    }

    /// Classify a newly observed position
    ///
    /// Updates `last_position` unconditionally after classification, except
    /// while suspended: position updates arriving between seek-start and
    /// seek-complete are ignored outright.
    pub fn observe(&mut self, position: f64) -> ClockTransition {
        if self.seeking {
            return ClockTransition::None;
        }

        let prev = self.last_position;
        let delta = position - prev;

        let transition = if delta.abs() <= self.epsilon {
            ClockTransition::None
        } else if delta > 0.0 && delta <= self.continuity_threshold {
            ClockTransition::Advance {
                from: prev,
                to: position,
            }
        } else if delta < 0.0 {
            ClockTransition::SeekBackward { to: position }
        } else {
            ClockTransition::SeekForward { to: position }
        };

        self.last_position = position;
        transition
    }

    /// Suspend classification: the player reported a seek in progress
    pub fn begin_seek(&mut self) {
        self.seeking = true;
    }

    /// Resume classification at the post-seek position
    ///
    /// The landing position is recorded directly, never replayed through
    /// advance logic. Returns the seek transition so the caller can
    /// schedule the tolerance window around the landing point; the
    /// direction is relative to the pre-seek position.
    pub fn complete_seek(&mut self, position: f64) -> ClockTransition {
        self.seeking = false;
        let prev = self.last_position;
        self.last_position = position;
        if position < prev {
            ClockTransition::SeekBackward { to: position }
        } else {
            ClockTransition::SeekForward { to: position }
        }
    }

    /// Set the position without classification (progress-restore path)
    ///
    /// Failing to call this after a restore would make the next tick look
    /// like an advance over the entire skipped range.
    pub fn force_position(&mut self, position: f64) {
        self.last_position = position;
    }

    /// Last observed position (seconds)
    pub fn last_position(&self) -> f64 {
        self.last_position
    }

    /// True while an explicit seek is in progress
    pub fn is_seeking(&self) -> bool {
        self.seeking
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> ClockTracker {
        ClockTracker::new(5.0, 0.001)
    }

    #[test]
    fn test_equal_position_is_noop() {
        let mut clock = tracker();
        clock.observe(10.0);
        assert_eq!(clock.observe(10.0), ClockTransition::None);
        // Within epsilon also counts as no movement
        assert_eq!(clock.observe(10.0005), ClockTransition::None);
    }

    #[test]
    fn test_small_forward_delta_is_advance() {
        let mut clock = tracker();
        let t = clock.observe(0.25);
        assert_eq!(t, ClockTransition::Advance { from: 0.0, to: 0.25 });
        assert_eq!(clock.last_position(), 0.25);

        let t = clock.observe(0.5);
        assert_eq!(t, ClockTransition::Advance { from: 0.25, to: 0.5 });
    }

    #[test]
    fn test_large_forward_jump_is_seek_forward() {
        let mut clock = tracker();
        clock.observe(10.0);
        let t = clock.observe(100.0);
        assert_eq!(t, ClockTransition::SeekForward { to: 100.0 });
        assert_eq!(clock.last_position(), 100.0);
    }

    #[test]
    fn test_delta_at_threshold_is_still_advance() {
        let mut clock = tracker();
        clock.observe(10.0);
        let t = clock.observe(15.0);
        assert_eq!(t, ClockTransition::Advance { from: 10.0, to: 15.0 });
    }

    #[test]
    fn test_backward_jump_is_seek_backward() {
        let mut clock = tracker();
        clock.observe(61.0);
        let t = clock.observe(30.0);
        assert_eq!(t, ClockTransition::SeekBackward { to: 30.0 });
        assert_eq!(clock.last_position(), 30.0);
    }

    #[test]
    fn test_updates_ignored_while_seeking() {
        let mut clock = tracker();
        clock.observe(10.0);
        clock.begin_seek();
        assert!(clock.is_seeking());

        // Ignored, not deferred: last_position stays put
        assert_eq!(clock.observe(55.0), ClockTransition::None);
        assert_eq!(clock.observe(56.0), ClockTransition::None);
        assert_eq!(clock.last_position(), 10.0);

        let t = clock.complete_seek(60.0);
        assert_eq!(t, ClockTransition::SeekForward { to: 60.0 });
        assert!(!clock.is_seeking());
        assert_eq!(clock.last_position(), 60.0);

        // Next tick is a plain advance from the landing point
        let t = clock.observe(60.3);
        assert_eq!(t, ClockTransition::Advance { from: 60.0, to: 60.3 });
    }

    #[test]
    fn test_force_position_skips_classification() {
        let mut clock = tracker();
        clock.force_position(45.0);
        assert_eq!(clock.last_position(), 45.0);

        // First tick after a restore must not sweep [0, 45]
        let t = clock.observe(45.2);
        assert_eq!(t, ClockTransition::Advance { from: 45.0, to: 45.2 });
    }

    #[test]
    fn test_backward_seek_completion_reports_direction() {
        let mut clock = tracker();
        clock.observe(61.0);
        clock.begin_seek();
        let t = clock.complete_seek(30.0);
        assert_eq!(t, ClockTransition::SeekBackward { to: 30.0 });
    }
}
