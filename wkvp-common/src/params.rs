//! Engine parameter management
//!
//! All tunable constants of the overlay and progress engine live in a single
//! `EngineParams` struct: defaults are compiled in, and every field can be
//! overridden from a TOML table (partial overrides are fine, missing keys
//! keep their defaults).

use crate::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Tunable parameters for the overlay and progress engine
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineParams {
    /// Positions closer than this are treated as "no movement" (seconds)
    pub epsilon_secs: f64,

    /// Maximum forward delta still classified as normal playback (seconds)
    ///
    /// Larger forward jumps are classified as seeks. Covers normal
    /// frame-to-frame deltas with generous margin for stalls.
    pub continuity_threshold_secs: f64,

    /// Symmetric window around a seek landing point within which entries
    /// are considered due (seconds)
    ///
    /// Product-tunable: a longer window re-shows more entries after large
    /// seeks; a shorter one drops entries near the landing point.
    pub seek_tolerance_secs: f64,

    /// Traversal duration of one overlay across the viewport (seconds)
    ///
    /// Decoupled from entry content; also the retirement timer duration.
    pub scroll_duration_secs: f64,

    /// Debounce interval for progress persistence (seconds)
    pub persist_debounce_secs: f64,

    /// Stored positions at or below this are not restored (seconds)
    pub restore_min_secs: f64,

    /// position/duration ratio at which a stream counts as completed
    pub completion_ratio: f64,

    /// Maximum overlay text length in characters
    pub max_text_chars: usize,

    /// Vertical margin reserved for the control bar (pixels)
    pub bottom_margin_px: u32,
}

impl Default for EngineParams {
    fn default() -> Self {
        Self {
            epsilon_secs: 0.001,
            continuity_threshold_secs: 5.0,
            seek_tolerance_secs: 0.5,
            scroll_duration_secs: 10.0,
            persist_debounce_secs: 5.0,
            restore_min_secs: 30.0,
            completion_ratio: 0.9,
            max_text_chars: 100,
            bottom_margin_px: 50,
        }
    }
}

impl EngineParams {
    /// Load parameters from a TOML file, falling back to defaults for
    /// missing keys
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let params = Self::load_from_str(&content)?;
        tracing::debug!("Loaded engine parameters from {}", path.display());
        Ok(params)
    }

    /// Parse parameters from a TOML string
    pub fn load_from_str(content: &str) -> Result<Self> {
        let params: EngineParams = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Invalid engine parameters: {}", e)))?;
        params.validate()?;
        Ok(params)
    }

    /// Reject parameter combinations the engine cannot operate with
    pub fn validate(&self) -> Result<()> {
        if self.epsilon_secs < 0.0 {
            return Err(Error::Config("epsilon_secs must be >= 0".to_string()));
        }
        if self.continuity_threshold_secs <= 0.0 {
            return Err(Error::Config(
                "continuity_threshold_secs must be > 0".to_string(),
            ));
        }
        if self.seek_tolerance_secs < 0.0 {
            return Err(Error::Config("seek_tolerance_secs must be >= 0".to_string()));
        }
        if self.scroll_duration_secs <= 0.0 {
            return Err(Error::Config("scroll_duration_secs must be > 0".to_string()));
        }
        if self.persist_debounce_secs <= 0.0 {
            return Err(Error::Config(
                "persist_debounce_secs must be > 0".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.completion_ratio) {
            return Err(Error::Config(
                "completion_ratio must be within [0.0, 1.0]".to_string(),
            ));
        }
        if self.max_text_chars == 0 {
            return Err(Error::Config("max_text_chars must be > 0".to_string()));
        }
        Ok(())
    }
}
