//! Engine tunables.

use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Knobs for slot search and analysis defaults.
///
/// Deserializes from a partial document; missing keys keep their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum number of alternative slots proposed.
    pub max_suggestions: usize,
    /// How far past a rejected start time to look for alternatives.
    pub search_horizon_days: i64,
    /// Step between candidate starts inside one free span.
    pub slot_step_minutes: i64,
    /// Length of the analysis range when the caller gives none.
    pub analysis_window_days: i64,
    /// Meeting length assumed by conflict analysis when the caller gives none.
    pub default_duration_minutes: i64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_suggestions: 3,
            search_horizon_days: 7,
            slot_step_minutes: 60,
            analysis_window_days: 7,
            default_duration_minutes: 60,
        }
    }
}

impl EngineConfig {
    /// `None` when the configured step does not fit a chrono duration.
    pub fn slot_step(&self) -> Option<Duration> {
        Duration::try_minutes(self.slot_step_minutes.max(1))
    }

    pub fn search_horizon(&self) -> Option<Duration> {
        Duration::try_days(self.search_horizon_days.max(0))
    }

    pub fn analysis_window(&self) -> Option<Duration> {
        Duration::try_days(self.analysis_window_days.max(0))
    }
}
