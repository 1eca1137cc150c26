//! Race configuration types
//!
//! `RaceSettings` mirrors the on-disk configuration document (camelCase keys).
//! It is validated into a `RaceConfig` before any event is processed, so that
//! the state machine works with parsed durations and clock values only.

use crate::types::{parse_clock_duration, parse_time, RaceError, Result, Timestamp};
use chrono::{Duration, NaiveTime};
use serde::{Deserialize, Serialize};

/// Raw race configuration as stored in the config file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceSettings {
    /// Number of main laps
    pub laps: u32,
    /// Length of one main lap in meters
    pub lap_len: u32,
    /// Length of one penalty lap in meters
    pub penalty_len: u32,
    /// Number of firing lines on the range
    #[serde(default = "default_firing_lines")]
    pub firing_lines: u32,
    /// Planned race start (`HH:MM:SS.mmm`)
    pub start: String,
    /// Allowed start window after the scheduled start (`hh:mm:ss`)
    pub start_delta: String,
}

fn default_firing_lines() -> u32 {
    1
}

/// Validated race configuration
#[derive(Debug, Clone, PartialEq)]
pub struct RaceConfig {
    pub laps: u32,
    pub lap_len: u32,
    pub penalty_len: u32,
    pub firing_lines: u32,
    pub start: Timestamp,
    pub start_delta: Duration,
}

impl TryFrom<RaceSettings> for RaceConfig {
    type Error = RaceError;

    fn try_from(settings: RaceSettings) -> Result<Self> {
        if settings.laps == 0 {
            return Err(RaceError::InvalidConfig {
                field: "laps",
                reason: "a race needs at least one lap".to_string(),
            });
        }

        let start = parse_time(&settings.start).map_err(|e| RaceError::InvalidConfig {
            field: "start",
            reason: format!("`{}` is not a HH:MM:SS.mmm time: {}", settings.start, e),
        })?;

        let start_delta =
            parse_clock_duration(&settings.start_delta).map_err(|e| RaceError::InvalidConfig {
                field: "startDelta",
                reason: format!("`{}` must have hh:mm:ss format: {}", settings.start_delta, e),
            })?;

        Ok(Self {
            laps: settings.laps,
            lap_len: settings.lap_len,
            penalty_len: settings.penalty_len,
            firing_lines: settings.firing_lines,
            start,
            start_delta,
        })
    }
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self {
            laps: 1,
            lap_len: 0,
            penalty_len: 0,
            firing_lines: 1,
            start: NaiveTime::MIN,
            start_delta: Duration::zero(),
        }
    }
}

impl RaceConfig {
    /// Create a configuration with default settings (one lap, zero-length track)
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the number of main laps
    pub fn with_laps(mut self, laps: u32) -> Self {
        self.laps = laps;
        self
    }

    /// Builder method: set the main lap length in meters
    pub fn with_lap_len(mut self, lap_len: u32) -> Self {
        self.lap_len = lap_len;
        self
    }

    /// Builder method: set the penalty lap length in meters
    pub fn with_penalty_len(mut self, penalty_len: u32) -> Self {
        self.penalty_len = penalty_len;
        self
    }

    /// Builder method: set the number of firing lines
    pub fn with_firing_lines(mut self, firing_lines: u32) -> Self {
        self.firing_lines = firing_lines;
        self
    }

    /// Builder method: set the planned race start
    pub fn with_start(mut self, start: Timestamp) -> Self {
        self.start = start;
        self
    }

    /// Builder method: set the allowed start window
    pub fn with_start_delta(mut self, start_delta: Duration) -> Self {
        self.start_delta = start_delta;
        self
    }

    /// Latest moment a competitor scheduled at `scheduled` may start.
    ///
    /// Returns `None` when the window runs past midnight, in which case no start
    /// on the same day can be late.
    pub fn start_deadline(&self, scheduled: Timestamp) -> Option<Timestamp> {
        let (deadline, wrapped_secs) = scheduled.overflowing_add_signed(self.start_delta);
        (wrapped_secs == 0).then_some(deadline)
    }
}
