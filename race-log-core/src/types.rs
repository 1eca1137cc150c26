//! Core types for the race log processor
//!
//! This module defines the timestamp representation shared by every stage of the
//! pipeline, the error type for fatal conditions and the helpers that read and
//! render the `HH:MM:SS.mmm` clock format used on the wire.

use chrono::{Duration, NaiveTime};
use std::path::PathBuf;

/// Timestamp type used throughout the processor (time of day, millisecond precision)
pub type Timestamp = NaiveTime;

/// Result type for processor operations
pub type Result<T> = std::result::Result<T, RaceError>;

/// Competitor identifier as it appears in the event log
pub type CompetitorId = u32;

/// Number of targets on a firing line
pub const TARGETS_PER_SESSION: u32 = 5;

/// Clock format of event timestamps and time parameters
pub const TIME_FORMAT: &str = "%H:%M:%S%.3f";

/// Errors that abort a run
#[derive(Debug, thiserror::Error)]
pub enum RaceError {
    #[error("Failed to read event file {path:?}: {source}")]
    EventFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration field `{field}`: {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    #[error("Event {event} for competitor({competitor}) is missing its {parameter} parameter")]
    MissingParameter {
        event: &'static str,
        competitor: CompetitorId,
        parameter: &'static str,
    },

    #[error("Event {event} for competitor({competitor}) has invalid {parameter} `{value}`: {reason}")]
    InvalidParameter {
        event: &'static str,
        competitor: CompetitorId,
        parameter: &'static str,
        value: String,
        reason: String,
    },

    #[error("Event {event} for competitor({competitor}) requires an open firing session")]
    NoOpenFiringSession {
        event: &'static str,
        competitor: CompetitorId,
    },

    #[error("Competitor({competitor}) has already hit target {target} on this firing line")]
    DuplicateHit { competitor: CompetitorId, target: u32 },

    #[error("Failed to write audit log: {0}")]
    Audit(std::io::Error),
}

/// Parse a `HH:MM:SS.mmm` clock value
pub fn parse_time(value: &str) -> std::result::Result<Timestamp, chrono::ParseError> {
    NaiveTime::parse_from_str(value.trim(), TIME_FORMAT)
}

/// Parse an `hh:mm:ss` duration (optionally with a fractional seconds part)
pub fn parse_clock_duration(value: &str) -> std::result::Result<Duration, chrono::ParseError> {
    let as_time = NaiveTime::parse_from_str(value.trim(), "%H:%M:%S%.f")?;
    Ok(as_time.signed_duration_since(NaiveTime::MIN))
}

/// Render a timestamp as `HH:MM:SS.mmm`
pub fn format_time(time: Timestamp) -> String {
    time.format(TIME_FORMAT).to_string()
}

/// Render a duration as `HH:MM:SS.mmm`; hours are not wrapped at 24
pub fn format_duration(duration: Duration) -> String {
    let total_ms = duration.num_milliseconds();
    let sign = if total_ms < 0 { "-" } else { "" };
    let ms = total_ms.unsigned_abs();

    let hours = ms / 3_600_000;
    let minutes = (ms / 60_000) % 60;
    let seconds = (ms / 1000) % 60;
    let millis = ms % 1000;

    format!("{}{:02}:{:02}:{:02}.{:03}", sign, hours, minutes, seconds, millis)
}
