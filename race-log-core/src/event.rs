//! Race events
//!
//! An `Event` is one line of the competition log after parsing. Event kinds are a
//! closed set identified by their numeric code on the wire; codes outside the set are
//! kept as `EventKind::Unknown` so that the dispatcher can skip them.

use crate::types::{format_time, CompetitorId, Timestamp};
use std::fmt;

/// Kind of a race event (numeric code in the log)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// 1: the competitor registered
    Registered,
    /// 2: the scheduled start time was set by a draw
    StartTimeAssigned,
    /// 3: the competitor is on the start line
    OnStartLine,
    /// 4: the competitor has started
    Started,
    /// 5: the competitor is on a firing range
    EnteredFiringRange,
    /// 6: a target has been hit
    TargetHit,
    /// 7: the competitor left the firing range
    LeftFiringRange,
    /// 8: the competitor entered the penalty laps
    EnteredPenalty,
    /// 9: the competitor left the penalty laps
    LeftPenalty,
    /// 10: the competitor ended a main lap
    LapCompleted,
    /// 11: the competitor can't continue
    DidNotFinish,
    /// 32: outgoing, the competitor is disqualified
    Disqualified,
    /// 33: outgoing, the competitor has finished
    Finished,
    /// Any other code; ignored by the dispatcher
    Unknown(u32),
}

impl EventKind {
    /// Map a wire code to an event kind
    pub fn from_code(code: u32) -> Self {
        match code {
            1 => EventKind::Registered,
            2 => EventKind::StartTimeAssigned,
            3 => EventKind::OnStartLine,
            4 => EventKind::Started,
            5 => EventKind::EnteredFiringRange,
            6 => EventKind::TargetHit,
            7 => EventKind::LeftFiringRange,
            8 => EventKind::EnteredPenalty,
            9 => EventKind::LeftPenalty,
            10 => EventKind::LapCompleted,
            11 => EventKind::DidNotFinish,
            32 => EventKind::Disqualified,
            33 => EventKind::Finished,
            other => EventKind::Unknown(other),
        }
    }

    /// Wire code of this event kind
    pub fn code(&self) -> u32 {
        match self {
            EventKind::Registered => 1,
            EventKind::StartTimeAssigned => 2,
            EventKind::OnStartLine => 3,
            EventKind::Started => 4,
            EventKind::EnteredFiringRange => 5,
            EventKind::TargetHit => 6,
            EventKind::LeftFiringRange => 7,
            EventKind::EnteredPenalty => 8,
            EventKind::LeftPenalty => 9,
            EventKind::LapCompleted => 10,
            EventKind::DidNotFinish => 11,
            EventKind::Disqualified => 32,
            EventKind::Finished => 33,
            EventKind::Unknown(code) => *code,
        }
    }

    /// Human-readable name, used in error messages
    pub fn name(&self) -> &'static str {
        match self {
            EventKind::Registered => "Registered",
            EventKind::StartTimeAssigned => "StartTimeAssigned",
            EventKind::OnStartLine => "OnStartLine",
            EventKind::Started => "Started",
            EventKind::EnteredFiringRange => "EnteredFiringRange",
            EventKind::TargetHit => "TargetHit",
            EventKind::LeftFiringRange => "LeftFiringRange",
            EventKind::EnteredPenalty => "EnteredPenalty",
            EventKind::LeftPenalty => "LeftPenalty",
            EventKind::LapCompleted => "LapCompleted",
            EventKind::DidNotFinish => "DidNotFinish",
            EventKind::Disqualified => "Disqualified",
            EventKind::Finished => "Finished",
            EventKind::Unknown(_) => "Unknown",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name(), self.code())
    }
}

/// A single race event
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// Time of day the event happened
    pub time: Timestamp,
    /// Event kind
    pub kind: EventKind,
    /// Competitor the event refers to
    pub competitor_id: CompetitorId,
    /// Extra parameters, passed through unparsed
    pub params: Vec<String>,
}

impl Event {
    /// Create an event without extra parameters
    pub fn new(time: Timestamp, kind: EventKind, competitor_id: CompetitorId) -> Self {
        Self {
            time,
            kind,
            competitor_id,
            params: Vec::new(),
        }
    }

    /// Builder method: append an extra parameter
    pub fn with_param(mut self, param: impl Into<String>) -> Self {
        self.params.push(param.into());
        self
    }

    /// First extra parameter, if any
    pub fn first_param(&self) -> Option<&str> {
        self.params.first().map(String::as_str)
    }
}

/// Renders the event in the log line format it was parsed from
impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} {}",
            format_time(self.time),
            self.kind.code(),
            self.competitor_id
        )?;
        for param in &self.params {
            write!(f, " {}", param)?;
        }
        Ok(())
    }
}
