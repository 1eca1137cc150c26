//! Per-competitor race state
//!
//! A `Competitor` starts out with every temporal field unset and is mutated only by
//! the state machine. Firing sessions are owned by their competitor and are
//! appended, never removed.

use crate::types::{CompetitorId, Timestamp, TARGETS_PER_SESSION};
use chrono::Duration;
use std::collections::BTreeSet;
use std::fmt;

/// Current status of a competitor
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Status {
    /// Seen in the log but not registered yet
    #[default]
    Undefined,
    Registered,
    OnStartLine,
    Racing,
    /// Shooting on the given firing line
    Shooting(u32),
    InPenalty,
    Finished,
    /// Did not finish, with an optional reason
    NotFinished(Option<String>),
    Disqualified,
}

impl Status {
    /// True for states no further event can leave
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Status::Finished | Status::NotFinished(_) | Status::Disqualified
        )
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Undefined => write!(f, "Undefined"),
            Status::Registered => write!(f, "Registered"),
            Status::OnStartLine => write!(f, "OnStartLine"),
            Status::Racing => write!(f, "Racing"),
            Status::Shooting(line) => write!(f, "Shooting firing line #{}", line),
            Status::InPenalty => write!(f, "InPenalty"),
            Status::Finished => write!(f, "Finished"),
            Status::NotFinished(None) => write!(f, "DNF"),
            Status::NotFinished(Some(reason)) => write!(f, "DNF: {}", reason),
            Status::Disqualified => write!(f, "Disqualified"),
        }
    }
}

/// One visit to a firing line
#[derive(Debug, Clone, PartialEq)]
pub struct FiringSession {
    /// Main lap the session belongs to (1-based)
    pub lap: u32,
    /// Firing line number
    pub line: u32,
    /// Time the competitor entered the range
    pub start: Timestamp,
    /// Time the competitor left the range (`None` while shooting)
    pub end: Option<Timestamp>,
    /// Targets hit during this session
    hits: BTreeSet<u32>,
}

impl FiringSession {
    pub fn new(lap: u32, line: u32, start: Timestamp) -> Self {
        Self {
            lap,
            line,
            start,
            end: None,
            hits: BTreeSet::new(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.end.is_none()
    }

    /// Record a hit; returns `false` if the target was already hit
    pub fn record_hit(&mut self, target: u32) -> bool {
        self.hits.insert(target)
    }

    pub fn hits(&self) -> usize {
        self.hits.len()
    }

    pub fn misses(&self) -> u32 {
        TARGETS_PER_SESSION.saturating_sub(self.hits.len() as u32)
    }
}

/// Race state of one competitor
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Competitor {
    pub id: CompetitorId,
    /// Start time drawn for this competitor
    pub scheduled_start: Option<Timestamp>,
    /// Time the competitor actually crossed the start
    pub actual_start: Option<Timestamp>,
    /// Start of the current main lap
    pub lap_start: Option<Timestamp>,
    pub laps_completed: u32,
    /// Set while the competitor is on the penalty loop
    pub penalty_entered: Option<Timestamp>,
    /// Penalty laps owed from missed targets
    pub penalty_laps: u32,
    pub penalty_time: Duration,
    /// Duration of each completed main lap, in order
    pub lap_times: Vec<Duration>,
    pub firing_sessions: Vec<FiringSession>,
    pub status: Status,
    pub disqualified: bool,
    pub hits: u32,
    /// Time the competitor finished, retired or was disqualified
    pub end_time: Option<Timestamp>,
    pub last_event: Option<Timestamp>,
}

impl Competitor {
    /// Create a competitor with all fields unset
    pub fn new(id: CompetitorId) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    /// The firing session still in progress, if any
    pub fn open_session(&mut self) -> Option<&mut FiringSession> {
        self.firing_sessions.last_mut().filter(|session| session.is_open())
    }

    /// Shots fired over all firing sessions
    pub fn shots(&self) -> u32 {
        self.firing_sessions.len() as u32 * TARGETS_PER_SESSION
    }

    /// Time from actual start to end, when both are known
    pub fn total_time(&self) -> Option<Duration> {
        match (self.actual_start, self.end_time) {
            (Some(start), Some(end)) => Some(end.signed_duration_since(start)),
            _ => None,
        }
    }
}
