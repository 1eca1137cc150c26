//! Event-driven race state machine
//!
//! `RaceProcessor` consumes events one at a time, in log order. Each event is
//! dispatched on its kind to a handler that applies the race rule to the
//! competitor's state. A handler may supersede its event with a synthetic one
//! (disqualification on a late start, finish on the last lap); the synthetic
//! event is applied immediately, audited in place of the original and kept in
//! the outgoing event list.

use crate::audit::{self, AuditSink};
use crate::competitor::{Competitor, FiringSession, Status};
use crate::config::RaceConfig;
use crate::event::{Event, EventKind};
use crate::registry::Registry;
use crate::types::{parse_time, RaceError, Result, TARGETS_PER_SESSION};
use chrono::NaiveTime;

/// What a handler did with its event
#[derive(Debug, Clone, PartialEq)]
enum Outcome {
    /// The event was applied and is audited as-is
    Applied,
    /// The event was replaced by a synthetic follow-up event
    Superseded(Event),
}

/// Applies race events to the competitor registry
pub struct RaceProcessor {
    config: RaceConfig,
    registry: Registry,
    outgoing: Vec<Event>,
}

impl RaceProcessor {
    /// Create a processor with an empty registry
    pub fn new(config: RaceConfig) -> Self {
        Self {
            config,
            registry: Registry::new(),
            outgoing: Vec::new(),
        }
    }

    /// Process a single event and write its audit line
    pub fn process(&mut self, event: &Event, audit: &mut dyn AuditSink) -> Result<()> {
        let competitor = self.registry.get_or_create(event.competitor_id);
        log::debug!("Processing {} for competitor({})", event.kind, event.competitor_id);

        if let EventKind::Unknown(code) = event.kind {
            log::debug!("Ignoring unknown event kind {}", code);
        } else if competitor.status.is_terminal() {
            log::warn!(
                "Competitor({}) is already {}; {} at {} is not applied",
                competitor.id,
                competitor.status,
                event.kind,
                event.time
            );
            record(audit, event)?;
        } else {
            match apply(event, competitor, &self.config)? {
                Outcome::Applied => record(audit, event)?,
                Outcome::Superseded(follow_up) => {
                    log::debug!("{} superseded by synthetic {}", event.kind, follow_up.kind);
                    apply(&follow_up, competitor, &self.config)?;
                    record(audit, &follow_up)?;
                    self.outgoing.push(follow_up);
                }
            }
        }

        competitor.last_event = Some(event.time);
        Ok(())
    }

    /// Process every event in order, stopping at the first fatal error
    pub fn process_all<'a, I>(&mut self, events: I, audit: &mut dyn AuditSink) -> Result<()>
    where
        I: IntoIterator<Item = &'a Event>,
    {
        let mut count = 0usize;
        for event in events {
            self.process(event, audit)?;
            count += 1;
        }
        log::info!(
            "Processed {} events for {} competitors ({} synthetic events)",
            count,
            self.registry.len(),
            self.outgoing.len()
        );
        Ok(())
    }

    pub fn config(&self) -> &RaceConfig {
        &self.config
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Synthetic events generated so far, in generation order
    pub fn outgoing_events(&self) -> &[Event] {
        &self.outgoing
    }
}

fn record(audit: &mut dyn AuditSink, event: &Event) -> Result<()> {
    match audit::describe(event) {
        Some(line) => audit.record(&line),
        None => Ok(()),
    }
}

/// Dispatch an event to the handler for its kind
fn apply(event: &Event, comp: &mut Competitor, config: &RaceConfig) -> Result<Outcome> {
    match event.kind {
        EventKind::Registered => on_registered(comp),
        EventKind::StartTimeAssigned => on_start_time_assigned(event, comp),
        EventKind::OnStartLine => on_start_line(comp),
        EventKind::Started => on_started(event, comp, config),
        EventKind::EnteredFiringRange => on_entered_firing_range(event, comp, config),
        EventKind::TargetHit => on_target_hit(event, comp),
        EventKind::LeftFiringRange => on_left_firing_range(event, comp),
        EventKind::EnteredPenalty => on_entered_penalty(event, comp),
        EventKind::LeftPenalty => on_left_penalty(event, comp),
        EventKind::LapCompleted => on_lap_completed(event, comp, config),
        EventKind::DidNotFinish => on_did_not_finish(event, comp),
        EventKind::Disqualified => on_disqualified(event, comp),
        EventKind::Finished => on_finished(event, comp),
        EventKind::Unknown(_) => Ok(Outcome::Applied),
    }
}

fn on_registered(comp: &mut Competitor) -> Result<Outcome> {
    comp.status = Status::Registered;
    Ok(Outcome::Applied)
}

fn on_start_time_assigned(event: &Event, comp: &mut Competitor) -> Result<Outcome> {
    let raw = match event.params.as_slice() {
        [] => {
            return Err(RaceError::MissingParameter {
                event: event.kind.name(),
                competitor: comp.id,
                parameter: "start time",
            })
        }
        [raw] => raw,
        more => {
            return Err(RaceError::InvalidParameter {
                event: event.kind.name(),
                competitor: comp.id,
                parameter: "start time",
                value: more.join(" "),
                reason: format!("expected exactly one parameter, got {}", more.len()),
            })
        }
    };

    let start = parse_time(raw).map_err(|e| RaceError::InvalidParameter {
        event: event.kind.name(),
        competitor: comp.id,
        parameter: "start time",
        value: raw.clone(),
        reason: e.to_string(),
    })?;

    comp.scheduled_start = Some(start);
    Ok(Outcome::Applied)
}

fn on_start_line(comp: &mut Competitor) -> Result<Outcome> {
    comp.status = Status::OnStartLine;
    Ok(Outcome::Applied)
}

fn on_started(event: &Event, comp: &mut Competitor, config: &RaceConfig) -> Result<Outcome> {
    let scheduled = comp.scheduled_start.unwrap_or_else(|| {
        log::warn!("Competitor({}) started without a drawn start time", comp.id);
        NaiveTime::MIN
    });

    let late = config
        .start_deadline(scheduled)
        .is_some_and(|deadline| event.time > deadline);
    if late {
        log::info!(
            "Competitor({}) started at {} outside the window after {}",
            comp.id,
            event.time,
            scheduled
        );
        return Ok(Outcome::Superseded(Event::new(
            event.time,
            EventKind::Disqualified,
            comp.id,
        )));
    }

    comp.actual_start = Some(event.time);
    comp.lap_start = Some(event.time);
    comp.status = Status::Racing;
    Ok(Outcome::Applied)
}

fn on_entered_firing_range(
    event: &Event,
    comp: &mut Competitor,
    config: &RaceConfig,
) -> Result<Outcome> {
    let Some(raw) = event.first_param() else {
        log::warn!("Competitor({}) entered a firing range without a line number", comp.id);
        return Ok(Outcome::Applied);
    };

    let line = raw.parse::<u32>().map_err(|e| RaceError::InvalidParameter {
        event: event.kind.name(),
        competitor: comp.id,
        parameter: "firing line",
        value: raw.to_string(),
        reason: e.to_string(),
    })?;

    if line == 0 || line > config.firing_lines {
        log::warn!(
            "Competitor({}) is on firing line {} but the range has {} line(s)",
            comp.id,
            line,
            config.firing_lines
        );
    }
    if comp.open_session().is_some() {
        log::warn!("Competitor({}) entered a firing range without leaving the previous one", comp.id);
    }

    comp.firing_sessions
        .push(FiringSession::new(comp.laps_completed + 1, line, event.time));
    comp.status = Status::Shooting(line);
    Ok(Outcome::Applied)
}

fn on_target_hit(event: &Event, comp: &mut Competitor) -> Result<Outcome> {
    let id = comp.id;
    let target = parse_target(event, id)?;

    let session = comp.open_session().ok_or(RaceError::NoOpenFiringSession {
        event: event.kind.name(),
        competitor: id,
    })?;
    if !session.record_hit(target) {
        return Err(RaceError::DuplicateHit { competitor: id, target });
    }

    comp.hits += 1;
    Ok(Outcome::Applied)
}

fn parse_target(event: &Event, competitor: u32) -> Result<u32> {
    let raw = event.first_param().ok_or(RaceError::MissingParameter {
        event: event.kind.name(),
        competitor,
        parameter: "target",
    })?;

    let invalid = |reason: String| RaceError::InvalidParameter {
        event: event.kind.name(),
        competitor,
        parameter: "target",
        value: raw.to_string(),
        reason,
    };

    let target = raw.parse::<u32>().map_err(|e| invalid(e.to_string()))?;
    if !(1..=TARGETS_PER_SESSION).contains(&target) {
        return Err(invalid(format!("targets are numbered 1 to {}", TARGETS_PER_SESSION)));
    }
    Ok(target)
}

fn on_left_firing_range(event: &Event, comp: &mut Competitor) -> Result<Outcome> {
    let id = comp.id;
    let session = comp.open_session().ok_or(RaceError::NoOpenFiringSession {
        event: event.kind.name(),
        competitor: id,
    })?;

    session.end = Some(event.time);
    let misses = session.misses();
    log::debug!("Competitor({}) missed {} target(s) on line {}", id, misses, session.line);

    // One penalty lap per missed target
    comp.penalty_laps += misses;
    comp.status = Status::Racing;
    Ok(Outcome::Applied)
}

fn on_entered_penalty(event: &Event, comp: &mut Competitor) -> Result<Outcome> {
    comp.penalty_entered = Some(event.time);
    comp.status = Status::InPenalty;
    Ok(Outcome::Applied)
}

fn on_left_penalty(event: &Event, comp: &mut Competitor) -> Result<Outcome> {
    match comp.penalty_entered.take() {
        Some(entered) => {
            comp.penalty_time = comp.penalty_time + event.time.signed_duration_since(entered);
        }
        None => log::warn!("Competitor({}) left penalty laps it never entered", comp.id),
    }
    comp.status = Status::Racing;
    Ok(Outcome::Applied)
}

fn on_lap_completed(event: &Event, comp: &mut Competitor, config: &RaceConfig) -> Result<Outcome> {
    comp.laps_completed += 1;

    match comp.lap_start {
        Some(start) => comp.lap_times.push(event.time.signed_duration_since(start)),
        None => log::warn!(
            "Competitor({}) completed lap {} without a lap start",
            comp.id,
            comp.laps_completed
        ),
    }

    if comp.laps_completed >= config.laps {
        return Ok(Outcome::Superseded(Event::new(
            event.time,
            EventKind::Finished,
            comp.id,
        )));
    }

    comp.lap_start = Some(event.time);
    Ok(Outcome::Applied)
}

fn on_did_not_finish(event: &Event, comp: &mut Competitor) -> Result<Outcome> {
    let reason = (!event.params.is_empty()).then(|| event.params.join(" "));
    comp.status = Status::NotFinished(reason);
    comp.end_time = Some(event.time);
    Ok(Outcome::Applied)
}

fn on_disqualified(event: &Event, comp: &mut Competitor) -> Result<Outcome> {
    comp.disqualified = true;
    comp.status = Status::Disqualified;
    comp.end_time = Some(event.time);
    Ok(Outcome::Applied)
}

fn on_finished(event: &Event, comp: &mut Competitor) -> Result<Outcome> {
    comp.status = Status::Finished;
    comp.end_time = Some(event.time);
    Ok(Outcome::Applied)
}
