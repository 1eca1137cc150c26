//! Audit log
//!
//! Every handled event is described by one fixed sentence per event kind. The lines
//! are product output; they are written to an `AuditSink` in processing order.

use crate::event::{Event, EventKind};
use crate::types::{format_time, parse_time, RaceError, Result};
use std::io::Write;

/// Destination for audit lines
pub trait AuditSink {
    /// Write one audit line (without trailing newline)
    fn record(&mut self, line: &str) -> Result<()>;
}

/// Collects audit lines in memory
impl AuditSink for Vec<String> {
    fn record(&mut self, line: &str) -> Result<()> {
        self.push(line.to_string());
        Ok(())
    }
}

/// Writes audit lines to any `io::Write`, one per line
pub struct WriterSink<W: Write> {
    writer: W,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> AuditSink for WriterSink<W> {
    fn record(&mut self, line: &str) -> Result<()> {
        writeln!(self.writer, "{}", line).map_err(RaceError::Audit)
    }
}

/// Discards all audit lines
pub struct NullSink;

impl AuditSink for NullSink {
    fn record(&mut self, _line: &str) -> Result<()> {
        Ok(())
    }
}

/// Describe an event as an audit line, or `None` for unknown kinds
pub fn describe(event: &Event) -> Option<String> {
    let time = format_time(event.time);
    let id = event.competitor_id;

    let sentence = match event.kind {
        EventKind::Registered => format!("The competitor({}) registered", id),
        EventKind::StartTimeAssigned => {
            // Normalise the drawn time when it parses; echo it otherwise
            let start = event
                .first_param()
                .map(|raw| parse_time(raw).map(format_time).unwrap_or_else(|_| raw.to_string()))
                .unwrap_or_default();
            format!(
                "The start time for the competitor({}) was set by a draw to {}",
                id, start
            )
        }
        EventKind::OnStartLine => format!("The competitor({}) is on the start line", id),
        EventKind::Started => format!("The competitor({}) has started", id),
        EventKind::EnteredFiringRange => match event.first_param() {
            Some(line) => format!("The competitor({}) is on the firing range({})", id, line),
            None => format!("The competitor({}) is on the firing range", id),
        },
        EventKind::TargetHit => format!(
            "The target({}) has been hit by competitor({})",
            event.first_param().unwrap_or_default(),
            id
        ),
        EventKind::LeftFiringRange => format!("The competitor({}) left the firing range", id),
        EventKind::EnteredPenalty => format!("The competitor({}) entered the penalty laps", id),
        EventKind::LeftPenalty => format!("The competitor({}) left the penalty laps", id),
        EventKind::LapCompleted => format!("The competitor({}) ended the main lap", id),
        EventKind::DidNotFinish => {
            if event.params.is_empty() {
                format!("The competitor({}) can`t continue", id)
            } else {
                format!("The competitor({}) can`t continue: {}", id, event.params.join(" "))
            }
        }
        EventKind::Disqualified => format!("The competitor({}) is disqualified", id),
        EventKind::Finished => format!("The competitor({}) has finished", id),
        EventKind::Unknown(_) => return None,
    };

    Some(format!("[{}] {}", time, sentence))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn event(kind: EventKind) -> Event {
        Event::new(NaiveTime::from_hms_milli_opt(9, 30, 1, 5).unwrap(), kind, 1)
    }

    #[test]
    fn test_templates() {
        assert_eq!(
            describe(&event(EventKind::Registered)).unwrap(),
            "[09:30:01.005] The competitor(1) registered"
        );
        assert_eq!(
            describe(&event(EventKind::StartTimeAssigned).with_param("09:30:00.000")).unwrap(),
            "[09:30:01.005] The start time for the competitor(1) was set by a draw to 09:30:00.000"
        );
        assert_eq!(
            describe(&event(EventKind::TargetHit).with_param("4")).unwrap(),
            "[09:30:01.005] The target(4) has been hit by competitor(1)"
        );
        assert_eq!(
            describe(&event(EventKind::EnteredFiringRange).with_param("1")).unwrap(),
            "[09:30:01.005] The competitor(1) is on the firing range(1)"
        );
        assert_eq!(
            describe(&event(EventKind::Finished)).unwrap(),
            "[09:30:01.005] The competitor(1) has finished"
        );
    }

    #[test]
    fn test_dnf_reason_is_joined() {
        let dnf = event(EventKind::DidNotFinish)
            .with_param("Lost")
            .with_param("in")
            .with_param("the")
            .with_param("forest");
        assert_eq!(
            describe(&dnf).unwrap(),
            "[09:30:01.005] The competitor(1) can`t continue: Lost in the forest"
        );
        assert_eq!(
            describe(&event(EventKind::DidNotFinish)).unwrap(),
            "[09:30:01.005] The competitor(1) can`t continue"
        );
    }

    #[test]
    fn test_unknown_kind_has_no_line() {
        assert!(describe(&event(EventKind::Unknown(42))).is_none());
    }

    #[test]
    fn test_writer_sink() {
        let mut sink = WriterSink::new(Vec::new());
        sink.record("first").unwrap();
        sink.record("second").unwrap();
        assert_eq!(String::from_utf8(sink.into_inner()).unwrap(), "first\nsecond\n");
    }
}
