//! Event log parser
//!
//! Reads the competition log (`[HH:MM:SS.mmm] <kind> <competitor> [params...]`, one
//! event per line) into `Event` records. Only an unreadable file is an error;
//! individual malformed lines are skipped.

use crate::event::{Event, EventKind};
use crate::types::{parse_time, RaceError, Result};
use std::path::Path;

/// Parser for the textual competition log
pub struct EventLogParser;

impl EventLogParser {
    /// Read and parse an event log file
    pub fn parse(path: &Path) -> Result<Vec<Event>> {
        log::info!("Parsing event log: {:?}", path);

        let content = std::fs::read_to_string(path).map_err(|source| RaceError::EventFile {
            path: path.to_path_buf(),
            source,
        })?;

        let events = Self::parse_str(&content);
        log::info!("Parsed {} events from {:?}", events.len(), path);
        Ok(events)
    }

    /// Parse an in-memory event log, preserving line order
    pub fn parse_str(content: &str) -> Vec<Event> {
        let mut events = Vec::new();
        let mut skipped = 0usize;

        for (index, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            match parse_line(line) {
                Some(event) => events.push(event),
                None => {
                    log::debug!("Skipping malformed line {}: {:?}", index + 1, line);
                    skipped += 1;
                }
            }
        }

        if skipped > 0 {
            log::warn!("Skipped {} malformed event line(s)", skipped);
        }

        events
    }
}

/// Parse one non-blank log line; `None` if the line is malformed
///
/// A kind or competitor field that is not a number reads as 0, so the line still
/// reaches the dispatcher (kind 0 is unknown).
pub fn parse_line(line: &str) -> Option<Event> {
    let rest = line.trim().strip_prefix('[')?;
    let (time, fields) = rest.split_once(']')?;
    let time = parse_time(time).ok()?;

    let mut fields = fields.split_whitespace();
    let kind = numeric_field(fields.next()?);
    let competitor_id = numeric_field(fields.next()?);

    Some(Event {
        time,
        kind: EventKind::from_code(kind),
        competitor_id,
        params: fields.map(str::to_string).collect(),
    })
}

fn numeric_field(field: &str) -> u32 {
    field.parse().unwrap_or_else(|_| {
        log::debug!("Non-numeric field {:?} read as 0", field);
        0
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    #[test]
    fn test_parse_line_with_params() {
        let event = parse_line("[09:05:59.867] 2 1 09:30:00.000").unwrap();
        assert_eq!(event.time, NaiveTime::from_hms_milli_opt(9, 5, 59, 867).unwrap());
        assert_eq!(event.kind, EventKind::StartTimeAssigned);
        assert_eq!(event.competitor_id, 1);
        assert_eq!(event.params, vec!["09:30:00.000".to_string()]);
    }

    #[test]
    fn test_parse_line_unknown_kind_is_kept() {
        let event = parse_line("[09:05:59.867] 99 4").unwrap();
        assert_eq!(event.kind, EventKind::Unknown(99));
        assert!(event.params.is_empty());
    }

    #[test]
    fn test_malformed_lines_are_rejected() {
        assert!(parse_line("09:05:59.867] 1 1").is_none()); // No opening bracket
        assert!(parse_line("[09:05:59.867 1 1").is_none()); // No closing bracket
        assert!(parse_line("[9h05] 1 1").is_none()); // Bad timestamp
        assert!(parse_line("[09:05:59.867] 1").is_none()); // Missing competitor
    }

    #[test]
    fn test_non_numeric_fields_read_as_zero() {
        let event = parse_line("[09:00:00.000] abc 7").unwrap();
        assert_eq!(event.kind, EventKind::Unknown(0));
        assert_eq!(event.competitor_id, 7);

        let event = parse_line("[09:00:01.000] 1 x").unwrap();
        assert_eq!(event.kind, EventKind::Registered);
        assert_eq!(event.competitor_id, 0);

        let events = EventLogParser::parse_str("[09:00:00.000] abc 7\n[09:00:01.000] 1 x\n");
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn test_parse_str_skips_bad_lines_and_blanks() {
        let log = "\
[09:05:59.867] 1 1

garbage line
[09:15:00.841] 2 1 09:30:00.000
[09:29:45.734] 3
[09:29:45.734] 3 1
";
        let events = EventLogParser::parse_str(log);
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].kind, EventKind::Registered);
        assert_eq!(events[1].kind, EventKind::StartTimeAssigned);
        assert_eq!(events[2].kind, EventKind::OnStartLine);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = EventLogParser::parse(Path::new("nonexistent-events.log"));
        assert!(matches!(result, Err(RaceError::EventFile { .. })));
    }
}
