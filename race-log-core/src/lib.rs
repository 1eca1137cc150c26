//! Race Log Processor Library
//!
//! A reusable library for processing biathlon competition event logs into
//! per-competitor race state and a results report.
//!
//! # Architecture
//!
//! The pipeline runs in a single synchronous pass:
//! - `EventLogParser` turns log lines into `Event` records (malformed lines are skipped)
//! - `RaceProcessor` dispatches each event on its kind, mutating the competitor in the
//!   `Registry` and writing one audit line per handled event to an `AuditSink`
//! - `Report::generate` sorts the final competitors by end time and computes lap pace,
//!   penalty pace and hit counts
//!
//! Configuration file loading, logger setup and output files belong to the
//! application layer (race-log-cli).
//!
//! # Example Usage
//!
//! ```no_run
//! use race_log_core::{EventLogParser, RaceConfig, RaceProcessor, RaceSettings, Report};
//! use std::path::Path;
//!
//! let settings = RaceSettings {
//!     laps: 2,
//!     lap_len: 3651,
//!     penalty_len: 50,
//!     firing_lines: 1,
//!     start: "09:30:00.000".to_string(),
//!     start_delta: "00:00:30".to_string(),
//! };
//! let config = RaceConfig::try_from(settings).unwrap();
//!
//! let events = EventLogParser::parse(Path::new("events")).unwrap();
//!
//! let mut audit = Vec::new();
//! let mut processor = RaceProcessor::new(config);
//! processor.process_all(&events, &mut audit).unwrap();
//!
//! let report = Report::generate(processor.registry(), processor.config());
//! print!("{}", report);
//! ```

// Public modules
pub mod audit;
pub mod competitor;
pub mod config;
pub mod event;
pub mod machine;
pub mod parser;
pub mod registry;
pub mod report;
pub mod types;

// Re-export main types for convenience
pub use audit::{AuditSink, NullSink, WriterSink};
pub use competitor::{Competitor, FiringSession, Status};
pub use config::{RaceConfig, RaceSettings};
pub use event::{Event, EventKind};
pub use machine::RaceProcessor;
pub use parser::EventLogParser;
pub use registry::Registry;
pub use report::{Pace, Report, ReportLine, ResultStatus, REPORT_HEADER};
pub use types::{CompetitorId, RaceError, Result, Timestamp};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
