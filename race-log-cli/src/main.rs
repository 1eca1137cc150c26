//! Race Log Processor CLI Application
//!
//! This is the command-line interface for the biathlon race log processor.
//! It uses the race-log-core library and adds:
//! - Configuration loading (JSON or TOML)
//! - Audit log output (stdout and file)
//! - Report output (TXT/JSON)

use anyhow::{Context, Result};
use clap::Parser;
use race_log_core::{EventLogParser, RaceProcessor, Report};
use std::path::PathBuf;

mod audit_log;
mod config;
mod report;

use audit_log::AuditLog;
use report::OutputFormat;

/// Race Log Processor - Replay a competition event log and report results
#[derive(Parser, Debug)]
#[command(name = "race-log-cli")]
#[command(about = "Process biathlon competition event logs into a results report", long_about = None)]
#[command(version)]
struct Args {
    /// Path to race configuration file (.json or .toml)
    #[arg(short, long, value_name = "FILE")]
    config: PathBuf,

    /// Path to the competition event log
    #[arg(short, long, value_name = "FILE")]
    events: PathBuf,

    /// Also write the audit log to this file
    #[arg(long, value_name = "FILE")]
    audit_log: Option<PathBuf>,

    /// Also write the results report to this file
    #[arg(short, long, value_name = "FILE")]
    report: Option<PathBuf>,

    /// Report format
    #[arg(short, long, value_enum, default_value = "txt")]
    format: OutputFormat,

    /// Verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress the audit echo and all diagnostics except errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose, args.quiet);

    log::info!("Race Log Processor CLI v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using core library v{}", race_log_core::VERSION);

    run(&args)
}

fn run(args: &Args) -> Result<()> {
    log::info!("Loading configuration from: {:?}", args.config);
    let config = config::load_config(&args.config)?;
    log::debug!("Configuration loaded: {:?}", config);

    let events = EventLogParser::parse(&args.events)
        .with_context(|| format!("Cannot parse events file: {:?}", args.events))?;

    let mut audit = AuditLog::new(args.audit_log.as_deref(), !args.quiet)?;
    let mut processor = RaceProcessor::new(config);
    processor
        .process_all(&events, &mut audit)
        .context("Race processing aborted")?;
    audit.finish()?;

    for event in processor.outgoing_events() {
        log::info!("Outgoing event: {}", event);
    }

    let report = Report::generate(processor.registry(), processor.config());
    let rendered = report::render(&report, args.format)?;

    if let Some(path) = &args.report {
        report::write_report(path, &rendered)?;
    }
    print!("{}", rendered);

    Ok(())
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
