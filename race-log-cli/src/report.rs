//! Report rendering and output
//!
//! Renders the results report as text (header plus one line per competitor) or JSON.

use anyhow::{Context, Result};
use clap::ValueEnum;
use race_log_core::{Report, REPORT_HEADER};
use std::fs;
use std::path::Path;

/// Report output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Txt,
    Json,
}

/// Render the report in the requested format
pub fn render(report: &Report, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Txt => Ok(format!(
            "Result report. Report structure represents below\n{}\n\n{}",
            REPORT_HEADER, report
        )),
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(report).context("Failed to serialize report")?;
            json.push('\n');
            Ok(json)
        }
    }
}

/// Write a rendered report to a file
pub fn write_report(path: &Path, rendered: &str) -> Result<()> {
    fs::write(path, rendered).with_context(|| format!("Failed to write report: {:?}", path))?;
    log::info!("Report written to {:?}", path);
    Ok(())
}
