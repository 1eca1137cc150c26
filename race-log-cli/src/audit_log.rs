//! Audit log output
//!
//! Audit lines go to stdout and, when requested, to a log file as well.

use anyhow::{Context, Result};
use race_log_core::{AuditSink, WriterSink};
use std::fs::File;
use std::io::{self, BufWriter, Stdout, Write};
use std::path::Path;

/// Audit sink writing to an optional file and optionally echoing to stdout
pub struct AuditLog {
    file: Option<WriterSink<BufWriter<File>>>,
    stdout: Option<WriterSink<Stdout>>,
}

impl AuditLog {
    pub fn new(path: Option<&Path>, echo: bool) -> Result<Self> {
        let file = match path {
            Some(path) => {
                let file = File::create(path)
                    .with_context(|| format!("Failed to create audit log: {:?}", path))?;
                log::info!("Writing audit log to {:?}", path);
                Some(WriterSink::new(BufWriter::new(file)))
            }
            None => None,
        };
        let stdout = echo.then(|| WriterSink::new(io::stdout()));
        Ok(Self { file, stdout })
    }

    /// Flush buffered lines to the file
    pub fn finish(self) -> Result<()> {
        if let Some(sink) = self.file {
            sink.into_inner().flush().context("Failed to flush audit log")?;
        }
        Ok(())
    }
}

impl AuditSink for AuditLog {
    fn record(&mut self, line: &str) -> race_log_core::Result<()> {
        if let Some(stdout) = self.stdout.as_mut() {
            stdout.record(line)?;
        }
        if let Some(file) = self.file.as_mut() {
            file.record(line)?;
        }
        Ok(())
    }
}
