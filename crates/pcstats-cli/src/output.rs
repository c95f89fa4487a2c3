//! Report writers: CSV (default) and JSON output modes.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use pcstats_core::report::ReportRow;

/// Output format for the report stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Csv,
    Json,
}

/// Write the report to `target`, or stdout when no target is given.
///
/// # Errors
///
/// Returns an error when the target cannot be created or written.
pub fn write_report(rows: &[ReportRow], mode: OutputMode, target: Option<&Path>) -> Result<()> {
    match target {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            write_to(rows, mode, file)
        }
        None => write_to(rows, mode, std::io::stdout().lock()),
    }
}

fn write_to<W: Write>(rows: &[ReportRow], mode: OutputMode, writer: W) -> Result<()> {
    match mode {
        OutputMode::Csv => {
            let mut csv_writer = csv::Writer::from_writer(writer);
            for row in rows {
                csv_writer
                    .serialize(row)
                    .context("failed to write report row")?;
            }
            csv_writer.flush().context("failed to flush report")?;
        }
        OutputMode::Json => {
            let mut writer = writer;
            serde_json::to_writer_pretty(&mut writer, rows).context("failed to write report")?;
            writeln!(writer)?;
        }
    }
    Ok(())
}
