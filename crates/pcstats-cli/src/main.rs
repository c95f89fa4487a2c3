#![forbid(unsafe_code)]

mod output;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use output::OutputMode;
use pcstats_core::config::Config;
use pcstats_core::diag::TracingSink;
use pcstats_core::ingest;
use pcstats_core::replay::{CycleContext, Reconciler, ReviewerDirectory};
use pcstats_core::report;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "pcstats: reviewer activity statistics from HotCRP logs",
    long_about = "Reconstructs reviewer assignments and submission timeliness from \
                  HotCRP action logs, then emits one report row per reviewer. \
                  Warnings about unrecognized actions or unknown emails go to \
                  stderr and never affect the exit status."
)]
struct Cli {
    /// Path to the cycle configuration file.
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Write the report to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Emit JSON output instead of CSV.
    #[arg(long)]
    json: bool,

    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress warnings.
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    const fn output_mode(&self) -> OutputMode {
        if self.json {
            OutputMode::Json
        } else {
            OutputMode::Csv
        }
    }

    const fn default_log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "warn"
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Diagnostics go to stderr; the report stream stays clean.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.default_log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let config = Config::load(&cli.config)
        .with_context(|| format!("failed to load configuration {}", cli.config.display()))?;
    if !config.general.conference_name.is_empty() {
        tracing::info!("generating report for {}", config.general.conference_name);
    }

    // Union of reviewers across all cycles, before any log is replayed.
    let mut directory = ReviewerDirectory::new();
    for cycle in &config.cycles {
        let identities = ingest::load_reviewers(&cycle.reviewers_file).with_context(|| {
            format!("failed to load reviewers for cycle {}", cycle.cycle_number)
        })?;
        for identity in identities {
            directory.add_identity(&identity);
        }
    }
    tracing::debug!("loaded {} reviewers", directory.len());

    let mut sink = TracingSink;
    for cycle in &config.cycles {
        let records = ingest::load_log(&cycle.log_file)
            .with_context(|| format!("failed to load log for cycle {}", cycle.cycle_number))?;
        tracing::debug!(
            "replaying {} records for cycle {}",
            records.len(),
            cycle.cycle_number
        );
        let ctx = CycleContext::from_config(cycle);
        Reconciler::new(&mut directory, &mut sink).replay(&ctx, records);
    }

    let rows = report::report_rows(&directory, &config.cycles);
    output::write_report(&rows, cli.output_mode(), cli.output.as_deref())
}
