//! Diagnostic sink: how non-fatal reconciliation warnings leave the core.
//!
//! Unknown action labels, unresolvable subject emails, and damaged rows are
//! recoverable by policy. They must reach the operator without touching the
//! report stream and without aborting the run, so the reconciler reports
//! them through this seam instead of printing.

/// Receives non-fatal diagnostics during reconciliation.
pub trait DiagnosticSink {
    fn warn(&mut self, message: String);
}

/// Routes warnings to the `tracing` subscriber (stderr in the CLI).
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn warn(&mut self, message: String) {
        tracing::warn!("{message}");
    }
}

/// Collects warnings in memory; used by tests and available to embedders.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    pub warnings: Vec<String>,
}

impl DiagnosticSink for MemorySink {
    fn warn(&mut self, message: String) {
        self.warnings.push(message);
    }
}
