//! pcstats-core: event reconciliation and reporting for peer-review logs.
//!
//! The input is an append-only HotCRP action log that is *not* delivered in
//! chronological order and may contain duplicate or superseding events for
//! the same fact. The core of this crate is a last-writer-wins state machine
//! ([`model::review::ReviewState`]) whose final state is independent of the
//! order in which events are replayed, plus the aggregation queries that
//! turn the reconciled state into one report row per reviewer.
//!
//! # Conventions
//!
//! - **Errors**: thiserror enums per module; callers attach context with
//!   `anyhow` at the binary boundary.
//! - **Logging**: `tracing` macros. Non-fatal reconciliation diagnostics go
//!   through [`diag::DiagnosticSink`] instead, so the core stays testable
//!   without console coupling.

pub mod config;
pub mod diag;
pub mod event;
pub mod ingest;
pub mod model;
pub mod replay;
pub mod report;

/// Offset-aware instant used for every timestamp in the system.
///
/// Log and configuration timestamps both use the fixed
/// `%Y-%m-%d %H:%M:%S %z` pattern; see [`config::parse_timestamp`].
pub type Instant = chrono::DateTime<chrono::FixedOffset>;
