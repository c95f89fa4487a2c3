//! Replay: drives reviewer aggregates from the raw action log.
//!
//! HotCRP delivers the log newest-first, but nothing here relies on that:
//! the directory converges to the same final state for any permutation of
//! the record multiset, because every state mutation goes through the
//! monotonic-timestamp guards in [`crate::model::review::ReviewState`].

use std::collections::BTreeMap;

use crate::Instant;
use crate::config::{CycleConfig, parse_timestamp};
use crate::diag::DiagnosticSink;
use crate::event::{EventKind, classify};
use crate::ingest::{Identity, LogRecord};
use crate::model::paper::PaperKey;
use crate::model::reviewer::ReviewerAggregate;

/// All reviewer aggregates for one report run, keyed by email.
///
/// Constructed once from the identity tables (union across cycles), then
/// mutated by the [`Reconciler`], then read by the report. Iteration is in
/// ascending email order, which makes the report deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewerDirectory {
    reviewers: BTreeMap<String, ReviewerAggregate>,
}

impl ReviewerDirectory {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            reviewers: BTreeMap::new(),
        }
    }

    /// Register an identity. The first occurrence of an email wins;
    /// later duplicates (e.g. the same reviewer in two cycles) are no-ops.
    pub fn add_identity(&mut self, identity: &Identity) {
        self.reviewers
            .entry(identity.email.clone())
            .or_insert_with(|| {
                ReviewerAggregate::new(identity.full_name(), identity.email.clone())
            });
    }

    #[must_use]
    pub fn get(&self, email: &str) -> Option<&ReviewerAggregate> {
        self.reviewers.get(email)
    }

    pub fn get_mut(&mut self, email: &str) -> Option<&mut ReviewerAggregate> {
        self.reviewers.get_mut(email)
    }

    /// Aggregates in ascending email order.
    pub fn iter(&self) -> impl Iterator<Item = &ReviewerAggregate> {
        self.reviewers.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.reviewers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reviewers.is_empty()
    }
}

/// Per-cycle values resolved once before replay begins, so review state
/// never needs its own configuration lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleContext {
    pub cycle: u32,
    pub round1_deadline: Instant,
    pub round2_deadline: Instant,
    /// The cycle's acceptance instant; lateness reference for no-shows.
    pub cycle_end: Instant,
}

impl CycleContext {
    #[must_use]
    pub const fn from_config(cycle: &CycleConfig) -> Self {
        Self {
            cycle: cycle.cycle_number,
            round1_deadline: cycle.timestamps.round1_deadline,
            round2_deadline: cycle.timestamps.round2_deadline,
            cycle_end: cycle.timestamps.acceptance,
        }
    }
}

/// Replays classified log records into the directory.
///
/// Recovery rules: unknown action labels and unresolvable subject emails
/// are warnings, damaged timestamps/paper numbers on tracked records are
/// warnings, comment events from emails outside the directory are silently
/// skipped (authors comment too). Nothing here terminates the run.
pub struct Reconciler<'a, S: DiagnosticSink> {
    directory: &'a mut ReviewerDirectory,
    sink: &'a mut S,
}

impl<'a, S: DiagnosticSink> Reconciler<'a, S> {
    pub const fn new(directory: &'a mut ReviewerDirectory, sink: &'a mut S) -> Self {
        Self { directory, sink }
    }

    /// Replay a batch of records for one cycle, in whatever order they come.
    pub fn replay(&mut self, ctx: &CycleContext, records: impl IntoIterator<Item = LogRecord>) {
        for record in records {
            self.replay_record(ctx, &record);
        }
    }

    fn replay_record(&mut self, ctx: &CycleContext, record: &LogRecord) {
        let kind = classify(&record.action);
        match kind {
            EventKind::Ignored => {}
            EventKind::Unknown => {
                self.sink.warn(format!(
                    "cycle {}: unknown action [{}]",
                    ctx.cycle, record.action
                ));
            }
            EventKind::AssignR1 | EventKind::AssignR2 => {
                let due = round_deadline(ctx, kind);
                self.apply_assignment(ctx, record, kind, due, true);
            }
            EventKind::UnassignR1 | EventKind::UnassignR2 => {
                let due = round_deadline(ctx, kind);
                self.apply_assignment(ctx, record, kind, due, false);
            }
            EventKind::Submitted => {
                let Some((ts, paper)) = self.tracked_fields(ctx, record) else {
                    return;
                };
                let Some(reviewer) = self.directory.get_mut(&record.email) else {
                    self.warn_unknown_subject(ctx, record, &record.email, "review submitted");
                    return;
                };
                reviewer.apply_submission(paper, ts, ctx.cycle_end);
            }
            EventKind::Comment => {
                let Some(ts) = self.tracked_timestamp(ctx, record) else {
                    return;
                };
                // Authors comment too; unknown commenters are not reviewers
                // and are skipped without a warning.
                if let Some(reviewer) = self.directory.get_mut(&record.email) {
                    reviewer.add_comment(ts);
                }
            }
            EventKind::ShepherdSet => {
                let Some(paper) = self.tracked_paper(ctx, record) else {
                    return;
                };
                let Some(reviewer) = self.directory.get_mut(&record.affected_email) else {
                    self.warn_unknown_subject(ctx, record, &record.affected_email, "set shepherd on");
                    return;
                };
                reviewer.add_shepherd(paper);
            }
        }
    }

    fn apply_assignment(
        &mut self,
        ctx: &CycleContext,
        record: &LogRecord,
        kind: EventKind,
        due: Instant,
        assign: bool,
    ) {
        let Some((ts, paper)) = self.tracked_fields(ctx, record) else {
            return;
        };
        let Some(reviewer) = self.directory.get_mut(&record.affected_email) else {
            self.warn_unknown_subject(
                ctx,
                record,
                &record.affected_email,
                Self::assignment_label(kind),
            );
            return;
        };
        if assign {
            reviewer.apply_assign(paper, ts, due, ctx.cycle_end);
        } else {
            reviewer.apply_unassign(paper, ts, due, ctx.cycle_end);
        }
    }

    const fn assignment_label(kind: EventKind) -> &'static str {
        match kind {
            EventKind::AssignR1 => "R1 assignment",
            EventKind::AssignR2 => "R2 assignment",
            EventKind::UnassignR1 => "R1 removed assignment",
            _ => "R2 removed assignment",
        }
    }

    fn tracked_fields(
        &mut self,
        ctx: &CycleContext,
        record: &LogRecord,
    ) -> Option<(Instant, PaperKey)> {
        let ts = self.tracked_timestamp(ctx, record)?;
        let paper = self.tracked_paper(ctx, record)?;
        Some((ts, paper))
    }

    fn tracked_timestamp(&mut self, ctx: &CycleContext, record: &LogRecord) -> Option<Instant> {
        let Ok(ts) = parse_timestamp(&record.date) else {
            self.sink.warn(format!(
                "cycle {}: unreadable timestamp '{}' for action [{}]",
                ctx.cycle, record.date, record.action
            ));
            return None;
        };
        Some(ts)
    }

    fn tracked_paper(&mut self, ctx: &CycleContext, record: &LogRecord) -> Option<PaperKey> {
        let Ok(number) = record.paper.parse::<u32>() else {
            self.sink.warn(format!(
                "cycle {}: unreadable paper number '{}' for action [{}]",
                ctx.cycle, record.paper, record.action
            ));
            return None;
        };
        Some(PaperKey::new(ctx.cycle, number))
    }

    fn warn_unknown_subject(
        &mut self,
        ctx: &CycleContext,
        record: &LogRecord,
        email: &str,
        what: &str,
    ) {
        self.sink.warn(format!(
            "could not find {email} for cycle {} {what} #{}",
            ctx.cycle, record.paper
        ));
    }
}

const fn round_deadline(ctx: &CycleContext, kind: EventKind) -> Instant {
    match kind {
        EventKind::AssignR2 | EventKind::UnassignR2 => ctx.round2_deadline,
        _ => ctx.round1_deadline,
    }
}
