//! Per (reviewer, paper) review state machine.
//!
//! The action log is replayed in whatever order it arrives, so every mutator
//! here must be safe under arbitrary permutations of the same event multiset.
//! Assignment status uses a last-writer-wins rule keyed on the event
//! timestamp: an assign/unassign only takes effect when its timestamp is
//! *strictly* newer than the one already recorded. Equal timestamps are
//! no-ops, which makes replay idempotent — applying the same event twice
//! cannot flip the state back.
//!
//! Submission uses the opposite rule: the *earliest* submission timestamp
//! wins, because a reviewer may resubmit and only the first submission counts
//! for timeliness.

#![allow(clippy::module_name_repetitions)]

use crate::Instant;

/// Reconciled state of one review obligation.
///
/// Created lazily on the first assign, unassign, or submission event for a
/// (reviewer, paper) pair; never deleted; mutated in place by later events.
/// The externally observable states are assigned-pending, assigned-on-time,
/// assigned-late, and unassigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewState {
    assigned: bool,
    /// Timestamp of the most recent assignment-status-changing event applied
    /// so far. Never decreases under replay.
    time_assigned: Option<Instant>,
    /// Round deadline in effect at the last assignment change.
    time_due: Option<Instant>,
    /// The cycle's acceptance instant, used as the no-show lateness
    /// reference when a review was never submitted.
    cycle_end: Instant,
    /// Earliest known submission.
    time_submitted: Option<Instant>,
}

impl ReviewState {
    /// A fresh, unassigned record with no history.
    #[must_use]
    pub const fn new(cycle_end: Instant) -> Self {
        Self {
            assigned: false,
            time_assigned: None,
            time_due: None,
            cycle_end,
            time_submitted: None,
        }
    }

    /// Record an assignment at `ts` with round deadline `due`.
    ///
    /// No-op unless `ts` is strictly newer than the recorded assignment
    /// timestamp: the latest action in the log is the correct one.
    pub fn apply_assign(&mut self, ts: Instant, due: Instant) {
        if self.time_assigned.is_none_or(|prior| prior < ts) {
            self.assigned = true;
            self.time_assigned = Some(ts);
            self.time_due = Some(due);
        }
    }

    /// Record an unassignment at `ts`. Same monotonic guard as
    /// [`Self::apply_assign`].
    pub fn apply_unassign(&mut self, ts: Instant, due: Instant) {
        if self.time_assigned.is_none_or(|prior| prior < ts) {
            self.assigned = false;
            self.time_assigned = Some(ts);
            self.time_due = Some(due);
        }
    }

    /// Record a submission at `ts`, keeping the earliest one ever seen.
    ///
    /// A submission may arrive for a pair with no assignment record at all;
    /// the caller materializes an unassigned record first. Such a record is
    /// vacuously on time (no obligation), which can understate true lateness
    /// when the matching assign event simply has not been replayed yet. That
    /// behavior is inherited from unordered log replay and is preserved
    /// deliberately, not patched.
    pub fn apply_submission(&mut self, ts: Instant) {
        if self.time_submitted.is_none_or(|prior| prior > ts) {
            self.time_submitted = Some(ts);
        }
    }

    #[must_use]
    pub const fn is_assigned(&self) -> bool {
        self.assigned
    }

    #[must_use]
    pub const fn is_submitted(&self) -> bool {
        self.time_submitted.is_some()
    }

    /// Whether this review met its obligation.
    ///
    /// - Unassigned reviews are always on time (no obligation).
    /// - An assigned review with no submission is not on time.
    /// - Submission at or before the due instant is on time.
    /// - A review assigned *after* its own deadline is on time regardless of
    ///   when it was submitted (late assignments are never penalized).
    #[must_use]
    pub fn on_time(&self) -> bool {
        if !self.assigned {
            return true;
        }
        // Assigned records always carry a due date (both mutators set it).
        let Some(due) = self.time_due else {
            return false;
        };
        let Some(submitted) = self.time_submitted else {
            return false;
        };
        if submitted <= due {
            return true;
        }
        self.time_assigned.is_some_and(|assigned| assigned > due)
    }

    /// Lateness in whole days, truncated toward zero.
    ///
    /// `None` when the review is on time. A review that was never submitted
    /// is measured against the cycle end instead of a submission time.
    #[must_use]
    pub fn days_late(&self) -> Option<i64> {
        if self.on_time() {
            return None;
        }
        // Not on time implies assigned, and assigned implies a due date.
        let due = self.time_due?;
        let reference = self.time_submitted.unwrap_or(self.cycle_end);
        Some((reference - due).num_days())
    }
}
