//! Per-reviewer aggregate: owned review states plus activity counters.

#![allow(clippy::module_name_repetitions)]

use std::collections::BTreeMap;

use crate::Instant;
use crate::model::paper::PaperKey;
use crate::model::review::ReviewState;

/// Everything reconciled for one reviewer, keyed by email in the directory.
///
/// Owns the map from paper key to [`ReviewState`] (arena-by-map: queries
/// always start from the owning reviewer, so no back-pointers are needed),
/// the raw comment instants, and the shepherded paper keys. Shepherd
/// reassignment is not modeled: `Set shepherd` events only append, so
/// duplicates are permitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewerAggregate {
    full_name: String,
    email: String,
    reviews: BTreeMap<PaperKey, ReviewState>,
    comments: Vec<Instant>,
    shepherd: Vec<PaperKey>,
}

impl ReviewerAggregate {
    #[must_use]
    pub const fn new(full_name: String, email: String) -> Self {
        Self {
            full_name,
            email,
            reviews: BTreeMap::new(),
            comments: Vec::new(),
            shepherd: Vec::new(),
        }
    }

    #[must_use]
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Apply an assignment event, creating the review record on demand.
    pub fn apply_assign(&mut self, paper: PaperKey, ts: Instant, due: Instant, cycle_end: Instant) {
        self.review_entry(paper, cycle_end).apply_assign(ts, due);
    }

    /// Apply an unassignment event, creating the review record on demand.
    pub fn apply_unassign(
        &mut self,
        paper: PaperKey,
        ts: Instant,
        due: Instant,
        cycle_end: Instant,
    ) {
        self.review_entry(paper, cycle_end).apply_unassign(ts, due);
    }

    /// Apply a submission event, creating the review record on demand.
    ///
    /// When no assignment record exists yet the materialized record is
    /// unassigned with no due date; see [`ReviewState::apply_submission`] for
    /// why that ambiguity is preserved.
    pub fn apply_submission(&mut self, paper: PaperKey, ts: Instant, cycle_end: Instant) {
        self.review_entry(paper, cycle_end).apply_submission(ts);
    }

    pub fn add_comment(&mut self, ts: Instant) {
        self.comments.push(ts);
    }

    pub fn add_shepherd(&mut self, paper: PaperKey) {
        self.shepherd.push(paper);
    }

    fn review_entry(&mut self, paper: PaperKey, cycle_end: Instant) -> &mut ReviewState {
        self.reviews
            .entry(paper)
            .or_insert_with(|| ReviewState::new(cycle_end))
    }

    /// Papers currently assigned, in ascending `(cycle, number)` order.
    #[must_use]
    pub fn assigned_papers(&self) -> Vec<PaperKey> {
        self.reviews
            .iter()
            .filter(|(_, review)| review.is_assigned())
            .map(|(paper, _)| *paper)
            .collect()
    }

    /// Papers with a known submission, in ascending `(cycle, number)` order.
    #[must_use]
    pub fn completed_papers(&self) -> Vec<PaperKey> {
        self.reviews
            .iter()
            .filter(|(_, review)| review.is_submitted())
            .map(|(paper, _)| *paper)
            .collect()
    }

    /// AND over every tracked review's on-time predicate.
    ///
    /// Vacuously true for a reviewer with zero reviews.
    #[must_use]
    pub fn all_on_time(&self) -> bool {
        self.reviews.values().all(ReviewState::on_time)
    }

    /// Sum of whole days late over every not-on-time review.
    #[must_use]
    pub fn days_late_total(&self) -> i64 {
        self.reviews
            .values()
            .filter_map(ReviewState::days_late)
            .sum()
    }

    /// Count comments within an inclusive window; a `None` bound is
    /// unbounded on that side. A window with `start > end` matches nothing.
    #[must_use]
    pub fn comments_in_window(&self, start: Option<Instant>, end: Option<Instant>) -> usize {
        self.comments
            .iter()
            .filter(|&&time| {
                start.is_none_or(|start| start <= time) && end.is_none_or(|end| time <= end)
            })
            .count()
    }

    #[must_use]
    pub fn comment_count(&self) -> usize {
        self.comments.len()
    }

    #[must_use]
    pub fn shepherd_assignments(&self) -> &[PaperKey] {
        &self.shepherd
    }
}
