//! Report assembly: one row per reviewer from the reconciled directory.

#![allow(clippy::module_name_repetitions)]

use serde::Serialize;

use crate::config::CycleConfig;
use crate::model::reviewer::ReviewerAggregate;
use crate::replay::ReviewerDirectory;

/// One output row. Field order is the report's column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub full_name: String,
    pub email: String,
    pub num_assigned_reviews: usize,
    pub num_completed_reviews: usize,
    /// `"Y"` when every tracked review met its obligation (vacuously `"Y"`
    /// for reviewers with no reviews), `"N"` otherwise.
    pub all_on_time: &'static str,
    pub sum_days_late: i64,
    pub num_comments: usize,
    pub num_comments_r1_disc: usize,
    pub num_comments_r2_disc: usize,
    pub num_comments_rebuttal: usize,
    pub num_shepherd: usize,
    /// Comments between acceptance and camera-ready (shepherding activity).
    pub num_comments_after_notification: usize,
}

/// Build report rows for every reviewer in the directory, in directory
/// (ascending email) order.
///
/// Window counters are summed across all configured cycles; the windows of
/// different cycles may overlap freely, each is counted independently.
#[must_use]
pub fn report_rows(directory: &ReviewerDirectory, cycles: &[CycleConfig]) -> Vec<ReportRow> {
    directory
        .iter()
        .map(|reviewer| build_row(reviewer, cycles))
        .collect()
}

fn build_row(reviewer: &ReviewerAggregate, cycles: &[CycleConfig]) -> ReportRow {
    let mut r1_disc = 0;
    let mut r2_disc = 0;
    let mut rebuttal = 0;
    let mut after_notification = 0;

    for cycle in cycles {
        let times = &cycle.timestamps;
        r1_disc += reviewer.comments_in_window(
            Some(times.round1_discussion_start),
            Some(times.round1_discussion_end),
        );
        r2_disc += reviewer.comments_in_window(
            Some(times.round2_discussion_start),
            Some(times.round2_discussion_end),
        );
        rebuttal += reviewer.comments_in_window(
            Some(times.rebuttal_discussion_start),
            Some(times.rebuttal_discussion_end),
        );
        after_notification +=
            reviewer.comments_in_window(Some(times.acceptance), Some(times.camera_ready));
    }

    ReportRow {
        full_name: reviewer.full_name().to_string(),
        email: reviewer.email().to_string(),
        num_assigned_reviews: reviewer.assigned_papers().len(),
        num_completed_reviews: reviewer.completed_papers().len(),
        all_on_time: if reviewer.all_on_time() { "Y" } else { "N" },
        sum_days_late: reviewer.days_late_total(),
        num_comments: reviewer.comment_count(),
        num_comments_r1_disc: r1_disc,
        num_comments_r2_disc: r2_disc,
        num_comments_rebuttal: rebuttal,
        num_shepherd: reviewer.shepherd_assignments().len(),
        num_comments_after_notification: after_notification,
    }
}

#[cfg(test)]
mod tests {
    use super::report_rows;
    use crate::config::Config;
    use crate::diag::MemorySink;
    use crate::ingest::{Identity, LogRecord};
    use crate::replay::{CycleContext, Reconciler, ReviewerDirectory};

    fn config() -> Config {
        toml::from_str(
            r#"
[[cycles]]
cycle_number = 1
reviewers_file = "users.csv"
log_file = "log.csv"

[cycles.timestamps]
submission = "2024-06-06 23:59:59 -1100"
round1_deadline = "2024-07-10 23:59:59 -1100"
round1_discussion_start = "2024-07-11 00:00:00 -0400"
round1_discussion_end = "2024-07-19 23:59:59 -0400"
round2_deadline = "2024-08-09 23:59:59 -1100"
round2_discussion_start = "2024-08-12 00:00:00 -0400"
round2_discussion_end = "2024-09-08 23:59:59 -0400"
rebuttal_discussion_start = "2024-08-19 00:00:00 -0400"
rebuttal_discussion_end = "2024-08-30 23:59:59 -0400"
acceptance = "2024-09-09 12:00:00 -0400"
camera_ready = "2024-10-18 23:59:59 -1100"
"#,
        )
        .expect("test config must parse")
    }

    fn record(date: &str, email: &str, affected: &str, paper: &str, action: &str) -> LogRecord {
        LogRecord {
            date: date.to_string(),
            email: email.to_string(),
            affected_email: affected.to_string(),
            paper: paper.to_string(),
            action: action.to_string(),
        }
    }

    #[test]
    fn zero_activity_reviewer_still_gets_a_row() {
        let mut directory = ReviewerDirectory::new();
        directory.add_identity(&Identity {
            first: "Grace".to_string(),
            last: "Hopper".to_string(),
            email: "grace@example.com".to_string(),
        });

        let rows = report_rows(&directory, &config().cycles);
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.full_name, "Grace Hopper");
        assert_eq!(row.num_assigned_reviews, 0);
        assert_eq!(row.num_completed_reviews, 0);
        assert_eq!(row.all_on_time, "Y");
        assert_eq!(row.sum_days_late, 0);
        assert_eq!(row.num_comments, 0);
    }

    #[test]
    fn rows_come_out_in_email_order() {
        let mut directory = ReviewerDirectory::new();
        for (first, email) in [("Zee", "zee@example.com"), ("Abe", "abe@example.com")] {
            directory.add_identity(&Identity {
                first: first.to_string(),
                last: "Reviewer".to_string(),
                email: email.to_string(),
            });
        }
        let rows = report_rows(&directory, &config().cycles);
        assert_eq!(rows[0].email, "abe@example.com");
        assert_eq!(rows[1].email, "zee@example.com");
    }

    #[test]
    fn comment_windows_are_bucketed_per_cycle_configuration() {
        let config = config();
        let mut directory = ReviewerDirectory::new();
        directory.add_identity(&Identity {
            first: "Grace".to_string(),
            last: "Hopper".to_string(),
            email: "grace@example.com".to_string(),
        });

        let mut sink = MemorySink::default();
        let ctx = CycleContext::from_config(&config.cycles[0]);
        Reconciler::new(&mut directory, &mut sink).replay(
            &ctx,
            vec![
                // R1 discussion.
                record("2024-07-12 10:00:00 -0400", "grace@example.com", "", "57", "Comment 1 submitted"),
                // R2 discussion AND rebuttal discussion (overlapping windows).
                record("2024-08-20 10:00:00 -0400", "grace@example.com", "", "57", "Comment 2 submitted"),
                // After notification.
                record("2024-09-15 10:00:00 -0400", "grace@example.com", "", "57", "Comment 3 submitted"),
                // Outside every window.
                record("2024-06-01 10:00:00 -0400", "grace@example.com", "", "57", "Comment 4 submitted"),
            ],
        );

        let rows = report_rows(&directory, &config.cycles);
        let row = &rows[0];
        assert_eq!(row.num_comments, 4);
        assert_eq!(row.num_comments_r1_disc, 1);
        assert_eq!(row.num_comments_r2_disc, 1);
        assert_eq!(row.num_comments_rebuttal, 1);
        assert_eq!(row.num_comments_after_notification, 1);
    }

    #[test]
    fn lateness_and_shepherding_reach_the_row() {
        let config = config();
        let mut directory = ReviewerDirectory::new();
        directory.add_identity(&Identity {
            first: "Grace".to_string(),
            last: "Hopper".to_string(),
            email: "grace@example.com".to_string(),
        });

        let mut sink = MemorySink::default();
        let ctx = CycleContext::from_config(&config.cycles[0]);
        Reconciler::new(&mut directory, &mut sink).replay(
            &ctx,
            vec![
                record(
                    "2024-06-10 09:00:00 -0400",
                    "chair@example.com",
                    "grace@example.com",
                    "57",
                    "Assigned primary review (round R1)",
                ),
                record(
                    "2024-07-13 23:59:59 -1100",
                    "grace@example.com",
                    "",
                    "57",
                    "Review 1 submitted: 850 words",
                ),
                record(
                    "2024-09-10 09:00:00 -0400",
                    "chair@example.com",
                    "grace@example.com",
                    "57",
                    "Set shepherd to Grace Hopper",
                ),
            ],
        );

        let rows = report_rows(&directory, &config.cycles);
        let row = &rows[0];
        assert_eq!(row.num_assigned_reviews, 1);
        assert_eq!(row.num_completed_reviews, 1);
        assert_eq!(row.all_on_time, "N");
        assert_eq!(row.sum_days_late, 3);
        assert_eq!(row.num_shepherd, 1);
    }
}
