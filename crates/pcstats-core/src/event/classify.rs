//! Classification of raw HotCRP action labels into a closed event taxonomy.
//!
//! HotCRP writes free-text action labels like `Review 2 submitted: ...` or
//! `Comment 5 on submission submitted...`. Classification is driven by one
//! const rule table evaluated top-down, so the full taxonomy is auditable in
//! one place and testable in isolation from reconciliation. Labels that
//! match no rule classify as [`EventKind::Unknown`]; the reconciler surfaces
//! those as warnings and keeps going.

/// The closed set of event classifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Primary review assigned for round 1.
    AssignR1,
    /// Primary review assigned for round 2.
    AssignR2,
    /// Round-1 assignment removed.
    UnassignR1,
    /// Round-2 assignment removed.
    UnassignR2,
    /// A review was submitted.
    Submitted,
    /// A discussion comment was submitted.
    Comment,
    /// A reviewer was set as shepherd for a paper.
    ShepherdSet,
    /// Recognized activity that the report deliberately does not track
    /// (edits, deletions, meta-review lifecycle, mail, account noise, ...).
    Ignored,
    /// Label matched no rule; surfaced as a warning, never fatal.
    Unknown,
}

impl EventKind {
    /// Whether this classification mutates reconciliation state.
    #[must_use]
    pub const fn is_tracked(self) -> bool {
        !matches!(self, Self::Ignored | Self::Unknown)
    }
}

/// One classification rule. Rules are tried in table order; the first match
/// wins.
enum Rule {
    /// The whole label equals the pattern.
    Exact(&'static str, EventKind),
    /// The label starts with the pattern.
    Prefix(&'static str, EventKind),
    /// `<head><digits> [infix ]<tail>...` — the embedded ordinal is
    /// irrelevant to classification and is discarded.
    Numbered {
        head: &'static str,
        infix: Option<&'static str>,
        tail: &'static str,
        kind: EventKind,
    },
}

/// The classification table, mirroring the HotCRP action-label taxonomy.
const RULES: &[Rule] = &[
    Rule::Exact("Assigned primary review (round R1)", EventKind::AssignR1),
    Rule::Exact("Assigned primary review (round R2)", EventKind::AssignR2),
    Rule::Exact("Removed primary review (round R1)", EventKind::UnassignR1),
    Rule::Exact("Removed primary review (round R2)", EventKind::UnassignR2),
    Rule::Numbered {
        head: "Review ",
        infix: None,
        tail: "submitted: ",
        kind: EventKind::Submitted,
    },
    // Review edits happen both before submission (draft) and after the
    // rebuttal; neither counts as activity here.
    Rule::Numbered {
        head: "Review ",
        infix: None,
        tail: "edited draft: ",
        kind: EventKind::Ignored,
    },
    Rule::Numbered {
        head: "Review ",
        infix: None,
        tail: "edited: ",
        kind: EventKind::Ignored,
    },
    Rule::Numbered {
        head: "Review ",
        infix: None,
        tail: "deleted",
        kind: EventKind::Ignored,
    },
    Rule::Prefix("Set shepherd", EventKind::ShepherdSet),
    Rule::Prefix("Unsubmitted primary review", EventKind::Ignored),
    // Responses are added by authors, not reviewers.
    Rule::Prefix("Response", EventKind::Ignored),
    Rule::Numbered {
        head: "Comment ",
        infix: Some("on submission "),
        tail: "submitted",
        kind: EventKind::Comment,
    },
    Rule::Numbered {
        head: "Comment ",
        infix: Some("on submission "),
        tail: "edited draft",
        kind: EventKind::Ignored,
    },
    Rule::Numbered {
        head: "Comment ",
        infix: Some("on submission "),
        tail: "deleted",
        kind: EventKind::Ignored,
    },
    Rule::Prefix("Assigned meta review", EventKind::Ignored),
    Rule::Prefix("Removed meta review", EventKind::Ignored),
    Rule::Prefix("Changed meta review", EventKind::Ignored),
    Rule::Prefix("Unsubmitted meta review", EventKind::Ignored),
    Rule::Prefix("Download", EventKind::Ignored),
    Rule::Prefix("Password", EventKind::Ignored),
    Rule::Prefix("Account", EventKind::Ignored),
    Rule::Prefix("Paper", EventKind::Ignored),
    Rule::Prefix("Sent mail", EventKind::Ignored),
    Rule::Prefix("Sending mail", EventKind::Ignored),
    Rule::Prefix("Tag", EventKind::Ignored),
    Rule::Prefix("Set decision", EventKind::Ignored),
    Rule::Prefix("Settings edited:", EventKind::Ignored),
    Rule::Prefix("Set lead", EventKind::Ignored),
    Rule::Prefix("Clear lead", EventKind::Ignored),
];

/// Classify a raw action label. Total: every label maps to exactly one
/// [`EventKind`].
#[must_use]
pub fn classify(action: &str) -> EventKind {
    for rule in RULES {
        match *rule {
            Rule::Exact(pattern, kind) => {
                if action == pattern {
                    return kind;
                }
            }
            Rule::Prefix(pattern, kind) => {
                if action.starts_with(pattern) {
                    return kind;
                }
            }
            Rule::Numbered {
                head,
                infix,
                tail,
                kind,
            } => {
                if matches_numbered(action, head, infix, tail) {
                    return kind;
                }
            }
        }
    }
    EventKind::Unknown
}

/// Match `<head><digits> [infix ]<tail>...`, requiring at least one digit.
fn matches_numbered(
    action: &str,
    head: &str,
    infix: Option<&str>,
    tail: &str,
) -> bool {
    let Some(rest) = action.strip_prefix(head) else {
        return false;
    };
    let digits = rest.len() - rest.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return false;
    }
    let Some(rest) = rest[digits..].strip_prefix(' ') else {
        return false;
    };
    let rest = infix
        .and_then(|infix| rest.strip_prefix(infix))
        .unwrap_or(rest);
    rest.starts_with(tail)
}
