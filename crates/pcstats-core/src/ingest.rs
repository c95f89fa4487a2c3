//! CSV collaborators: reviewer identity tables and HotCRP action logs.
//!
//! Both inputs have a fixed, position-sensitive column layout. Header
//! validation is strict and fatal — nothing is reconciled from a file whose
//! header does not match — while damage in individual data rows is left to
//! the reconciler's non-fatal recovery rules.

#![allow(clippy::module_name_repetitions)]

use std::fs::File;
use std::path::{Path, PathBuf};

/// Errors reading the tabular inputs. All fatal.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("failed to open {path}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("malformed header in {path}: {detail}")]
    MalformedHeader { path: PathBuf, detail: String },
    #[error("malformed row at line {line} in {path}: expected at least {expected} columns")]
    MalformedRow {
        path: PathBuf,
        line: u64,
        expected: usize,
    },
}

/// One reviewer identity row. Extra columns in the file are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub first: String,
    pub last: String,
    pub email: String,
}

impl Identity {
    /// `"<first> <last>"`, the report's display name.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first, self.last)
    }
}

/// One raw action-log row, untyped. Classification and timestamp/paper
/// parsing happen during replay, where damage is recoverable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub date: String,
    pub email: String,
    pub affected_email: String,
    pub paper: String,
    pub action: String,
}

// Position-sensitive log columns (HotCRP export layout).
const LOG_DATE: usize = 0;
const LOG_EMAIL: usize = 2;
const LOG_AFFECTED_EMAIL: usize = 4;
const LOG_PAPER: usize = 6;
const LOG_ACTION: usize = 7;

fn open_csv(path: &Path) -> Result<csv::Reader<File>, IngestError> {
    let file = File::open(path).map_err(|source| IngestError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    // Headers are validated by position below; flexible because trailing
    // columns vary between HotCRP exports.
    Ok(csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(file))
}

fn read_error(path: &Path, source: csv::Error) -> IngestError {
    IngestError::Read {
        path: path.to_path_buf(),
        source,
    }
}

/// Load a reviewer identity table.
///
/// The mandatory header must start with `first,last,email`. Rows keep their
/// file order; duplicate emails are the caller's concern (first wins in the
/// directory).
///
/// # Errors
///
/// Returns [`IngestError`] when the file cannot be opened or read, the
/// header does not match, or a data row carries fewer than three columns.
pub fn load_reviewers(path: &Path) -> Result<Vec<Identity>, IngestError> {
    let mut reader = open_csv(path)?;
    let mut rows = reader.records();

    let header = rows
        .next()
        .ok_or_else(|| IngestError::MalformedHeader {
            path: path.to_path_buf(),
            detail: "file is empty".to_string(),
        })?
        .map_err(|source| read_error(path, source))?;
    let leading: Vec<&str> = header.iter().take(3).collect();
    if leading != ["first", "last", "email"] {
        return Err(IngestError::MalformedHeader {
            path: path.to_path_buf(),
            detail: format!("expected columns first,last,email, found {leading:?}"),
        });
    }

    let mut identities = Vec::new();
    for row in rows {
        let row = row.map_err(|source| read_error(path, source))?;
        let line = row.position().map_or(0, csv::Position::line);
        let (Some(first), Some(last), Some(email)) = (row.get(0), row.get(1), row.get(2)) else {
            return Err(IngestError::MalformedRow {
                path: path.to_path_buf(),
                line,
                expected: 3,
            });
        };
        identities.push(Identity {
            first: first.to_string(),
            last: last.to_string(),
            email: email.to_string(),
        });
    }
    Ok(identities)
}

/// Load an action log.
///
/// The mandatory header must carry `date` at column 0, `email` at 2,
/// `affected_email` at 4, `paper` at 6, and `action` at 7. Data rows are
/// read untyped; missing trailing fields become empty strings, which the
/// reconciler then classifies as unknown and warns about.
///
/// # Errors
///
/// Returns [`IngestError`] when the file cannot be opened or read, or the
/// header does not match the expected positions.
pub fn load_log(path: &Path) -> Result<Vec<LogRecord>, IngestError> {
    let mut reader = open_csv(path)?;
    let mut rows = reader.records();

    let header = rows
        .next()
        .ok_or_else(|| IngestError::MalformedHeader {
            path: path.to_path_buf(),
            detail: "file is empty".to_string(),
        })?
        .map_err(|source| read_error(path, source))?;
    for (index, expected) in [
        (LOG_DATE, "date"),
        (LOG_EMAIL, "email"),
        (LOG_AFFECTED_EMAIL, "affected_email"),
        (LOG_PAPER, "paper"),
        (LOG_ACTION, "action"),
    ] {
        if header.get(index) != Some(expected) {
            return Err(IngestError::MalformedHeader {
                path: path.to_path_buf(),
                detail: format!(
                    "expected '{expected}' at column {index}, found {:?}",
                    header.get(index).unwrap_or("<missing>")
                ),
            });
        }
    }

    let mut records = Vec::new();
    for row in rows {
        let row = row.map_err(|source| read_error(path, source))?;
        let field = |index: usize| row.get(index).unwrap_or_default().to_string();
        records.push(LogRecord {
            date: field(LOG_DATE),
            email: field(LOG_EMAIL),
            affected_email: field(LOG_AFFECTED_EMAIL),
            paper: field(LOG_PAPER),
            action: field(LOG_ACTION),
        });
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::{IngestError, load_log, load_reviewers};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(content.as_bytes()).expect("write");
        file
    }

    #[test]
    fn loads_identities_and_ignores_extra_columns() {
        let file = write_file(
            "first,last,email,affiliation,roles\n\
             Grace,Hopper,grace@example.com,Navy,pc\n\
             \"Ada\",\"Lovelace, Countess\",ada@example.com,,pc\n",
        );
        let identities = load_reviewers(file.path()).expect("table loads");
        assert_eq!(identities.len(), 2);
        assert_eq!(identities[0].full_name(), "Grace Hopper");
        assert_eq!(identities[0].email, "grace@example.com");
        // Quoted commas stay inside one field.
        assert_eq!(identities[1].last, "Lovelace, Countess");
    }

    #[test]
    fn identity_header_mismatch_is_fatal() {
        let file = write_file("name,email\nGrace Hopper,grace@example.com\n");
        let err = load_reviewers(file.path()).expect_err("header must be rejected");
        assert!(matches!(err, IngestError::MalformedHeader { .. }));
    }

    #[test]
    fn identity_short_row_is_fatal() {
        let file = write_file("first,last,email\nGrace,Hopper\n");
        let err = load_reviewers(file.path()).expect_err("header must be rejected");
        assert!(matches!(err, IngestError::MalformedRow { line: 2, .. }));
    }

    #[test]
    fn empty_identity_file_is_fatal() {
        let file = write_file("");
        assert!(matches!(
            load_reviewers(file.path()).expect_err("empty file must be rejected"),
            IngestError::MalformedHeader { .. }
        ));
    }

    #[test]
    fn loads_log_records_by_position() {
        let file = write_file(
            "date,ipaddr,email,name,affected_email,via,paper,action\n\
             \"2024-06-10 09:00:00 -0400\",10.0.0.1,chair@example.com,Chair,grace@example.com,web,57,Assigned primary review (round R1)\n\
             \"2024-07-01 10:00:00 -0400\",10.0.0.2,grace@example.com,Grace,,web,57,\"Review 1 submitted: 850 words\"\n",
        );
        let records = load_log(file.path()).expect("log loads");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].date, "2024-06-10 09:00:00 -0400");
        assert_eq!(records[0].affected_email, "grace@example.com");
        assert_eq!(records[0].paper, "57");
        assert_eq!(records[0].action, "Assigned primary review (round R1)");
        // Quoted action labels keep their embedded punctuation.
        assert_eq!(records[1].action, "Review 1 submitted: 850 words");
    }

    #[test]
    fn log_header_mismatch_is_fatal() {
        let file = write_file("date,email,affected_email,paper,action\n");
        let err = load_log(file.path()).expect_err("header must be rejected");
        assert!(matches!(err, IngestError::MalformedHeader { .. }));
    }

    #[test]
    fn short_log_rows_become_empty_fields() {
        let file = write_file(
            "date,ipaddr,email,name,affected_email,via,paper,action\n\
             \"2024-06-10 09:00:00 -0400\",10.0.0.1,someone@example.com\n",
        );
        let records = load_log(file.path()).expect("log loads");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].action, "");
        assert_eq!(records[0].paper, "");
    }

    #[test]
    fn missing_file_reports_the_path() {
        let err = load_log(std::path::Path::new("/nonexistent/log.csv"))
            .expect_err("missing file must be an error");
        assert!(err.to_string().contains("/nonexistent/log.csv"));
    }
}
