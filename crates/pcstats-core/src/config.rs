//! Cycle configuration: TOML document with per-cycle file references and the
//! eleven named instants that drive deadlines and discussion windows.

#![allow(clippy::module_name_repetitions)]

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::Instant;

/// Fixed timestamp pattern shared by the configuration and the HotCRP log.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";

/// Error returned when a raw timestamp does not match [`TIMESTAMP_FORMAT`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid timestamp '{raw}': expected 'YYYY-MM-DD HH:MM:SS +HHMM'")]
pub struct TimestampError {
    pub raw: String,
}

/// Parse an offset-aware instant in the fixed `%Y-%m-%d %H:%M:%S %z` pattern.
///
/// # Errors
///
/// Returns [`TimestampError`] when the input does not match the pattern,
/// including naive timestamps with no UTC offset.
pub fn parse_timestamp(raw: &str) -> Result<Instant, TimestampError> {
    chrono::DateTime::parse_from_str(raw, TIMESTAMP_FORMAT).map_err(|_| TimestampError {
        raw: raw.to_string(),
    })
}

/// Errors loading or parsing the configuration file. Always fatal: nothing
/// is reconciled until the configuration is fully resolved.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: Box<toml::de::Error>,
    },
}

/// Top-level configuration document.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: General,
    #[serde(default)]
    pub cycles: Vec<CycleConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct General {
    #[serde(default)]
    pub conference_name: String,
}

/// One submission cycle: numeric id, input file references, and timestamps.
#[derive(Debug, Clone, Deserialize)]
pub struct CycleConfig {
    pub cycle_number: u32,
    pub reviewers_file: PathBuf,
    pub log_file: PathBuf,
    pub timestamps: CycleTimestamps,
}

/// The eleven named instants of one cycle.
///
/// Deadlines and discussion windows may legitimately sit in different time
/// zones (e.g. Samoa-time deadlines, Eastern-time discussion periods); every
/// value keeps its configured offset.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CycleTimestamps {
    #[serde(with = "timestamp")]
    pub submission: Instant,
    #[serde(with = "timestamp")]
    pub round1_deadline: Instant,
    #[serde(with = "timestamp")]
    pub round1_discussion_start: Instant,
    #[serde(with = "timestamp")]
    pub round1_discussion_end: Instant,
    #[serde(with = "timestamp")]
    pub round2_deadline: Instant,
    #[serde(with = "timestamp")]
    pub round2_discussion_start: Instant,
    #[serde(with = "timestamp")]
    pub round2_discussion_end: Instant,
    #[serde(with = "timestamp")]
    pub rebuttal_discussion_start: Instant,
    #[serde(with = "timestamp")]
    pub rebuttal_discussion_end: Instant,
    #[serde(with = "timestamp")]
    pub acceptance: Instant,
    #[serde(with = "timestamp")]
    pub camera_ready: Instant,
}

mod timestamp {
    use serde::{Deserialize, Deserializer};

    use crate::Instant;

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Instant, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_timestamp(&raw).map_err(serde::de::Error::custom)
    }
}

impl Config {
    /// Load and parse the configuration file.
    ///
    /// File references inside the document are interpreted relative to the
    /// configuration file's directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read or the document
    /// does not parse, including malformed or missing timestamps.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Self =
            toml::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source: Box::new(source),
            })?;

        if let Some(base) = path.parent() {
            for cycle in &mut config.cycles {
                cycle.reviewers_file = base.join(&cycle.reviewers_file);
                cycle.log_file = base.join(&cycle.log_file);
            }
        }
        Ok(config)
    }
}
