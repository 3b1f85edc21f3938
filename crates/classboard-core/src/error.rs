//! Core error types for classboard-core.
//!
//! Schedule problems are collected rather than reported one at a time: a
//! rejected import lists every offending slot so the user can fix the file
//! in one pass. None of these errors is fatal to a running engine; the
//! store keeps serving the last schedule that validated.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::schedule::Weekday;

/// Core error type for classboard-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Schedule failed validation
    #[error(transparent)]
    Schedule(#[from] ScheduleValidationError),

    /// A single time token could not be parsed
    #[error("Time parse error: {0}")]
    TimeParse(#[from] TimeParseError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors produced while parsing `HH:MM` and `HH:MM-HH:MM` tokens.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum TimeParseError {
    /// The range has no `-` between its two times
    #[error("missing '-' in time range '{text}'")]
    MissingSeparator { text: String },

    /// Not of the form `H:MM` / `HH:MM` with ASCII digits
    #[error("malformed time '{text}', expected HH:MM")]
    Malformed { text: String },

    /// Syntactically valid but not a minute of the day
    #[error("time {hours:02}:{minutes:02} is outside 00:00-23:59")]
    OutOfRange { hours: u32, minutes: u32 },
}

/// A schedule key that is not one of the seven weekdays.
///
/// Non-fatal: the key is skipped and treated as a day without lessons.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown weekday key: '{0}'")]
pub struct UnknownWeekdayError(pub String);

/// What is wrong with a single slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IssueKind {
    /// `start_minute >= end_minute`
    StartNotBeforeEnd { start: u16, end: u16 },
    /// A bound is not inside `[0, 1440)`
    OutOfRange { start: u16, end: u16 },
    /// Starts before the preceding slot of the same day
    Unordered { previous: usize },
    /// Shares at least one minute with the preceding slot
    Overlap { previous: usize },
    /// The `time` field did not parse
    BadTime { error: TimeParseError },
    /// A second document key resolved to an already-seen weekday
    DuplicateDay { key: String },
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueKind::StartNotBeforeEnd { start, end } => {
                write!(f, "start minute {start} is not before end minute {end}")
            }
            IssueKind::OutOfRange { start, end } => {
                write!(f, "minutes {start}-{end} fall outside the day")
            }
            IssueKind::Unordered { previous } => {
                write!(f, "starts before slot #{previous}")
            }
            IssueKind::Overlap { previous } => write!(f, "overlaps slot #{previous}"),
            IssueKind::BadTime { error } => write!(f, "{error}"),
            IssueKind::DuplicateDay { key } => write!(f, "key '{key}' repeats this day"),
        }
    }
}

/// One offending entry of a rejected schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotIssue {
    pub weekday: Weekday,
    /// Position of the slot in the day as it was submitted.
    pub index: usize,
    pub subject: String,
    #[serde(flatten)]
    pub kind: IssueKind,
}

impl fmt::Display for SlotIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} #{} ({}): {}",
            self.weekday, self.index, self.subject, self.kind
        )
    }
}

/// Malformed or overlapping slot definitions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("schedule rejected with {} issue(s): {}", .issues.len(), join_issues(.issues))]
pub struct ScheduleValidationError {
    pub issues: Vec<SlotIssue>,
}

fn join_issues(issues: &[SlotIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Key does not exist in the configuration tree
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    /// Home/config directory could not be prepared
    #[error("Data directory unavailable: {0}")]
    DataDir(#[from] std::io::Error),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
