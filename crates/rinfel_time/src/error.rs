//! Error types for moment parsing and zone handling.

use thiserror::Error;

/// Errors from parsing table cells, timestamps, or UTC offsets.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum TimeError {
    /// UTC offset outside what a fixed offset can represent.
    #[error("invalid UTC offset: {0} seconds")]
    InvalidOffset(i32),
    /// A table day/time cell pair did not match `<day> <Mon>` + `HH:MM`.
    #[error("invalid table cell {text:?}: {reason}")]
    InvalidCell { text: String, reason: String },
    /// A free-form timestamp could not be parsed.
    #[error("invalid timestamp {text:?}: {reason}")]
    InvalidTimestamp { text: String, reason: String },
    /// Local wall time has no single mapping at the given offset.
    #[error("local time {0} does not exist at the configured offset")]
    NonexistentLocalTime(String),
}
