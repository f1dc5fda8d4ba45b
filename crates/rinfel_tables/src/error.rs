//! Error types for table loading.

use std::path::PathBuf;

use rinfel_time::TimeError;
use thiserror::Error;

/// Errors from reading or interpreting a season or lunar-phase table.
///
/// Any of these is fatal for the affected table: nothing from that table is
/// returned.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum TableError {
    /// The table file could not be read.
    #[error("I/O error reading {}: {message}", .path.display())]
    Io { path: PathBuf, message: String },
    /// The table is not well-formed XML.
    #[error("XML error in {table}: {message}")]
    Xml { table: String, message: String },
    /// A day cell has no time cell after it.
    #[error("{table}: cell {index} has no time cell after it")]
    MissingCell { table: String, index: usize },
    /// A cell that must carry a value is empty.
    #[error("{table}: cell {index} is empty")]
    EmptyCell { table: String, index: usize },
    /// A cell pair did not parse as a moment.
    #[error("{table}: cell {index}: {source}")]
    Time {
        table: String,
        index: usize,
        source: TimeError,
    },
    /// Events in a table are not in ascending order.
    #[error("{table}: event {index} is earlier than the one before it")]
    Unsorted { table: String, index: usize },
    /// The source configuration is unusable.
    #[error("invalid source config: {0}")]
    InvalidConfig(&'static str),
}

impl TableError {
    pub(crate) fn io(path: impl Into<PathBuf>, e: &std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: e.to_string(),
        }
    }
}
