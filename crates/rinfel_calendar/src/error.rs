//! Error types for calendar construction and lookup.

use rinfel_tables::TableError;
use rinfel_time::Moment;
use thiserror::Error;

/// Errors from building a calendar or locating a moment in it.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum CalendarError {
    /// The moment is before the first day or at/after the last one.
    /// Callers are expected to catch and skip this.
    #[error("{moment} is outside the calendar coverage")]
    OutOfRange { moment: Moment },
    /// The event source failed; no calendar is produced.
    #[error("event source error: {0}")]
    Source(#[from] TableError),
    /// Day markers are not strictly increasing.
    #[error("day {index} does not start after the day before it")]
    Unordered { index: usize },
}

impl CalendarError {
    /// Whether this is the recoverable out-of-coverage case.
    pub fn is_out_of_range(&self) -> bool {
        matches!(self, Self::OutOfRange { .. })
    }
}
