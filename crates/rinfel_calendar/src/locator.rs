//! Timestamp lookup: which derived day contains a moment, and how far into it.
//!
//! A day is divided into 216 sections of 400 seconds. The label of a moment
//! is the enclosing day's name followed by the zero-padded section number,
//! e.g. `1/Autumn/3/25 159`.

use std::fmt::{Display, Formatter};

use rinfel_time::{Moment, SECONDS_PER_DAY, TimedEvent, elapsed_nanos};

use crate::error::CalendarError;

/// Sections per 24 hours.
pub const SECTIONS_PER_DAY: i64 = 216;

const NANOS_PER_DAY: i128 = SECONDS_PER_DAY as i128 * 1_000_000_000;

/// Where a moment falls in the calendar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayPosition<'a> {
    /// The enclosing day marker.
    pub day: &'a TimedEvent,
    /// Index of `day` in the calendar.
    pub index: usize,
    /// Whole sections elapsed since the start of `day`.
    pub section: u64,
}

impl Display for DayPosition<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {:03}", self.day.name, self.section)
    }
}

/// Whole sections in a non-negative span of nanoseconds, truncated.
pub fn section_at(elapsed_nanos: i128) -> u64 {
    let sections = elapsed_nanos.max(0) * i128::from(SECTIONS_PER_DAY) / NANOS_PER_DAY;
    u64::try_from(sections).unwrap_or(u64::MAX)
}

/// Find the day containing `moment`.
///
/// `days` must be sorted ascending by moment. A moment before the first
/// day or at/after the last one is `OutOfRange`: the last marker only
/// closes the one before it.
pub fn position<'a>(
    days: &'a [TimedEvent],
    moment: &Moment,
) -> Result<DayPosition<'a>, CalendarError> {
    let insert_at = days.partition_point(|d| d.moment <= *moment);
    if insert_at == 0 || insert_at == days.len() {
        return Err(CalendarError::OutOfRange { moment: *moment });
    }
    let index = insert_at - 1;
    let day = &days[index];
    Ok(DayPosition {
        day,
        index,
        section: section_at(elapsed_nanos(&day.moment, moment)),
    })
}

/// Label of `moment`: `"<day name> <section:03>"`.
pub fn locate(days: &[TimedEvent], moment: &Moment) -> Result<String, CalendarError> {
    position(days, moment).map(|p| p.to_string())
}
