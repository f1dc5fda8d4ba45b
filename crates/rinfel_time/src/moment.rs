//! Absolute moments carried with a fixed UTC offset.
//!
//! A `Moment` is a `chrono::DateTime<FixedOffset>`: comparisons and
//! differences are on the absolute instant, the offset only affects how the
//! moment prints and how wall-clock table cells are interpreted.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeDelta, TimeZone};

use crate::error::TimeError;

/// An absolute timestamp with an explicit fixed UTC offset.
pub type Moment = DateTime<FixedOffset>;

/// Seconds in one civil day.
pub const SECONDS_PER_DAY: i64 = 86_400;

/// Seconds in one hour.
pub const SECONDS_PER_HOUR: i32 = 3_600;

const NANOS_PER_SECOND: i128 = 1_000_000_000;

/// Format of a table cell pair once the year is prefixed: `2025 20 Mar 04:01`.
const TABLE_CELL_FORMAT: &str = "%Y %d %b %H:%M";

/// Build a fixed offset from whole hours east of UTC (negative = west).
pub fn zone_from_hours(hours: i32) -> Result<FixedOffset, TimeError> {
    let seconds = hours
        .checked_mul(SECONDS_PER_HOUR)
        .ok_or(TimeError::InvalidOffset(i32::MAX))?;
    zone_from_seconds(seconds)
}

/// Build a fixed offset from seconds east of UTC.
pub fn zone_from_seconds(seconds: i32) -> Result<FixedOffset, TimeError> {
    FixedOffset::east_opt(seconds).ok_or(TimeError::InvalidOffset(seconds))
}

/// Wall-clock date and time at `zone`, to the minute.
pub fn local_moment(
    zone: FixedOffset,
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
) -> Result<Moment, TimeError> {
    let naive = NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, minute, 0))
        .ok_or_else(|| {
            TimeError::NonexistentLocalTime(format!(
                "{year:04}-{month:02}-{day:02}T{hour:02}:{minute:02}"
            ))
        })?;
    attach_zone(zone, naive)
}

/// Parse one table row entry: a `<day> <Mon>` cell and an `HH:MM` cell,
/// read as wall-clock time of `year` at `zone`.
pub fn parse_table_moment(
    year: i32,
    day_month: &str,
    hour_minute: &str,
    zone: FixedOffset,
) -> Result<Moment, TimeError> {
    let text = format!("{year} {} {}", day_month.trim(), hour_minute.trim());
    let naive = NaiveDateTime::parse_from_str(&text, TABLE_CELL_FORMAT).map_err(|e| {
        TimeError::InvalidCell {
            text: text.clone(),
            reason: e.to_string(),
        }
    })?;
    attach_zone(zone, naive)
}

/// Parse an RFC 3339 timestamp such as `2025-06-21T02:42:00Z` or
/// `2025-06-20T21:42:00-05:00`. The offset written in the text is kept.
pub fn parse_moment(text: &str) -> Result<Moment, TimeError> {
    DateTime::parse_from_rfc3339(text.trim()).map_err(|e| TimeError::InvalidTimestamp {
        text: text.to_string(),
        reason: e.to_string(),
    })
}

/// Signed nanoseconds from `from` to `to`.
pub fn elapsed_nanos(from: &Moment, to: &Moment) -> i128 {
    let delta: TimeDelta = to.signed_duration_since(*from);
    i128::from(delta.num_seconds()) * NANOS_PER_SECOND + i128::from(delta.subsec_nanos())
}

fn attach_zone(zone: FixedOffset, naive: NaiveDateTime) -> Result<Moment, TimeError> {
    zone.from_local_datetime(&naive)
        .single()
        .ok_or_else(|| TimeError::NonexistentLocalTime(naive.to_string()))
}
