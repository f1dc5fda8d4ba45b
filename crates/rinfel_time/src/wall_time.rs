//! Wall-clock date/time to the minute, without an offset.
//!
//! Used for configured epochs, which are written as local time and only
//! become a `Moment` once an offset is chosen.

use std::str::FromStr;

use chrono::{Datelike, FixedOffset, NaiveDateTime, Timelike};

use crate::error::TimeError;
use crate::moment::{Moment, local_moment};

const WALL_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Local calendar date and time, minute precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WallTime {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
}

impl WallTime {
    pub const fn new(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
        }
    }

    /// Interpret this wall time at `zone`.
    pub fn at(&self, zone: FixedOffset) -> Result<Moment, TimeError> {
        local_moment(zone, self.year, self.month, self.day, self.hour, self.minute)
    }
}

impl FromStr for WallTime {
    type Err = TimeError;

    /// Parse `YYYY-MM-DDTHH:MM`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let naive = NaiveDateTime::parse_from_str(s.trim(), WALL_TIME_FORMAT).map_err(|e| {
            TimeError::InvalidTimestamp {
                text: s.to_string(),
                reason: e.to_string(),
            }
        })?;
        Ok(Self::new(
            naive.year(),
            naive.month(),
            naive.day(),
            naive.hour(),
            naive.minute(),
        ))
    }
}

impl std::fmt::Display for WallTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}T{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute
        )
    }
}
