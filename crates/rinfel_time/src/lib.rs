//! Moments and timed events for the rinfel derived calendar.
//!
//! This crate provides:
//! - `Moment`, an absolute timestamp with a fixed UTC offset
//! - Parsing of table cells (`20 Mar` + `04:01`) and RFC 3339 timestamps
//! - `WallTime`, an offset-free local date/time used for configured epochs
//! - `EventKind` and `TimedEvent`, the records carried by every event stream

pub mod error;
pub mod event;
pub mod moment;
pub mod wall_time;

pub use error::TimeError;
pub use event::{ALL_EVENT_KINDS, EventKind, SEASON_CHANGE_KINDS, TimedEvent};
pub use moment::{
    Moment, SECONDS_PER_DAY, SECONDS_PER_HOUR, elapsed_nanos, local_moment, parse_moment,
    parse_table_moment, zone_from_hours, zone_from_seconds,
};
pub use wall_time::WallTime;

pub use chrono::{FixedOffset, TimeDelta};
