//! Derived calendar built from astronomical events.
//!
//! This crate provides:
//! - The conciliation engine that merges a major and a minor event stream
//!   into named, indexed intervals
//! - The two-level calendar builder (season changes + moons → months,
//!   months + daylight → days)
//! - The materialized `Calendar` and timestamp lookup into 216 sections
//!   per day

pub mod builder;
pub mod calendar;
pub mod conciliation;
pub mod error;
pub mod locator;

pub use builder::{
    DAY_RULE, DayStream, MONTH_RULE, MonthStream, build_calendar, build_days, build_months,
};
pub use calendar::Calendar;
pub use conciliation::{
    Conciliate, ConciliationRule, ConciliationState, MergeByMoment, conciliate,
};
pub use error::CalendarError;
pub use locator::{DayPosition, SECTIONS_PER_DAY, locate, position, section_at};
