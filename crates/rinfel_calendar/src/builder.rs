//! Calendar construction: two conciliations stacked on each other.
//!
//! Season changes gate month numbering (seasons + moons → months), and
//! month boundaries gate day numbering (months + daylight → days). A month
//! starts at the new moon of the first lunation completed after a season
//! change; a day starts at the midnight of the first daylight cycle
//! completed after a month change.

use std::vec;

use rinfel_tables::{Daylights, EventSource};
use rinfel_time::{EventKind, SEASON_CHANGE_KINDS, TimedEvent};

use crate::calendar::Calendar;
use crate::conciliation::{Conciliate, ConciliationRule, conciliate};
use crate::error::CalendarError;

/// Seasons + moons → months, named `<year>/<season>/<month>`.
pub const MONTH_RULE: ConciliationRule = ConciliationRule::new(
    &SEASON_CHANGE_KINDS,
    EventKind::NewMoon,
    EventKind::FullMoon,
    EventKind::Month,
);

/// Months + daylight → days, named `<year>/<season>/<month>/<day:02>`.
pub const DAY_RULE: ConciliationRule = ConciliationRule::new(
    &[EventKind::Month],
    EventKind::Midnight,
    EventKind::Noon,
    EventKind::Day,
)
.with_index_width(2);

/// Lazy month stream.
pub type MonthStream = Conciliate<vec::IntoIter<TimedEvent>, vec::IntoIter<TimedEvent>>;

/// Lazy day stream.
pub type DayStream = Conciliate<MonthStream, Daylights>;

/// Month boundaries derived from season changes and moon phases.
pub fn build_months<S: EventSource + ?Sized>(source: &S) -> Result<MonthStream, CalendarError> {
    let seasons = source.season_changes()?;
    let moons = source.moon_phases()?;
    Ok(conciliate(seasons, moons, MONTH_RULE))
}

/// Day boundaries derived from months and the daylight series.
pub fn build_days<S: EventSource + ?Sized>(source: &S) -> Result<DayStream, CalendarError> {
    let months = build_months(source)?;
    let daylights = source.daylights()?;
    Ok(conciliate(months, daylights, DAY_RULE))
}

/// Materialize the day stream into a `Calendar`.
pub fn build_calendar<S: EventSource + ?Sized>(source: &S) -> Result<Calendar, CalendarError> {
    let calendar = Calendar::from_stream(build_days(source)?)?;
    match calendar.coverage() {
        Some((start, end)) => tracing::debug!(
            days = calendar.len(),
            start = %start,
            end = %end,
            "calendar built"
        ),
        None => tracing::warn!(days = calendar.len(), "calendar covers no moment"),
    }
    Ok(calendar)
}
