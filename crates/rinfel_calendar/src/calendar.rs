//! The materialized derived calendar.

use rinfel_time::{Moment, TimedEvent};

use crate::error::CalendarError;
use crate::locator::{DayPosition, locate, position};

/// Ordered day markers, immutable once built.
///
/// Day `i` spans `[days[i].moment, days[i + 1].moment)`. The last marker
/// only closes the day before it, so coverage is `[first, last)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Calendar {
    days: Vec<TimedEvent>,
}

impl Calendar {
    /// Wrap day markers, checking that moments strictly increase.
    pub fn from_days(days: Vec<TimedEvent>) -> Result<Self, CalendarError> {
        if let Some(i) = days.windows(2).position(|w| w[1].moment <= w[0].moment) {
            return Err(CalendarError::Unordered { index: i + 1 });
        }
        Ok(Self { days })
    }

    /// Drain a day stream into a calendar.
    pub fn from_stream<I>(days: I) -> Result<Self, CalendarError>
    where
        I: IntoIterator<Item = TimedEvent>,
    {
        Self::from_days(days.into_iter().collect())
    }

    pub fn days(&self) -> &[TimedEvent] {
        &self.days
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn first(&self) -> Option<&TimedEvent> {
        self.days.first()
    }

    pub fn last(&self) -> Option<&TimedEvent> {
        self.days.last()
    }

    /// Half-open `[start, end)` range of moments that can be located, if any.
    pub fn coverage(&self) -> Option<(Moment, Moment)> {
        match (self.days.first(), self.days.last()) {
            (Some(first), Some(last)) if self.days.len() > 1 => Some((first.moment, last.moment)),
            _ => None,
        }
    }

    /// Whether `moment` falls inside the coverage.
    pub fn covers(&self, moment: &Moment) -> bool {
        self.coverage()
            .is_some_and(|(start, end)| start <= *moment && *moment < end)
    }

    /// Day containing `moment` and the section within it.
    pub fn position(&self, moment: &Moment) -> Result<DayPosition<'_>, CalendarError> {
        position(&self.days, moment)
    }

    /// Label of `moment`, e.g. `1/Autumn/3/25 159`.
    pub fn locate(&self, moment: &Moment) -> Result<String, CalendarError> {
        locate(&self.days, moment)
    }
}

impl<'a> IntoIterator for &'a Calendar {
    type Item = &'a TimedEvent;
    type IntoIter = std::slice::Iter<'a, TimedEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.days.iter()
    }
}
