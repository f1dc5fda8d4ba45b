//! Synthetic daylight series: one midnight/noon pair per day from an epoch.

use rinfel_time::{EventKind, Moment, TimeDelta, TimedEvent};

/// Offset of the noon marker from its midnight, in hours.
pub const NOON_OFFSET_HOURS: i64 = 12;

/// Lazy `midnight, noon, midnight, noon, ...` stream at 24-hour spacing.
///
/// Day `n` has its midnight at `epoch + n days` and its noon twelve hours
/// later, for `n` in `0..days`.
#[derive(Debug, Clone)]
pub struct Daylights {
    epoch: Moment,
    days: u32,
    day: u32,
    noon_pending: bool,
}

impl Daylights {
    /// Pairs whose noon would overflow the representable time range are
    /// dropped, so the reported length is always the number yielded.
    pub fn new(epoch: Moment, days: u32) -> Self {
        Self {
            epoch,
            days: representable_days(epoch, days),
            day: 0,
            noon_pending: false,
        }
    }

    fn remaining(&self) -> usize {
        let pairs = (self.days - self.day) as usize;
        pairs * 2 + usize::from(self.noon_pending)
    }
}

impl Iterator for Daylights {
    type Item = TimedEvent;

    fn next(&mut self) -> Option<TimedEvent> {
        if self.noon_pending {
            self.noon_pending = false;
            let noon = noon_of(self.epoch, self.day - 1)?;
            return Some(TimedEvent::unnamed(noon, EventKind::Noon));
        }
        if self.day >= self.days {
            return None;
        }
        let midnight = midnight_of(self.epoch, self.day)?;
        self.day += 1;
        self.noon_pending = true;
        Some(TimedEvent::unnamed(midnight, EventKind::Midnight))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining();
        (n, Some(n))
    }
}

impl ExactSizeIterator for Daylights {}

/// Daylight stream of `days` pairs starting at `epoch`.
pub fn daylights(epoch: Moment, days: u32) -> Daylights {
    Daylights::new(epoch, days)
}

/// Largest `n <= days` such that the noon of day `n - 1` is representable.
fn representable_days(epoch: Moment, days: u32) -> u32 {
    let fits = |n: u32| n == 0 || noon_of(epoch, n - 1).is_some();
    if fits(days) {
        return days;
    }
    // fits(lo) holds, fits(hi) does not.
    let (mut lo, mut hi) = (0, days);
    while hi - lo > 1 {
        let mid = lo + (hi - lo) / 2;
        if fits(mid) {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    tracing::warn!(
        requested = days,
        kept = lo,
        "daylight series truncated at the representable time range"
    );
    lo
}

fn midnight_of(epoch: Moment, day: u32) -> Option<Moment> {
    epoch.checked_add_signed(days_span(day)?)
}

fn noon_of(epoch: Moment, day: u32) -> Option<Moment> {
    midnight_of(epoch, day)?.checked_add_signed(hours_span(NOON_OFFSET_HOURS)?)
}

fn days_span(n: u32) -> Option<TimeDelta> {
    TimeDelta::try_days(i64::from(n))
}

fn hours_span(n: i64) -> Option<TimeDelta> {
    TimeDelta::try_hours(n)
}
