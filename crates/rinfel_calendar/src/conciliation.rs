//! Conciliation engine: merge a major and a minor event stream into named,
//! indexed intervals.
//!
//! The two streams are merged by moment. Major events mark boundaries and
//! hand down their name; each minor start/mid pair closes one sub-interval.
//! The first sub-interval closed after a major boundary gets index 1, the
//! next one 2, and so on until the next boundary. Every closed sub-interval
//! is emitted at its start moment, named `<major name>/<index>`.
//!
//! Sub-intervals closed before any major boundary are counted but not
//! emitted. A mid event with no fresh start reuses the last start seen.
//! Inputs must be sorted by moment; this is not checked.

use std::cmp::Ordering;
use std::iter::Peekable;

use rinfel_time::{EventKind, Moment, TimedEvent};

/// Which event kinds play which role in one conciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConciliationRule {
    /// Kinds that count as a major boundary.
    pub major_events: &'static [EventKind],
    /// Kind that opens a minor sub-interval.
    pub minor_start_event: EventKind,
    /// Kind that closes a minor sub-interval.
    pub minor_mid_event: EventKind,
    /// Kind given to the emitted intervals.
    pub new_event: EventKind,
    /// Minimum digits of the minor index in emitted names (zero-padded).
    pub index_width: usize,
}

impl ConciliationRule {
    pub const fn new(
        major_events: &'static [EventKind],
        minor_start_event: EventKind,
        minor_mid_event: EventKind,
        new_event: EventKind,
    ) -> Self {
        Self {
            major_events,
            minor_start_event,
            minor_mid_event,
            new_event,
            index_width: 1,
        }
    }

    pub const fn with_index_width(mut self, index_width: usize) -> Self {
        self.index_width = index_width;
        self
    }

    fn is_major(&self, kind: EventKind) -> bool {
        self.major_events.contains(&kind)
    }
}

/// Counters threaded through one merge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConciliationState {
    /// Major intervals entered so far.
    pub major_index: u32,
    /// Sub-intervals closed within the current major interval.
    pub minor_index: u32,
    /// A major boundary was seen since the last closed sub-interval.
    pub dirty_major: bool,
    /// Most recent minor start.
    pub pending_minor_start: Option<Moment>,
    /// Name of the most recent major event.
    pub inherited_name: String,
}

impl ConciliationState {
    /// Feed one merged event. Returns the derived interval when `event`
    /// closes a sub-interval that has a major context.
    pub fn advance(&mut self, event: TimedEvent, rule: &ConciliationRule) -> Option<TimedEvent> {
        if rule.is_major(event.kind) {
            self.dirty_major = true;
            self.inherited_name = event.name;
            return None;
        }
        if event.kind == rule.minor_start_event {
            self.pending_minor_start = Some(event.moment);
            return None;
        }
        if event.kind != rule.minor_mid_event {
            return None;
        }

        if self.dirty_major {
            self.major_index += 1;
            self.minor_index = 1;
            self.dirty_major = false;
        } else {
            self.minor_index += 1;
        }
        if self.major_index == 0 {
            return None;
        }
        let Some(start) = self.pending_minor_start else {
            tracing::debug!(
                mid = %event.moment,
                name = %self.inherited_name,
                "sub-interval closed with no start seen; nothing emitted"
            );
            return None;
        };

        let name = format!(
            "{}/{:0width$}",
            self.inherited_name,
            self.minor_index,
            width = rule.index_width
        );
        tracing::trace!(kind = %rule.new_event, moment = %start, name = %name, "interval");
        Some(TimedEvent::new(start, rule.new_event, name))
    }
}

/// Two sorted streams merged by moment. On equal moments the major stream
/// goes first.
#[derive(Debug, Clone)]
pub struct MergeByMoment<M, N>
where
    M: Iterator<Item = TimedEvent>,
    N: Iterator<Item = TimedEvent>,
{
    major: Peekable<M>,
    minor: Peekable<N>,
}

impl<M, N> MergeByMoment<M, N>
where
    M: Iterator<Item = TimedEvent>,
    N: Iterator<Item = TimedEvent>,
{
    pub fn new(major: M, minor: N) -> Self {
        Self {
            major: major.peekable(),
            minor: minor.peekable(),
        }
    }
}

impl<M, N> Iterator for MergeByMoment<M, N>
where
    M: Iterator<Item = TimedEvent>,
    N: Iterator<Item = TimedEvent>,
{
    type Item = TimedEvent;

    fn next(&mut self) -> Option<TimedEvent> {
        let take_minor = match (self.major.peek(), self.minor.peek()) {
            (Some(a), Some(b)) => b.cmp_moment(a) == Ordering::Less,
            (Some(_), None) => false,
            (None, _) => true,
        };
        if take_minor {
            self.minor.next()
        } else {
            self.major.next()
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (a_lo, a_hi) = self.major.size_hint();
        let (b_lo, b_hi) = self.minor.size_hint();
        let hi = match (a_hi, b_hi) {
            (Some(a), Some(b)) => a.checked_add(b),
            _ => None,
        };
        (a_lo.saturating_add(b_lo), hi)
    }
}

/// Lazy stream of derived intervals. See [`conciliate`].
#[derive(Debug, Clone)]
pub struct Conciliate<M, N>
where
    M: Iterator<Item = TimedEvent>,
    N: Iterator<Item = TimedEvent>,
{
    merged: MergeByMoment<M, N>,
    rule: ConciliationRule,
    state: ConciliationState,
}

impl<M, N> Conciliate<M, N>
where
    M: Iterator<Item = TimedEvent>,
    N: Iterator<Item = TimedEvent>,
{
    /// Counters as of the last event consumed.
    pub fn state(&self) -> &ConciliationState {
        &self.state
    }
}

impl<M, N> Iterator for Conciliate<M, N>
where
    M: Iterator<Item = TimedEvent>,
    N: Iterator<Item = TimedEvent>,
{
    type Item = TimedEvent;

    fn next(&mut self) -> Option<TimedEvent> {
        for event in self.merged.by_ref() {
            if let Some(interval) = self.state.advance(event, &self.rule) {
                return Some(interval);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.merged.size_hint().1)
    }
}

/// Merge `major` and `minor` and emit one `rule.new_event` per closed minor
/// sub-interval that follows at least one major boundary.
pub fn conciliate<M, N>(
    major: M,
    minor: N,
    rule: ConciliationRule,
) -> Conciliate<M::IntoIter, N::IntoIter>
where
    M: IntoIterator<Item = TimedEvent>,
    N: IntoIterator<Item = TimedEvent>,
{
    Conciliate {
        merged: MergeByMoment::new(major.into_iter(), minor.into_iter()),
        rule,
        state: ConciliationState::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rinfel_time::{TimeDelta, parse_moment};

    const MOON_RULE: ConciliationRule = ConciliationRule::new(
        &[EventKind::Equinox, EventKind::Solstice],
        EventKind::NewMoon,
        EventKind::FullMoon,
        EventKind::Month,
    );

    fn t(n: i64) -> Moment {
        parse_moment("2025-01-01T00:00:00Z").unwrap() + TimeDelta::hours(n)
    }

    fn major(n: i64, name: &str) -> TimedEvent {
        TimedEvent::new(t(n), EventKind::Equinox, name)
    }

    fn new_moon(n: i64) -> TimedEvent {
        TimedEvent::unnamed(t(n), EventKind::NewMoon)
    }

    fn full_moon(n: i64) -> TimedEvent {
        TimedEvent::unnamed(t(n), EventKind::FullMoon)
    }

    fn month(n: i64, name: &str) -> TimedEvent {
        TimedEvent::new(t(n), EventKind::Month, name)
    }

    #[test]
    fn two_intervals_under_one_major() {
        let out: Vec<TimedEvent> = conciliate(
            vec![major(0, "Y/Spring")],
            vec![new_moon(1), full_moon(2), new_moon(3), full_moon(4)],
            MOON_RULE,
        )
        .collect();
        assert_eq!(out, vec![month(1, "Y/Spring/1"), month(3, "Y/Spring/2")]);
    }

    #[test]
    fn no_major_no_output() {
        let out: Vec<TimedEvent> =
            conciliate(Vec::new(), vec![new_moon(1), full_moon(2)], MOON_RULE).collect();
        assert!(out.is_empty());
    }

    #[test]
    fn intervals_before_first_major_are_suppressed() {
        let out: Vec<TimedEvent> = conciliate(
            vec![major(5, "A")],
            vec![
                new_moon(1),
                full_moon(2),
                new_moon(3),
                full_moon(4),
                new_moon(6),
                full_moon(7),
            ],
            MOON_RULE,
        )
        .collect();
        assert_eq!(out, vec![month(6, "A/1")]);
    }

    #[test]
    fn new_major_resets_index_and_name() {
        let out: Vec<TimedEvent> = conciliate(
            vec![major(0, "A"), major(5, "B")],
            vec![
                new_moon(1),
                full_moon(2),
                new_moon(3),
                full_moon(4),
                new_moon(6),
                full_moon(7),
            ],
            MOON_RULE,
        )
        .collect();
        assert_eq!(out, vec![month(1, "A/1"), month(3, "A/2"), month(6, "B/1")]);
    }

    #[test]
    fn major_between_start_and_mid_applies_to_that_interval() {
        let out: Vec<TimedEvent> = conciliate(
            vec![major(0, "A"), major(4, "B")],
            vec![new_moon(1), full_moon(2), new_moon(3), full_moon(5)],
            MOON_RULE,
        )
        .collect();
        assert_eq!(out, vec![month(1, "A/1"), month(3, "B/1")]);
    }

    #[test]
    fn latest_major_name_wins() {
        let out: Vec<TimedEvent> = conciliate(
            vec![major(0, "A"), major(1, "B")],
            vec![new_moon(2), full_moon(3)],
            MOON_RULE,
        )
        .collect();
        assert_eq!(out, vec![month(2, "B/1")]);
    }

    #[test]
    fn stale_start_is_reused() {
        let out: Vec<TimedEvent> = conciliate(
            vec![major(0, "A")],
            vec![new_moon(1), full_moon(2), full_moon(3)],
            MOON_RULE,
        )
        .collect();
        assert_eq!(out, vec![month(1, "A/1"), month(1, "A/2")]);
    }

    #[test]
    fn latest_start_wins() {
        let out: Vec<TimedEvent> = conciliate(
            vec![major(0, "A")],
            vec![new_moon(1), new_moon(2), full_moon(3)],
            MOON_RULE,
        )
        .collect();
        assert_eq!(out, vec![month(2, "A/1")]);
    }

    #[test]
    fn mid_without_any_start_is_counted_not_emitted() {
        let out: Vec<TimedEvent> = conciliate(
            vec![major(0, "A")],
            vec![full_moon(1), new_moon(2), full_moon(3)],
            MOON_RULE,
        )
        .collect();
        assert_eq!(out, vec![month(2, "A/2")]);
    }

    #[test]
    fn equal_moments_take_major_first() {
        let out: Vec<TimedEvent> = conciliate(
            vec![major(0, "A"), major(4, "B")],
            vec![new_moon(1), full_moon(2), new_moon(3), full_moon(4)],
            MOON_RULE,
        )
        .collect();
        assert_eq!(out, vec![month(1, "A/1"), month(3, "B/1")]);
    }

    #[test]
    fn foreign_kinds_are_ignored() {
        let out: Vec<TimedEvent> = conciliate(
            vec![major(0, "A"), TimedEvent::new(t(1), EventKind::Day, "x")],
            vec![
                new_moon(2),
                TimedEvent::unnamed(t(3), EventKind::Noon),
                full_moon(4),
            ],
            MOON_RULE,
        )
        .collect();
        assert_eq!(out, vec![month(2, "A/1")]);
    }

    #[test]
    fn index_width_pads() {
        let rule = MOON_RULE.with_index_width(2);
        let out: Vec<TimedEvent> = conciliate(
            vec![major(0, "Y/Spring")],
            vec![new_moon(1), full_moon(2)],
            rule,
        )
        .collect();
        assert_eq!(out, vec![month(1, "Y/Spring/01")]);
    }

    #[test]
    fn output_can_feed_another_conciliation() {
        let days = ConciliationRule::new(
            &[EventKind::Month],
            EventKind::Midnight,
            EventKind::Noon,
            EventKind::Day,
        );
        let months = conciliate(
            vec![major(0, "Y")],
            vec![new_moon(10), full_moon(20)],
            MOON_RULE,
        );
        let daylight: Vec<TimedEvent> = (0..3)
            .flat_map(|d| {
                [
                    TimedEvent::unnamed(t(9 + d * 24), EventKind::Midnight),
                    TimedEvent::unnamed(t(21 + d * 24), EventKind::Noon),
                ]
            })
            .collect();
        let out: Vec<TimedEvent> = conciliate(months, daylight, days).collect();
        let names: Vec<&str> = out.iter().map(|e| e.name.as_str()).collect();
        // The month starts at hour 10, after the first midnight but before its noon.
        assert_eq!(names, vec!["Y/1/1", "Y/1/2", "Y/1/3"]);
        assert_eq!(out[0].moment, t(9));
    }

    #[test]
    fn state_tracks_counters() {
        let mut stream = conciliate(
            vec![major(0, "A")],
            vec![new_moon(1), full_moon(2), new_moon(3)],
            MOON_RULE,
        );
        assert_eq!(stream.next(), Some(month(1, "A/1")));
        assert_eq!(stream.next(), None);
        let state = stream.state();
        assert_eq!(state.major_index, 1);
        assert_eq!(state.minor_index, 1);
        assert!(!state.dirty_major);
        assert_eq!(state.pending_minor_start, Some(t(3)));
        assert_eq!(state.inherited_name, "A");
    }

    #[test]
    fn merge_is_stable_and_sorted() {
        let merged: Vec<TimedEvent> = MergeByMoment::new(
            vec![major(0, "A"), major(2, "B")].into_iter(),
            vec![new_moon(0), new_moon(1), new_moon(3)].into_iter(),
        )
        .collect();
        let order: Vec<(i64, EventKind)> = merged
            .iter()
            .map(|e| ((e.moment - t(0)).num_hours(), e.kind))
            .collect();
        assert_eq!(
            order,
            vec![
                (0, EventKind::Equinox),
                (0, EventKind::NewMoon),
                (1, EventKind::NewMoon),
                (2, EventKind::Equinox),
                (3, EventKind::NewMoon),
            ]
        );
    }
}
