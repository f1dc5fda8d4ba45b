//! Timed reference events: the records every event stream carries.

use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

use crate::moment::Moment;

/// Category of a reference or derived event.
///
/// Ordering between kinds carries no meaning; conciliation only asks
/// whether a kind belongs to a set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// March or September equinox.
    Equinox,
    /// June or December solstice.
    Solstice,
    /// New moon (start of a lunation).
    NewMoon,
    /// Full moon (middle of a lunation).
    FullMoon,
    /// Start of a synthetic daylight cycle.
    Midnight,
    /// Middle of a synthetic daylight cycle.
    Noon,
    /// Derived month boundary.
    Month,
    /// Derived day boundary.
    Day,
}

/// All event kinds in declaration order.
pub const ALL_EVENT_KINDS: [EventKind; 8] = [
    EventKind::Equinox,
    EventKind::Solstice,
    EventKind::NewMoon,
    EventKind::FullMoon,
    EventKind::Midnight,
    EventKind::Noon,
    EventKind::Month,
    EventKind::Day,
];

/// Kinds that mark a solar season change.
pub const SEASON_CHANGE_KINDS: [EventKind; 2] = [EventKind::Equinox, EventKind::Solstice];

/// Rendering of event moments: `2025-03-29 04:01:00-05:00`.
const MOMENT_FORMAT: &str = "%Y-%m-%d %H:%M:%S%:z";

impl EventKind {
    /// Stable lowercase identifier.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Equinox => "equinox",
            Self::Solstice => "solstice",
            Self::NewMoon => "new_moon",
            Self::FullMoon => "full_moon",
            Self::Midnight => "midnight",
            Self::Noon => "noon",
            Self::Month => "month",
            Self::Day => "day",
        }
    }

    /// Whether this kind is one of the solar season markers.
    pub const fn is_season_change(self) -> bool {
        matches!(self, Self::Equinox | Self::Solstice)
    }
}

impl Display for EventKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name().to_ascii_uppercase())
    }
}

/// One timestamped event in a stream.
///
/// Reference events from the tables and the daylight series have an empty
/// `name`; derived months and days carry their hierarchical label.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TimedEvent {
    /// When the event happens.
    pub moment: Moment,
    /// What kind of event it is.
    pub kind: EventKind,
    /// Hierarchical label, empty unless derived.
    pub name: String,
}

impl TimedEvent {
    pub fn new(moment: Moment, kind: EventKind, name: impl Into<String>) -> Self {
        Self {
            moment,
            kind,
            name: name.into(),
        }
    }

    /// An event with no label.
    pub fn unnamed(moment: Moment, kind: EventKind) -> Self {
        Self::new(moment, kind, String::new())
    }

    /// Order two events by moment only.
    pub fn cmp_moment(&self, other: &Self) -> Ordering {
        self.moment.cmp(&other.moment)
    }
}

impl Display for TimedEvent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.moment.format(MOMENT_FORMAT), self.kind)?;
        if !self.name.is_empty() {
            write!(f, " {}", self.name)?;
        }
        Ok(())
    }
}
