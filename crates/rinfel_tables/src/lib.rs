//! Astronomical event source for the rinfel calendar.
//!
//! This crate provides:
//! - XML table reading (`tbody/tr/td` cells) over `quick-xml`
//! - Equinox/solstice tables with generated `"<year>/<season>"` names
//! - New/full moon tables with the fixed row layout and blank-cell skips
//! - The synthetic midnight/noon daylight series
//! - `EventSource`, with file-backed (`XmlTables`) and in-memory
//!   (`StaticSource`) implementations
//!
//! Every series is returned sorted; a table that is missing, malformed, or
//! out of order is an error for the whole series.

pub mod config;
pub mod daylight;
pub mod error;
pub mod lunar;
pub mod seasons;
pub mod source;
pub mod xml;

pub use config::{LUNAR_PHASES_DIR, MAX_DAYLIGHT_DAYS, SEASONS_DIR, SourceConfig};
pub use daylight::{Daylights, NOON_OFFSET_HOURS, daylights};
pub use error::TableError;
pub use lunar::{LunarRowLayout, load_moon_phases, parse_moon_phases};
pub use seasons::{SEASON_NAMES, SeasonNames, load_seasons, parse_seasons};
pub use source::{EventSource, StaticSource, XmlTables};
pub use xml::{Cell, load_cells, read_cells};

use rinfel_time::TimedEvent;

/// Fail with `Unsorted` at the first event earlier than its predecessor.
pub(crate) fn check_sorted(table: &str, events: &[TimedEvent]) -> Result<(), TableError> {
    match events.windows(2).position(|w| w[1].moment < w[0].moment) {
        Some(i) => Err(TableError::Unsorted {
            table: table.to_string(),
            index: i + 1,
        }),
        None => Ok(()),
    }
}
