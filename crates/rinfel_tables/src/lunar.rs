//! New moon / full moon tables.
//!
//! Each row of a lunar-phase table lists the four principal phases as
//! (day-month, hour:minute) pairs followed by one trailing cell:
//!
//! ```text
//! | new moon | time | first quarter | time | full moon | time | last quarter | time | extra |
//! ```
//!
//! Only new and full moons are read; they alternate. A phase that falls
//! outside the table's year is written as a blank date cell, and reading
//! still advances past that phase's cells.

use rinfel_time::{EventKind, FixedOffset, TimedEvent, parse_table_moment};

use crate::config::SourceConfig;
use crate::error::TableError;
use crate::xml::{Cell, load_cells};

/// How many cells follow each phase's (date, time) pair before the next
/// phase that is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LunarRowLayout {
    /// Cells between a new moon's time and the following full moon's date.
    pub after_new_moon: usize,
    /// Cells between a full moon's time and the following new moon's date.
    pub after_full_moon: usize,
}

impl LunarRowLayout {
    /// Four phases per row plus one trailing cell.
    pub const STANDARD: Self = Self {
        after_new_moon: 2,
        after_full_moon: 3,
    };

    /// Cells to skip after a phase of `kind`.
    pub fn trailing(&self, kind: EventKind) -> usize {
        match kind {
            EventKind::FullMoon => self.after_full_moon,
            _ => self.after_new_moon,
        }
    }
}

impl Default for LunarRowLayout {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Interpret the cells of one lunar-phase table.
pub fn parse_moon_phases(
    table: &str,
    year: i32,
    cells: &[Cell],
    zone: FixedOffset,
    layout: LunarRowLayout,
) -> Result<Vec<TimedEvent>, TableError> {
    let mut events = Vec::new();
    let mut index = 0;
    let mut full = false;

    while index < cells.len() {
        let kind = if full {
            EventKind::FullMoon
        } else {
            EventKind::NewMoon
        };
        full = !full;

        // A blank date still owns its time cell.
        let Some(day) = cells[index].as_deref() else {
            index += 2 + layout.trailing(kind);
            continue;
        };
        let time = match cells.get(index + 1) {
            None => {
                return Err(TableError::MissingCell {
                    table: table.to_string(),
                    index,
                });
            }
            Some(None) => {
                return Err(TableError::EmptyCell {
                    table: table.to_string(),
                    index: index + 1,
                });
            }
            Some(Some(time)) => time,
        };
        let moment =
            parse_table_moment(year, day, time, zone).map_err(|source| TableError::Time {
                table: table.to_string(),
                index,
                source,
            })?;
        events.push(TimedEvent::unnamed(moment, kind));
        index += 2 + layout.trailing(kind);
    }
    Ok(events)
}

/// Read every configured lunar-phase table, in year order.
pub fn load_moon_phases(config: &SourceConfig) -> Result<Vec<TimedEvent>, TableError> {
    let zone = config.zone()?;
    let mut events = Vec::new();
    for &year in &config.lunar_years {
        let path = config.lunar_table_path(year);
        let cells = load_cells(&path)?;
        let table = path.display().to_string();
        let parsed = parse_moon_phases(&table, year, &cells, zone, config.lunar_layout)?;
        tracing::debug!(table = %table, events = parsed.len(), "loaded lunar-phase table");
        events.extend(parsed);
    }
    crate::check_sorted("lunar phases", &events)?;
    Ok(events)
}
