//! Equinox/solstice tables and the season name sequence.
//!
//! A season table is a flat run of (day-month, hour:minute) cell pairs.
//! Kinds alternate equinox, solstice, starting with an equinox in every
//! file. Each event takes the next name from a single `SeasonNames`
//! generator shared by all the years being read.

use rinfel_time::{EventKind, FixedOffset, TimedEvent, parse_table_moment};

use crate::config::SourceConfig;
use crate::error::TableError;
use crate::xml::{Cell, load_cells};

/// Season names in the order they follow one another, starting at the
/// March equinox.
pub const SEASON_NAMES: [&str; 4] = ["Autumn", "Winter", "Spring", "Summer"];

/// Endless `"<year>/<season>"` labels: `1/Autumn`, `1/Winter`, `1/Spring`,
/// `1/Summer`, `2/Autumn`, ...
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeasonNames {
    year: u32,
    season: usize,
}

impl SeasonNames {
    /// Names starting at the first season of calendar year `year`.
    pub fn starting_at(year: u32) -> Self {
        Self { year, season: 0 }
    }
}

impl Default for SeasonNames {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

impl Iterator for SeasonNames {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let name = format!("{}/{}", self.year, SEASON_NAMES[self.season]);
        self.season += 1;
        if self.season == SEASON_NAMES.len() {
            self.season = 0;
            self.year += 1;
        }
        Some(name)
    }
}

/// Interpret the cells of one season table.
pub fn parse_seasons(
    table: &str,
    year: i32,
    cells: &[Cell],
    zone: FixedOffset,
    names: &mut SeasonNames,
) -> Result<Vec<TimedEvent>, TableError> {
    let mut events = Vec::with_capacity(cells.len() / 2);
    for (pair, index) in (0..cells.len()).step_by(2).enumerate() {
        let day = required(table, cells, index)?;
        if index + 1 == cells.len() {
            return Err(TableError::MissingCell {
                table: table.to_string(),
                index,
            });
        }
        let time = required(table, cells, index + 1)?;
        let moment =
            parse_table_moment(year, day, time, zone).map_err(|source| TableError::Time {
                table: table.to_string(),
                index,
                source,
            })?;
        let kind = if pair % 2 == 0 {
            EventKind::Equinox
        } else {
            EventKind::Solstice
        };
        // The generator is endless.
        let name = names.next().unwrap_or_default();
        events.push(TimedEvent::new(moment, kind, name));
    }
    Ok(events)
}

/// Read every configured season table, in year order.
pub fn load_seasons(config: &SourceConfig) -> Result<Vec<TimedEvent>, TableError> {
    let zone = config.zone()?;
    let mut names = SeasonNames::default();
    let mut events = Vec::new();
    for &year in &config.season_years {
        let path = config.season_table_path(year);
        let cells = load_cells(&path)?;
        let table = path.display().to_string();
        let parsed = parse_seasons(&table, year, &cells, zone, &mut names)?;
        tracing::debug!(table = %table, events = parsed.len(), "loaded season table");
        events.extend(parsed);
    }
    crate::check_sorted("seasons", &events)?;
    Ok(events)
}

fn required<'a>(table: &str, cells: &'a [Cell], index: usize) -> Result<&'a str, TableError> {
    cells
        .get(index)
        .and_then(|c| c.as_deref())
        .ok_or_else(|| TableError::EmptyCell {
            table: table.to_string(),
            index,
        })
}
