//! Configuration for the table-backed event source.

use std::path::{Path, PathBuf};

use rinfel_time::{FixedOffset, Moment, WallTime, zone_from_hours};

use crate::error::TableError;
use crate::lunar::LunarRowLayout;

/// Directory under `table_dir` holding `<year>.xml` season tables.
pub const SEASONS_DIR: &str = "seasons";
/// Directory under `table_dir` holding `<year>.xml` lunar-phase tables.
pub const LUNAR_PHASES_DIR: &str = "lunar-phases";

/// Upper bound on the synthetic daylight series (about a century).
pub const MAX_DAYLIGHT_DAYS: u32 = 36_600;

/// Where the tables live and how the synthetic daylight series is laid out.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceConfig {
    /// Root directory containing `seasons/` and `lunar-phases/`.
    pub table_dir: PathBuf,
    /// Years of season tables to read, in order.
    pub season_years: Vec<i32>,
    /// Years of lunar-phase tables to read, in order.
    pub lunar_years: Vec<i32>,
    /// Fixed UTC offset of every table cell and of the epoch, in hours.
    pub utc_offset_hours: i32,
    /// First midnight of the daylight series, as wall-clock time.
    pub epoch: WallTime,
    /// Number of midnight/noon pairs generated from the epoch.
    pub daylight_days: u32,
    /// Cell layout of lunar-phase rows.
    pub lunar_layout: LunarRowLayout,
}

impl Default for SourceConfig {
    /// Tables under `data/` for 2025 seasons and 2025–2026 moons at UTC-5,
    /// 286 days of daylight from the 2025 March equinox.
    fn default() -> Self {
        Self {
            table_dir: PathBuf::from("data"),
            season_years: vec![2025],
            lunar_years: vec![2025, 2026],
            utc_offset_hours: -5,
            epoch: WallTime::new(2025, 3, 20, 4, 1),
            daylight_days: 286,
            lunar_layout: LunarRowLayout::STANDARD,
        }
    }
}

impl SourceConfig {
    /// Default layout rooted at `table_dir`.
    pub fn with_table_dir(table_dir: impl Into<PathBuf>) -> Self {
        Self {
            table_dir: table_dir.into(),
            ..Self::default()
        }
    }

    /// The configured fixed offset.
    pub fn zone(&self) -> Result<FixedOffset, TableError> {
        zone_from_hours(self.utc_offset_hours)
            .map_err(|_| TableError::InvalidConfig("utc_offset_hours must be within -23..=23"))
    }

    /// The epoch as an absolute moment at the configured offset.
    pub fn epoch_moment(&self) -> Result<Moment, TableError> {
        let zone = self.zone()?;
        self.epoch
            .at(zone)
            .map_err(|_| TableError::InvalidConfig("epoch is not a valid wall-clock time"))
    }

    /// Path of the season table for `year`.
    pub fn season_table_path(&self, year: i32) -> PathBuf {
        table_path(&self.table_dir, SEASONS_DIR, year)
    }

    /// Path of the lunar-phase table for `year`.
    pub fn lunar_table_path(&self, year: i32) -> PathBuf {
        table_path(&self.table_dir, LUNAR_PHASES_DIR, year)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), TableError> {
        if self.season_years.is_empty() {
            return Err(TableError::InvalidConfig("season_years must not be empty"));
        }
        if self.lunar_years.is_empty() {
            return Err(TableError::InvalidConfig("lunar_years must not be empty"));
        }
        if self.daylight_days == 0 || self.daylight_days > MAX_DAYLIGHT_DAYS {
            return Err(TableError::InvalidConfig(
                "daylight_days must be within 1..=36600",
            ));
        }
        if !(-23..=23).contains(&self.utc_offset_hours) {
            return Err(TableError::InvalidConfig(
                "utc_offset_hours must be within -23..=23",
            ));
        }
        self.epoch_moment()?;
        Ok(())
    }
}

fn table_path(root: &Path, dir: &str, year: i32) -> PathBuf {
    root.join(dir).join(format!("{year}.xml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let c = SourceConfig::default();
        assert!(c.validate().is_ok());
        assert_eq!(c.daylight_days, 286);
        assert_eq!(
            c.epoch_moment().unwrap().to_rfc3339(),
            "2025-03-20T04:01:00-05:00"
        );
    }

    #[test]
    fn table_paths() {
        let c = SourceConfig::with_table_dir("/srv/tables");
        assert_eq!(
            c.season_table_path(2025),
            PathBuf::from("/srv/tables/seasons/2025.xml")
        );
        assert_eq!(
            c.lunar_table_path(2026),
            PathBuf::from("/srv/tables/lunar-phases/2026.xml")
        );
    }

    #[test]
    fn rejects_empty_years() {
        let mut c = SourceConfig::default();
        c.season_years.clear();
        assert!(matches!(c.validate(), Err(TableError::InvalidConfig(_))));

        let mut c = SourceConfig::default();
        c.lunar_years.clear();
        assert!(matches!(c.validate(), Err(TableError::InvalidConfig(_))));
    }

    #[test]
    fn rejects_bad_day_count() {
        let mut c = SourceConfig::default();
        c.daylight_days = 0;
        assert!(c.validate().is_err());
        c.daylight_days = MAX_DAYLIGHT_DAYS + 1;
        assert!(c.validate().is_err());
        c.daylight_days = MAX_DAYLIGHT_DAYS;
        assert!(c.validate().is_ok());
    }

    #[test]
    fn rejects_bad_offset() {
        let mut c = SourceConfig::default();
        c.utc_offset_hours = 24;
        assert!(c.validate().is_err());
        c.utc_offset_hours = -23;
        assert!(c.validate().is_ok());
    }

    #[test]
    fn rejects_bad_epoch() {
        let mut c = SourceConfig::default();
        c.epoch = WallTime::new(2025, 2, 29, 0, 0);
        assert_eq!(
            c.validate(),
            Err(TableError::InvalidConfig("epoch is not a valid wall-clock time"))
        );
    }
}
