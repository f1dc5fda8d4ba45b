//! The event source seam: where calendar construction gets its inputs.

use rinfel_time::{Moment, TimedEvent};

use crate::config::{MAX_DAYLIGHT_DAYS, SourceConfig};
use crate::daylight::Daylights;
use crate::error::TableError;
use crate::lunar::load_moon_phases;
use crate::seasons::load_seasons;

/// Provider of the three sorted reference series.
///
/// Each call produces a fresh series; callers that need a series twice
/// call again.
pub trait EventSource {
    /// Equinoxes and solstices, named `"<year>/<season>"`, ascending.
    fn season_changes(&self) -> Result<Vec<TimedEvent>, TableError>;

    /// New and full moons, unnamed, ascending.
    fn moon_phases(&self) -> Result<Vec<TimedEvent>, TableError>;

    /// Midnight/noon markers, ascending.
    fn daylights(&self) -> Result<Daylights, TableError>;
}

/// File-backed source reading XML tables as described by a `SourceConfig`.
#[derive(Debug, Clone)]
pub struct XmlTables {
    config: SourceConfig,
}

impl XmlTables {
    /// Validate `config` and wrap it. No file is read until a series is
    /// requested.
    pub fn new(config: SourceConfig) -> Result<Self, TableError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SourceConfig {
        &self.config
    }
}

impl EventSource for XmlTables {
    fn season_changes(&self) -> Result<Vec<TimedEvent>, TableError> {
        load_seasons(&self.config)
    }

    fn moon_phases(&self) -> Result<Vec<TimedEvent>, TableError> {
        load_moon_phases(&self.config)
    }

    fn daylights(&self) -> Result<Daylights, TableError> {
        let epoch = self.config.epoch_moment()?;
        Ok(Daylights::new(epoch, self.config.daylight_days))
    }
}

/// In-memory source over already-built series.
#[derive(Debug, Clone)]
pub struct StaticSource {
    seasons: Vec<TimedEvent>,
    moons: Vec<TimedEvent>,
    epoch: Moment,
    days: u32,
}

impl StaticSource {
    /// Both series must be sorted by moment, and `days` is bounded like
    /// `SourceConfig::daylight_days`.
    pub fn new(
        seasons: Vec<TimedEvent>,
        moons: Vec<TimedEvent>,
        epoch: Moment,
        days: u32,
    ) -> Result<Self, TableError> {
        if days > MAX_DAYLIGHT_DAYS {
            return Err(TableError::InvalidConfig(
                "daylight_days must be within 0..=36600",
            ));
        }
        crate::check_sorted("seasons", &seasons)?;
        crate::check_sorted("lunar phases", &moons)?;
        Ok(Self {
            seasons,
            moons,
            epoch,
            days,
        })
    }
}

impl EventSource for StaticSource {
    fn season_changes(&self) -> Result<Vec<TimedEvent>, TableError> {
        Ok(self.seasons.clone())
    }

    fn moon_phases(&self) -> Result<Vec<TimedEvent>, TableError> {
        Ok(self.moons.clone())
    }

    fn daylights(&self) -> Result<Daylights, TableError> {
        Ok(Daylights::new(self.epoch, self.days))
    }
}

impl<S: EventSource + ?Sized> EventSource for &S {
    fn season_changes(&self) -> Result<Vec<TimedEvent>, TableError> {
        (**self).season_changes()
    }

    fn moon_phases(&self) -> Result<Vec<TimedEvent>, TableError> {
        (**self).moon_phases()
    }

    fn daylights(&self) -> Result<Daylights, TableError> {
        (**self).daylights()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rinfel_time::{EventKind, parse_moment};

    fn at(s: &str) -> Moment {
        parse_moment(s).unwrap()
    }

    #[test]
    fn static_source_round_trips_series() {
        let seasons = vec![TimedEvent::new(
            at("2025-03-20T04:01:00-05:00"),
            EventKind::Equinox,
            "1/Autumn",
        )];
        let moons = vec![
            TimedEvent::unnamed(at("2025-03-29T05:58:00-05:00"), EventKind::NewMoon),
            TimedEvent::unnamed(at("2025-04-12T19:22:00-05:00"), EventKind::FullMoon),
        ];
        let src = StaticSource::new(seasons.clone(), moons.clone(), at("2025-03-20T04:01:00-05:00"), 3)
            .unwrap();
        assert_eq!(src.season_changes().unwrap(), seasons);
        assert_eq!(src.moon_phases().unwrap(), moons);
        assert_eq!(src.daylights().unwrap().count(), 6);
    }

    #[test]
    fn static_source_rejects_unsorted() {
        let moons = vec![
            TimedEvent::unnamed(at("2025-04-12T19:22:00-05:00"), EventKind::FullMoon),
            TimedEvent::unnamed(at("2025-03-29T05:58:00-05:00"), EventKind::NewMoon),
        ];
        let err = StaticSource::new(Vec::new(), moons, at("2025-03-20T04:01:00-05:00"), 1)
            .unwrap_err();
        assert_eq!(
            err,
            TableError::Unsorted {
                table: "lunar phases".into(),
                index: 1
            }
        );
    }

    #[test]
    fn static_source_bounds_daylight_days() {
        let epoch = at("2025-03-20T04:01:00-05:00");
        let err = StaticSource::new(Vec::new(), Vec::new(), epoch, MAX_DAYLIGHT_DAYS + 1)
            .unwrap_err();
        assert!(matches!(err, TableError::InvalidConfig(_)));
        let src = StaticSource::new(Vec::new(), Vec::new(), epoch, MAX_DAYLIGHT_DAYS).unwrap();
        assert_eq!(
            src.daylights().unwrap().len(),
            2 * MAX_DAYLIGHT_DAYS as usize
        );
    }

    #[test]
    fn xml_tables_validates_config() {
        let mut config = SourceConfig::default();
        config.daylight_days = 0;
        assert!(XmlTables::new(config).is_err());
    }

    #[test]
    fn xml_tables_missing_directory_is_io_error() {
        let tables = XmlTables::new(SourceConfig::with_table_dir("does/not/exist")).unwrap();
        assert!(matches!(tables.season_changes(), Err(TableError::Io { .. })));
        assert!(matches!(tables.moon_phases(), Err(TableError::Io { .. })));
        // The daylight series needs no file.
        assert_eq!(tables.daylights().unwrap().len(), 572);
    }
}
