use std::fmt::Display;
use std::path::PathBuf;

use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use rinfel_calendar::{Calendar, build_calendar};
use rinfel_tables::{EventSource, SourceConfig, TableError, XmlTables};
use rinfel_time::{EventKind, Moment, TimedEvent, WallTime, parse_moment};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "rinfel", version, about = "Rinfel derived calendar CLI")]
struct Cli {
    #[command(flatten)]
    source: SourceArgs,
    /// Log at debug level (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
    /// Defaults to `report`
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Where the tables live and how the daylight series is laid out.
/// Anything left unset keeps its built-in default.
#[derive(Args)]
struct SourceArgs {
    /// Directory containing seasons/ and lunar-phases/ (default: data)
    #[arg(long, env = "RINFEL_TABLES", global = true)]
    tables: Option<PathBuf>,
    /// Season table year, repeatable (default: 2025)
    #[arg(long = "season-year", global = true)]
    season_years: Vec<i32>,
    /// Lunar-phase table year, repeatable (default: 2025 2026)
    #[arg(long = "lunar-year", global = true)]
    lunar_years: Vec<i32>,
    /// UTC offset of table cells and epoch, in hours (default: -5)
    #[arg(long, allow_negative_numbers = true, global = true)]
    utc_offset: Option<i32>,
    /// First midnight of the daylight series, local YYYY-MM-DDThh:mm (default: 2025-03-20T04:01)
    #[arg(long, global = true)]
    epoch: Option<WallTime>,
    /// Number of midnight/noon pairs (default: 286)
    #[arg(long, global = true)]
    days: Option<u32>,
}

impl SourceArgs {
    fn into_config(self) -> SourceConfig {
        let mut config = SourceConfig::default();
        if let Some(dir) = self.tables {
            config.table_dir = dir;
        }
        if !self.season_years.is_empty() {
            config.season_years = self.season_years;
        }
        if !self.lunar_years.is_empty() {
            config.lunar_years = self.lunar_years;
        }
        if let Some(hours) = self.utc_offset {
            config.utc_offset_hours = hours;
        }
        if let Some(epoch) = self.epoch {
            config.epoch = epoch;
        }
        if let Some(days) = self.days {
            config.daylight_days = days;
        }
        config
    }
}

#[derive(Subcommand)]
enum Commands {
    /// All days, then labels of the current time and of tabulated events
    Report,
    /// Print every derived day
    Days,
    /// Label of the current time
    Now,
    /// Label of a timestamp
    Convert {
        /// RFC 3339 timestamp with offset (e.g. 2025-06-20T21:42:00-05:00)
        #[arg(long)]
        date: String,
    },
    /// Labels of the season changes inside the calendar
    SeasonChanges,
    /// Labels of the new moons inside the calendar
    NewMoons,
    /// First and last day marker
    Coverage,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn fail(context: &str, err: impl Display) -> ! {
    eprintln!("{context}: {err}");
    std::process::exit(1);
}

fn load_tables(config: SourceConfig) -> XmlTables {
    XmlTables::new(config).unwrap_or_else(|e| fail("Invalid configuration", e))
}

fn load_calendar(tables: &XmlTables) -> Calendar {
    build_calendar(tables).unwrap_or_else(|e| fail("Failed to build calendar", e))
}

fn require_events(events: Result<Vec<TimedEvent>, TableError>) -> Vec<TimedEvent> {
    events.unwrap_or_else(|e| fail("Failed to read tables", e))
}

fn require_moment(text: &str) -> Moment {
    parse_moment(text).unwrap_or_else(|e| fail("Invalid date", e))
}

fn current_moment(tables: &XmlTables) -> Moment {
    let zone = tables
        .config()
        .zone()
        .unwrap_or_else(|e| fail("Invalid configuration", e));
    Utc::now().with_timezone(&zone)
}

fn season_changes(tables: &XmlTables) -> Vec<Moment> {
    require_events(tables.season_changes())
        .into_iter()
        .filter(|e| e.kind.is_season_change())
        .map(|e| e.moment)
        .collect()
}

fn new_moons(tables: &XmlTables) -> Vec<Moment> {
    require_events(tables.moon_phases())
        .into_iter()
        .filter(|e| e.kind == EventKind::NewMoon)
        .map(|e| e.moment)
        .collect()
}

fn print_days(calendar: &Calendar) {
    for day in calendar {
        println!("{day}");
    }
}

/// One label per moment; moments outside the calendar are skipped.
fn print_labels(calendar: &Calendar, moments: &[Moment]) {
    for moment in moments {
        match calendar.locate(moment) {
            Ok(label) => println!("{label}"),
            Err(e) if e.is_out_of_range() => {
                tracing::debug!(moment = %moment, "outside calendar coverage; skipped");
            }
            Err(e) => fail("Lookup failed", e),
        }
    }
}

fn print_now(calendar: &Calendar, tables: &XmlTables) {
    let now = current_moment(tables);
    match calendar.locate(&now) {
        Ok(label) => println!("{label}"),
        Err(e) => tracing::warn!(now = %now, "{e}"),
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let tables = load_tables(cli.source.into_config());
    let calendar = load_calendar(&tables);

    match cli.command.unwrap_or(Commands::Report) {
        Commands::Report => {
            print_days(&calendar);
            println!("====NOW");
            print_now(&calendar, &tables);
            println!("====SEASON CHANGES");
            print_labels(&calendar, &season_changes(&tables));
            println!("====NEW MOONS");
            print_labels(&calendar, &new_moons(&tables));
        }

        Commands::Days => print_days(&calendar),

        Commands::Now => print_now(&calendar, &tables),

        Commands::Convert { date } => {
            let moment = require_moment(&date);
            match calendar.locate(&moment) {
                Ok(label) => println!("{label}"),
                Err(e) => fail("Conversion failed", e),
            }
        }

        Commands::SeasonChanges => print_labels(&calendar, &season_changes(&tables)),

        Commands::NewMoons => print_labels(&calendar, &new_moons(&tables)),

        Commands::Coverage => match calendar.coverage() {
            Some((start, end)) => {
                println!("{start} .. {end} ({} days)", calendar.len() - 1);
                if let (Some(first), Some(last)) = (calendar.first(), calendar.last()) {
                    println!("first: {}", first.name);
                    println!("last:  {}", last.name);
                }
            }
            None => println!("Calendar has no coverage ({} day markers)", calendar.len()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_flags_keeps_defaults() {
        let cli = Cli::try_parse_from(["rinfel"]).unwrap();
        assert!(cli.command.is_none());
        let config = cli.source.into_config();
        assert_eq!(config.season_years, SourceConfig::default().season_years);
        assert_eq!(config.daylight_days, 286);
    }

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "rinfel",
            "--tables",
            "/tmp/tables",
            "--season-year",
            "2025",
            "--season-year",
            "2026",
            "--utc-offset",
            "-3",
            "--epoch",
            "2025-03-20T00:00",
            "--days",
            "10",
            "days",
        ])
        .unwrap();
        assert!(matches!(cli.command, Some(Commands::Days)));
        let config = cli.source.into_config();
        assert_eq!(config.table_dir, PathBuf::from("/tmp/tables"));
        assert_eq!(config.season_years, vec![2025, 2026]);
        assert_eq!(config.lunar_years, vec![2025, 2026]);
        assert_eq!(config.utc_offset_hours, -3);
        assert_eq!(config.epoch, WallTime::new(2025, 3, 20, 0, 0));
        assert_eq!(config.daylight_days, 10);
    }

    #[test]
    fn source_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["rinfel", "new-moons", "--lunar-year", "2026"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::NewMoons)));
        assert_eq!(cli.source.into_config().lunar_years, vec![2026]);
    }

    #[test]
    fn convert_requires_date() {
        assert!(Cli::try_parse_from(["rinfel", "convert"]).is_err());
        let cli =
            Cli::try_parse_from(["rinfel", "convert", "--date", "2025-06-20T21:42:00-05:00"])
                .unwrap();
        match cli.command {
            Some(Commands::Convert { date }) => assert!(parse_moment(&date).is_ok()),
            _ => panic!("expected convert"),
        }
    }

    #[test]
    fn bad_epoch_is_rejected() {
        assert!(Cli::try_parse_from(["rinfel", "--epoch", "yesterday"]).is_err());
    }
}
