pub mod config;
pub mod day;
pub mod status;
pub mod validate;
pub mod watch;

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate, NaiveDateTime};
use classboard_core::{Config, CoreError, ScheduleDocument, WeeklySchedule};

/// Read and validate a timetable JSON file.
pub fn read_schedule(path: &Path) -> Result<WeeklySchedule, CoreError> {
    let json = std::fs::read_to_string(path)?;
    let schedule = ScheduleDocument::from_json_str(&json)?.into_schedule()?;
    Ok(schedule)
}

/// Path of the timetable to use: `--schedule`, then `schedule_path` from
/// the config. `None` means the built-in sample.
pub fn schedule_path(explicit: Option<PathBuf>, config: &Config) -> Option<PathBuf> {
    explicit.or_else(|| config.schedule_path.as_ref().map(PathBuf::from))
}

pub fn load_schedule(
    explicit: Option<PathBuf>,
    config: &Config,
) -> Result<WeeklySchedule, Box<dyn std::error::Error>> {
    match schedule_path(explicit, config) {
        Some(path) => Ok(read_schedule(&path)?),
        None => {
            tracing::info!("no timetable configured, using the sample week");
            Ok(WeeklySchedule::sample())
        }
    }
}

/// `YYYY-MM-DD HH:MM[:SS]`, or the local time when absent.
pub fn parse_at(at: Option<&str>) -> Result<NaiveDateTime, Box<dyn std::error::Error>> {
    let Some(text) = at else {
        return Ok(Local::now().naive_local());
    };
    NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M"))
        .map_err(|e| format!("invalid --at '{text}': {e}").into())
}

/// `YYYY-MM-DD`, or today when absent.
pub fn parse_date(date: Option<&str>) -> Result<NaiveDate, Box<dyn std::error::Error>> {
    match date {
        Some(text) => NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .map_err(|e| format!("invalid --date '{text}': {e}").into()),
        None => Ok(Local::now().date_naive()),
    }
}
