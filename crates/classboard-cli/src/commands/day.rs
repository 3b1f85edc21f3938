use std::path::PathBuf;

use chrono::Local;
use clap::Args;
use classboard_core::{ClassEngine, Config};

#[derive(Args)]
pub struct DayArgs {
    /// Timetable JSON (defaults to `schedule_path` from the config)
    #[arg(long)]
    schedule: Option<PathBuf>,
    /// Day to list ("YYYY-MM-DD", defaults to today)
    #[arg(long)]
    date: Option<String>,
}

pub fn run(args: DayArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let date = super::parse_date(args.date.as_deref())?;
    let schedule = super::load_schedule(args.schedule, &config)?;

    let engine = ClassEngine::new(&config);
    engine.store().replace(schedule)?;
    let view = engine.day_view(date, Local::now().naive_local());
    println!("{}", serde_json::to_string_pretty(&view)?);
    Ok(())
}
