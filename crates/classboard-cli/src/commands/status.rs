use std::path::PathBuf;

use clap::Args;
use classboard_core::{ClassEngine, Config};

#[derive(Args)]
pub struct StatusArgs {
    /// Timetable JSON (defaults to `schedule_path` from the config)
    #[arg(long)]
    schedule: Option<PathBuf>,
    /// Resolve at this local time instead of now ("YYYY-MM-DD HH:MM[:SS]")
    #[arg(long)]
    at: Option<String>,
}

pub fn run(args: StatusArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let now = super::parse_at(args.at.as_deref())?;
    let schedule = super::load_schedule(args.schedule, &config)?;

    let engine = ClassEngine::new(&config);
    engine.store().replace(schedule)?;
    let report = engine.status(now);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
