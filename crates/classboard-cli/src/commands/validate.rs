use std::path::PathBuf;

use clap::Args;
use classboard_core::CoreError;

#[derive(Args)]
pub struct ValidateArgs {
    /// Timetable JSON to check
    path: PathBuf,
}

pub fn run(args: ValidateArgs) -> Result<(), Box<dyn std::error::Error>> {
    match super::read_schedule(&args.path) {
        Ok(schedule) => {
            println!("ok: {} lesson(s)", schedule.lesson_count());
            Ok(())
        }
        Err(CoreError::Schedule(err)) => {
            // One line per offending slot, then fail.
            for issue in &err.issues {
                println!("{issue}");
            }
            Err(format!("{} issue(s) found", err.issues.len()).into())
        }
        Err(other) => Err(other.into()),
    }
}
