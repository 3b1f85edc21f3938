//! Long-running tick driver.
//!
//! Second ticks evaluate reminders, minute ticks evaluate lesson state and
//! presence. Both are aligned to wall-clock boundaries so the start
//! reminder lands on second 0, and re-aligned on every minute tick. On each
//! minute tick the config and timetable files are re-read if their
//! modification time changed; a changed `schedule_path` switches the
//! timetable source unless `--schedule` pinned it.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{Local, NaiveDateTime, Timelike};
use clap::Args;
use classboard_core::{ClassEngine, Config, CoreError, Event, ScheduleDocument, WeeklySchedule};
use tokio::time::{interval_at, Duration, Instant, Interval, MissedTickBehavior};

#[derive(Args)]
pub struct WatchArgs {
    /// Timetable JSON (defaults to `schedule_path` from the config)
    #[arg(long)]
    schedule: Option<PathBuf>,
}

/// Tracks a file's modification time between polls.
struct FileWatch {
    path: PathBuf,
    modified: Option<SystemTime>,
}

impl FileWatch {
    fn new(path: PathBuf) -> Self {
        let modified = modified_at(&path);
        Self { path, modified }
    }

    /// True once per observed change of the modification time.
    fn changed(&mut self) -> bool {
        let current = modified_at(&self.path);
        if current == self.modified {
            return false;
        }
        self.modified = current;
        current.is_some()
    }
}

fn modified_at(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}

fn read_document(path: &Path) -> Result<ScheduleDocument, CoreError> {
    let json = std::fs::read_to_string(path)?;
    ScheduleDocument::from_json_str(&json)
}

/// Engine plus the files it is fed from.
struct Watcher {
    engine: ClassEngine,
    config_file: FileWatch,
    /// Set when `--schedule` was given; config changes then never move the source.
    pinned: bool,
    schedule_path: Option<PathBuf>,
    schedule_file: Option<FileWatch>,
}

impl Watcher {
    /// Load the initial timetable. An unreadable or invalid one is fatal here,
    /// unlike on reload.
    fn start(
        explicit: Option<PathBuf>,
        config: &Config,
        config_path: PathBuf,
        now: NaiveDateTime,
    ) -> Result<(Self, Vec<Event>), Box<dyn std::error::Error>> {
        let pinned = explicit.is_some();
        let schedule_path = super::schedule_path(explicit, config);
        let schedule = super::load_schedule(schedule_path.clone(), config)?;

        let mut watcher = Self {
            engine: ClassEngine::new(config),
            config_file: FileWatch::new(config_path),
            pinned,
            schedule_file: schedule_path.clone().map(FileWatch::new),
            schedule_path,
        };
        let events = watcher.engine.replace_schedule(schedule, now);
        Ok((watcher, events))
    }

    /// Pick up config and timetable edits. Read failures are logged and the
    /// running state is kept.
    fn reload(&mut self, at: NaiveDateTime) -> Vec<Event> {
        let mut events = Vec::new();

        if self.config_file.changed() {
            match Config::load_from(&self.config_file.path) {
                Ok(config) => {
                    events.extend(self.engine.apply_config(&config, at));
                    let configured = config.schedule_path.map(PathBuf::from);
                    if !self.pinned && configured != self.schedule_path {
                        events.extend(self.switch_source(configured, at));
                    }
                }
                Err(err) => tracing::warn!(%err, "keeping previous configuration"),
            }
        }

        if let Some(file) = self.schedule_file.as_mut() {
            if file.changed() {
                match read_document(&file.path) {
                    Ok(document) => events.extend(self.engine.replace_document(document, at)),
                    Err(err) => {
                        tracing::warn!(%err, path = %file.path.display(), "timetable unreadable")
                    }
                }
            }
        }
        events
    }

    fn switch_source(&mut self, path: Option<PathBuf>, at: NaiveDateTime) -> Vec<Event> {
        tracing::info!(path = ?path, "timetable source changed");
        self.schedule_path = path.clone();
        self.schedule_file = path.clone().map(FileWatch::new);
        match path {
            Some(path) => match read_document(&path) {
                Ok(document) => self.engine.replace_document(document, at),
                Err(err) => {
                    // Loaded once the file shows up or changes.
                    tracing::warn!(%err, path = %path.display(), "timetable unreadable");
                    Vec::new()
                }
            },
            None => self.engine.replace_schedule(WeeklySchedule::sample(), at),
        }
    }
}

/// Second and minute intervals locked to the local clock.
struct Ticker {
    seconds: Interval,
    minutes: Interval,
}

impl Ticker {
    fn new() -> Self {
        let mut seconds = interval_at(next_boundary(1), Duration::from_secs(1));
        seconds.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut minutes = interval_at(next_boundary(60), Duration::from_secs(60));
        minutes.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Self { seconds, minutes }
    }

    /// Pull both intervals back onto wall-clock boundaries; the monotonic
    /// clock drifts from the local clock over long runs.
    fn realign(&mut self) {
        self.seconds.reset_at(next_boundary(1));
        self.minutes.reset_at(next_boundary(60));
    }
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Delay until the next multiple of `period_secs` on the local clock.
fn until_boundary(period_secs: u32) -> Duration {
    let now = Local::now();
    let into_period = now.second() % period_secs;
    let nanos = u64::from(now.nanosecond() % 1_000_000_000);
    let remaining = u64::from(period_secs - into_period) * 1_000_000_000 - nanos;
    Duration::from_nanos(remaining)
}

fn next_boundary(period_secs: u32) -> Instant {
    Instant::now() + until_boundary(period_secs)
}

fn emit(events: Vec<Event>) -> Result<(), Box<dyn std::error::Error>> {
    if events.is_empty() {
        return Ok(());
    }
    let mut out = std::io::stdout().lock();
    for event in &events {
        writeln!(out, "{}", serde_json::to_string(event)?)?;
    }
    out.flush()?;
    Ok(())
}

pub fn run(args: WatchArgs) -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(watch(args))
}

async fn watch(args: WatchArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let (mut watcher, events) = Watcher::start(args.schedule, &config, Config::path()?, now())?;
    emit(events)?;

    let mut ticker = Ticker::new();
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);
    tracing::info!("watching, press Ctrl-C to stop");

    loop {
        tokio::select! {
            result = &mut shutdown => {
                result?;
                tracing::info!("shutting down");
                break;
            }
            _ = ticker.seconds.tick() => {
                emit(watcher.engine.on_second_tick(now()))?;
            }
            _ = ticker.minutes.tick() => {
                let at = now();
                emit(watcher.reload(at))?;
                emit(watcher.engine.on_minute_tick(at))?;
                ticker.realign();
            }
        }
    }
    Ok(())
}
