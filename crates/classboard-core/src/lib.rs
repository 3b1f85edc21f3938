//! # Classboard Core Library
//!
//! This library provides the core logic for Classboard, a desktop class
//! schedule board. Everything is available through the standalone CLI; a
//! desktop shell would be a thin layer over the same engine.
//!
//! ## Architecture
//!
//! - **Schedule**: weekly timetable model, `HH:MM` parsing, validation and
//!   an atomically swapped [`ScheduleStore`]
//! - **Resolver**: pure lesson resolution over a schedule snapshot
//!   (current, nearest, next, countdown)
//! - **Consumers**: reminder dedup ([`NotificationScheduler`]) and the
//!   edge-triggered in-class signal ([`ClassPresenceMonitor`])
//! - **Engine**: tick-driven glue that turns the above into [`Event`]s;
//!   the caller invokes the ticks, the library never reads the clock
//! - **Storage**: TOML-based configuration
//!
//! ## Key Components
//!
//! - [`ClassEngine`]: Tick-driven engine
//! - [`TimeResolver`]: Lesson resolution
//! - [`WeeklySchedule`]: Timetable model
//! - [`Config`]: Application configuration management

pub mod engine;
pub mod error;
pub mod events;
pub mod notification;
pub mod presence;
pub mod resolver;
pub mod schedule;
pub mod storage;

pub use engine::{ClassEngine, StatusReport};
pub use error::{
    ConfigError, CoreError, IssueKind, ScheduleValidationError, SlotIssue, TimeParseError,
    UnknownWeekdayError,
};
pub use events::Event;
pub use notification::{Notification, NotificationKind, NotificationScheduler, ReminderPhase};
pub use presence::{ClassPresenceMonitor, Presence};
pub use resolver::{
    ClockReading, Countdown, DayEntry, DayView, LessonState, LessonStatus, NextLesson,
    NextTarget, TimeResolver,
};
pub use schedule::{LessonSlot, RawLesson, ScheduleDocument, ScheduleStore, WeeklySchedule, Weekday};
pub use storage::Config;
