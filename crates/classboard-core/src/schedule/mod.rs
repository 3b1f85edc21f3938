//! Weekly timetable types.
//!
//! A [`WeeklySchedule`] maps each weekday to its lessons in ascending start
//! order. Schedules are built whole (from a [`ScheduleDocument`] or in code)
//! and handed to a [`ScheduleStore`], which validates them before they
//! become visible to any reader.

mod document;
mod store;
pub mod time;
mod weekday;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use document::{RawLesson, ScheduleDocument};
pub use store::{validate, ScheduleStore};
pub use weekday::Weekday;

/// One lesson occupying the inclusive minute range `[start_minute, end_minute]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LessonSlot {
    pub start_minute: u16,
    pub end_minute: u16,
    pub subject: String,
    #[serde(default)]
    pub room: String,
}

impl LessonSlot {
    pub fn new(
        start_minute: u16,
        end_minute: u16,
        subject: impl Into<String>,
        room: impl Into<String>,
    ) -> Self {
        Self {
            start_minute,
            end_minute,
            subject: subject.into(),
            room: room.into(),
        }
    }

    /// Both ends inclusive.
    pub fn contains(&self, minute: u16) -> bool {
        self.start_minute <= minute && minute <= self.end_minute
    }

    pub fn duration_min(&self) -> u16 {
        self.end_minute.saturating_sub(self.start_minute)
    }

    /// Reminder dedup key: `subject-start_minute`.
    pub fn key(&self) -> String {
        format!("{}-{}", self.subject, self.start_minute)
    }

    /// `HH:MM-HH:MM`, the form the slot was imported from.
    pub fn time_label(&self) -> String {
        format!(
            "{}-{}",
            time::format_clock(self.start_minute),
            time::format_clock(self.end_minute)
        )
    }
}

/// Lessons per weekday. Days without an entry have no lessons.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklySchedule {
    days: BTreeMap<Weekday, Vec<LessonSlot>>,
}

impl WeeklySchedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style day assignment; replaces any lessons already set.
    pub fn with_day(mut self, weekday: Weekday, lessons: Vec<LessonSlot>) -> Self {
        self.set_day(weekday, lessons);
        self
    }

    pub fn set_day(&mut self, weekday: Weekday, lessons: Vec<LessonSlot>) {
        if lessons.is_empty() {
            self.days.remove(&weekday);
        } else {
            self.days.insert(weekday, lessons);
        }
    }

    /// Lessons of `weekday` in start order, empty if none.
    pub fn lessons_for(&self, weekday: Weekday) -> &[LessonSlot] {
        self.days.get(&weekday).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn days(&self) -> impl Iterator<Item = (Weekday, &[LessonSlot])> {
        self.days.iter().map(|(day, lessons)| (*day, lessons.as_slice()))
    }

    pub fn lesson_count(&self) -> usize {
        self.days.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// The timetable a fresh install starts with: six lessons on each school day.
    pub fn sample() -> Self {
        const TIMES: [(u16, u16); 6] = [
            (480, 525),  // 08:00-08:45
            (540, 585),  // 09:00-09:45
            (610, 655),  // 10:10-10:55
            (670, 715),  // 11:10-11:55
            (840, 885),  // 14:00-14:45
            (900, 945),  // 15:00-15:45
        ];
        let rotation: [(Weekday, [(&str, &str); 6]); 5] = [
            (
                Weekday::Monday,
                [
                    ("Chinese", "301"),
                    ("Math", "302"),
                    ("English", "303"),
                    ("Physics", "304"),
                    ("Chemistry", "305"),
                    ("Biology", "306"),
                ],
            ),
            (
                Weekday::Tuesday,
                [
                    ("Math", "302"),
                    ("Physics", "304"),
                    ("Chemistry", "305"),
                    ("Biology", "306"),
                    ("Chinese", "301"),
                    ("English", "303"),
                ],
            ),
            (
                Weekday::Wednesday,
                [
                    ("English", "303"),
                    ("Biology", "306"),
                    ("Chinese", "301"),
                    ("Math", "302"),
                    ("Physics", "304"),
                    ("Chemistry", "305"),
                ],
            ),
            (
                Weekday::Thursday,
                [
                    ("Chemistry", "305"),
                    ("Chinese", "301"),
                    ("Math", "302"),
                    ("English", "303"),
                    ("Biology", "306"),
                    ("Physics", "304"),
                ],
            ),
            (
                Weekday::Friday,
                [
                    ("Biology", "306"),
                    ("English", "303"),
                    ("Physics", "304"),
                    ("Chemistry", "305"),
                    ("Math", "302"),
                    ("Chinese", "301"),
                ],
            ),
        ];

        rotation
            .into_iter()
            .fold(Self::new(), |schedule, (day, subjects)| {
                let lessons = TIMES
                    .iter()
                    .zip(subjects)
                    .map(|(&(start, end), (subject, room))| {
                        LessonSlot::new(start, end, subject, room)
                    })
                    .collect();
                schedule.with_day(day, lessons)
            })
    }
}
