//! Lesson resolution: what is happening now and what happens next.
//!
//! Every consumer (countdown, activity display, presence, reminders) goes
//! through [`TimeResolver`] so the "nearest" and "next" searches cannot
//! drift apart. The resolver is pure: it borrows one schedule snapshot and
//! a [`ClockReading`], and never reads the wall clock itself.
//!
//! ## Searches
//!
//! - **current**: the slot whose inclusive `[start, end]` holds now.
//! - **nearest**: smallest `|start - now|` today, ties to the earlier
//!   start. May point into the past; used for the idle display.
//! - **next**: directional. An active lesson targets its own end;
//!   otherwise the first later start today, then the first lesson of the
//!   following days up to the look-ahead depth.

use chrono::{Datelike, Timelike};
use serde::{Deserialize, Serialize};

use crate::schedule::time::MINUTES_PER_DAY;
use crate::schedule::{LessonSlot, WeeklySchedule, Weekday};

/// Days searched after today by [`TimeResolver::next_lesson`].
pub const DEFAULT_LOOKAHEAD_DAYS: u8 = 1;

/// A wall-clock instant reduced to what resolution needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockReading {
    pub weekday: Weekday,
    /// 0..=1439
    pub minute: u16,
    /// 0..=59
    pub second: u8,
}

impl ClockReading {
    /// Out-of-range values wrap into the day/minute.
    pub fn new(weekday: Weekday, minute: u16, second: u8) -> Self {
        Self {
            weekday,
            minute: minute % MINUTES_PER_DAY,
            second: second % 60,
        }
    }

    pub fn at(weekday: Weekday, hour: u16, minute: u16) -> Self {
        let minute_of_day =
            (u32::from(hour) * 60 + u32::from(minute)) % u32::from(MINUTES_PER_DAY);
        Self::new(weekday, minute_of_day as u16, 0)
    }

    /// From any local date-time (`NaiveDateTime`, `DateTime<Local>`, ...).
    pub fn from_datetime<T: Datelike + Timelike>(instant: &T) -> Self {
        Self::new(
            Weekday::of(instant),
            (instant.hour() * 60 + instant.minute()) as u16,
            instant.second().min(59) as u8,
        )
    }
}

/// Resolution result at one instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LessonState {
    InLesson {
        slot: LessonSlot,
        /// 0..=100
        elapsed_fraction: u8,
    },
    Break {
        /// Nearest lesson today (may already be over).
        upcoming: Option<LessonSlot>,
        /// Negative when the nearest lesson lies in the past.
        minutes_until_start: i32,
    },
    NoLessonsToday,
}

impl LessonState {
    pub fn is_in_lesson(&self) -> bool {
        matches!(self, LessonState::InLesson { .. })
    }
}

/// What the countdown is running towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NextTarget {
    /// The lesson in progress ends.
    ActiveEnd,
    /// A lesson starts, `day_offset` days from today.
    Upcoming { day_offset: u8 },
}

/// Result of the directional search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextLesson {
    pub slot: LessonSlot,
    pub weekday: Weekday,
    /// Minutes until the target (end for `ActiveEnd`, start otherwise).
    pub minutes_until: i32,
    pub target: NextTarget,
}

impl NextLesson {
    /// Minutes until this lesson's start as seen from `now_minute`:
    /// zero or negative once the lesson is running.
    pub fn minutes_until_start(&self, now_minute: u16) -> i32 {
        match self.target {
            NextTarget::ActiveEnd => self.slot.start_minute as i32 - now_minute as i32,
            NextTarget::Upcoming { .. } => self.minutes_until,
        }
    }
}

/// Per-slot status for a day listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LessonStatus {
    Past,
    Current,
    Upcoming,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayEntry {
    pub slot: LessonSlot,
    pub status: LessonStatus,
}

/// A weekday's lessons with their status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayView {
    pub weekday: Weekday,
    pub lessons: Vec<DayEntry>,
}

/// Hours/minutes/seconds left until a [`NextLesson`] target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Countdown {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

impl Countdown {
    /// `minutes_until` whole minutes away, `second` seconds into the current minute.
    pub fn new(minutes_until: i32, second: u8) -> Self {
        let total = (minutes_until.max(0) as u32 * 60).saturating_sub(second as u32);
        Self {
            hours: total / 3600,
            minutes: total % 3600 / 60,
            seconds: total % 60,
        }
    }

    pub fn total_seconds(&self) -> u32 {
        self.hours * 3600 + self.minutes * 60 + self.seconds
    }
}

impl std::fmt::Display for Countdown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hours, self.minutes, self.seconds)
    }
}

/// `floor(100 * (now - start) / (end - start))` clamped to `0..=100`.
pub fn elapsed_fraction(slot: &LessonSlot, now_minute: u16) -> u8 {
    let duration = slot.duration_min() as u32;
    if duration == 0 {
        return if now_minute >= slot.end_minute { 100 } else { 0 };
    }
    if now_minute <= slot.start_minute {
        return 0;
    }
    let passed = (now_minute - slot.start_minute) as u32;
    (passed * 100 / duration).min(100) as u8
}

/// Resolver over one schedule snapshot.
#[derive(Debug, Clone, Copy)]
pub struct TimeResolver<'a> {
    schedule: &'a WeeklySchedule,
    lookahead_days: u8,
}

impl<'a> TimeResolver<'a> {
    pub fn new(schedule: &'a WeeklySchedule) -> Self {
        Self {
            schedule,
            lookahead_days: DEFAULT_LOOKAHEAD_DAYS,
        }
    }

    /// Search depth for [`Self::next_lesson`], capped at 6 so the search
    /// never wraps back to today.
    pub fn with_lookahead(mut self, days: u8) -> Self {
        self.lookahead_days = days.min(6);
        self
    }

    pub fn lookahead_days(&self) -> u8 {
        self.lookahead_days
    }

    pub fn resolve(&self, now: ClockReading) -> LessonState {
        let today = self.schedule.lessons_for(now.weekday);
        if today.is_empty() {
            return LessonState::NoLessonsToday;
        }
        if let Some(slot) = self.current_lesson(now) {
            return LessonState::InLesson {
                slot: slot.clone(),
                elapsed_fraction: elapsed_fraction(slot, now.minute),
            };
        }
        let upcoming = self.nearest_lesson(now);
        let minutes_until_start = upcoming
            .map(|slot| slot.start_minute as i32 - now.minute as i32)
            .unwrap_or(0);
        LessonState::Break {
            upcoming: upcoming.cloned(),
            minutes_until_start,
        }
    }

    /// Slot containing now. Slots never overlap, so the first hit is the only one.
    pub fn current_lesson(&self, now: ClockReading) -> Option<&'a LessonSlot> {
        self.schedule
            .lessons_for(now.weekday)
            .iter()
            .find(|slot| slot.contains(now.minute))
    }

    pub fn nearest_lesson(&self, now: ClockReading) -> Option<&'a LessonSlot> {
        self.schedule
            .lessons_for(now.weekday)
            .iter()
            .min_by_key(|slot| {
                (
                    (slot.start_minute as i32 - now.minute as i32).abs(),
                    slot.start_minute,
                )
            })
    }

    pub fn next_lesson(&self, now: ClockReading) -> Option<NextLesson> {
        if let Some(slot) = self.current_lesson(now) {
            return Some(NextLesson {
                slot: slot.clone(),
                weekday: now.weekday,
                minutes_until: slot.end_minute as i32 - now.minute as i32,
                target: NextTarget::ActiveEnd,
            });
        }

        let later_today = self
            .schedule
            .lessons_for(now.weekday)
            .iter()
            .filter(|slot| slot.start_minute > now.minute)
            .min_by_key(|slot| slot.start_minute);
        if let Some(slot) = later_today {
            return Some(NextLesson {
                slot: slot.clone(),
                weekday: now.weekday,
                minutes_until: slot.start_minute as i32 - now.minute as i32,
                target: NextTarget::Upcoming { day_offset: 0 },
            });
        }

        let rest_of_today = (MINUTES_PER_DAY - now.minute) as i32;
        let mut weekday = now.weekday;
        for day_offset in 1..=self.lookahead_days {
            weekday = weekday.succ();
            if let Some(first) = self.schedule.lessons_for(weekday).first() {
                let whole_days = (day_offset as i32 - 1) * MINUTES_PER_DAY as i32;
                return Some(NextLesson {
                    slot: first.clone(),
                    weekday,
                    minutes_until: rest_of_today + whole_days + first.start_minute as i32,
                    target: NextTarget::Upcoming { day_offset },
                });
            }
        }
        None
    }

    /// Countdown to the next target, `None` when nothing is scheduled in range.
    pub fn countdown(&self, now: ClockReading) -> Option<Countdown> {
        self.next_lesson(now)
            .map(|next| Countdown::new(next.minutes_until, now.second))
    }

    /// Lessons of `weekday`. Statuses are only meaningful for today, so
    /// without `now_minute` every lesson is reported as upcoming.
    pub fn day_view(&self, weekday: Weekday, now_minute: Option<u16>) -> DayView {
        let lessons = self
            .schedule
            .lessons_for(weekday)
            .iter()
            .map(|slot| {
                let status = match now_minute {
                    Some(now) if slot.contains(now) => LessonStatus::Current,
                    Some(now) if now > slot.end_minute => LessonStatus::Past,
                    _ => LessonStatus::Upcoming,
                };
                DayEntry {
                    slot: slot.clone(),
                    status,
                }
            })
            .collect();
        DayView { weekday, lessons }
    }
}
