//! Lesson reminders.
//!
//! [`NotificationScheduler`] is fed the directional [`NextLesson`] once per
//! tick and decides whether a reminder fires. Each lesson, identified by
//! `subject-start_minute`, moves through
//!
//! ```text
//! Idle -> PreNotified -> StartNotified
//! ```
//!
//! at most once per phase. The heads-up fires on the tick where the lesson
//! is exactly `lead_minutes` away; the start reminder fires on the tick at
//! minute 0, second 0 of the lesson (also straight from `Idle` if the
//! heads-up was missed).
//!
//! ## Epoch reset
//!
//! Records are not dropped one by one. Once the last lesson seen in
//! progress is more than `reset_grace_minutes` past its end, the whole
//! record map is cleared and a new epoch begins. A lesson that already
//! passed its reminder marks cannot fire again after the reset, because
//! both marks lie in the past by then.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::resolver::{ClockReading, NextLesson, NextTarget};
use crate::schedule::time::format_clock;
use crate::schedule::Weekday;
use crate::storage::NotificationsConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    /// Lesson starts in `lead_minutes`.
    Pre,
    /// Lesson starts now.
    Start,
}

/// A reminder ready to be shown by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub subject: String,
    pub room: String,
    pub start_minute: u16,
    pub message: String,
}

/// Reminder phase of one lesson.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderPhase {
    Idle,
    PreNotified,
    StartNotified,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NotificationRecord {
    pub pre_fired: bool,
    pub start_fired: bool,
}

impl NotificationRecord {
    pub fn phase(&self) -> ReminderPhase {
        if self.start_fired {
            ReminderPhase::StartNotified
        } else if self.pre_fired {
            ReminderPhase::PreNotified
        } else {
            ReminderPhase::Idle
        }
    }
}

/// Lesson seen in progress, kept until the epoch reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ActiveLesson {
    weekday: Weekday,
    end_minute: u16,
}

#[derive(Debug, Clone)]
pub struct NotificationScheduler {
    config: NotificationsConfig,
    records: HashMap<String, NotificationRecord>,
    active: Option<ActiveLesson>,
}

impl NotificationScheduler {
    pub fn new(config: NotificationsConfig) -> Self {
        Self {
            config,
            records: HashMap::new(),
            active: None,
        }
    }

    /// Swap settings without losing dedup state.
    pub fn set_config(&mut self, config: NotificationsConfig) {
        self.config = config;
    }

    /// Phase of the lesson with dedup key `key` (`Idle` if never seen).
    pub fn phase_of(&self, key: &str) -> ReminderPhase {
        self.records
            .get(key)
            .map(NotificationRecord::phase)
            .unwrap_or(ReminderPhase::Idle)
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// Drop every record and start a new epoch.
    pub fn reset_epoch(&mut self) {
        if !self.records.is_empty() {
            tracing::debug!(records = self.records.len(), "reminder epoch reset");
        }
        self.records.clear();
        self.active = None;
    }

    /// Evaluate one tick. Returns the reminders that fire on this tick;
    /// empty when reminders are disabled (state is still tracked).
    pub fn on_tick(&mut self, next: Option<&NextLesson>, now: ClockReading) -> Vec<Notification> {
        self.expire_epoch(now);

        let Some(next) = next else {
            return Vec::new();
        };
        if next.target == NextTarget::ActiveEnd {
            self.active = Some(ActiveLesson {
                weekday: next.weekday,
                end_minute: next.slot.end_minute,
            });
        }

        let until_start = next.minutes_until_start(now.minute);
        let lead = i32::from(self.config.lead_minutes);
        let record = self.records.entry(next.slot.key()).or_default();
        let mut fired = Vec::new();

        if until_start == lead && !record.pre_fired {
            record.pre_fired = true;
            fired.push(NotificationKind::Pre);
        }
        if until_start == 0 && now.second == 0 && !record.start_fired {
            record.start_fired = true;
            fired.push(NotificationKind::Start);
        }

        if !self.config.enabled {
            return Vec::new();
        }
        fired
            .into_iter()
            .map(|kind| {
                tracing::debug!(?kind, key = %next.slot.key(), "reminder fired");
                Notification {
                    kind,
                    subject: next.slot.subject.clone(),
                    room: next.slot.room.clone(),
                    start_minute: next.slot.start_minute,
                    message: message_for(kind, next),
                }
            })
            .collect()
    }

    fn expire_epoch(&mut self, now: ClockReading) {
        let Some(active) = self.active else {
            return;
        };
        // Active lessons are always today's, so a different weekday means
        // the calendar day has turned over since.
        let over = active.weekday != now.weekday
            || i32::from(now.minute) - i32::from(active.end_minute)
                > i32::from(self.config.reset_grace_minutes);
        if over {
            self.reset_epoch();
        }
    }
}

fn message_for(kind: NotificationKind, next: &NextLesson) -> String {
    match kind {
        NotificationKind::Pre => format!(
            "Next lesson: {} at {}",
            next.slot.subject,
            format_clock(next.slot.start_minute)
        ),
        NotificationKind::Start => format!("{} is starting now", next.slot.subject),
    }
}
