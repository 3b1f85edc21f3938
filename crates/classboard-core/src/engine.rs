//! Tick-driven engine tying the store, resolver and consumers together.
//!
//! Like the resolver, the engine never reads the wall clock and owns no
//! threads: the host calls
//!
//! - [`ClassEngine::on_second_tick`] every second (reminders),
//! - [`ClassEngine::on_minute_tick`] every minute (lesson state, presence),
//! - [`ClassEngine::replace_schedule`] whenever a new timetable arrives,
//!   which re-resolves immediately instead of waiting for the next tick.
//!
//! Each call returns the events to deliver, in order.
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = ClassEngine::new(&config);
//! engine.replace_schedule(schedule, now);
//! // In a loop:
//! for event in engine.on_second_tick(now) { host.deliver(event) }
//! ```

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::events::Event;
use crate::notification::NotificationScheduler;
use crate::presence::ClassPresenceMonitor;
use crate::resolver::{ClockReading, Countdown, DayView, LessonState, NextLesson, TimeResolver};
use crate::schedule::{ScheduleDocument, ScheduleStore, WeeklySchedule, Weekday};
use crate::storage::Config;

/// Point-in-time summary for status displays.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusReport {
    pub now: ClockReading,
    pub state: LessonState,
    pub next: Option<NextLesson>,
    pub countdown: Option<Countdown>,
    pub generation: u64,
}

#[derive(Debug)]
pub struct ClassEngine {
    store: ScheduleStore,
    notifier: NotificationScheduler,
    presence: ClassPresenceMonitor,
    lookahead_days: u8,
    last_state: Option<LessonState>,
}

impl ClassEngine {
    /// Engine with an empty timetable.
    pub fn new(config: &Config) -> Self {
        Self {
            store: ScheduleStore::new(),
            notifier: NotificationScheduler::new(config.notifications.clone()),
            presence: ClassPresenceMonitor::new(config.presence.autohide),
            lookahead_days: config.resolver.lookahead_days,
            last_state: None,
        }
    }

    pub fn store(&self) -> &ScheduleStore {
        &self.store
    }

    /// Apply changed settings. Dedup records survive; a changed auto-hide
    /// policy is re-announced.
    pub fn apply_config(&mut self, config: &Config, now: NaiveDateTime) -> Vec<Event> {
        self.notifier.set_config(config.notifications.clone());
        self.lookahead_days = config.resolver.lookahead_days;
        self.presence
            .set_autohide(config.presence.autohide)
            .map(|presence| Event::presence(presence, now))
            .into_iter()
            .collect()
    }

    /// Validate and install `schedule`, then re-resolve at `now`.
    ///
    /// A rejected schedule yields a single `ScheduleRejected` event and the
    /// previous timetable keeps running.
    pub fn replace_schedule(&mut self, schedule: WeeklySchedule, now: NaiveDateTime) -> Vec<Event> {
        let lessons = schedule.lesson_count();
        match self.store.replace(schedule) {
            Ok(generation) => {
                let mut events = vec![Event::ScheduleReplaced {
                    generation,
                    lessons,
                    at: now,
                }];
                events.extend(self.on_minute_tick(now));
                events.extend(self.on_second_tick(now));
                events
            }
            Err(err) => {
                tracing::warn!(%err, "schedule replacement rejected");
                vec![Event::ScheduleRejected {
                    issues: err.issues,
                    at: now,
                }]
            }
        }
    }

    /// [`Self::replace_schedule`] from the interchange document.
    pub fn replace_document(&mut self, document: ScheduleDocument, now: NaiveDateTime) -> Vec<Event> {
        match document.into_schedule() {
            Ok(schedule) => self.replace_schedule(schedule, now),
            Err(err) => {
                tracing::warn!(%err, "schedule document rejected");
                vec![Event::ScheduleRejected {
                    issues: err.issues,
                    at: now,
                }]
            }
        }
    }

    /// One-second cadence: reminder evaluation.
    pub fn on_second_tick(&mut self, now: NaiveDateTime) -> Vec<Event> {
        let reading = ClockReading::from_datetime(&now);
        let snapshot = self.store.snapshot();
        let next = self.resolver(&snapshot).next_lesson(reading);
        self.notifier
            .on_tick(next.as_ref(), reading)
            .into_iter()
            .map(|notification| Event::notification(notification, now))
            .collect()
    }

    /// One-minute cadence: lesson state and presence, both edge-triggered.
    pub fn on_minute_tick(&mut self, now: NaiveDateTime) -> Vec<Event> {
        let reading = ClockReading::from_datetime(&now);
        let snapshot = self.store.snapshot();
        let state = self.resolver(&snapshot).resolve(reading);

        let mut events = Vec::new();
        if self.last_state.as_ref() != Some(&state) {
            tracing::debug!(?state, "lesson state changed");
            events.push(Event::LessonStateChanged {
                state: state.clone(),
                at: now,
            });
        }
        if let Some(presence) = self.presence.observe(&state) {
            events.push(Event::presence(presence, now));
        }
        self.last_state = Some(state);
        events
    }

    pub fn status(&self, now: NaiveDateTime) -> StatusReport {
        let reading = ClockReading::from_datetime(&now);
        let snapshot = self.store.snapshot();
        let resolver = self.resolver(&snapshot);
        let next = resolver.next_lesson(reading);
        StatusReport {
            now: reading,
            state: resolver.resolve(reading),
            countdown: next
                .as_ref()
                .map(|next| Countdown::new(next.minutes_until, reading.second)),
            next,
            generation: self.store.generation(),
        }
    }

    /// Day listing; statuses are filled in only when `date` is `now`'s date.
    pub fn day_view(&self, date: chrono::NaiveDate, now: NaiveDateTime) -> DayView {
        let snapshot = self.store.snapshot();
        let now_minute = (date == now.date()).then(|| ClockReading::from_datetime(&now).minute);
        self.resolver(&snapshot).day_view(Weekday::of(&date), now_minute)
    }

    fn resolver<'a>(&self, schedule: &'a WeeklySchedule) -> TimeResolver<'a> {
        TimeResolver::new(schedule).with_lookahead(self.lookahead_days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::NotificationKind;
    use crate::resolver::LessonStatus;
    use crate::schedule::LessonSlot;
    use chrono::NaiveDate;

    // 2026-10-19 is a Monday
    fn monday(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn schedule() -> WeeklySchedule {
        WeeklySchedule::new().with_day(
            Weekday::Monday,
            vec![
                LessonSlot::new(480, 525, "Math", "101"),
                LessonSlot::new(540, 585, "Art", "102"),
            ],
        )
    }

    fn engine() -> ClassEngine {
        let mut engine = ClassEngine::new(&Config::default());
        engine.replace_schedule(schedule(), monday(7, 0, 30));
        engine
    }

    #[test]
    fn replacement_resolves_immediately() {
        let mut engine = ClassEngine::new(&Config::default());
        let events = engine.replace_schedule(schedule(), monday(8, 10, 30));
        assert!(matches!(
            events[0],
            Event::ScheduleReplaced {
                generation: 1,
                lessons: 2,
                ..
            }
        ));
        assert!(matches!(
            &events[1],
            Event::LessonStateChanged {
                state: LessonState::InLesson { elapsed_fraction: 22, .. },
                ..
            }
        ));
        assert!(matches!(
            events[2],
            Event::PresenceChanged { in_class: true, .. }
        ));
    }

    #[test]
    fn rejected_replacement_keeps_old_schedule() {
        let mut engine = engine();
        let bad = WeeklySchedule::new().with_day(
            Weekday::Monday,
            vec![
                LessonSlot::new(480, 525, "Math", "101"),
                LessonSlot::new(500, 510, "Clash", "102"),
            ],
        );
        let events = engine.replace_schedule(bad, monday(7, 1, 0));
        assert_eq!(events.len(), 1);
        assert!(matches!(&events[0], Event::ScheduleRejected { issues, .. } if issues.len() == 1));
        assert_eq!(engine.store().snapshot().lessons_for(Weekday::Monday).len(), 2);
        assert_eq!(engine.store().generation(), 1);
    }

    #[test]
    fn rejected_document_reports_issues() {
        let mut engine = engine();
        let doc = ScheduleDocument::from_json_str(
            r#"{ "Monday": [{ "time": "8:00-08:6", "subject": "Math", "room": "1" }] }"#,
        )
        .unwrap();
        let events = engine.replace_document(doc, monday(7, 2, 0));
        assert!(matches!(&events[0], Event::ScheduleRejected { .. }));
        assert_eq!(engine.store().generation(), 1);
    }

    #[test]
    fn minute_tick_is_edge_triggered() {
        let mut engine = engine();
        // 07:00 break state already announced by replace_schedule
        assert!(engine.on_minute_tick(monday(7, 0, 30)).is_empty());

        let events = engine.on_minute_tick(monday(7, 1, 0));
        // nearest-lesson distance changed, presence did not
        assert_eq!(events.len(), 1);
        assert!(matches!(
            &events[0],
            Event::LessonStateChanged {
                state: LessonState::Break { minutes_until_start: 59, .. },
                ..
            }
        ));
    }

    #[test]
    fn second_ticks_emit_reminders_once() {
        let mut engine = engine();
        let mut notifications = Vec::new();
        let mut at = monday(7, 54, 0);
        while at <= monday(8, 0, 30) {
            notifications.extend(engine.on_second_tick(at));
            at += chrono::Duration::seconds(1);
        }
        let kinds: Vec<_> = notifications
            .iter()
            .map(|event| match event {
                Event::Notification { kind, .. } => *kind,
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(kinds, vec![NotificationKind::Pre, NotificationKind::Start]);
    }

    #[test]
    fn status_reports_countdown_to_active_end() {
        let engine = engine();
        let status = engine.status(monday(8, 30, 15));
        assert!(status.state.is_in_lesson());
        let countdown = status.countdown.unwrap();
        assert_eq!(countdown.to_string(), "00:14:45");
        assert_eq!(status.generation, 1);
    }

    #[test]
    fn day_view_only_marks_today() {
        let engine = engine();
        let today = engine.day_view(monday(0, 0, 0).date(), monday(9, 0, 0));
        assert_eq!(today.lessons[0].status, LessonStatus::Past);
        assert_eq!(today.lessons[1].status, LessonStatus::Current);

        let next_monday = NaiveDate::from_ymd_opt(2026, 10, 26).unwrap();
        let later = engine.day_view(next_monday, monday(9, 0, 0));
        assert!(later
            .lessons
            .iter()
            .all(|entry| entry.status == LessonStatus::Upcoming));
    }

    #[test]
    fn autohide_change_reannounces_presence() {
        let mut engine = engine();
        engine.on_minute_tick(monday(8, 10, 0));
        let config = Config {
            presence: crate::storage::PresenceConfig { autohide: true },
            ..Config::default()
        };
        let events = engine.apply_config(&config, monday(8, 10, 5));
        assert!(matches!(
            events.as_slice(),
            [Event::PresenceChanged {
                in_class: true,
                keep_on_top: false,
                ..
            }]
        ));
    }
}
