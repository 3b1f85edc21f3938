use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::SlotIssue;
use crate::notification::{Notification, NotificationKind};
use crate::presence::Presence;
use crate::resolver::LessonState;

/// Everything the engine hands to the host.
/// `at` is the local wall-clock instant of the tick that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    LessonStateChanged {
        state: LessonState,
        at: NaiveDateTime,
    },
    Notification {
        kind: NotificationKind,
        subject: String,
        room: String,
        start_minute: u16,
        message: String,
        at: NaiveDateTime,
    },
    PresenceChanged {
        in_class: bool,
        keep_on_top: bool,
        at: NaiveDateTime,
    },
    ScheduleReplaced {
        generation: u64,
        lessons: usize,
        at: NaiveDateTime,
    },
    /// A replacement failed validation; the previous schedule stays active.
    ScheduleRejected {
        issues: Vec<SlotIssue>,
        at: NaiveDateTime,
    },
}

impl Event {
    pub fn notification(notification: Notification, at: NaiveDateTime) -> Self {
        Event::Notification {
            kind: notification.kind,
            subject: notification.subject,
            room: notification.room,
            start_minute: notification.start_minute,
            message: notification.message,
            at,
        }
    }

    pub fn presence(presence: Presence, at: NaiveDateTime) -> Self {
        Event::PresenceChanged {
            in_class: presence.in_class,
            keep_on_top: presence.keep_on_top,
            at,
        }
    }
}
