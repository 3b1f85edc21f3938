use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::store::validate_day;
use super::time::parse_range;
use super::{LessonSlot, WeeklySchedule, Weekday};
use crate::error::{CoreError, IssueKind, ScheduleValidationError, SlotIssue};

/// A lesson as written in a timetable file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawLesson {
    /// `HH:MM-HH:MM`
    pub time: String,
    pub subject: String,
    #[serde(default, alias = "classroom")]
    pub room: String,
}

/// The timetable interchange format: weekday key to lessons.
///
/// ```json
/// { "Monday": [{ "time": "08:00-08:45", "subject": "Math", "room": "101" }] }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScheduleDocument {
    pub days: BTreeMap<String, Vec<RawLesson>>,
}

impl ScheduleDocument {
    pub fn from_json_str(json: &str) -> Result<Self, CoreError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse and validate into a [`WeeklySchedule`].
    ///
    /// Unknown weekday keys are logged and skipped. Every time-token and
    /// slot problem is collected into one [`ScheduleValidationError`].
    pub fn into_schedule(self) -> Result<WeeklySchedule, ScheduleValidationError> {
        let mut schedule = WeeklySchedule::new();
        let mut seen: BTreeMap<Weekday, String> = BTreeMap::new();
        let mut issues = Vec::new();

        for (key, raw_lessons) in self.days {
            let weekday = match key.parse::<Weekday>() {
                Ok(day) => day,
                Err(err) => {
                    tracing::warn!(%err, "skipping schedule entry");
                    continue;
                }
            };
            if seen.contains_key(&weekday) {
                issues.push(SlotIssue {
                    weekday,
                    index: 0,
                    subject: String::new(),
                    kind: IssueKind::DuplicateDay { key },
                });
                continue;
            }
            seen.insert(weekday, key);

            let mut parsed = Vec::with_capacity(raw_lessons.len());
            for (index, raw) in raw_lessons.into_iter().enumerate() {
                match parse_range(&raw.time) {
                    Ok((start, end)) => {
                        parsed.push((index, LessonSlot::new(start, end, raw.subject, raw.room)))
                    }
                    Err(error) => issues.push(SlotIssue {
                        weekday,
                        index,
                        subject: raw.subject,
                        kind: IssueKind::BadTime { error },
                    }),
                }
            }

            validate_day(
                weekday,
                parsed.iter().map(|(index, slot)| (*index, slot)),
                &mut issues,
            );
            schedule.set_day(weekday, parsed.into_iter().map(|(_, slot)| slot).collect());
        }

        if issues.is_empty() {
            Ok(schedule)
        } else {
            issues.sort_by_key(|issue| (issue.weekday, issue.index));
            Err(ScheduleValidationError { issues })
        }
    }
}

impl From<&WeeklySchedule> for ScheduleDocument {
    fn from(schedule: &WeeklySchedule) -> Self {
        let days = schedule
            .days()
            .map(|(weekday, lessons)| {
                let raw = lessons
                    .iter()
                    .map(|slot| RawLesson {
                        time: slot.time_label(),
                        subject: slot.subject.clone(),
                        room: slot.room.clone(),
                    })
                    .collect();
                (weekday.name().to_string(), raw)
            })
            .collect();
        Self { days }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TimeParseError;

    #[test]
    fn parses_english_and_legacy_keys() {
        let doc = ScheduleDocument::from_json_str(
            r#"{
                "Monday": [{ "time": "08:00-08:45", "subject": "Math", "room": "101" }],
                "星期二": [{ "time": "09:00-09:45", "subject": "History", "classroom": "301" }]
            }"#,
        )
        .unwrap();
        let schedule = doc.into_schedule().unwrap();

        let monday = schedule.lessons_for(Weekday::Monday);
        assert_eq!(monday, &[LessonSlot::new(480, 525, "Math", "101")]);
        let tuesday = schedule.lessons_for(Weekday::Tuesday);
        assert_eq!(tuesday[0].room, "301");
    }

    #[test]
    fn unknown_weekday_is_skipped() {
        let doc = ScheduleDocument::from_json_str(
            r#"{
                "Holiday": [{ "time": "08:00-08:45", "subject": "Math", "room": "101" }],
                "Friday": [{ "time": "08:00-08:45", "subject": "Art", "room": "7" }]
            }"#,
        )
        .unwrap();
        let schedule = doc.into_schedule().unwrap();
        assert_eq!(schedule.lesson_count(), 1);
        assert_eq!(schedule.lessons_for(Weekday::Friday)[0].subject, "Art");
    }

    #[test]
    fn bad_time_is_reported_not_guessed() {
        let doc = ScheduleDocument::from_json_str(
            r#"{ "Monday": [
                { "time": "08:00-08:45", "subject": "Math", "room": "101" },
                { "time": "9:x0-09:45", "subject": "Art", "room": "102" },
                { "time": "10:00", "subject": "Music", "room": "103" }
            ] }"#,
        )
        .unwrap();
        let err = doc.into_schedule().unwrap_err();
        assert_eq!(err.issues.len(), 2);
        assert_eq!(err.issues[0].index, 1);
        assert_eq!(
            err.issues[0].kind,
            IssueKind::BadTime {
                error: TimeParseError::Malformed { text: "9:x0".into() }
            }
        );
        assert!(matches!(
            err.issues[1].kind,
            IssueKind::BadTime {
                error: TimeParseError::MissingSeparator { .. }
            }
        ));
    }

    #[test]
    fn overlap_reported_with_document_indices() {
        let doc = ScheduleDocument::from_json_str(
            r#"{ "Monday": [
                { "time": "bad", "subject": "Broken", "room": "" },
                { "time": "08:00-08:45", "subject": "Math", "room": "101" },
                { "time": "08:30-09:15", "subject": "Art", "room": "102" }
            ] }"#,
        )
        .unwrap();
        let err = doc.into_schedule().unwrap_err();
        let overlap = err
            .issues
            .iter()
            .find(|issue| matches!(issue.kind, IssueKind::Overlap { .. }))
            .unwrap();
        assert_eq!(overlap.index, 2);
        assert_eq!(overlap.kind, IssueKind::Overlap { previous: 1 });
    }

    #[test]
    fn duplicate_day_keys_rejected() {
        let doc = ScheduleDocument::from_json_str(
            r#"{
                "Monday": [{ "time": "08:00-08:45", "subject": "Math", "room": "101" }],
                "mon": [{ "time": "09:00-09:45", "subject": "Art", "room": "102" }]
            }"#,
        )
        .unwrap();
        let err = doc.into_schedule().unwrap_err();
        assert!(matches!(err.issues[0].kind, IssueKind::DuplicateDay { .. }));
    }

    #[test]
    fn converts_back_from_schedule() {
        let schedule = WeeklySchedule::sample();
        let doc = ScheduleDocument::from(&schedule);
        assert_eq!(doc.days["Monday"][0].time, "08:00-08:45");
        assert_eq!(doc.into_schedule().unwrap(), schedule);
    }
}
