use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use super::time::MINUTES_PER_DAY;
use super::{LessonSlot, WeeklySchedule, Weekday};
use crate::error::{IssueKind, ScheduleValidationError, SlotIssue};

/// Holder of the active timetable.
///
/// Replacement is a pointer swap behind a lock: readers take an
/// [`Arc`] snapshot and resolve against it, so one resolution never mixes
/// slots from two schedules. A rejected replacement leaves the current
/// schedule in place.
#[derive(Debug, Default)]
pub struct ScheduleStore {
    current: RwLock<Arc<WeeklySchedule>>,
    generation: AtomicU64,
}

impl ScheduleStore {
    /// Empty store, generation 0.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_schedule(schedule: WeeklySchedule) -> Result<Self, ScheduleValidationError> {
        let store = Self::new();
        store.replace(schedule)?;
        Ok(store)
    }

    /// Validate and swap in `schedule`. Returns the new generation.
    pub fn replace(&self, schedule: WeeklySchedule) -> Result<u64, ScheduleValidationError> {
        validate(&schedule)?;
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *current = Arc::new(schedule);
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::info!(
            generation,
            lessons = current.lesson_count(),
            "schedule replaced"
        );
        Ok(generation)
    }

    /// Consistent view of the current schedule.
    pub fn snapshot(&self) -> Arc<WeeklySchedule> {
        let current = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&current)
    }

    pub fn lessons_for(&self, weekday: Weekday) -> Vec<LessonSlot> {
        self.snapshot().lessons_for(weekday).to_vec()
    }

    /// Bumped on every successful replacement.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }
}

/// Check every day of `schedule`, collecting all issues.
pub fn validate(schedule: &WeeklySchedule) -> Result<(), ScheduleValidationError> {
    let mut issues = Vec::new();
    for (weekday, lessons) in schedule.days() {
        validate_day(weekday, lessons.iter().enumerate(), &mut issues);
    }
    if issues.is_empty() {
        Ok(())
    } else {
        Err(ScheduleValidationError { issues })
    }
}

/// Validate one day's slots, given with their submitted positions.
///
/// A slot is compared against the closest preceding *well-formed* slot, so
/// one broken entry does not cascade into ordering errors for the rest.
pub(crate) fn validate_day<'a>(
    weekday: Weekday,
    slots: impl Iterator<Item = (usize, &'a LessonSlot)>,
    issues: &mut Vec<SlotIssue>,
) {
    let mut previous: Option<(usize, &LessonSlot)> = None;
    for (index, slot) in slots {
        let issue = |kind| SlotIssue {
            weekday,
            index,
            subject: slot.subject.clone(),
            kind,
        };

        if slot.start_minute >= MINUTES_PER_DAY || slot.end_minute >= MINUTES_PER_DAY {
            issues.push(issue(IssueKind::OutOfRange {
                start: slot.start_minute,
                end: slot.end_minute,
            }));
            continue;
        }
        if slot.start_minute >= slot.end_minute {
            issues.push(issue(IssueKind::StartNotBeforeEnd {
                start: slot.start_minute,
                end: slot.end_minute,
            }));
            continue;
        }
        if let Some((prev_index, prev)) = previous {
            if slot.start_minute < prev.start_minute {
                issues.push(issue(IssueKind::Unordered {
                    previous: prev_index,
                }));
                continue;
            }
            // Inclusive ranges: touching slots share their boundary minute.
            if slot.start_minute <= prev.end_minute {
                issues.push(issue(IssueKind::Overlap {
                    previous: prev_index,
                }));
                continue;
            }
        }
        previous = Some((index, slot));
    }
}
