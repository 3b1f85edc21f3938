use std::fmt;
use std::str::FromStr;

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::error::UnknownWeekdayError;

/// Day of the week, Sunday first like the timetable files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Sunday,
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
    ];

    /// Weekday of a calendar date (or date-time).
    pub fn of<D: Datelike>(date: &D) -> Self {
        Self::from_index(date.weekday().num_days_from_sunday())
    }

    /// 0 = Sunday ... 6 = Saturday, wrapping.
    pub fn from_index(index: u32) -> Self {
        Self::ALL[(index % 7) as usize]
    }

    pub fn index(self) -> u32 {
        self as u32
    }

    /// The following day, Saturday wraps to Sunday.
    pub fn succ(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    pub fn name(self) -> &'static str {
        match self {
            Weekday::Sunday => "Sunday",
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Weekday {
    type Err = UnknownWeekdayError;

    /// Accepts English names and three-letter abbreviations in any case,
    /// plus the `星期一` .. `星期日` keys older timetable exports use.
    fn from_str(key: &str) -> Result<Self, Self::Err> {
        let trimmed = key.trim();
        let day = match trimmed {
            "星期日" | "星期天" => Some(Weekday::Sunday),
            "星期一" => Some(Weekday::Monday),
            "星期二" => Some(Weekday::Tuesday),
            "星期三" => Some(Weekday::Wednesday),
            "星期四" => Some(Weekday::Thursday),
            "星期五" => Some(Weekday::Friday),
            "星期六" => Some(Weekday::Saturday),
            _ => match trimmed.to_ascii_lowercase().as_str() {
                "sunday" | "sun" => Some(Weekday::Sunday),
                "monday" | "mon" => Some(Weekday::Monday),
                "tuesday" | "tue" => Some(Weekday::Tuesday),
                "wednesday" | "wed" => Some(Weekday::Wednesday),
                "thursday" | "thu" => Some(Weekday::Thursday),
                "friday" | "fri" => Some(Weekday::Friday),
                "saturday" | "sat" => Some(Weekday::Saturday),
                _ => None,
            },
        };
        day.ok_or_else(|| UnknownWeekdayError(key.to_string()))
    }
}
