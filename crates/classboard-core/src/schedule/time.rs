//! `HH:MM` and `HH:MM-HH:MM` tokens.
//!
//! Every field is checked before arithmetic: a token like `8:x0` is a
//! [`TimeParseError`], never a garbage minute value.

use crate::error::TimeParseError;

pub const MINUTES_PER_DAY: u16 = 1440;

/// Parse `H:MM` or `HH:MM` into minute-of-day.
pub fn parse_clock(text: &str) -> Result<u16, TimeParseError> {
    let token = text.trim();
    let malformed = || TimeParseError::Malformed {
        text: token.to_string(),
    };

    let (hours, minutes) = token.split_once(':').ok_or_else(malformed)?;
    let hours_ok = (1..=2).contains(&hours.len()) && hours.bytes().all(|b| b.is_ascii_digit());
    let minutes_ok = minutes.len() == 2 && minutes.bytes().all(|b| b.is_ascii_digit());
    if !hours_ok || !minutes_ok {
        return Err(malformed());
    }

    let hours: u32 = hours.parse().map_err(|_| malformed())?;
    let minutes: u32 = minutes.parse().map_err(|_| malformed())?;
    if hours >= 24 || minutes >= 60 {
        return Err(TimeParseError::OutOfRange { hours, minutes });
    }
    Ok((hours * 60 + minutes) as u16)
}

/// Parse `HH:MM-HH:MM` into `(start_minute, end_minute)`.
///
/// Ordering of the two bounds is left to schedule validation.
pub fn parse_range(text: &str) -> Result<(u16, u16), TimeParseError> {
    let (start, end) = text
        .split_once('-')
        .ok_or_else(|| TimeParseError::MissingSeparator {
            text: text.trim().to_string(),
        })?;
    Ok((parse_clock(start)?, parse_clock(end)?))
}

/// Minute-of-day back to `HH:MM`.
pub fn format_clock(minute: u16) -> String {
    format!("{:02}:{:02}", minute / 60, minute % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_padded_and_unpadded_hours() {
        assert_eq!(parse_clock("08:00"), Ok(480));
        assert_eq!(parse_clock("8:05"), Ok(485));
        assert_eq!(parse_clock(" 23:59 "), Ok(1439));
        assert_eq!(parse_clock("00:00"), Ok(0));
    }

    #[test]
    fn rejects_non_digits() {
        for bad in ["8:x0", "ab:cd", "+8:00", "08:0", "080:00", "0800", "", ":30"] {
            assert!(
                matches!(parse_clock(bad), Err(TimeParseError::Malformed { .. })),
                "{bad:?} should be malformed"
            );
        }
    }

    #[test]
    fn rejects_out_of_range() {
        assert_eq!(
            parse_clock("24:00"),
            Err(TimeParseError::OutOfRange { hours: 24, minutes: 0 })
        );
        assert_eq!(
            parse_clock("12:60"),
            Err(TimeParseError::OutOfRange { hours: 12, minutes: 60 })
        );
    }

    #[test]
    fn parses_range() {
        assert_eq!(parse_range("08:00-08:45"), Ok((480, 525)));
        assert_eq!(parse_range("14:00 - 14:45"), Ok((840, 885)));
    }

    #[test]
    fn range_without_separator() {
        assert_eq!(
            parse_range("08:00 08:45"),
            Err(TimeParseError::MissingSeparator {
                text: "08:00 08:45".into()
            })
        );
    }

    #[test]
    fn formats_clock() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(485), "08:05");
        assert_eq!(format_clock(1439), "23:59");
    }
}
