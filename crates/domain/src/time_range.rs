// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::normalize::fold_full_width;
use serde::{Deserialize, Serialize};
use time::macros::format_description;
use time::{Date, Month, Time};

/// A same-day interval of wall-clock time.
///
/// The end is always strictly after the start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeRange {
    start: Time,
    end: Time,
}

impl TimeRange {
    /// Creates a new time range.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTimeRange` if `end` is not after `start`.
    pub fn new(start: Time, end: Time) -> Result<Self, DomainError> {
        if end <= start {
            return Err(DomainError::InvalidTimeRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Returns the start of the range.
    #[must_use]
    pub const fn start(&self) -> Time {
        self.start
    }

    /// Returns the end of the range.
    #[must_use]
    pub const fn end(&self) -> Time {
        self.end
    }

    /// Returns whether `other` lies entirely within this range.
    #[must_use]
    pub fn contains(&self, other: &Self) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Returns the smallest range covering both ranges.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

impl std::fmt::Display for TimeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", format_time(self.start), format_time(self.end))
    }
}

/// Formats a date as `YYYY-MM-DD`.
#[must_use]
pub fn format_date(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

/// Formats a time as `HH:MM`.
#[must_use]
pub fn format_time(time: Time) -> String {
    format!("{:02}:{:02}", time.hour(), time.minute())
}

/// Parses a stored `YYYY-MM-DD` date.
///
/// # Errors
///
/// Returns `DomainError::InvalidDate` if the value is not in that format.
pub fn parse_iso_date(value: &str) -> Result<Date, DomainError> {
    Date::parse(value.trim(), format_description!("[year]-[month]-[day]")).map_err(|e| {
        DomainError::InvalidDate {
            input: value.to_string(),
            reason: e.to_string(),
        }
    })
}

/// Parses a stored `HH:MM` time.
///
/// # Errors
///
/// Returns `DomainError::InvalidTime` if the value is not in that format.
pub fn parse_clock_time(value: &str) -> Result<Time, DomainError> {
    Time::parse(value.trim(), format_description!("[hour]:[minute]"))
        .map_err(|_| DomainError::InvalidTime(value.to_string()))
}

/// Parses a date typed by a user.
///
/// Accepts `YYYY-MM-DD`, `YYYY/MM/DD`, `MM/DD`, `M月D日`, and the words
/// today/tomorrow in English or Japanese. Full-width digits are accepted.
/// A month/day without a year resolves to the next occurrence on or after
/// `today`.
///
/// # Arguments
///
/// * `input` - The raw user text
/// * `today` - The current local day
///
/// # Errors
///
/// Returns `DomainError::InvalidDate` if the input cannot be read as a date.
pub fn parse_date_input(input: &str, today: Date) -> Result<Date, DomainError> {
    let folded: String = fold_full_width(input);
    let text: String = folded.trim().to_lowercase();
    let invalid = |reason: &str| DomainError::InvalidDate {
        input: input.to_string(),
        reason: reason.to_string(),
    };

    match text.as_str() {
        "today" | "今日" | "きょう" => return Ok(today),
        "tomorrow" | "明日" | "あした" => {
            return today.next_day().ok_or_else(|| invalid("date out of range"));
        }
        _ => {}
    }

    let unified: String = text
        .replace('年', "/")
        .replace('月', "/")
        .replace('日', "")
        .replace('-', "/");
    let parts: Vec<&str> = unified.split('/').map(str::trim).collect();

    let parse_number = |part: &str| -> Result<u16, DomainError> {
        part.parse::<u16>()
            .map_err(|_| invalid("expected YYYY-MM-DD or MM/DD"))
    };

    let (year, month, day, explicit_year) = match parts.as_slice() {
        [y, m, d] => (
            i32::from(parse_number(y)?),
            parse_number(m)?,
            parse_number(d)?,
            true,
        ),
        [m, d] => (today.year(), parse_number(m)?, parse_number(d)?, false),
        _ => return Err(invalid("expected YYYY-MM-DD or MM/DD")),
    };

    let month: Month = u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .ok_or_else(|| invalid("month must be between 1 and 12"))?;
    let day: u8 = u8::try_from(day).map_err(|_| invalid("day is out of range"))?;

    let date: Date = Date::from_calendar_date(year, month, day)
        .map_err(|e| invalid(&e.to_string()))?;

    if !explicit_year && date < today {
        return Date::from_calendar_date(year + 1, month, day)
            .map_err(|e| invalid(&e.to_string()));
    }
    Ok(date)
}

/// Rejects dates before the current local day.
///
/// # Errors
///
/// Returns `DomainError::PastDate` if `date` is before `today`.
pub fn ensure_not_past(date: Date, today: Date) -> Result<(), DomainError> {
    if date < today {
        return Err(DomainError::PastDate { date, today });
    }
    Ok(())
}

/// Parses a time typed by a user.
///
/// Accepts `H:MM`, `HH:MM`, a bare hour, and `H時` / `H時M分`.
///
/// # Errors
///
/// Returns `DomainError::InvalidTime` if the input cannot be read as a time.
pub fn parse_time_input(input: &str) -> Result<Time, DomainError> {
    let folded: String = fold_full_width(input);
    let text: String = folded.trim().replace('時', ":").replace('分', "");
    let text: &str = text.trim_end_matches(':');
    let invalid = || DomainError::InvalidTime(input.trim().to_string());

    let (hour, minute) = match text.split_once(':') {
        Some((h, m)) => (h.trim(), m.trim()),
        None => (text.trim(), "0"),
    };
    let hour: u8 = hour.parse().map_err(|_| invalid())?;
    let minute: u8 = minute.parse().map_err(|_| invalid())?;
    Time::from_hms(hour, minute, 0).map_err(|_| invalid())
}

/// Parses a time range typed by a user, such as `18:00-20:00`.
///
/// The separator may be `-`, `~` or `〜`, in half or full width.
///
/// # Errors
///
/// Returns `DomainError::InvalidTime` if either side cannot be read, or
/// `DomainError::InvalidTimeRange` if the end is not after the start.
pub fn parse_time_range_input(input: &str) -> Result<TimeRange, DomainError> {
    let folded: String = fold_full_width(input);
    let (start, end) = folded
        .split_once(['-', '~', '〜'])
        .ok_or_else(|| DomainError::InvalidTime(input.trim().to_string()))?;
    TimeRange::new(parse_time_input(start)?, parse_time_input(end)?)
}
