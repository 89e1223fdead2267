//! Date and time utilities.
//!
//! Everything here takes its timezone explicitly. The reference instant of a
//! parse is a `DateTime<Tz>`, so relative words like "today" always resolve
//! against the caller's zone rather than the machine's.

use chrono::{DateTime, FixedOffset, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::SmartdoError;

/// Display format for due dates, e.g. `Jan 02 2025, 05:00 PM`.
pub const DUE_DISPLAY_FORMAT: &str = "%b %d %Y, %I:%M %p";

/// Resolve an IANA timezone name such as `Europe/Berlin`.
///
/// # Errors
///
/// Returns `SmartdoError::InvalidTimezone` if the name is unknown.
pub fn resolve_timezone(name: &str) -> Result<Tz, SmartdoError> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| SmartdoError::InvalidTimezone(name.to_string()))
}

/// The current instant, viewed in `tz`.
#[must_use]
pub fn now_in(tz: Tz) -> DateTime<Tz> {
    Utc::now().with_timezone(&tz)
}

/// Parse a reference instant given on the command line.
///
/// Accepts RFC 3339 (`2025-01-01T09:00:00+02:00`), which is converted into
/// `tz`, or a naive local timestamp (`2025-01-01T09:00` / `2025-01-01 09:00`)
/// which is interpreted in `tz`.
///
/// # Errors
///
/// Returns `SmartdoError::InvalidDate` if the input matches neither form or
/// names a local time that does not exist in `tz`.
pub fn parse_reference(input: &str, tz: Tz) -> Result<DateTime<Tz>, SmartdoError> {
    let input = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&tz));
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, fmt) {
            return localize(tz, naive);
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return localize(tz, date.and_time(NaiveTime::MIN));
    }

    Err(SmartdoError::InvalidDate(format!(
        "unrecognized reference time '{input}'"
    )))
}

/// Build a calendar date, failing instead of clamping impossible days.
///
/// # Errors
///
/// Returns `SmartdoError::InvalidDate` for dates like 31 April or month 13.
pub fn build_date(year: i32, month: u32, day: u32) -> Result<NaiveDate, SmartdoError> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        SmartdoError::InvalidDate(format!("{year:04}-{month:02}-{day:02} is not a calendar day"))
    })
}

/// Attach `tz` to a wall-clock timestamp.
///
/// Ambiguous times (clocks going back) resolve to the earlier instant.
///
/// # Errors
///
/// Returns `SmartdoError::InvalidDate` when the wall-clock time is skipped
/// by a daylight saving transition.
pub fn localize(tz: Tz, naive: NaiveDateTime) -> Result<DateTime<Tz>, SmartdoError> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Ok(dt),
        LocalResult::Ambiguous(earliest, _) => Ok(earliest),
        LocalResult::None => Err(SmartdoError::InvalidDate(format!(
            "{} does not exist in {}",
            naive.format("%Y-%m-%d %H:%M"),
            tz.name()
        ))),
    }
}

/// Render a due date for humans, e.g. `Jan 02 2025, 05:00 PM`.
#[must_use]
pub fn format_due<T: TimeZone>(due_at: &DateTime<T>) -> String
where
    T::Offset: std::fmt::Display,
{
    due_at.format(DUE_DISPLAY_FORMAT).to_string()
}

/// Render a stored due date in `tz`, or an empty string when there is none.
#[must_use]
pub fn format_due_opt(due_at: Option<&DateTime<FixedOffset>>, tz: Tz) -> String {
    due_at.map_or_else(String::new, |due| format_due(&due.with_timezone(&tz)))
}
