//! Temporal expression parser.
//!
//! Pulls a due date out of task text like "Submit report tomorrow at 5pm".
//! Parsing runs as an ordered list of stages over one working string. Each
//! stage either matches, cutting its span out of the string, or passes. Date
//! stages stop at the first match; the time stage always runs afterwards on
//! whatever is left.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime};
use chrono_tz::Tz;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::Serialize;
use tracing::debug;

use super::normalize::normalize_title;
use crate::core::{build_date, localize};
use crate::error::SmartdoError;

// Only ASCII digits are accepted; `\d` would also match other scripts.

static LONG_DATE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    // "23 mar 2026" / "5 Mar 26"
    Regex::new(
        r"(?i)\b([0-9]{1,2})\s+(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)\s+([0-9]{4}|[0-9]{2})\b",
    )
    .unwrap_or_else(|e| panic!("Invalid long date regex: {e}"))
});

static NUMERIC_DATE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    // "23.05.26" / "1.2.2026"
    Regex::new(r"\b([0-9]{1,2})\.([0-9]{1,2})\.([0-9]{4}|[0-9]{2})\b")
        .unwrap_or_else(|e| panic!("Invalid numeric date regex: {e}"))
});

static TOMORROW_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\btomorrow\b").unwrap_or_else(|e| panic!("Invalid tomorrow regex: {e}"))
});

static TODAY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\btoday\b").unwrap_or_else(|e| panic!("Invalid today regex: {e}"))
});

static TWELVE_HOUR_PATTERN: Lazy<Regex> = Lazy::new(|| {
    // "at 5pm" / "9:30am" / "12 AM"
    Regex::new(r"(?i)\b(?:at\s*)?(1[0-2]|0?[1-9])(?::([0-5][0-9]))?\s*([ap]m)\b")
        .unwrap_or_else(|e| panic!("Invalid 12-hour regex: {e}"))
});

static TWENTY_FOUR_HOUR_PATTERN: Lazy<Regex> = Lazy::new(|| {
    // "at 14:00" / "9:05"
    Regex::new(r"(?i)\b(?:at\s*)?([01]?[0-9]|2[0-3]):([0-5][0-9])\b")
        .unwrap_or_else(|e| panic!("Invalid 24-hour regex: {e}"))
});

/// Where the date of a parse came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DateSource {
    /// "23 mar 2026"
    LongForm,
    /// "23.05.26"
    Numeric,
    /// "tomorrow"
    Tomorrow,
    /// "today"
    Today,
    /// Nothing matched; the reference date was used.
    Reference,
}

/// Result of parsing task text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseResult {
    /// The text with the temporal phrase and connective words removed.
    pub title: String,
    /// The due instant, present only when a time of day was found.
    pub due_at: Option<DateTime<Tz>>,
    /// The date that was resolved, whether or not a time was found.
    pub date: NaiveDate,
    /// Which rule produced `date`.
    pub date_source: DateSource,
}

impl ParseResult {
    /// True when an explicit or relative date matched but no time did, so the
    /// date was dropped.
    #[must_use]
    pub fn date_without_time(&self) -> bool {
        self.due_at.is_none() && self.date_source != DateSource::Reference
    }
}

/// A time of day read from a clock token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TimeOfDay {
    hour: u32,
    minute: u32,
}

impl TimeOfDay {
    /// Convert a 12-hour reading: 12am is midnight, 12pm is noon.
    fn from_meridiem(hour: u32, minute: u32, pm: bool) -> Self {
        let hour = match (hour, pm) {
            (12, false) => 0,
            (12, true) => 12,
            (h, true) => h + 12,
            (h, false) => h,
        };
        Self { hour, minute }
    }

    fn to_naive(self) -> Result<NaiveTime, SmartdoError> {
        NaiveTime::from_hms_opt(self.hour, self.minute, 0).ok_or_else(|| {
            SmartdoError::InvalidDate(format!("{:02}:{:02} is not a time of day", self.hour, self.minute))
        })
    }
}

/// The text being parsed, shrinking as stages consume their matches.
struct WorkingText {
    text: String,
}

impl WorkingText {
    fn new(raw: &str) -> Self {
        Self {
            text: raw.trim().to_string(),
        }
    }

    /// Run `pattern` against the text. On a match, hand the captures to
    /// `extract`, cut the whole match out and return the extracted value.
    fn consume<T>(
        &mut self,
        pattern: &Regex,
        extract: impl FnOnce(&Captures<'_>) -> T,
    ) -> Option<T> {
        let (range, value) = {
            let caps = pattern.captures(&self.text)?;
            let whole = caps.get(0)?;
            debug!(matched = whole.as_str(), "temporal match");
            (whole.range(), extract(&caps))
        };
        self.text.replace_range(range, " ");
        Some(value)
    }

    fn into_inner(self) -> String {
        self.text
    }
}

/// Date rules, highest precedence first.
const DATE_STAGES: [DateSource; 4] = [
    DateSource::LongForm,
    DateSource::Numeric,
    DateSource::Tomorrow,
    DateSource::Today,
];

impl DateSource {
    /// Try this rule against the working text.
    ///
    /// `None` means the rule did not match; `Some(Err)` means it matched an
    /// impossible date.
    fn try_consume(
        self,
        work: &mut WorkingText,
        today: NaiveDate,
    ) -> Option<Result<NaiveDate, SmartdoError>> {
        match self {
            Self::LongForm => work.consume(&LONG_DATE_PATTERN, |caps| {
                let day = capture_number(caps, 1)?;
                let month = month_number(caps.get(2).map_or("", |m| m.as_str()))?;
                let year = capture_number(caps, 3)?;
                build_date(expand_year(year)?, month, day)
            }),
            Self::Numeric => work.consume(&NUMERIC_DATE_PATTERN, |caps| {
                let day = capture_number(caps, 1)?;
                let month = capture_number(caps, 2)?;
                let year = capture_number(caps, 3)?;
                build_date(expand_year(year)?, month, day)
            }),
            Self::Tomorrow => work.consume(&TOMORROW_PATTERN, |_| {
                today
                    .checked_add_signed(Duration::days(1))
                    .ok_or_else(|| SmartdoError::InvalidDate(format!("no day after {today}")))
            }),
            Self::Today => work.consume(&TODAY_PATTERN, |_| Ok(today)),
            Self::Reference => Some(Ok(today)),
        }
    }
}

/// Parse task text against a reference instant.
///
/// Returns the cleaned title and, when the text contains a clock time, the
/// due instant in the reference instant's timezone. A date with no time
/// yields no due instant.
///
/// # Errors
///
/// Returns `SmartdoError::InvalidDate` if an explicit date names a day that
/// does not exist (e.g. "31 apr 2026"), or the resolved wall-clock time is
/// skipped by a daylight saving change.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Timelike};
/// use chrono_tz::Tz;
/// use smartdo::features::nlp::parse;
///
/// let now = Tz::UTC.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
/// let result = parse("Submit report tomorrow at 5pm", &now).unwrap();
/// assert_eq!(result.title, "Submit report");
/// assert_eq!(result.due_at.unwrap().hour(), 17);
/// ```
pub fn parse(raw: &str, reference: &DateTime<Tz>) -> Result<ParseResult, SmartdoError> {
    let today = reference.date_naive();
    let mut work = WorkingText::new(raw);

    let (date, date_source) = resolve_date(&mut work, today)?;
    let time = consume_time(&mut work);

    let due_at = match time {
        Some(time) => Some(localize(reference.timezone(), date.and_time(time.to_naive()?))?),
        None => None,
    };

    debug!(?date_source, %date, due = ?due_at, "parsed temporal expression");

    Ok(ParseResult {
        title: normalize_title(&work.into_inner(), raw),
        due_at,
        date,
        date_source,
    })
}

/// Apply the date rules in order; the first match wins.
fn resolve_date(
    work: &mut WorkingText,
    today: NaiveDate,
) -> Result<(NaiveDate, DateSource), SmartdoError> {
    for stage in DATE_STAGES {
        if let Some(date) = stage.try_consume(work, today) {
            return Ok((date?, stage));
        }
    }
    Ok((today, DateSource::Reference))
}

/// Find a clock time, 12-hour form first.
fn consume_time(work: &mut WorkingText) -> Option<TimeOfDay> {
    let twelve = work.consume(&TWELVE_HOUR_PATTERN, |caps| {
        let hour = capture_number(caps, 1).ok()?;
        let minute = optional_number(caps, 2).ok()?;
        let pm = caps
            .get(3)
            .is_some_and(|m| m.as_str().eq_ignore_ascii_case("pm"));
        Some(TimeOfDay::from_meridiem(hour, minute, pm))
    });
    if let Some(time) = twelve {
        return time;
    }

    work.consume(&TWENTY_FOUR_HOUR_PATTERN, |caps| {
        let hour = capture_number(caps, 1).ok()?;
        let minute = capture_number(caps, 2).ok()?;
        Some(TimeOfDay { hour, minute })
    })
    .flatten()
}

/// Two-digit years land in the 2000s.
fn expand_year(year: u32) -> Result<i32, SmartdoError> {
    let year = if year < 100 { year + 2000 } else { year };
    i32::try_from(year).map_err(|_| SmartdoError::InvalidDate(format!("year {year} out of range")))
}

fn month_number(abbrev: &str) -> Result<u32, SmartdoError> {
    let month = match abbrev.to_ascii_lowercase().as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        other => return Err(SmartdoError::InvalidDate(format!("unknown month '{other}'"))),
    };
    Ok(month)
}

fn capture_number(caps: &Captures<'_>, group: usize) -> Result<u32, SmartdoError> {
    let text = caps.get(group).map_or("", |m| m.as_str());
    text.parse()
        .map_err(|_| SmartdoError::InvalidDate(format!("'{text}' is not a number")))
}

fn optional_number(caps: &Captures<'_>, group: usize) -> Result<u32, SmartdoError> {
    if caps.get(group).is_some() {
        capture_number(caps, group)
    } else {
        Ok(0)
    }
}
