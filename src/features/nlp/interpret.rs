//! Turning a raw task title into title, due date and priority in one call.

use chrono::DateTime;
use chrono_tz::Tz;
use serde::Serialize;

use super::parser::{parse, DateSource};
use super::urgency::{classify_with, Priority};
use crate::error::SmartdoError;

/// Everything read from a task title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Interpretation {
    /// Cleaned title.
    pub title: String,
    /// Due instant, if the title carried a clock time.
    pub due_at: Option<DateTime<Tz>>,
    /// Priority after urgency detection.
    pub priority: Priority,
    /// Which rule supplied the date.
    pub date_source: DateSource,
    /// A date was written but dropped for lack of a time.
    pub date_without_time: bool,
}

/// Interprets task titles, with optional extra urgency keywords.
#[derive(Debug, Clone, Default)]
pub struct Interpreter {
    extra_keywords: Vec<String>,
}

impl Interpreter {
    /// Create an interpreter that also treats `extra_keywords` as urgent.
    #[must_use]
    pub fn new(extra_keywords: Vec<String>) -> Self {
        Self { extra_keywords }
    }

    /// Parse `raw` and classify its urgency.
    ///
    /// Urgency is read from the raw text, so keywords count even when they
    /// sit next to the removed date phrase.
    ///
    /// # Errors
    ///
    /// Returns `SmartdoError::InvalidDate` if the text names an impossible date.
    pub fn interpret(
        &self,
        raw: &str,
        reference: &DateTime<Tz>,
        default_priority: Priority,
    ) -> Result<Interpretation, SmartdoError> {
        let parsed = parse(raw, reference)?;
        let date_without_time = parsed.date_without_time();

        Ok(Interpretation {
            title: parsed.title,
            due_at: parsed.due_at,
            priority: classify_with(raw, default_priority, &self.extra_keywords),
            date_source: parsed.date_source,
            date_without_time,
        })
    }
}

/// Interpret a task title with the built-in urgency keywords.
///
/// # Errors
///
/// Returns `SmartdoError::InvalidDate` if the text names an impossible date.
///
/// # Examples
///
/// ```
/// use chrono::TimeZone;
/// use chrono_tz::Tz;
/// use smartdo::features::nlp::{interpret, Priority};
///
/// let now = Tz::UTC.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap();
/// let task = interpret("Urgent: fix bug by 9:30am", &now, Priority::Medium).unwrap();
/// assert_eq!(task.title, "Urgent: fix bug");
/// assert_eq!(task.priority, Priority::High);
/// assert!(task.due_at.is_some());
/// ```
pub fn interpret(
    raw: &str,
    reference: &DateTime<Tz>,
    default_priority: Priority,
) -> Result<Interpretation, SmartdoError> {
    Interpreter::default().interpret(raw, reference, default_priority)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, TimeZone, Timelike};

    fn now() -> DateTime<Tz> {
        Tz::UTC.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_urgent_with_time() {
        let result = interpret("Urgent: fix bug by 9:30am", &now(), Priority::Medium).unwrap();
        assert_eq!(result.priority, Priority::High);
        assert_eq!(result.title, "Urgent: fix bug");
        let due = result.due_at.unwrap();
        assert_eq!((due.month(), due.day(), due.hour(), due.minute()), (6, 1, 9, 30));
    }

    #[test]
    fn test_priority_unchanged_without_keyword() {
        let result = interpret("23.05.26 at 14:00 deploy", &now(), Priority::Medium).unwrap();
        assert_eq!(result.priority, Priority::Medium);
        assert_eq!(result.title, "deploy");

        let result = interpret("water plants", &now(), Priority::Low).unwrap();
        assert_eq!(result.priority, Priority::Low);
    }

    #[test]
    fn test_keyword_in_raw_text_counts() {
        // "deadline" stays in the title and is detected on the raw text.
        let result = interpret("tax deadline on 15 apr 2026 at 11pm", &now(), Priority::Low).unwrap();
        assert_eq!(result.priority, Priority::High);
        assert_eq!(result.title, "tax deadline");
    }

    #[test]
    fn test_date_without_time_flag() {
        let result = interpret("Pay rent on 23 mar 2026", &now(), Priority::Medium).unwrap();
        assert!(result.due_at.is_none());
        assert!(result.date_without_time);
        assert_eq!(result.date_source, DateSource::LongForm);
    }

    #[test]
    fn test_invalid_date_propagates() {
        let err = interpret("urgent 31 jun 2026 9am", &now(), Priority::Medium).unwrap_err();
        assert!(matches!(err, SmartdoError::InvalidDate(_)));
    }

    #[test]
    fn test_extra_keywords() {
        let interpreter = Interpreter::new(vec!["blocker".to_string()]);
        let result = interpreter
            .interpret("Blocker in prod", &now(), Priority::Medium)
            .unwrap();
        assert_eq!(result.priority, Priority::High);
        assert_eq!(result.title, "Blocker prod");
    }
}
