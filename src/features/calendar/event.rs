//! Calendar event payload.

use chrono::{DateTime, Duration};
use chrono_tz::Tz;
use serde::Serialize;

/// A point in time as calendar APIs expect it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventTime {
    /// RFC 3339 timestamp with offset.
    pub date_time: String,
    /// IANA zone the timestamp was written in.
    pub time_zone: String,
}

impl EventTime {
    fn from_datetime(dt: &DateTime<Tz>) -> Self {
        Self {
            date_time: dt.to_rfc3339(),
            time_zone: dt.timezone().name().to_string(),
        }
    }
}

/// The event pushed for a task with a due date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    /// Target calendar, when the receiving side needs one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calendar_id: Option<String>,
    /// Event title (the cleaned task title).
    pub summary: String,
    /// Free text shown in the event body.
    pub description: String,
    /// Start of the event: the task's due instant.
    pub start: EventTime,
    /// End of the event.
    pub end: EventTime,
}

impl CalendarEvent {
    /// Build an event starting at `due_at` and lasting `duration_minutes`.
    #[must_use]
    pub fn for_task(
        title: &str,
        due_at: &DateTime<Tz>,
        duration_minutes: u32,
        description: &str,
        calendar_id: Option<&str>,
    ) -> Self {
        let end = *due_at + Duration::minutes(i64::from(duration_minutes));

        Self {
            calendar_id: calendar_id.map(str::to_string),
            summary: title.to_string(),
            description: description.to_string(),
            start: EventTime::from_datetime(due_at),
            end: EventTime::from_datetime(&end),
        }
    }
}
