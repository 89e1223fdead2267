//! Calendar notifiers.
//!
//! A notifier is told about every task created with a due date. Delivery is
//! fire-and-forget: callers go through [`notify_quietly`], which logs
//! failures and never hands them back.

use std::time::Duration;

use chrono::DateTime;
use chrono_tz::Tz;
use thiserror::Error;
use tracing::{info, warn};

use super::event::CalendarEvent;
use crate::config::CalendarConfig;

/// Errors from delivering a calendar event.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// The calendar service could not be reached.
    #[error("calendar service unavailable: {0}")]
    Unavailable(String),

    /// The calendar service answered with an error status.
    #[error("calendar service rejected event (HTTP {status}): {body}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly empty.
        body: String,
    },

    /// The event could not be encoded.
    #[error("failed to encode calendar event: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Something that can put a task on a calendar.
#[cfg_attr(test, mockall::automock)]
pub trait CalendarNotifier {
    /// Push a task due at `due_at` to the calendar.
    ///
    /// # Errors
    ///
    /// Returns a `NotifyError` if the event could not be delivered.
    fn notify(&self, title: &str, due_at: &DateTime<Tz>) -> Result<(), NotifyError>;
}

/// Event settings shared by notifiers.
#[derive(Debug, Clone)]
struct EventSettings {
    duration_minutes: u32,
    description: String,
    calendar_id: Option<String>,
}

impl EventSettings {
    fn from_config(config: &CalendarConfig) -> Self {
        Self {
            duration_minutes: config.event_duration_minutes,
            description: config.description.clone(),
            calendar_id: config.calendar_id.clone(),
        }
    }

    fn event(&self, title: &str, due_at: &DateTime<Tz>) -> CalendarEvent {
        CalendarEvent::for_task(
            title,
            due_at,
            self.duration_minutes,
            &self.description,
            self.calendar_id.as_deref(),
        )
    }
}

/// Posts events as JSON to a webhook URL.
pub struct WebhookNotifier {
    url: String,
    agent: ureq::Agent,
    settings: EventSettings,
}

impl WebhookNotifier {
    /// Create a notifier posting to `url` with the config's timeouts.
    #[must_use]
    pub fn new(url: &str, config: &CalendarConfig) -> Self {
        let timeout = Duration::from_secs(config.timeout_secs.max(1));
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(timeout)
            .timeout_read(timeout)
            .timeout_write(timeout)
            .build();

        Self {
            url: url.to_string(),
            agent,
            settings: EventSettings::from_config(config),
        }
    }
}

impl CalendarNotifier for WebhookNotifier {
    fn notify(&self, title: &str, due_at: &DateTime<Tz>) -> Result<(), NotifyError> {
        let event = self.settings.event(title, due_at);
        let body = serde_json::to_string(&event)?;

        match self
            .agent
            .post(&self.url)
            .set("Content-Type", "application/json")
            .send_string(&body)
        {
            Ok(_) => {
                info!(title, url = %self.url, "calendar event delivered");
                Ok(())
            },
            Err(ureq::Error::Status(status, response)) => Err(NotifyError::Rejected {
                status,
                body: response.into_string().unwrap_or_default(),
            }),
            Err(ureq::Error::Transport(transport)) => {
                Err(NotifyError::Unavailable(transport.to_string()))
            },
        }
    }
}

/// Logs events instead of delivering them. Used when no webhook is set.
#[derive(Debug, Clone)]
pub struct LogNotifier {
    settings: EventSettings,
}

impl LogNotifier {
    /// Create a log notifier using the config's event settings.
    #[must_use]
    pub fn new(config: &CalendarConfig) -> Self {
        Self {
            settings: EventSettings::from_config(config),
        }
    }
}

impl CalendarNotifier for LogNotifier {
    fn notify(&self, title: &str, due_at: &DateTime<Tz>) -> Result<(), NotifyError> {
        let event = self.settings.event(title, due_at);
        info!(
            summary = %event.summary,
            start = %event.start.date_time,
            end = %event.end.date_time,
            "calendar event (no webhook configured)"
        );
        Ok(())
    }
}

/// Build the notifier described by `config`, or `None` when sync is off.
#[must_use]
pub fn notifier_from_config(config: &CalendarConfig) -> Option<Box<dyn CalendarNotifier>> {
    if !config.enabled {
        return None;
    }

    match config.webhook_url.as_deref().map(str::trim) {
        Some(url) if !url.is_empty() => Some(Box::new(WebhookNotifier::new(url, config))),
        _ => Some(Box::new(LogNotifier::new(config))),
    }
}

/// Notify once, logging any failure. Returns whether delivery succeeded.
pub fn notify_quietly(
    notifier: &dyn CalendarNotifier,
    title: &str,
    due_at: &DateTime<Tz>,
) -> bool {
    match notifier.notify(title, due_at) {
        Ok(()) => true,
        Err(e) => {
            warn!(title, error = %e, "calendar sync failed");
            false
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::thread::{self, JoinHandle};

    fn due() -> DateTime<Tz> {
        Tz::UTC.with_ymd_and_hms(2025, 1, 2, 17, 0, 0).unwrap()
    }

    /// Serve one HTTP request with `status_line`, returning the request body.
    fn one_shot_server(status_line: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/events", listener.local_addr().unwrap());

        let handle = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());

            let mut content_length = 0usize;
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                if line == "\r\n" || line.is_empty() {
                    break;
                }
                if let Some((name, value)) = line.split_once(':') {
                    if name.eq_ignore_ascii_case("content-length") {
                        content_length = value.trim().parse().unwrap();
                    }
                }
            }

            let mut body = vec![0; content_length];
            reader.read_exact(&mut body).unwrap();

            let mut stream = stream;
            let reply = "nope";
            write!(
                stream,
                "{status_line}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{reply}",
                reply.len()
            )
            .unwrap();
            stream.flush().unwrap();

            String::from_utf8(body).unwrap()
        });

        (url, handle)
    }

    #[test]
    fn test_webhook_delivers_event() {
        let (url, server) = one_shot_server("HTTP/1.1 200 OK");
        let notifier = WebhookNotifier::new(&url, &CalendarConfig::default());

        notifier.notify("Submit report", &due()).unwrap();

        let body: serde_json::Value = serde_json::from_str(&server.join().unwrap()).unwrap();
        assert_eq!(body["summary"], "Submit report");
        assert_eq!(body["start"]["dateTime"], "2025-01-02T17:00:00+00:00");
        assert_eq!(body["end"]["dateTime"], "2025-01-02T18:00:00+00:00");
    }

    #[test]
    fn test_webhook_rejected() {
        let (url, server) = one_shot_server("HTTP/1.1 500 Internal Server Error");
        let notifier = WebhookNotifier::new(&url, &CalendarConfig::default());

        let err = notifier.notify("Submit report", &due()).unwrap_err();
        server.join().unwrap();

        match err {
            NotifyError::Rejected { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "nope");
            },
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn test_webhook_unavailable() {
        // Bind then drop to get a port nothing listens on.
        let port = TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let notifier = WebhookNotifier::new(
            &format!("http://127.0.0.1:{port}/events"),
            &CalendarConfig::default(),
        );

        let err = notifier.notify("x", &due()).unwrap_err();
        assert!(matches!(err, NotifyError::Unavailable(_)));
    }

    #[test]
    fn test_notify_quietly_swallows_errors() {
        let mut mock = MockCalendarNotifier::new();
        mock.expect_notify()
            .times(1)
            .returning(|_, _| Err(NotifyError::Unavailable("offline".to_string())));

        assert!(!notify_quietly(&mock, "x", &due()));
    }

    #[test]
    fn test_notify_quietly_reports_success() {
        let mut mock = MockCalendarNotifier::new();
        mock.expect_notify()
            .withf(|title, _| title == "Submit report")
            .times(1)
            .returning(|_, _| Ok(()));

        assert!(notify_quietly(&mock, "Submit report", &due()));
    }

    #[test]
    fn test_notifier_from_config() {
        let mut config = CalendarConfig::default();
        assert!(notifier_from_config(&config).is_some());

        config.enabled = false;
        assert!(notifier_from_config(&config).is_none());
    }

    #[test]
    fn test_log_notifier_always_succeeds() {
        let notifier = LogNotifier::new(&CalendarConfig::default());
        assert!(notifier.notify("x", &due()).is_ok());
    }
}
