//! Task creation and lifecycle.
//!
//! Creating a task runs the title through the interpreter, stores the
//! result, then pushes it to the calendar if it has a due date. The record
//! is committed before the calendar is contacted, and a calendar failure
//! only shows up in the outcome and the log.

use chrono::{DateTime, Offset};
use chrono_tz::Tz;
use serde::Serialize;
use tracing::info;

use super::types::{NewTask, Status, Task};
use crate::error::SmartdoError;
use crate::features::calendar::{notify_quietly, CalendarNotifier};
use crate::features::nlp::{Interpretation, Interpreter, Priority};
use crate::storage::Database;

/// What happened with calendar sync for a new task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CalendarSync {
    /// The task has no due date.
    NotNeeded,
    /// Calendar sync is turned off.
    Disabled,
    /// The event was delivered.
    Delivered,
    /// Delivery failed; the task was still created.
    Failed,
}

/// Result of creating a task.
#[derive(Debug, Clone)]
pub struct CreateOutcome {
    /// The stored task.
    pub task: Task,
    /// How the title was read.
    pub interpretation: Interpretation,
    /// Calendar sync result.
    pub calendar: CalendarSync,
}

/// Interpret `raw` as a new task would be, without touching the store.
///
/// # Errors
///
/// Returns `SmartdoError::EmptyTitle` for blank input and
/// `SmartdoError::InvalidDate` for impossible dates.
pub fn preview(
    interpreter: &Interpreter,
    raw: &str,
    reference: &DateTime<Tz>,
    default_priority: Priority,
) -> Result<Interpretation, SmartdoError> {
    if raw.trim().is_empty() {
        return Err(SmartdoError::EmptyTitle);
    }
    interpreter.interpret(raw, reference, default_priority)
}

/// Creates and manages tasks.
pub struct TaskService {
    db: Database,
    interpreter: Interpreter,
    notifier: Option<Box<dyn CalendarNotifier>>,
}

impl TaskService {
    /// Create a service over `db`.
    #[must_use]
    pub fn new(
        db: Database,
        interpreter: Interpreter,
        notifier: Option<Box<dyn CalendarNotifier>>,
    ) -> Self {
        Self {
            db,
            interpreter,
            notifier,
        }
    }

    /// Create a task from free text.
    ///
    /// # Errors
    ///
    /// Returns `SmartdoError::EmptyTitle` for blank input,
    /// `SmartdoError::InvalidDate` for impossible dates, or a database error.
    /// Calendar failures are never returned.
    pub fn create(
        &self,
        raw: &str,
        reference: &DateTime<Tz>,
        default_priority: Priority,
        description: Option<String>,
    ) -> Result<CreateOutcome, SmartdoError> {
        let interpretation = preview(&self.interpreter, raw, reference, default_priority)?;

        let new_task = NewTask::new(&interpretation.title, interpretation.priority)
            .with_description(description)
            .with_due(
                interpretation
                    .due_at
                    .map(|due| due.with_timezone(&due.offset().fix())),
            );
        let task = self.db.insert_task(&new_task)?;
        info!(id = task.id, title = %task.title, priority = %task.priority, "task created");

        let calendar = match (&interpretation.due_at, &self.notifier) {
            (None, _) => CalendarSync::NotNeeded,
            (Some(_), None) => CalendarSync::Disabled,
            (Some(due_at), Some(notifier)) => {
                if notify_quietly(notifier.as_ref(), &task.title, due_at) {
                    CalendarSync::Delivered
                } else {
                    CalendarSync::Failed
                }
            },
        };

        Ok(CreateOutcome {
            task,
            interpretation,
            calendar,
        })
    }

    /// Fetch a task.
    ///
    /// # Errors
    ///
    /// Returns `SmartdoError::NotFound` if no task has this id.
    pub fn get(&self, id: i64) -> Result<Task, SmartdoError> {
        self.db.get_task(id)
    }

    /// List tasks, optionally by status.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list(&self, status: Option<Status>) -> Result<Vec<Task>, SmartdoError> {
        self.db.list_tasks(status)
    }

    /// Mark a task completed.
    ///
    /// # Errors
    ///
    /// Returns `SmartdoError::NotFound` if no task has this id.
    pub fn complete(&self, id: i64) -> Result<Task, SmartdoError> {
        self.db.set_status(id, Status::Completed)
    }

    /// Mark a task pending again.
    ///
    /// # Errors
    ///
    /// Returns `SmartdoError::NotFound` if no task has this id.
    pub fn reopen(&self, id: i64) -> Result<Task, SmartdoError> {
        self.db.set_status(id, Status::Pending)
    }

    /// Delete a task, returning it as it was.
    ///
    /// # Errors
    ///
    /// Returns `SmartdoError::NotFound` if no task has this id.
    pub fn delete(&self, id: i64) -> Result<Task, SmartdoError> {
        let task = self.db.get_task(id)?;
        self.db.delete_task(id)?;
        info!(id, "task deleted");
        Ok(task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::calendar::{MockCalendarNotifier, NotifyError};
    use chrono::{TimeZone, Timelike};

    fn now() -> DateTime<Tz> {
        Tz::UTC.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
    }

    fn service(notifier: Option<MockCalendarNotifier>) -> TaskService {
        TaskService::new(
            Database::open_in_memory().unwrap(),
            Interpreter::default(),
            notifier.map(|n| Box::new(n) as Box<dyn CalendarNotifier>),
        )
    }

    #[test]
    fn test_create_with_due_notifies_once() {
        let mut mock = MockCalendarNotifier::new();
        mock.expect_notify()
            .withf(|title, due| title == "Submit report" && due.hour() == 17)
            .times(1)
            .returning(|_, _| Ok(()));
        let service = service(Some(mock));

        let outcome = service
            .create("Submit report tomorrow at 5pm", &now(), Priority::Medium, None)
            .unwrap();

        assert_eq!(outcome.task.title, "Submit report");
        assert_eq!(outcome.task.priority, Priority::Medium);
        assert_eq!(
            outcome.task.due_at.unwrap().to_rfc3339(),
            "2025-01-02T17:00:00+00:00"
        );
        assert_eq!(outcome.calendar, CalendarSync::Delivered);
    }

    #[test]
    fn test_notifier_failure_does_not_fail_create() {
        let mut mock = MockCalendarNotifier::new();
        mock.expect_notify()
            .times(1)
            .returning(|_, _| Err(NotifyError::Unavailable("offline".to_string())));
        let service = service(Some(mock));

        let outcome = service
            .create("Urgent: fix bug by 9:30am", &now(), Priority::Medium, None)
            .unwrap();

        assert_eq!(outcome.calendar, CalendarSync::Failed);
        assert_eq!(outcome.task.priority, Priority::High);
        // The record is committed regardless.
        assert_eq!(service.get(outcome.task.id).unwrap().title, "Urgent: fix bug");
    }

    #[test]
    fn test_no_due_no_notification() {
        let mut mock = MockCalendarNotifier::new();
        mock.expect_notify().times(0);
        let service = service(Some(mock));

        let outcome = service
            .create("Pay rent on 23 mar 2026", &now(), Priority::Medium, None)
            .unwrap();

        assert!(outcome.task.due_at.is_none());
        assert!(outcome.interpretation.date_without_time);
        assert_eq!(outcome.calendar, CalendarSync::NotNeeded);
    }

    #[test]
    fn test_disabled_calendar() {
        let service = service(None);
        let outcome = service
            .create("deploy 23.05.26 at 14:00", &now(), Priority::Low, None)
            .unwrap();
        assert_eq!(outcome.calendar, CalendarSync::Disabled);
        assert_eq!(outcome.task.priority, Priority::Low);
    }

    #[test]
    fn test_blank_input_rejected() {
        let service = service(None);
        assert!(matches!(
            service.create("   ", &now(), Priority::Medium, None),
            Err(SmartdoError::EmptyTitle)
        ));
    }

    #[test]
    fn test_invalid_date_stores_nothing() {
        let service = service(None);
        let err = service
            .create("report 31 apr 2026 5pm", &now(), Priority::Medium, None)
            .unwrap_err();
        assert!(matches!(err, SmartdoError::InvalidDate(_)));
        assert!(service.list(None).unwrap().is_empty());
    }

    #[test]
    fn test_description_is_stored() {
        let service = service(None);
        let outcome = service
            .create("call mom", &now(), Priority::Medium, Some("about the trip".to_string()))
            .unwrap();
        assert_eq!(outcome.task.description.as_deref(), Some("about the trip"));
    }

    #[test]
    fn test_lifecycle() {
        let service = service(None);
        let id = service
            .create("water plants", &now(), Priority::Medium, None)
            .unwrap()
            .task
            .id;

        assert!(service.complete(id).unwrap().is_completed());
        assert_eq!(service.list(Some(Status::Completed)).unwrap().len(), 1);
        assert!(!service.reopen(id).unwrap().is_completed());

        let deleted = service.delete(id).unwrap();
        assert_eq!(deleted.title, "water plants");
        assert!(matches!(service.get(id), Err(SmartdoError::NotFound(_))));
    }

    #[test]
    fn test_standalone_preview() {
        let interpreter = Interpreter::new(vec!["blocker".to_string()]);
        let preview = preview(&interpreter, "release blocker today 3pm", &now(), Priority::Low)
            .unwrap();
        assert_eq!(preview.title, "release blocker");
        assert_eq!(preview.priority, Priority::High);
        assert_eq!(preview.due_at.unwrap().hour(), 15);

        assert!(matches!(
            super::preview(&interpreter, " \t ", &now(), Priority::Medium),
            Err(SmartdoError::EmptyTitle)
        ));
    }
}
