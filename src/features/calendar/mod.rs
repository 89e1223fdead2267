//! Calendar sync for tasks with due dates.
//!
//! When a task is created with a due date, a one-hour event is pushed to a
//! calendar webhook. Sync never fails task creation.

mod event;
mod notifier;

pub use event::{CalendarEvent, EventTime};
pub use notifier::{
    notifier_from_config, notify_quietly, CalendarNotifier, LogNotifier, NotifyError,
    WebhookNotifier,
};

#[cfg(test)]
pub use notifier::MockCalendarNotifier;
