//! Task records and the service that creates them from free text.

mod service;
mod types;

pub use service::{preview, CalendarSync, CreateOutcome, TaskService};
pub use types::{NewTask, Status, Task, MAX_TITLE_CHARS};
