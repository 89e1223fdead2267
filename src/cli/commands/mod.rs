//! Command implementations for smartdo.
//!
//! Each handler returns the text to print; `main` does the printing.

mod add;

pub use add::add;

use chrono_tz::Tz;

use crate::cli::args::OutputFormat;
use crate::config::Config;
use crate::error::SmartdoError;
use crate::features::calendar::notifier_from_config;
use crate::features::nlp::Interpreter;
use crate::output::{format_task, format_tasks};
use crate::storage::Database;
use crate::tasks::{Status, TaskService};

/// Settings shared by every command, resolved from config and global flags.
pub struct Context {
    pub config: Config,
    pub tz: Tz,
    pub format: OutputFormat,
}

impl Context {
    /// Resolve the timezone and output format, flags taking precedence over config.
    ///
    /// # Errors
    ///
    /// Returns `SmartdoError::InvalidTimezone` if the timezone name is unknown.
    pub fn new(
        config: Config,
        timezone: Option<&str>,
        format: Option<OutputFormat>,
    ) -> Result<Self, SmartdoError> {
        let tz = match timezone {
            Some(name) => crate::core::resolve_timezone(name)?,
            None => config.general.tz()?,
        };
        let format = format.unwrap_or(config.general.default_output);
        Ok(Self { config, tz, format })
    }

    /// Interpreter carrying the configured extra urgency keywords.
    #[must_use]
    pub fn interpreter(&self) -> Interpreter {
        Interpreter::new(self.config.nlp.extra_urgent_keywords.clone())
    }

    /// Open the task store, with calendar sync unless `sync` is false.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened.
    pub fn service(&self, sync: bool) -> Result<TaskService, SmartdoError> {
        let db = Database::open()?;
        let interpreter = self.interpreter();
        let notifier = if sync {
            notifier_from_config(&self.config.calendar)
        } else {
            None
        };
        Ok(TaskService::new(db, interpreter, notifier))
    }
}

/// Execute list command
///
/// # Errors
///
/// Returns an error if the query or output formatting fails.
pub fn list(ctx: &Context, status: Option<Status>) -> Result<String, SmartdoError> {
    let tasks = ctx.service(false)?.list(status)?;
    let title = match status {
        Some(Status::Pending) => "Pending",
        Some(Status::Completed) => "Completed",
        None => "Tasks",
    };
    format_tasks(&tasks, title, ctx.tz, ctx.format)
}

/// Execute show command
///
/// # Errors
///
/// Returns `SmartdoError::NotFound` if no task has this id.
pub fn show(ctx: &Context, id: i64) -> Result<String, SmartdoError> {
    let task = ctx.service(false)?.get(id)?;
    format_task(&task, ctx.tz, ctx.format)
}

/// Execute done command
///
/// # Errors
///
/// Returns `SmartdoError::NotFound` if no task has this id.
pub fn done(ctx: &Context, id: i64) -> Result<String, SmartdoError> {
    let task = ctx.service(false)?.complete(id)?;
    status_message(ctx, "Completed", task.id, &task.title)
}

/// Execute reopen command
///
/// # Errors
///
/// Returns `SmartdoError::NotFound` if no task has this id.
pub fn reopen(ctx: &Context, id: i64) -> Result<String, SmartdoError> {
    let task = ctx.service(false)?.reopen(id)?;
    status_message(ctx, "Reopened", task.id, &task.title)
}

/// Execute delete command
///
/// # Errors
///
/// Returns `SmartdoError::NotFound` if no task has this id.
pub fn delete(ctx: &Context, id: i64) -> Result<String, SmartdoError> {
    let task = ctx.service(false)?.delete(id)?;
    status_message(ctx, "Deleted", task.id, &task.title)
}

fn status_message(
    ctx: &Context,
    action: &str,
    id: i64,
    title: &str,
) -> Result<String, SmartdoError> {
    use colored::Colorize;

    match ctx.format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&serde_json::json!({
            "action": action.to_lowercase(),
            "id": id,
            "title": title,
        }))?),
        OutputFormat::Pretty => Ok(format!(
            "{} {} (ID: {})",
            format!("{action}:").green().bold(),
            title,
            id.to_string().dimmed()
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_flag_overrides_config() {
        let config = Config::default();
        let ctx = Context::new(config, Some("Europe/Berlin"), Some(OutputFormat::Json)).unwrap();
        assert_eq!(ctx.tz, Tz::Europe__Berlin);
        assert_eq!(ctx.format, OutputFormat::Json);
    }

    #[test]
    fn test_context_defaults_from_config() {
        let mut config = Config::default();
        config.general.timezone = "Asia/Tokyo".to_string();
        config.general.default_output = OutputFormat::Json;
        let ctx = Context::new(config, None, None).unwrap();
        assert_eq!(ctx.tz, Tz::Asia__Tokyo);
        assert_eq!(ctx.format, OutputFormat::Json);
    }

    #[test]
    fn test_context_rejects_unknown_zone() {
        let result = Context::new(Config::default(), Some("Mars/Olympus"), None);
        assert!(matches!(result, Err(SmartdoError::InvalidTimezone(_))));
    }

    #[test]
    fn test_status_message_json() {
        let ctx = Context::new(Config::default(), None, Some(OutputFormat::Json)).unwrap();
        let output = status_message(&ctx, "Completed", 4, "water plants").unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["action"], "completed");
        assert_eq!(value["id"], 4);
    }
}
