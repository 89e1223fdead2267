//! JSON output formatting for smartdo.

use chrono_tz::Tz;
use serde_json::{json, Value};

use crate::core::{format_due, format_due_opt};
use crate::error::SmartdoError;
use crate::features::nlp::Interpretation;
use crate::tasks::{CreateOutcome, Task};

/// A task as JSON, with its due date rendered for display.
///
/// # Errors
///
/// Returns `SmartdoError::Json` if serialization fails.
pub fn task_value(task: &Task, tz: Tz) -> Result<Value, SmartdoError> {
    let mut value = serde_json::to_value(task)?;
    value["formatted_date"] = Value::String(format_due_opt(task.due_at.as_ref(), tz));
    Ok(value)
}

/// Format tasks as JSON
///
/// # Errors
///
/// Returns `SmartdoError::Json` if serialization fails.
pub fn format_tasks_json(tasks: &[Task], list_name: &str, tz: Tz) -> Result<String, SmartdoError> {
    let items = tasks
        .iter()
        .map(|t| task_value(t, tz))
        .collect::<Result<Vec<_>, _>>()?;

    let output = json!({
        "list": list_name,
        "count": tasks.len(),
        "items": items,
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Format a single task as JSON
///
/// # Errors
///
/// Returns `SmartdoError::Json` if serialization fails.
pub fn format_task_json(task: &Task, tz: Tz) -> Result<String, SmartdoError> {
    Ok(serde_json::to_string_pretty(&task_value(task, tz)?)?)
}

/// Format the result of creating a task as JSON
///
/// # Errors
///
/// Returns `SmartdoError::Json` if serialization fails.
pub fn format_created_json(outcome: &CreateOutcome, tz: Tz) -> Result<String, SmartdoError> {
    let output = json!({
        "created": true,
        "task": task_value(&outcome.task, tz)?,
        "calendar": outcome.calendar,
        "date_without_time": outcome.interpretation.date_without_time,
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Format an interpretation as JSON (parse-only mode)
///
/// # Errors
///
/// Returns `SmartdoError::Json` if serialization fails.
pub fn format_preview_json(interpretation: &Interpretation) -> Result<String, SmartdoError> {
    let output = json!({
        "parsed": true,
        "title": interpretation.title,
        "due_at": interpretation.due_at.map(|d| d.to_rfc3339()),
        "formatted_date": interpretation.due_at.as_ref().map(format_due).unwrap_or_default(),
        "priority": interpretation.priority,
        "date_source": interpretation.date_source,
        "date_without_time": interpretation.date_without_time,
    });
    Ok(serde_json::to_string_pretty(&output)?)
}
