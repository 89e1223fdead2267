//! Output formatting for smartdo.
//!
//! This module provides formatters for displaying tasks in various formats.
//! Due dates are always rendered in the caller's timezone.

mod json;
mod pretty;

use chrono_tz::Tz;

use crate::cli::args::OutputFormat;
use crate::error::SmartdoError;
use crate::features::nlp::Interpretation;
use crate::tasks::{CreateOutcome, Task};

pub use json::*;
pub use pretty::*;

/// Format tasks based on output format
///
/// # Errors
///
/// Returns `SmartdoError::Json` if JSON serialization fails.
pub fn format_tasks(
    tasks: &[Task],
    title: &str,
    tz: Tz,
    format: OutputFormat,
) -> Result<String, SmartdoError> {
    match format {
        OutputFormat::Pretty => Ok(format_tasks_pretty(tasks, title, tz)),
        OutputFormat::Json => format_tasks_json(tasks, title, tz),
    }
}

/// Format a single task based on output format
///
/// # Errors
///
/// Returns `SmartdoError::Json` if JSON serialization fails.
pub fn format_task(task: &Task, tz: Tz, format: OutputFormat) -> Result<String, SmartdoError> {
    match format {
        OutputFormat::Pretty => Ok(format_task_pretty(task, tz)),
        OutputFormat::Json => format_task_json(task, tz),
    }
}

/// Format a newly created task based on output format
///
/// # Errors
///
/// Returns `SmartdoError::Json` if JSON serialization fails.
pub fn format_created(
    outcome: &CreateOutcome,
    tz: Tz,
    format: OutputFormat,
) -> Result<String, SmartdoError> {
    match format {
        OutputFormat::Pretty => Ok(format_created_pretty(outcome, tz)),
        OutputFormat::Json => format_created_json(outcome, tz),
    }
}

/// Format a parse-only preview based on output format
///
/// # Errors
///
/// Returns `SmartdoError::Json` if JSON serialization fails.
pub fn format_preview(
    interpretation: &Interpretation,
    format: OutputFormat,
) -> Result<String, SmartdoError> {
    match format {
        OutputFormat::Pretty => Ok(format_preview_pretty(interpretation)),
        OutputFormat::Json => format_preview_json(interpretation),
    }
}
