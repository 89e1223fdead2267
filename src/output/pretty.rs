use std::fmt::Write;

use chrono_tz::Tz;
use colored::{ColoredString, Colorize};

use crate::core::{format_due, format_due_opt};
use crate::features::nlp::{Interpretation, Priority};
use crate::tasks::{CalendarSync, CreateOutcome, Status, Task};

fn status_icon(status: Status) -> ColoredString {
    match status {
        Status::Pending => "[ ]".white(),
        Status::Completed => "[x]".green(),
    }
}

fn priority_label(priority: Priority) -> ColoredString {
    match priority {
        Priority::High => "high".red().bold(),
        Priority::Medium => "medium".yellow(),
        Priority::Low => "low".dimmed(),
    }
}

/// Format a list of tasks as a pretty table
pub fn format_tasks_pretty(tasks: &[Task], title: &str, tz: Tz) -> String {
    if tasks.is_empty() {
        return format!("{title} (0 items)\n  No tasks");
    }

    let mut output = format!("{} ({} items)\n", title, tasks.len());
    output.push_str(&"─".repeat(60));
    output.push('\n');

    for task in tasks {
        let name = match task.status {
            Status::Completed => task.title.strikethrough().to_string(),
            Status::Pending => task.title.bold().to_string(),
        };

        let mut line = format!(
            "{} {} {}",
            status_icon(task.status),
            format!("#{}", task.id).dimmed(),
            name
        );

        if task.priority == Priority::High {
            write!(line, "  {}", "!".red().bold()).ok();
        }

        let due = format_due_opt(task.due_at.as_ref(), tz);
        if !due.is_empty() {
            write!(line, "  {}", due.yellow()).ok();
        }

        output.push_str(&line);
        output.push('\n');
    }

    output
}

/// Format a single task as pretty output
pub fn format_task_pretty(task: &Task, tz: Tz) -> String {
    let mut output = format!("{} {}\n", status_icon(task.status), task.title.bold());
    writeln!(output, "  {}: {}", "ID".dimmed(), task.id).ok();
    writeln!(output, "  {}: {}", "Status".dimmed(), task.status).ok();
    writeln!(output, "  {}: {}", "Priority".dimmed(), priority_label(task.priority)).ok();

    let due = format_due_opt(task.due_at.as_ref(), tz);
    if !due.is_empty() {
        writeln!(output, "  {}: {}", "Due".dimmed(), due).ok();
    }

    if let Some(description) = &task.description {
        writeln!(output, "  {}: {}", "Notes".dimmed(), description).ok();
    }

    writeln!(
        output,
        "  {}: {}",
        "Created".dimmed(),
        task.created_at.with_timezone(&tz).format("%Y-%m-%d %H:%M")
    )
    .ok();

    output
}

/// Format the result of creating a task
pub fn format_created_pretty(outcome: &CreateOutcome, tz: Tz) -> String {
    let task = &outcome.task;
    let mut output = format!(
        "{} {} (ID: {})\n",
        "Created:".green().bold(),
        task.title,
        task.id.to_string().dimmed()
    );

    let due = format_due_opt(task.due_at.as_ref(), tz);
    if !due.is_empty() {
        writeln!(output, "  {} {due}", "Due:".cyan()).ok();
    } else if outcome.interpretation.date_without_time {
        writeln!(
            output,
            "  {} date found without a time, no due date set",
            "Note:".dimmed()
        )
        .ok();
    }

    if task.priority == Priority::High {
        writeln!(output, "  {} {}", "Priority:".red().bold(), task.priority).ok();
    }

    match outcome.calendar {
        CalendarSync::Delivered => {
            writeln!(output, "  {} synced", "Calendar:".magenta()).ok();
        },
        CalendarSync::Failed => {
            writeln!(output, "  {} sync failed (task kept)", "Calendar:".magenta()).ok();
        },
        CalendarSync::NotNeeded | CalendarSync::Disabled => {},
    }

    output
}

/// Format an interpretation for display (parse-only mode)
pub fn format_preview_pretty(interpretation: &Interpretation) -> String {
    let mut output = format!("{}\n", "Parsed Task (not created)".yellow().bold());
    writeln!(output, "  {} {}", "Title:".cyan().bold(), interpretation.title).ok();

    match &interpretation.due_at {
        Some(due) => {
            writeln!(output, "  {} {}", "Due:".cyan(), format_due(due)).ok();
        },
        None if interpretation.date_without_time => {
            writeln!(output, "  {} none (date without a time)", "Due:".cyan()).ok();
        },
        None => {
            writeln!(output, "  {} none", "Due:".cyan()).ok();
        },
    }

    writeln!(
        output,
        "  {} {}",
        "Priority:".cyan(),
        priority_label(interpretation.priority)
    )
    .ok();

    output
}
