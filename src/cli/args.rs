use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::features::nlp::Priority;
use crate::tasks::Status;

#[derive(Parser)]
#[command(name = "smartdo")]
#[command(about = "A todo list that reads due dates and urgency from what you type")]
#[command(long_about = "smartdo - a smart todo list

Type tasks the way you would say them. smartdo pulls the due date and time
out of the title, flags urgent tasks, and pushes anything with a due time to
your calendar.

QUICK START:
  smartdo add Submit report tomorrow at 5pm
  smartdo add \"Urgent: fix bug by 9:30am\"
  smartdo add \"23.05.26 at 14:00 deploy\"
  smartdo list
  smartdo done 3

OUTPUT FORMATS:
  --output pretty    Human-readable colored output (default)
  --output json      Machine-readable JSON for scripting")]
#[command(version, propagate_version = true)]
pub struct Cli {
    /// Output format for command results
    ///
    /// Defaults to `general.default_output` from the config file.
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// IANA timezone for "today", "tomorrow" and display (e.g. Europe/Berlin)
    ///
    /// Overrides `general.timezone` from the config file.
    #[arg(long, env = "SMARTDO_TZ", global = true)]
    pub timezone: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for command results.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable colored output.
    #[default]
    Pretty,
    /// Machine-readable JSON output.
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a task written in natural language
    ///
    /// The due date and time are read from the text and removed from the
    /// title. Words like "urgent", "asap", "important", "critical" and
    /// "deadline" raise the priority to high.
    ///
    /// # Supported Patterns
    ///
    ///   Dates:   23 mar 2026, 5 Mar 26, 23.05.26, 1.2.2026, today, tomorrow
    ///   Times:   5pm, 9:30am, 12 AM, 14:00, at 7:05
    ///
    /// A date without a time does not set a due date.
    ///
    /// # Examples
    ///
    ///   smartdo add Submit report tomorrow at 5pm
    ///   smartdo add "Pay rent on 23 mar 2026 9am"
    ///   smartdo add --parse-only "ASAP call bank today 4pm"
    #[command(alias = "a")]
    Add(AddArgs),

    /// List tasks, soonest due first
    #[command(alias = "ls")]
    List {
        /// Only show tasks with this status
        #[arg(long, value_enum)]
        status: Option<Status>,
    },

    /// Show a single task
    Show {
        /// Task ID
        id: i64,
    },

    /// Mark a task completed
    Done {
        /// Task ID
        id: i64,
    },

    /// Mark a completed task pending again
    Reopen {
        /// Task ID
        id: i64,
    },

    /// Delete a task
    #[command(alias = "rm")]
    Delete {
        /// Task ID
        id: i64,
    },
}

#[derive(Args)]
pub struct AddArgs {
    /// Task text, e.g. "Submit report tomorrow at 5pm"
    #[arg(required = true, num_args = 1..)]
    pub text: Vec<String>,

    /// Priority when no urgency keyword is present
    ///
    /// Defaults to `general.default_priority` from the config file.
    #[arg(short, long, value_enum)]
    pub priority: Option<Priority>,

    /// Longer description stored with the task
    #[arg(short, long)]
    pub description: Option<String>,

    /// Reference time instead of now (RFC 3339 or YYYY-MM-DDTHH:MM)
    #[arg(long)]
    pub now: Option<String>,

    /// Show what would be created without creating it
    #[arg(long)]
    pub parse_only: bool,

    /// Do not push the task to the calendar
    #[arg(long)]
    pub no_sync: bool,
}

impl AddArgs {
    /// The task text as one string.
    #[must_use]
    pub fn joined_text(&self) -> String {
        self.text.join(" ")
    }
}
