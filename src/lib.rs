//! smartdo - a todo list that understands what you type
//!
//! Task titles are read for a due date, a due time and urgency keywords.
//! What remains becomes the stored title, and tasks with a due time are
//! pushed to a calendar.

#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod features;
pub mod output;
pub mod storage;
pub mod tasks;

pub use cli::args::{Cli, Commands, OutputFormat};
pub use error::SmartdoError;
pub use tasks::TaskService;
