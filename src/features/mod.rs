//! Feature implementations for smartdo.
//!
//! - Natural language parsing of task titles
//! - Calendar sync for tasks with a due time

pub mod calendar;
pub mod nlp;
