//! Core utilities shared across smartdo.
//!
//! This module provides timezone-aware date handling used by the parser,
//! the task store and the output layer.

mod datetime;

pub use datetime::{
    build_date, format_due, format_due_opt, localize, now_in, parse_reference, resolve_timezone,
    DUE_DISPLAY_FORMAT,
};
