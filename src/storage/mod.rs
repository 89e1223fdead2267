//! Storage layer for smartdo.
//!
//! This module provides SQLite-based persistence for tasks.

mod database;
mod migrations;

pub use database::Database;
