//! Error types for smartdo.

use thiserror::Error;

/// Errors that can occur anywhere in smartdo.
///
/// Calendar notification failures are reported through
/// [`crate::features::calendar::NotifyError`] and never converted into this
/// type.
#[derive(Debug, Error)]
pub enum SmartdoError {
    /// A matched date or time names a day or instant that does not exist.
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// The timezone name is not a known IANA zone.
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    /// The task text was blank.
    #[error("Task title cannot be empty")]
    EmptyTitle,

    /// Configuration could not be read, written or resolved.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The task database failed.
    #[error("Database error: {0}")]
    Database(String),

    /// No record matched the given identifier.
    #[error("Not found: {0}")]
    NotFound(String),

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Filesystem access failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<rusqlite::Error> for SmartdoError {
    fn from(e: rusqlite::Error) -> Self {
        Self::Database(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = SmartdoError::InvalidDate("31 apr 2026".to_string());
        assert_eq!(err.to_string(), "Invalid date: 31 apr 2026");

        let err = SmartdoError::NotFound("task 7".to_string());
        assert_eq!(err.to_string(), "Not found: task 7");

        assert_eq!(
            SmartdoError::EmptyTitle.to_string(),
            "Task title cannot be empty"
        );
    }

    #[test]
    fn test_from_rusqlite() {
        let err: SmartdoError = rusqlite::Error::QueryReturnedNoRows.into();
        assert!(matches!(err, SmartdoError::Database(_)));
    }
}
