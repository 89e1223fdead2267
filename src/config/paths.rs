//! Path resolution for smartdo configuration and data files.
//!
//! All smartdo data is stored in `~/.smartdo/` (or `$SMARTDO_HOME`):
//! - `config.yaml` - Main configuration file
//! - `tasks.db` - SQLite task database

use std::path::PathBuf;

use crate::error::SmartdoError;

/// Environment variable that overrides the data directory.
pub const HOME_ENV: &str = "SMARTDO_HOME";

/// Paths to smartdo configuration and data files.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Root directory: `~/.smartdo/`
    pub root: PathBuf,
    /// Config file: `~/.smartdo/config.yaml`
    pub config_file: PathBuf,
    /// Database file: `~/.smartdo/tasks.db`
    pub database: PathBuf,
}

impl Paths {
    /// Resolve paths from `$SMARTDO_HOME`, falling back to `~/.smartdo`.
    ///
    /// # Errors
    ///
    /// Returns an error if neither variable is set.
    pub fn new() -> Result<Self, SmartdoError> {
        if let Some(root) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
            return Ok(Self::with_root(PathBuf::from(root)));
        }

        let home = std::env::var("HOME").map_err(|_| {
            SmartdoError::Config("Could not determine home directory".to_string())
        })?;

        Ok(Self::with_root(PathBuf::from(home).join(".smartdo")))
    }

    /// Create paths with a custom root directory (useful for testing).
    #[must_use]
    pub fn with_root(root: PathBuf) -> Self {
        Self {
            config_file: root.join("config.yaml"),
            database: root.join("tasks.db"),
            root,
        }
    }

    /// Ensure the root directory exists.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation fails.
    pub fn ensure_dirs(&self) -> Result<(), SmartdoError> {
        if !self.root.exists() {
            std::fs::create_dir_all(&self.root).map_err(|e| {
                SmartdoError::Config(format!(
                    "Failed to create directory {}: {e}",
                    self.root.display()
                ))
            })?;
        }
        Ok(())
    }
}
