//! Configuration settings for smartdo.
//!
//! Settings are loaded from `~/.smartdo/config.yaml`.

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::cli::args::OutputFormat;
use crate::config::Paths;
use crate::core::resolve_timezone;
use crate::error::SmartdoError;
use crate::features::nlp::Priority;

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// General settings.
    pub general: GeneralConfig,
    /// Natural language parsing settings.
    pub nlp: NlpConfig,
    /// Calendar sync settings.
    pub calendar: CalendarConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Default output format.
    #[serde(default = "default_output_format")]
    pub default_output: OutputFormat,
    /// Color output setting.
    #[serde(default = "default_color")]
    pub color: ColorSetting,
    /// IANA timezone used for "today", "tomorrow" and display.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Priority for tasks without urgency keywords.
    #[serde(default)]
    pub default_priority: Priority,
}

/// Color output setting.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ColorSetting {
    /// Auto-detect based on terminal.
    #[default]
    Auto,
    /// Always use colors.
    Always,
    /// Never use colors.
    Never,
}

/// Natural language parsing settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct NlpConfig {
    /// Extra words that mark a task as high priority.
    pub extra_urgent_keywords: Vec<String>,
}

/// Calendar sync settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    /// Push tasks with due dates to the calendar.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Webhook receiving events. Events are only logged when unset.
    #[serde(default)]
    pub webhook_url: Option<String>,
    /// Calendar identifier sent along with each event.
    #[serde(default)]
    pub calendar_id: Option<String>,
    /// Event length in minutes.
    #[serde(default = "default_event_duration")]
    pub event_duration_minutes: u32,
    /// Connect/read/write timeout for the webhook, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Event description.
    #[serde(default = "default_description")]
    pub description: String,
}

// Default value functions for serde
const fn default_output_format() -> OutputFormat {
    OutputFormat::Pretty
}

const fn default_color() -> ColorSetting {
    ColorSetting::Auto
}

fn default_timezone() -> String {
    "UTC".to_string()
}

const fn default_true() -> bool {
    true
}

const fn default_event_duration() -> u32 {
    60
}

const fn default_timeout_secs() -> u64 {
    10
}

fn default_description() -> String {
    "Created via smartdo".to_string()
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_output: default_output_format(),
            color: default_color(),
            timezone: default_timezone(),
            default_priority: Priority::default(),
        }
    }
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            webhook_url: None,
            calendar_id: None,
            event_duration_minutes: default_event_duration(),
            timeout_secs: default_timeout_secs(),
            description: default_description(),
        }
    }
}

impl GeneralConfig {
    /// Resolve the configured timezone.
    ///
    /// # Errors
    ///
    /// Returns `SmartdoError::InvalidTimezone` if the name is unknown.
    pub fn tz(&self) -> Result<Tz, SmartdoError> {
        resolve_timezone(&self.timezone)
    }
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load() -> Result<Self, SmartdoError> {
        let paths = Paths::new()?;
        Self::load_from_path(&paths.config_file)
    }

    /// Load configuration from a specific path.
    ///
    /// If the config file doesn't exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load_from_path(path: &std::path::Path) -> Result<Self, SmartdoError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|e| {
            SmartdoError::Config(format!(
                "Failed to read config file {}: {e}",
                path.display()
            ))
        })?;

        serde_yaml::from_str(&contents).map_err(|e| {
            SmartdoError::Config(format!(
                "Failed to parse config file {}: {e}",
                path.display()
            ))
        })
    }
}
