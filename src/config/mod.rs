//! Configuration management for smartdo.
//!
//! This module handles loading configuration from `~/.smartdo/`.

mod paths;
mod settings;

pub use paths::{Paths, HOME_ENV};
pub use settings::{CalendarConfig, ColorSetting, Config, GeneralConfig, NlpConfig};
