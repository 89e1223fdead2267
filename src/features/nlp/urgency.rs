//! Urgency detection from keywords in the task text.

use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Words that mark a task as urgent wherever they appear.
pub const URGENT_KEYWORDS: [&str; 5] = ["urgent", "asap", "important", "critical", "deadline"];

/// Priority levels for tasks.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Low priority.
    Low,
    /// Medium priority, the default for new tasks.
    #[default]
    Medium,
    /// High priority, set automatically by urgency keywords.
    High,
}

impl Priority {
    /// Stable string form used in storage.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(format!("unknown priority '{other}'")),
        }
    }
}

/// Upgrade `default` to [`Priority::High`] if `raw` mentions an urgency keyword.
///
/// Matching is a case-insensitive substring search, so "URGENT:" and
/// "deadlines" both count.
///
/// # Examples
///
/// ```
/// use smartdo::features::nlp::{classify, Priority};
///
/// assert_eq!(classify("ASAP: call the bank", Priority::Medium), Priority::High);
/// assert_eq!(classify("water plants", Priority::Low), Priority::Low);
/// ```
#[must_use]
pub fn classify(raw: &str, default: Priority) -> Priority {
    classify_with::<&str>(raw, default, &[])
}

/// Like [`classify`], also honoring `extra` keywords.
#[must_use]
pub fn classify_with<S: AsRef<str>>(raw: &str, default: Priority, extra: &[S]) -> Priority {
    let lower = raw.to_lowercase();

    let builtin = URGENT_KEYWORDS.iter().any(|k| lower.contains(k));
    let custom = extra.iter().any(|k| {
        let k = k.as_ref().trim().to_lowercase();
        !k.is_empty() && lower.contains(&k)
    });

    if builtin || custom {
        Priority::High
    } else {
        default
    }
}
