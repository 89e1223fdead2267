//! Title cleanup after temporal phrases have been cut out.

use once_cell::sync::Lazy;
use regex::Regex;

// Prepositions left dangling once their date or time has been removed.
static CONNECTIVE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:at|on|by|in)\b")
        .unwrap_or_else(|e| panic!("Invalid connective regex: {e}"))
});

/// Remove connective words, collapse whitespace and trim.
///
/// Falls back to `raw` (trimmed) when nothing would be left, so a title is
/// never blank if the input wasn't.
///
/// # Examples
///
/// ```
/// use smartdo::features::nlp::normalize_title;
///
/// assert_eq!(normalize_title("Pay rent  on ", "Pay rent on 23 mar 2026"), "Pay rent");
/// assert_eq!(normalize_title(" at ", "at 5pm"), "at 5pm");
/// ```
#[must_use]
pub fn normalize_title(remaining: &str, raw: &str) -> String {
    let stripped = CONNECTIVE_PATTERN.replace_all(remaining, "");
    let collapsed = collapse_whitespace(&stripped);

    if collapsed.is_empty() {
        raw.trim().to_string()
    } else {
        collapsed
    }
}

/// Collapse runs of whitespace into single spaces and trim the ends.
#[must_use]
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
