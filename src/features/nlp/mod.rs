//! Natural language parsing for task entry.
//!
//! This module reads due dates and urgency out of task titles like:
//! - "Submit report tomorrow at 5pm"
//! - "Pay rent on 23 mar 2026 9am"
//! - "Urgent: fix bug by 9:30am"
//! - "23.05.26 at 14:00 deploy"

mod interpret;
mod normalize;
mod parser;
mod urgency;

pub use interpret::{interpret, Interpretation, Interpreter};
pub use normalize::{collapse_whitespace, normalize_title};
pub use parser::{parse, DateSource, ParseResult};
pub use urgency::{classify, classify_with, Priority, URGENT_KEYWORDS};
