//! Add command implementation.
//!
//! This module implements `smartdo add`, which reads the due date, due time
//! and urgency out of free text.

use crate::cli::args::AddArgs;
use crate::core::{now_in, parse_reference};
use crate::error::SmartdoError;
use crate::output::{format_created, format_preview};
use crate::tasks::preview;

use super::Context;

/// Execute the add command.
///
/// # Errors
///
/// Returns an error if the text is blank, names an impossible date, or the
/// task cannot be stored. Calendar failures are reported in the output only.
pub fn add(ctx: &Context, args: AddArgs) -> Result<String, SmartdoError> {
    let text = args.joined_text();
    let reference = match args.now.as_deref() {
        Some(now) => parse_reference(now, ctx.tz)?,
        None => now_in(ctx.tz),
    };
    let default_priority = args
        .priority
        .unwrap_or(ctx.config.general.default_priority);

    if args.parse_only {
        let interpretation = preview(&ctx.interpreter(), &text, &reference, default_priority)?;
        return format_preview(&interpretation, ctx.format);
    }

    let service = ctx.service(!args.no_sync)?;
    let outcome = service.create(&text, &reference, default_priority, args.description)?;
    format_created(&outcome, ctx.tz, ctx.format)
}
