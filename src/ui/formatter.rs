//! Formatting functions for console output.
//!
//! Styling goes through `console`, which drops colors automatically when the
//! output is not a terminal.

use console::style;

use crate::boundary::BoundaryWarning;
use crate::sync::{SyncDirection, SyncFailure};

const RULE: &str = "----------------------------------";

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// A status line with a yellow arrow, e.g. `→ Stamping 1.0.1 into package.json`
pub fn format_status(message: &str) -> String {
    format!("{} {}", style("→").yellow(), message)
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{}", format_status(message));
}

/// Display a boundary warning to the user.
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// The banner printed once a sync knows which way changes flow, e.g. `>>> ../app`
pub fn format_sync_banner(direction: SyncDirection, location: &str) -> String {
    format!(
        "{}\n{} {}\n{}",
        RULE,
        style(direction.symbol()).cyan().bold(),
        location,
        RULE
    )
}

pub fn display_sync_banner(direction: SyncDirection, location: &str) {
    println!("{}", format_sync_banner(direction, location));
}

pub fn format_sync_failure(failure: &SyncFailure) -> String {
    match failure {
        SyncFailure::Unreachable { .. } => {
            format!("{}\n*** {}\n{}", RULE, style(failure).red(), RULE)
        }
        SyncFailure::Incomplete { .. } => format!("*** {}\n{}", style(failure).red(), RULE),
    }
}

/// Display why a sync stopped, with the underlying error first.
pub fn display_sync_failure(failure: &SyncFailure) {
    eprintln!("{}", failure.source());
    eprintln!("{}", format_sync_failure(failure));
}
