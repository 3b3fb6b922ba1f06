//! User interface module - console formatting and terminal queries.

use console::Term;

pub mod formatter;

pub use formatter::{
    display_boundary_warning, display_error, display_status, display_success,
    display_sync_banner, display_sync_failure,
};

/// Rows and columns assumed when stdout is not a terminal
pub const FALLBACK_SIZE: (usize, usize) = (40, 120);

/// Terminal height and width, or [FALLBACK_SIZE] when stdout is not a terminal.
pub fn terminal_size() -> (usize, usize) {
    Term::stdout()
        .size_checked()
        .map(|(rows, cols)| (rows as usize, cols as usize))
        .unwrap_or(FALLBACK_SIZE)
}

/// Print lines to stdout, one per line.
pub fn display_lines<I, S>(lines: I)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    for line in lines {
        println!("{}", line.as_ref());
    }
}
