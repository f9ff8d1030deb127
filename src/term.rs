//! Terminal Capability Probing
//!
//! Environment checks consulted once per animation start: whether the
//! output terminal understands ANSI escape sequences, and how wide it is.
//! The engine still functions when ANSI is unsupported; the render surface
//! falls back to appending lines instead of redrawing in place.

use std::io::stdout;

use crossterm::tty::IsTty;

/// Minimum width reported when the real width cannot be determined.
pub const FALLBACK_WIDTH: u16 = 80;

/// Whether the current terminal supports ANSI escape sequences.
///
/// Honors the `NO_COLOR` convention and the `TERM=dumb` marker, and
/// requires stdout to actually be a terminal.
#[must_use]
pub fn is_ansi_supported() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if let Ok(term) = std::env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }
    stdout().is_tty()
}

/// Current terminal width in columns, falling back to 80.
#[must_use]
pub fn terminal_width() -> u16 {
    match crossterm::terminal::size() {
        Ok((cols, _rows)) if cols > 0 => cols,
        _ => FALLBACK_WIDTH,
    }
}
