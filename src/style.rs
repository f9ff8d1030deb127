//! Color and Style Value Objects
//!
//! Truecolor escape-code values and the glyph tables the frame renderers
//! draw with. The animation engine treats these as opaque: it concatenates
//! their escape codes into frame text and never parses them back.

use serde::{Deserialize, Serialize};

/// Escape code that resets all terminal styling.
pub const RESET: &str = "\u{1b}[0m";

/// A 24-bit RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    /// Red component (0-255)
    pub r: u8,
    /// Green component (0-255)
    pub g: u8,
    /// Blue component (0-255)
    pub b: u8,
}

impl Rgb {
    /// Default color for animation messages.
    pub const MESSAGE: Rgb = Rgb::new(255, 255, 255);
    /// Default color for the filled part of a progress bar.
    pub const BAR: Rgb = Rgb::new(50, 205, 50);
    /// Default color for the unfilled part of a progress bar.
    pub const REMAINING: Rgb = Rgb::new(100, 100, 100);
    /// Default color for percentage and counter text.
    pub const PERCENT: Rgb = Rgb::new(255, 215, 0);
    /// Default color for spinner glyphs.
    pub const SPINNER: Rgb = Rgb::new(0, 191, 255);
    /// Color for success outcomes.
    pub const SUCCESS: Rgb = Rgb::new(50, 205, 50);
    /// Color for failure outcomes.
    pub const FAILURE: Rgb = Rgb::new(255, 69, 0);
    /// Color for warnings.
    pub const WARNING: Rgb = Rgb::new(255, 215, 0);

    /// Create a color from components.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Foreground escape code for this color.
    #[must_use]
    pub fn escape_code(&self) -> String {
        format!("\u{1b}[38;2;{};{};{}m", self.r, self.g, self.b)
    }

    /// Wrap `text` in this color followed by a reset.
    #[must_use]
    pub fn paint(&self, text: &str) -> String {
        format!("{}{}{}", self.escape_code(), text, RESET)
    }
}

/// Shape of a progress bar.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProgressStyle {
    /// Solid blocks with light-shade remainder
    #[default]
    Block,
    /// Classic `[====    ]` bar
    Bar,
    /// Minimal pipe-delimited bar
    Minimal,
    /// ASCII-only fallback for terminals without Unicode fonts
    Ascii,
}

impl ProgressStyle {
    /// Opening and closing border characters.
    #[must_use]
    pub const fn brackets(self) -> (char, char) {
        match self {
            Self::Block | Self::Bar | Self::Ascii => ('[', ']'),
            Self::Minimal => ('|', '|'),
        }
    }

    /// Character for a filled cell.
    #[must_use]
    pub const fn filled(self) -> char {
        match self {
            Self::Block => '\u{2588}',
            Self::Bar => '=',
            Self::Minimal | Self::Ascii => '#',
        }
    }

    /// Character for an unfilled cell.
    #[must_use]
    pub const fn empty(self) -> char {
        match self {
            Self::Block => '\u{2591}',
            Self::Bar => ' ',
            Self::Minimal | Self::Ascii => '-',
        }
    }
}

/// Glyph sequence for a spinner animation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpinnerStyle {
    /// Braille dots spinner
    #[default]
    Dots,
    /// Classic line spinner
    Line,
    /// Rotating arrow
    Arrow,
    /// Quarter-circle spinner
    Circle,
    /// Quadrant box spinner
    Box,
    /// ASCII-only fallback
    Ascii,
}

impl SpinnerStyle {
    /// The ordered frame glyphs for this spinner.
    #[must_use]
    pub const fn frames(self) -> &'static [&'static str] {
        match self {
            Self::Dots => &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"],
            Self::Line | Self::Ascii => &["|", "/", "-", "\\"],
            Self::Arrow => &["←", "↖", "↑", "↗", "→", "↘", "↓", "↙"],
            Self::Circle => &["◐", "◓", "◑", "◒"],
            Self::Box => &["▖", "▘", "▝", "▗"],
        }
    }

    /// Glyph for a given frame index (wraps around).
    #[must_use]
    pub fn frame(self, index: u64) -> &'static str {
        let frames = self.frames();
        frames[(index as usize) % frames.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_escape_code() {
        assert_eq!(Rgb::new(255, 0, 128).escape_code(), "\u{1b}[38;2;255;0;128m");
    }

    #[test]
    fn test_paint_wraps_with_reset() {
        let painted = Rgb::new(1, 2, 3).paint("x");
        assert!(painted.starts_with("\u{1b}[38;2;1;2;3m"));
        assert!(painted.ends_with(RESET));
        assert_eq!(crate::text::visible_len(&painted), 1);
    }

    #[test]
    fn test_spinner_frame_wraps() {
        let style = SpinnerStyle::Line;
        assert_eq!(style.frame(0), "|");
        assert_eq!(style.frame(4), "|");
        assert_eq!(style.frame(5), "/");
    }

    #[test]
    fn test_spinner_frames_nonempty() {
        for style in [
            SpinnerStyle::Dots,
            SpinnerStyle::Line,
            SpinnerStyle::Arrow,
            SpinnerStyle::Circle,
            SpinnerStyle::Box,
            SpinnerStyle::Ascii,
        ] {
            assert!(!style.frames().is_empty());
        }
    }

    #[test]
    fn test_progress_style_chars() {
        assert_eq!(ProgressStyle::Bar.filled(), '=');
        assert_eq!(ProgressStyle::Block.brackets(), ('[', ']'));
        assert_eq!(ProgressStyle::Minimal.brackets(), ('|', '|'));
    }
}
