//! ANSI-Aware Text Measurement
//!
//! Measuring and manipulating strings that may contain invisible escape
//! sequences. Every function here is pure: no state, no I/O.
//!
//! # Escape spans
//!
//! An escape span starts at ESC (`\u{1b}`) and runs through the first ASCII
//! letter that follows (the CSI final byte, `m` for color codes). Span
//! characters contribute zero visible width. An incomplete span at the end
//! of a string is never matched: its characters are not counted and are not
//! copied by [`truncate`]. Scanning is a single left-to-right pass with no
//! backtracking.

use unicode_width::UnicodeWidthChar;

/// ESC character that introduces an escape span.
const ESC: char = '\u{1b}';

/// Visible length of a string in characters, ignoring escape spans.
///
/// An empty string has length 0. Characters inside escape spans, including
/// an unterminated span at the end of input, are not counted.
#[must_use]
pub fn visible_len(text: &str) -> usize {
    let mut len = 0;
    let mut in_escape = false;

    for c in text.chars() {
        if in_escape {
            if c.is_ascii_alphabetic() {
                in_escape = false;
            }
        } else if c == ESC {
            in_escape = true;
        } else {
            len += 1;
        }
    }

    len
}

/// Visible width of a string in terminal display cells.
///
/// Like [`visible_len`] but wide glyphs (CJK, some emoji) count as two
/// cells and zero-width characters count as none. Used when sizing frames
/// around caller-supplied messages.
#[must_use]
pub fn visible_width(text: &str) -> usize {
    let mut width = 0;
    let mut in_escape = false;

    for c in text.chars() {
        if in_escape {
            if c.is_ascii_alphabetic() {
                in_escape = false;
            }
        } else if c == ESC {
            in_escape = true;
        } else {
            width += c.width().unwrap_or(0);
        }
    }

    width
}

/// Truncate a string to at most `max_visible` visible characters.
///
/// Complete escape spans are always copied verbatim (they cost no visible
/// width), so color state survives truncation. If the string already fits
/// it is returned unchanged. An incomplete trailing span is dropped.
#[must_use]
pub fn truncate(text: &str, max_visible: usize) -> String {
    if visible_len(text) <= max_visible {
        return text.to_string();
    }

    let mut result = String::with_capacity(text.len());
    let mut span = String::new();
    let mut visible = 0;
    let mut in_escape = false;

    for c in text.chars() {
        if c == ESC {
            in_escape = true;
            span.push(c);
        } else if in_escape {
            span.push(c);
            if c.is_ascii_alphabetic() {
                in_escape = false;
                result.push_str(&span);
                span.clear();
            }
        } else if visible < max_visible {
            result.push(c);
            visible += 1;
        } else {
            break;
        }
    }

    result
}

/// Pad a string on the left with `fill` until it is `width` visible
/// characters wide. Returns the string unchanged if it already fits.
#[must_use]
pub fn pad_left(text: &str, width: usize, fill: char) -> String {
    let len = visible_len(text);
    if len >= width {
        return text.to_string();
    }

    let mut result = String::with_capacity(text.len() + width - len);
    for _ in 0..width - len {
        result.push(fill);
    }
    result.push_str(text);
    result
}

/// Pad a string on the right with `fill` until it is `width` visible
/// characters wide. Returns the string unchanged if it already fits.
#[must_use]
pub fn pad_right(text: &str, width: usize, fill: char) -> String {
    let len = visible_len(text);
    if len >= width {
        return text.to_string();
    }

    let mut result = String::with_capacity(text.len() + width - len);
    result.push_str(text);
    for _ in 0..width - len {
        result.push(fill);
    }
    result
}

/// Center a string within `width` visible characters.
///
/// When the total padding is odd the left side receives the floor and the
/// right side the remainder, so the left pad is never larger than the
/// right.
#[must_use]
pub fn center(text: &str, width: usize, fill: char) -> String {
    let len = visible_len(text);
    if len >= width {
        return text.to_string();
    }

    let left = (width - len) / 2;
    let right = width - len - left;

    let mut result = String::with_capacity(text.len() + width - len);
    for _ in 0..left {
        result.push(fill);
    }
    result.push_str(text);
    for _ in 0..right {
        result.push(fill);
    }
    result
}
