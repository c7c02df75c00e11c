//! UTF-8 Safe Offset Utilities
//!
//! Selection offsets arrive from the editing surface as byte positions and
//! may be stale, reversed or land inside a multi-byte character. The helpers
//! here turn any pair of offsets into a range that is safe to slice with, and
//! normalize line endings so the rest of the engine only ever sees `\n`.
//!
//! # Example
//! ```
//! use wmd::string_utils::{clamp_selection, normalize_line_endings};
//!
//! let text = "Hei på deg";
//! assert_eq!(clamp_selection(text, 9, 5), (5, 9));
//! assert_eq!(normalize_line_endings("a\r\nb\rc"), "a\nb\nc");
//! ```

// ─────────────────────────────────────────────────────────────────────────────
// Character Boundary Functions
// ─────────────────────────────────────────────────────────────────────────────

/// Returns the largest index that is less than or equal to `index`
/// and is on a UTF-8 character boundary.
///
/// If `index` is greater than the string length, returns the string length.
#[inline]
pub fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }

    let mut i = index;
    while i > 0 && !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

/// Returns the smallest index that is greater than or equal to `index`
/// and is on a UTF-8 character boundary.
///
/// If `index` is greater than or equal to the string length, returns the string length.
#[inline]
pub fn ceil_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }

    let mut i = index;
    while i < s.len() && !s.is_char_boundary(i) {
        i += 1;
    }
    i
}

// ─────────────────────────────────────────────────────────────────────────────
// Selection Ranges
// ─────────────────────────────────────────────────────────────────────────────

/// Clamp a selection range to valid slicing positions in `text`.
///
/// - reversed ranges are swapped
/// - `start` floors and `end` ceils to a character boundary
/// - a boundary sitting between `\r` and `\n` moves past the `\n`, so that
///   splitting the text never leaves half of a CRLF pair on each side
pub fn clamp_selection(text: &str, start: usize, end: usize) -> (usize, usize) {
    let (start, end) = if start > end { (end, start) } else { (start, end) };
    let start = skip_split_crlf(text, floor_char_boundary(text, start));
    let end = skip_split_crlf(text, ceil_char_boundary(text, end));
    (start, end.max(start))
}

fn skip_split_crlf(text: &str, index: usize) -> usize {
    let bytes = text.as_bytes();
    if index > 0 && index < bytes.len() && bytes[index - 1] == b'\r' && bytes[index] == b'\n' {
        index + 1
    } else {
        index
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Line Endings
// ─────────────────────────────────────────────────────────────────────────────

/// Convert `\r\n` and lone `\r` line endings to `\n`.
pub fn normalize_line_endings(text: &str) -> String {
    if !text.contains('\r') {
        return text.to_string();
    }
    text.replace("\r\n", "\n").replace('\r', "\n")
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
