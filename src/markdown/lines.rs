//! Line Classification
//!
//! Block structure in this engine is decided one line at a time: every line
//! of a region is classified as blank, list item, quote, indented code,
//! heading, setext underline, reference definition or plain text. The list
//! scanner, the re-wrapper and the quote/code toggles all work from this
//! classification instead of matching ad hoc patterns against whole regions,
//! which keeps block-boundary detection testable on its own.

use regex::Regex;
use std::sync::LazyLock;

/// Compile one of the crate's static patterns.
pub(crate) fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("static markdown pattern should compile")
}

/// A line that opens a list item: up to three spaces, a marker, then whitespace.
static LIST_ITEM: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^[ ]{0,3}(?:([*+-])|(\d+)[.])[ \t]+"));

/// A line allowed to continue a list item after one or more blank lines.
static LOOSE_CONTINUATION: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^(?:(?:[*+-].*|\d+[.])[ \t]+|[ \t]+\S)"));

static QUOTE: LazyLock<Regex> = LazyLock::new(|| compile(r"^[ ]{0,3}>"));

static INDENTED_CODE: LazyLock<Regex> = LazyLock::new(|| compile(r"^(?:\t|[ ]{4,})"));

static ATX_HEADING: LazyLock<Regex> = LazyLock::new(|| compile(r"^(#{1,6})(?:[ \t]|$)"));

static SETEXT_UNDERLINE: LazyLock<Regex> = LazyLock::new(|| compile(r"^(?:=+|-+)[ \t]*$"));

static REFERENCE_DEFINITION: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^[ ]{0,3}\[[^\]\n]+\]:"));

/// Text that starts a Markdown block and must never be joined onto the
/// previous line or broken by the wrapper.
static BLOCK_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"^(?:\s{4,}|\s*>|\s*-\s+|\s*\d+\.|=|\+|-|_|\*|#|\s*\[[^\]\n]+\]:)")
});

/// A run of exactly one blank line between two content lines.
static SINGLE_BLANK_GAP: LazyLock<Regex> = LazyLock::new(|| compile(r"[^\n]\n\n[^\n]"));

// ─────────────────────────────────────────────────────────────────────────────
// Line Kinds
// ─────────────────────────────────────────────────────────────────────────────

/// The two list flavours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    /// `1.`, `2.`, ...
    Ordered,
    /// `-`, `*` or `+`
    Unordered,
}

/// Structural classification of a single line (no `\n` inside).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Empty or whitespace-only
    Blank,
    /// Opens a list item
    ListItem(ListKind),
    /// Starts with `>` after at most three spaces
    Quote,
    /// Indented by a tab or four spaces
    IndentedCode,
    /// `#` heading with its level
    AtxHeading(u8),
    /// A run of `=` (level 1) or `-` (level 2)
    SetextUnderline(u8),
    /// `[id]: url`
    ReferenceDefinition,
    /// Anything else
    Plain,
}

impl LineKind {
    /// Classify a line. The order matters: indentation wins over every
    /// other marker, and an underline of dashes is never a list item.
    pub fn of(line: &str) -> Self {
        if is_blank(line) {
            return LineKind::Blank;
        }
        if INDENTED_CODE.is_match(line) {
            return LineKind::IndentedCode;
        }
        if QUOTE.is_match(line) {
            return LineKind::Quote;
        }
        if SETEXT_UNDERLINE.is_match(line) {
            let level = if line.starts_with('=') { 1 } else { 2 };
            return LineKind::SetextUnderline(level);
        }
        if let Some(kind) = list_item_kind(line) {
            return LineKind::ListItem(kind);
        }
        if let Some(caps) = ATX_HEADING.captures(line) {
            return LineKind::AtxHeading(caps[1].len() as u8);
        }
        if REFERENCE_DEFINITION.is_match(line) {
            return LineKind::ReferenceDefinition;
        }
        LineKind::Plain
    }
}

/// Whether a line holds nothing but spaces and tabs.
pub fn is_blank(line: &str) -> bool {
    line.chars().all(|c| c == ' ' || c == '\t')
}

/// The list flavour of a line, if it opens a list item.
pub fn list_item_kind(line: &str) -> Option<ListKind> {
    LIST_ITEM.captures(line).map(|caps| {
        if caps.get(1).is_some() {
            ListKind::Unordered
        } else {
            ListKind::Ordered
        }
    })
}

/// Whether `text` begins with a Markdown block prefix.
pub fn starts_with_block_prefix(text: &str) -> bool {
    BLOCK_PREFIX.is_match(text)
}

/// Whether a list block is "loose", i.e. contains a single blank line
/// separating two of its content lines.
pub fn has_blank_line_gap(text: &str) -> bool {
    SINGLE_BLANK_GAP.is_match(text)
}

/// Iterate the lines of `text` with their starting byte offsets.
///
/// Unlike `str::lines`, a trailing `\n` yields a final empty line so that
/// offsets always cover the whole text.
pub fn line_spans(text: &str) -> impl Iterator<Item = (usize, &str)> {
    let mut offset = 0;
    text.split('\n').map(move |line| {
        let start = offset;
        offset += line.len() + 1;
        (start, line)
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// List Block Scanning
// ─────────────────────────────────────────────────────────────────────────────

/// Find the list block that runs up to the end of `text`.
///
/// A list block is an item line followed by any mix of directly attached
/// non-empty lines and, after empty lines, further item lines or indented
/// lines; only empty lines may follow it. Returns the byte offset of the
/// earliest line where such a block starts.
pub fn trailing_list_block(text: &str) -> Option<usize> {
    let lines: Vec<(usize, &str)> = line_spans(text).collect();
    let last = lines.iter().rposition(|(_, line)| !line.is_empty())?;

    // The block cannot start before a line that breaks continuation
    let mut earliest = 0;
    for j in 1..=last {
        let (_, line) = lines[j];
        if !line.is_empty() && lines[j - 1].1.is_empty() && !LOOSE_CONTINUATION.is_match(line) {
            earliest = j;
        }
    }

    lines[earliest..=last]
        .iter()
        .find(|(_, line)| LIST_ITEM.is_match(line))
        .map(|(start, _)| *start)
}

/// Find the list block at the start of `text` (after any empty lines).
///
/// Returns the byte offset just past the block, including the empty lines
/// that follow it.
pub fn leading_list_block(text: &str) -> Option<usize> {
    let mut lines = line_spans(text).skip_while(|(_, line)| line.is_empty());

    let (first_start, first) = lines.next()?;
    if !LIST_ITEM.is_match(first) {
        return None;
    }

    let mut end = first_start + first.len();
    let mut gap = false;
    for (start, line) in lines {
        if line.is_empty() {
            gap = true;
            continue;
        }
        if gap && !LOOSE_CONTINUATION.is_match(line) {
            break;
        }
        gap = false;
        end = start + line.len();
    }

    // Swallow the newlines after the block
    let trailing = text[end..].bytes().take_while(|&b| b == b'\n').count();
    Some(end + trailing)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_lines() {
        assert_eq!(LineKind::of(""), LineKind::Blank);
        assert_eq!(LineKind::of(" \t "), LineKind::Blank);
        assert_eq!(LineKind::of("- item"), LineKind::ListItem(ListKind::Unordered));
        assert_eq!(LineKind::of("  * item"), LineKind::ListItem(ListKind::Unordered));
        assert_eq!(LineKind::of("12. item"), LineKind::ListItem(ListKind::Ordered));
        assert_eq!(LineKind::of("> quote"), LineKind::Quote);
        assert_eq!(LineKind::of("   >quote"), LineKind::Quote);
        assert_eq!(LineKind::of("    code"), LineKind::IndentedCode);
        assert_eq!(LineKind::of("\tcode"), LineKind::IndentedCode);
        assert_eq!(LineKind::of("### Title"), LineKind::AtxHeading(3));
        assert_eq!(LineKind::of("====="), LineKind::SetextUnderline(1));
        assert_eq!(LineKind::of("---  "), LineKind::SetextUnderline(2));
        assert_eq!(LineKind::of("  [1]: http://x"), LineKind::ReferenceDefinition);
        assert_eq!(LineKind::of("just text"), LineKind::Plain);
        assert_eq!(LineKind::of("-no space"), LineKind::Plain);
        assert_eq!(LineKind::of("#hashtag"), LineKind::Plain);
    }

    #[test]
    fn test_block_prefix() {
        assert!(starts_with_block_prefix("> quoted"));
        assert!(starts_with_block_prefix("- item"));
        assert!(starts_with_block_prefix("3. item"));
        assert!(starts_with_block_prefix("    code"));
        assert!(starts_with_block_prefix("# heading"));
        assert!(starts_with_block_prefix("==="));
        assert!(starts_with_block_prefix("[1]: http://x"));
        assert!(!starts_with_block_prefix("plain words"));
        assert!(!starts_with_block_prefix("  two spaces"));
    }

    #[test]
    fn test_blank_line_gap() {
        assert!(has_blank_line_gap("- a\n\n- b"));
        assert!(!has_blank_line_gap("- a\n- b\n\n"));
        assert!(!has_blank_line_gap("- a\n\n\n- b"));
    }

    #[test]
    fn test_line_spans_offsets() {
        let spans: Vec<_> = line_spans("ab\ncd\n").collect();
        assert_eq!(spans, vec![(0, "ab"), (3, "cd"), (6, "")]);
    }

    #[test]
    fn test_trailing_list_block_simple() {
        let text = "Intro\n- a\n- b\n";
        assert_eq!(trailing_list_block(text), Some(6));
    }

    #[test]
    fn test_trailing_list_block_lazy_continuation() {
        let text = "- a\nwrapped text\n\n";
        assert_eq!(trailing_list_block(text), Some(0));
    }

    #[test]
    fn test_trailing_list_block_loose_items() {
        let text = "1. a\n\n2. b\n\n    more of b";
        assert_eq!(trailing_list_block(text), Some(0));
    }

    #[test]
    fn test_trailing_list_block_broken_by_paragraph() {
        assert_eq!(trailing_list_block("- a\n\npara\n"), None);
        assert_eq!(trailing_list_block("- a\n\npara\n- b"), Some(10));
    }

    #[test]
    fn test_trailing_list_block_none() {
        assert_eq!(trailing_list_block(""), None);
        assert_eq!(trailing_list_block("\n\n"), None);
        assert_eq!(trailing_list_block("plain\n"), None);
    }

    #[test]
    fn test_leading_list_block() {
        let text = "\n2. b\n3. c\n\nAfter";
        assert_eq!(leading_list_block(text), Some(12));
        assert_eq!(&text[..12], "\n2. b\n3. c\n\n");
    }

    #[test]
    fn test_leading_list_block_with_loose_item() {
        let text = "- b\n\n- c\nend";
        assert_eq!(leading_list_block(text), Some(text.len()));
    }

    #[test]
    fn test_leading_list_block_requires_item_first() {
        assert_eq!(leading_list_block("para\n- a"), None);
        assert_eq!(leading_list_block(""), None);
    }
}
