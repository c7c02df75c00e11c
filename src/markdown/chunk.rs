//! The Chunk Model
//!
//! A [`Chunk`] is the working set of exactly one formatting command: the
//! buffer split around the selection into `before`, `selection` and `after`,
//! plus the `start_tag`/`end_tag` markup fragments that bracket the selection.
//!
//! A chunk is built fresh from the editor state for every command, mutated in
//! place by a single runner, then reassembled as
//! `before + start_tag + selection + end_tag + after`. Line endings are
//! normalized to `\n` at construction and never reintroduced.
//!
//! # Example
//! ```
//! use wmd::markdown::Chunk;
//!
//! let mut chunk = Chunk::new("Hello  world ", 5, 13, 0.0);
//! chunk.trim_whitespace(false);
//! assert_eq!(chunk.selection, "world");
//! assert_eq!(chunk.text(), "Hello  world ");
//! ```

use crate::markdown::lines::{compile, is_blank, starts_with_block_prefix};
use crate::string_utils::{clamp_selection, normalize_line_endings};
use regex::Regex;

// ─────────────────────────────────────────────────────────────────────────────
// Tag Patterns
// ─────────────────────────────────────────────────────────────────────────────

/// A markup pattern compiled for both edges it is matched against: anchored
/// at the end of a region (`before`, `selection`) and at the start of one
/// (`selection`, `after`).
#[derive(Debug, Clone)]
pub struct TagPattern {
    leading: Regex,
    trailing: Regex,
}

impl TagPattern {
    /// Compile a pattern for use with [`Chunk::set_tags`].
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            leading: Regex::new(&format!("^(?:{})", pattern))?,
            trailing: Regex::new(&format!("(?:{})$", pattern))?,
        })
    }

    /// Compile one of the crate's built-in patterns.
    pub(crate) fn fixed(pattern: &str) -> Self {
        Self {
            leading: compile(&format!("^(?:{})", pattern)),
            trailing: compile(&format!("(?:{})$", pattern)),
        }
    }

    /// Remove the match at the start of `text` and return it.
    fn take_leading(&self, text: &mut String) -> Option<String> {
        let end = self.leading.find(text)?.end();
        Some(text.drain(..end).collect())
    }

    /// Remove the match at the end of `text` and return it.
    fn take_trailing(&self, text: &mut String) -> Option<String> {
        let start = self.trailing.find(text)?.start();
        Some(text.split_off(start))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Chunk
// ─────────────────────────────────────────────────────────────────────────────

/// One edit operation's view of the buffer.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Chunk {
    /// Text preceding the selection
    pub before: String,
    /// The selected text (empty for a bare caret)
    pub selection: String,
    /// Text following the selection
    pub after: String,
    /// Markup placed between `before` and `selection`
    pub start_tag: String,
    /// Markup placed between `selection` and `after`
    pub end_tag: String,
    /// Opaque viewport offset, handed back untouched
    pub scroll_top: f32,
}

impl Chunk {
    /// Split `text` around the byte range `start..end`.
    ///
    /// Offsets are clamped to the text and to character boundaries, so any
    /// pair of numbers is accepted.
    pub fn new(text: &str, start: usize, end: usize, scroll_top: f32) -> Self {
        let (start, end) = clamp_selection(text, start, end);
        Self {
            before: normalize_line_endings(&text[..start]),
            selection: normalize_line_endings(&text[start..end]),
            after: normalize_line_endings(&text[end..]),
            start_tag: String::new(),
            end_tag: String::new(),
            scroll_top,
        }
    }

    /// Build a chunk directly from its three regions.
    pub fn from_parts(before: &str, selection: &str, after: &str) -> Self {
        Self {
            before: normalize_line_endings(before),
            selection: normalize_line_endings(selection),
            after: normalize_line_endings(after),
            ..Self::default()
        }
    }

    /// The reassembled buffer.
    pub fn text(&self) -> String {
        [
            self.before.as_str(),
            &self.start_tag,
            &self.selection,
            &self.end_tag,
            &self.after,
        ]
        .concat()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Primitives
    // ─────────────────────────────────────────────────────────────────────────

    /// Separate the (tagged) selection from its surroundings with blank lines.
    ///
    /// Newlines at the edges of the selection are first moved out into the
    /// tags, and from there into `before`/`after`. Then `before` is made to
    /// end with `n_before + 1` newlines and `after` to start with
    /// `n_after + 1`. Without `greedy`, existing longer runs are kept; with
    /// it, they are replaced by exactly that many. Empty regions are left
    /// empty.
    pub fn add_blank_lines(&mut self, n_before: usize, n_after: usize, greedy: bool) -> &mut Self {
        let leading = take_leading_newlines(&mut self.selection);
        self.start_tag.push_str(&leading);
        let trailing = take_trailing_newlines(&mut self.selection);
        self.end_tag.insert_str(0, &trailing);

        let leading = take_leading_newlines(&mut self.start_tag);
        self.before.push_str(&leading);
        let trailing = take_trailing_newlines(&mut self.end_tag);
        self.after.insert_str(0, &trailing);

        if !self.before.is_empty() {
            let existing = take_trailing_newlines(&mut self.before).len();
            let wanted = n_before + 1;
            let count = if greedy { wanted } else { existing.max(wanted) };
            self.before.push_str(&"\n".repeat(count));
        }

        if !self.after.is_empty() {
            let existing = take_leading_newlines(&mut self.after).len();
            let wanted = n_after + 1;
            let count = if greedy { wanted } else { existing.max(wanted) };
            self.after.insert_str(0, &"\n".repeat(count));
        }

        self
    }

    /// Move markup matching `start` out of the end of `before` and the start
    /// of `selection` into `start_tag`, and markup matching `end` out of the
    /// end of `selection` and the start of `after` into `end_tag`.
    ///
    /// Left-to-right order is preserved when both regions match.
    pub fn set_tags(&mut self, start: Option<&TagPattern>, end: Option<&TagPattern>) -> &mut Self {
        if let Some(pattern) = start {
            if let Some(markup) = pattern.take_trailing(&mut self.before) {
                self.start_tag.insert_str(0, &markup);
            }
            if let Some(markup) = pattern.take_leading(&mut self.selection) {
                self.start_tag.push_str(&markup);
            }
        }

        if let Some(pattern) = end {
            if let Some(markup) = pattern.take_trailing(&mut self.selection) {
                self.end_tag.insert_str(0, &markup);
            }
            if let Some(markup) = pattern.take_leading(&mut self.after) {
                self.end_tag.push_str(&markup);
            }
        }

        self
    }

    /// Strip whitespace from both ends of the selection.
    ///
    /// Unless `discard` is set, the stripped whitespace is kept by moving it
    /// into `before`/`after`.
    pub fn trim_whitespace(&mut self, discard: bool) -> &mut Self {
        let kept = self.selection.trim_start().len();
        let leading: String = self.selection.drain(..self.selection.len() - kept).collect();
        let trailing = self.selection.split_off(self.selection.trim_end().len());

        if !discard {
            self.before.push_str(&leading);
            self.after.insert_str(0, &trailing);
        }

        self
    }

    /// Join soft-wrapped selection lines into paragraphs.
    ///
    /// A line break becomes a single space unless either side is empty, or
    /// the next line is blank or opens a Markdown block.
    pub fn unwrap_lines(&mut self) -> &mut Self {
        let lines: Vec<&str> = self.selection.split('\n').collect();
        let mut joined = String::with_capacity(self.selection.len());

        for (i, line) in lines.iter().enumerate() {
            joined.push_str(line);
            if let Some(next) = lines.get(i + 1) {
                let soft_break =
                    !line.is_empty() && !is_blank(next) && !starts_with_block_prefix(next);
                joined.push(if soft_break { ' ' } else { '\n' });
            }
        }

        self.selection = joined;
        self
    }

    /// Re-flow the selection into lines of at most `width` characters.
    ///
    /// Lines are broken at the last run of spaces that fits; a word longer
    /// than `width` stays whole. Lines that open a Markdown block are
    /// emitted untouched. Trailing whitespace is removed.
    pub fn wrap_lines(&mut self, width: usize) -> &mut Self {
        self.unwrap_lines();
        let flowed = reflow(&self.selection, width.max(1));
        self.selection = flowed.trim_end().to_string();
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn take_leading_newlines(text: &mut String) -> String {
    let count = text.bytes().take_while(|&b| b == b'\n').count();
    text.drain(..count).collect()
}

fn take_trailing_newlines(text: &mut String) -> String {
    let count = text.bytes().rev().take_while(|&b| b == b'\n').count();
    text.split_off(text.len() - count)
}

/// Greedy line filling, one logical line at a time.
///
/// Blank lines and lines opening a Markdown block pass through untouched.
/// Plain lines are filled word by word; a break is never placed in front of
/// a word that would open a block at the start of its new line, so
/// [`Chunk::unwrap_lines`] can always join the pieces again.
fn reflow(text: &str, width: usize) -> String {
    text.split('\n')
        .map(|line| {
            if is_blank(line) || starts_with_block_prefix(line) {
                line.to_string()
            } else {
                fill_line(line, width)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn fill_line(line: &str, width: usize) -> String {
    let indent = line.len() - line.trim_start_matches(' ').len();
    let mut out = String::with_capacity(line.len() + line.len() / width + 1);
    out.push_str(&line[..indent]);

    let mut column = indent;
    let mut first = true;
    let mut gap = "";
    let mut rest = &line[indent..];

    while !rest.is_empty() {
        let word_end = rest.find(' ').unwrap_or(rest.len());
        let word = &rest[..word_end];
        let word_width = word.chars().count();

        if first {
            out.push_str(word);
            column += word_width;
            first = false;
        } else if column + gap.len() + word_width <= width || starts_with_block_prefix(rest) {
            out.push_str(gap);
            out.push_str(word);
            column += gap.len() + word_width;
        } else {
            out.push('\n');
            out.push_str(word);
            column = word_width;
        }

        let tail = &rest[word_end..];
        let spaces = tail.len() - tail.trim_start_matches(' ').len();
        gap = &tail[..spaces];
        rest = &tail[spaces..];
    }

    out
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(before: &str, selection: &str, after: &str) -> Chunk {
        Chunk::from_parts(before, selection, after)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Construction
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_new_splits_at_selection() {
        let c = Chunk::new("Hello world", 6, 11, 12.5);
        assert_eq!(c.before, "Hello ");
        assert_eq!(c.selection, "world");
        assert_eq!(c.after, "");
        assert_eq!(c.scroll_top, 12.5);
        assert!(c.start_tag.is_empty() && c.end_tag.is_empty());
    }

    #[test]
    fn test_new_normalizes_line_endings() {
        let c = Chunk::new("a\r\nb\r\nc\rd", 3, 6, 0.0);
        assert_eq!(c.before, "a\n");
        assert_eq!(c.selection, "b\n");
        assert_eq!(c.after, "c\nd");
        assert!(!c.text().contains('\r'));
    }

    #[test]
    fn test_new_clamps_bad_offsets() {
        let c = Chunk::new("på", 2, 99, 0.0);
        assert_eq!(c.before, "p");
        assert_eq!(c.selection, "å");
    }

    // ─────────────────────────────────────────────────────────────────────────
    // add_blank_lines
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_add_blank_lines_pads_both_sides() {
        let mut c = chunk("para", "text", "next");
        c.add_blank_lines(1, 1, false);
        assert_eq!(c.text(), "para\n\ntext\n\nnext");
    }

    #[test]
    fn test_add_blank_lines_keeps_longer_runs() {
        let mut c = chunk("para\n\n\n\n", "text", "\n\n\nnext");
        c.add_blank_lines(1, 1, false);
        assert_eq!(c.before, "para\n\n\n\n");
        assert_eq!(c.after, "\n\n\nnext");
    }

    #[test]
    fn test_add_blank_lines_greedy_replaces_runs() {
        let mut c = chunk("para\n\n\n\n", "text", "\n\n\nnext");
        c.add_blank_lines(0, 0, true);
        assert_eq!(c.text(), "para\ntext\nnext");
    }

    #[test]
    fn test_add_blank_lines_moves_selection_newlines_out() {
        let mut c = chunk("a", "\n\nmiddle\n", "b");
        c.add_blank_lines(1, 1, false);
        assert_eq!(c.selection, "middle");
        assert!(c.start_tag.is_empty());
        assert!(c.end_tag.is_empty());
        assert_eq!(c.text(), "a\n\nmiddle\n\nb");
    }

    #[test]
    fn test_add_blank_lines_leaves_empty_regions_alone() {
        let mut c = chunk("", "only", "");
        c.add_blank_lines(2, 2, true);
        assert_eq!(c.text(), "only");
    }

    // ─────────────────────────────────────────────────────────────────────────
    // set_tags
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_set_tags_from_surroundings() {
        let stars = TagPattern::new(r"\*\*").unwrap();
        let mut c = chunk("say **", "hi", "** now");
        c.set_tags(Some(&stars), Some(&stars));
        assert_eq!(c.before, "say ");
        assert_eq!(c.start_tag, "**");
        assert_eq!(c.end_tag, "**");
        assert_eq!(c.after, " now");
        assert_eq!(c.text(), "say **hi** now");
    }

    #[test]
    fn test_set_tags_preserves_order_when_both_match() {
        let tick = TagPattern::new("`").unwrap();
        let mut c = chunk("`", "`code`", "`");
        c.set_tags(Some(&tick), Some(&tick));
        assert_eq!(c.start_tag, "``");
        assert_eq!(c.selection, "code");
        assert_eq!(c.end_tag, "``");
    }

    #[test]
    fn test_set_tags_without_match_is_noop() {
        let tick = TagPattern::new("`").unwrap();
        let mut c = chunk("a ", "b", " c");
        c.set_tags(Some(&tick), Some(&tick));
        assert_eq!(c, chunk("a ", "b", " c"));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // trim_whitespace
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_trim_whitespace_keeps_characters() {
        let mut c = chunk("x", " \n word\t ", "y");
        c.trim_whitespace(false);
        assert_eq!(c.selection, "word");
        assert_eq!(c.before, "x \n ");
        assert_eq!(c.after, "\t y");
    }

    #[test]
    fn test_trim_whitespace_discard() {
        let mut c = chunk("x", "  word  ", "y");
        c.trim_whitespace(true);
        assert_eq!(c.text(), "xwordy");
    }

    #[test]
    fn test_trim_whitespace_all_blank() {
        let mut c = chunk("x", "   ", "y");
        c.trim_whitespace(false);
        assert_eq!(c.selection, "");
        assert_eq!(c.text(), "x   y");
    }

    // ─────────────────────────────────────────────────────────────────────────
    // unwrap / wrap
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_unwrap_joins_soft_breaks() {
        let mut c = chunk("", "one\ntwo\nthree", "");
        c.unwrap_lines();
        assert_eq!(c.selection, "one two three");
    }

    #[test]
    fn test_unwrap_keeps_paragraphs_and_blocks() {
        let mut c = chunk("", "para\n\nnext\n- item\n> quote\n    code", "");
        c.unwrap_lines();
        assert_eq!(c.selection, "para\n\nnext\n- item\n> quote\n    code");
    }

    #[test]
    fn test_wrap_breaks_at_spaces() {
        let mut c = chunk("", "the quick brown fox jumps over the lazy dog", "");
        c.wrap_lines(10);
        assert_eq!(c.selection, "the quick\nbrown fox\njumps over\nthe lazy\ndog");
    }

    #[test]
    fn test_wrap_keeps_long_words_whole() {
        let mut c = chunk("", "a supercalifragilistic word", "");
        c.wrap_lines(6);
        assert_eq!(c.selection, "a\nsupercalifragilistic\nword");
    }

    #[test]
    fn test_wrap_leaves_block_lines_alone() {
        let mut c = chunk("", "intro text\n> quoted line", "");
        c.wrap_lines(8);
        assert_eq!(c.selection, "intro\ntext\n> quoted line");
    }

    #[test]
    fn test_wrap_then_unwrap_is_inverse() {
        let original = "Lorem ipsum dolor sit amet, consectetur adipiscing elit sed do";
        let mut c = chunk("", original, "");
        c.wrap_lines(16);
        assert!(c.selection.lines().all(|l| l.chars().count() <= 16));
        c.unwrap_lines();
        assert_eq!(c.selection, original);
    }

    #[test]
    fn test_wrap_handles_multibyte_text() {
        let mut c = chunk("", "æøå æøå æøå", "");
        c.wrap_lines(7);
        assert_eq!(c.selection, "æøå æøå\næøå");
    }

    #[test]
    fn test_wrap_never_starts_a_line_with_block_markup() {
        let mut c = chunk("", "one two *three* four five", "");
        c.wrap_lines(10);
        assert_eq!(c.selection, "one two *three*\nfour five");

        let mut c = chunk("", "version 2.5 is here", "");
        c.wrap_lines(8);
        assert_eq!(c.selection, "version 2.5\nis here");
    }

    #[test]
    fn test_wrap_then_unwrap_keeps_inline_markup() {
        for original in [
            "one two *three* four five",
            "version 2.5 is here",
            "tagged #rust and - dash",
            "a -> b and + c = d_e",
        ] {
            for width in 1..=12 {
                let mut c = chunk("", original, "");
                c.wrap_lines(width);
                c.unwrap_lines();
                assert_eq!(c.selection, original, "width {}", width);
            }
        }
    }

    #[test]
    fn test_primitives_on_empty_chunk() {
        let mut c = Chunk::default();
        c.add_blank_lines(1, 1, true)
            .trim_whitespace(false)
            .unwrap_lines()
            .wrap_lines(40);
        assert_eq!(c.text(), "");
    }
}
