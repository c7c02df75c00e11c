//! Heading level cycling.
//!
//! Each run demotes the current heading by one step toward the most
//! prominent level: none → 2 → 1 → none, and ATX levels 3-6 step down by
//! one until they reach 2. Levels 1 and 2 are written as setext underlines,
//! deeper levels as ATX `#` prefixes.

use crate::markdown::chunk::Chunk;
use crate::markdown::lines::{compile, LineKind};
use log::debug;
use regex::Regex;
use std::sync::LazyLock;

static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| compile(r"\s+"));

/// `##` (plus spaces) opening an ATX heading inside the selection.
static ATX_OPEN: LazyLock<Regex> = LazyLock::new(|| compile(r"^#+[ ]+"));
/// The last line of `before` holding only the ATX opening.
static ATX_OPEN_LINE: LazyLock<Regex> = LazyLock::new(|| compile(r"(?:^|\n)(#+)[ ]*$"));
/// A closing `#` run must end its line.
static ATX_CLOSE_END: LazyLock<Regex> = LazyLock::new(|| compile(r"[ ]+#+[ \t]*$"));
static ATX_CLOSE_START: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^([ ]+#+[ \t]*)(?:\n|$)"));

const PLACEHOLDER: &str = "Heading";

/// Cycle the heading level of the selected line.
pub(super) fn cycle(chunk: &mut Chunk, line_width: usize) {
    let underline = take_selected_underline(chunk);

    chunk.selection = WHITESPACE_RUN
        .replace_all(&chunk.selection, " ")
        .trim()
        .to_string();

    if chunk.selection.is_empty() {
        chunk.start_tag = "## ".to_string();
        chunk.selection = PLACEHOLDER.to_string();
        chunk.end_tag = " ##".to_string();
        return;
    }

    let mut level = take_atx_markup(chunk).unwrap_or(0);
    if let Some(setext) = underline.or_else(|| take_following_underline(chunk)) {
        level = setext;
    }

    chunk.add_blank_lines(1, 1, false);

    let next = if level == 0 { 2 } else { level - 1 };
    debug!("Heading level {} -> {}", level, next);

    match next {
        0 => {}
        1 | 2 => {
            let rule = if next == 1 { '=' } else { '-' };
            let width = chunk.selection.chars().count().min(line_width);
            chunk.end_tag = format!("\n{}", rule.to_string().repeat(width));
        }
        _ => chunk.start_tag = format!("{} ", "#".repeat(next)),
    }
}

/// Remove an ATX opening (and its closing run, if any) around the
/// selection, returning the level.
fn take_atx_markup(chunk: &mut Chunk) -> Option<usize> {
    let level = if let Some(open) = ATX_OPEN_LINE.captures(&chunk.before) {
        let hashes = open.get(1)?;
        let level = hashes.as_str().len();
        let start = hashes.start();
        chunk.before.truncate(start);
        level
    } else {
        let open = ATX_OPEN.find(&chunk.selection)?;
        let level = open.as_str().trim_end().len();
        let end = open.end();
        chunk.selection.drain(..end);
        level
    };

    let line_ends_here = chunk.after.is_empty() || chunk.after.starts_with('\n');
    let closing_in_selection = if line_ends_here {
        ATX_CLOSE_END.find(&chunk.selection).map(|close| close.start())
    } else {
        None
    };

    if let Some(start) = closing_in_selection {
        chunk.selection.truncate(start);
    } else if let Some(close) = ATX_CLOSE_START.captures(&chunk.after).and_then(|caps| caps.get(1)) {
        let end = close.end();
        chunk.after.drain(..end);
    }

    Some(level)
}

/// Split a trailing setext underline off a multi-line selection.
fn take_selected_underline(chunk: &mut Chunk) -> Option<usize> {
    let trimmed = chunk.selection.trim_end_matches('\n');
    let (text, last) = trimmed.rsplit_once('\n')?;
    let LineKind::SetextUnderline(level) = LineKind::of(last) else {
        return None;
    };
    if text.trim().is_empty() {
        return None;
    }
    let keep = text.len();
    chunk.selection.truncate(keep);
    Some(usize::from(level))
}

/// Remove a setext underline on the line after the selection.
fn take_following_underline(chunk: &mut Chunk) -> Option<usize> {
    let rest = chunk.after.strip_prefix('\n')?;
    let line = rest.split('\n').next().unwrap_or_default();
    let LineKind::SetextUnderline(level) = LineKind::of(line) else {
        return None;
    };
    let end = 1 + line.len();
    chunk.after.drain(..end);
    Some(usize::from(level))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn run(text: &str, start: usize, end: usize) -> Chunk {
        let mut chunk = Chunk::new(text, start, end, 0.0);
        cycle(&mut chunk, 40);
        chunk
    }

    #[test]
    fn test_plain_text_becomes_level_two() {
        let chunk = run("Title", 0, 5);
        assert_eq!(chunk.text(), "Title\n-----");
        assert_eq!(chunk.selection, "Title");
    }

    #[test]
    fn test_level_two_becomes_level_one() {
        let chunk = run("Title\n-----", 0, 5);
        assert_eq!(chunk.text(), "Title\n=====");
    }

    #[test]
    fn test_level_one_is_removed() {
        let chunk = run("Title\n=====\n\nBody", 0, 5);
        assert_eq!(chunk.text(), "Title\n\nBody");
    }

    #[test]
    fn test_atx_level_two_becomes_setext_level_one() {
        let chunk = run("## Title", 3, 8);
        assert_eq!(chunk.text(), "Title\n=====");
    }

    #[test]
    fn test_atx_deep_levels_step_down() {
        assert_eq!(run("#### Title", 5, 10).text(), "### Title");
        assert_eq!(run("### Title ###", 4, 9).text(), "Title\n-----");
    }

    #[test]
    fn test_atx_markup_inside_selection() {
        let chunk = run("### Title", 0, 9);
        assert_eq!(chunk.text(), "Title\n-----");
    }

    #[test]
    fn test_underline_inside_selection() {
        let chunk = run("Title\n=====", 0, 11);
        assert_eq!(chunk.text(), "Title");
    }

    #[test]
    fn test_hash_inside_text_is_not_a_heading() {
        let chunk = run("I like C#", 0, 9);
        assert_eq!(chunk.text(), "I like C#\n---------");
    }

    #[test]
    fn test_closing_hashes_need_a_space() {
        let chunk = run("## C#", 3, 5);
        assert_eq!(chunk.text(), "C#\n==");
    }

    #[test]
    fn test_hash_word_after_title_is_kept() {
        let chunk = run("## Title #rust", 3, 8);
        assert_eq!(chunk.text(), "Title\n=====\n\n #rust");
        assert_eq!(chunk.selection, "Title");
    }

    #[test]
    fn test_hash_word_inside_selection_is_kept() {
        let chunk = run("## Title #rust and more", 3, 14);
        assert_eq!(chunk.selection, "Title #rust");
        assert!(chunk.text().ends_with(" and more"));
    }

    #[test]
    fn test_closing_run_with_trailing_space_removed() {
        let chunk = run("### Title ### \nnext", 4, 9);
        assert_eq!(chunk.text(), "Title\n-----\n\nnext");
    }

    #[test]
    fn test_empty_selection_inserts_placeholder() {
        let chunk = run("", 0, 0);
        assert_eq!(chunk.text(), "## Heading ##");
        assert_eq!(chunk.selection, "Heading");
    }

    #[test]
    fn test_whitespace_collapsed_and_blank_lines_added() {
        let chunk = run("para\nsome   long\ttitle\nmore", 5, 22);
        assert_eq!(chunk.selection, "some long title");
        assert_eq!(
            chunk.text(),
            "para\n\nsome long title\n---------------\n\nmore"
        );
    }

    #[test]
    fn test_underline_capped_at_line_width() {
        let mut chunk = Chunk::from_parts("", "a rather long heading text", "");
        cycle(&mut chunk, 10);
        assert_eq!(chunk.end_tag, "\n----------");
    }
}
