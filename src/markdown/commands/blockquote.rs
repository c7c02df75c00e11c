//! Blockquote toggling.
//!
//! Quote markup works on whole lines. Quote blocks directly above or below
//! the selection are pulled into the tags so that quoting next to an
//! existing quote merges the two instead of stacking marker lines.

use super::CommandOptions;
use crate::markdown::chunk::Chunk;
use crate::markdown::lines::{compile, is_blank, LineKind};
use log::debug;
use regex::Regex;
use std::sync::LazyLock;

/// Quote block(s) running up to the end of the text, plus trailing blank lines.
static QUOTE_BLOCK_BEFORE: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?:(?:\n|^)(?:\n[ \t]*)*>(?:.+\n)*.*)+(?:\n[ \t]*)*$")
});

/// Quote block(s) at the start of the text, plus trailing blank lines.
static QUOTE_BLOCK_AFTER: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"^(?:(?:\n|^)(?:\n[ \t]*)*>(?:.+\n)*.*)+(?:\n[ \t]*)*")
});

/// One level of quote marker.
static QUOTE_MARKER: LazyLock<Regex> = LazyLock::new(|| compile(r"^[ ]{0,3}> ?"));

/// A line that is empty apart from an optional quote marker.
static EMPTY_QUOTE_LINE: LazyLock<Regex> = LazyLock::new(|| compile(r"^[ ]{0,3}>?[ \t]*$"));

/// A last line of `before` holding only quote markers; the final one is
/// captured.
static MARKER_BEFORE_CARET: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?:^|\n)(?:[ ]{0,3}>)*[ ]{0,3}(>[ \t]*)$"));

const PLACEHOLDER: &str = "Blockquote";

/// Quote or unquote the lines of the selection.
pub(super) fn toggle(chunk: &mut Chunk, options: &CommandOptions) {
    // Blank lines at the edges stay outside the quote
    if chunk.selection.contains(|c: char| c != '\n') {
        let leading = chunk.selection.len() - chunk.selection.trim_start_matches('\n').len();
        let moved: String = chunk.selection.drain(..leading).collect();
        chunk.before.push_str(&moved);

        let kept = chunk.selection.trim_end_matches('\n').len();
        let moved = chunk.selection.split_off(kept);
        chunk.after.insert_str(0, &moved);
    }

    // An empty quote marker right before the caret belongs to the selection
    let marker_start = MARKER_BEFORE_CARET
        .captures(&chunk.before)
        .and_then(|caps| caps.get(1))
        .map(|m| m.start());
    if let Some(start) = marker_start {
        let marker = chunk.before.split_off(start);
        chunk.selection.insert_str(0, &marker);
    }

    if chunk.selection.chars().all(|c| c.is_whitespace() || c == '>') {
        chunk.selection.clear();
    }
    if chunk.selection.is_empty() && !options.prevent_placeholder {
        chunk.selection = PLACEHOLDER.to_string();
    }

    if !chunk.before.is_empty() && !chunk.before.ends_with('\n') {
        chunk.before.push('\n');
    }
    if !chunk.after.is_empty() && !chunk.after.starts_with('\n') {
        chunk.after.insert(0, '\n');
    }

    if let Some(start) = QUOTE_BLOCK_BEFORE.find(&chunk.before).map(|m| m.start()) {
        chunk.start_tag = chunk.before.split_off(start);
    }
    if let Some(end) = QUOTE_BLOCK_AFTER.find(&chunk.after).map(|m| m.end()) {
        let rest = chunk.after.split_off(end);
        chunk.end_tag = std::mem::replace(&mut chunk.after, rest);
    }

    if is_quoted(&chunk.selection) {
        debug!("Removing blockquote");
        chunk.selection = map_lines(&chunk.selection, |line| {
            QUOTE_MARKER.replace(line, "").into_owned()
        });
        chunk.unwrap_lines();
        replace_blank_lines_in_tags(chunk, "");

        let first_is_quote = chunk.selection.lines().next().map(LineKind::of) == Some(LineKind::Quote);
        if !first_is_quote && !chunk.start_tag.is_empty() {
            let newlines = chunk.start_tag.len() - chunk.start_tag.trim_end_matches('\n').len();
            chunk.start_tag.push_str(&"\n".repeat(2usize.saturating_sub(newlines)));
        }

        let last_is_quote = chunk.selection.rsplit('\n').next().map(LineKind::of) == Some(LineKind::Quote);
        if !last_is_quote && !chunk.end_tag.is_empty() {
            let newlines = chunk.end_tag.len() - chunk.end_tag.trim_start_matches('\n').len();
            chunk.end_tag.insert_str(0, &"\n".repeat(2usize.saturating_sub(newlines)));
        }
    } else {
        debug!("Adding blockquote");
        chunk.wrap_lines(options.line_width.saturating_sub(2));
        chunk.selection = map_lines(&chunk.selection, |line| format!("> {}", line));
        replace_blank_lines_in_tags(chunk, "> ");
        chunk.add_blank_lines(1, 1, false);
    }

    // A single line keeps its marker outside the selection
    if !chunk.selection.contains('\n') {
        if let Some(rest) = chunk.selection.strip_prefix('>') {
            let marker = 1 + rest.len() - rest.trim_start_matches(' ').len();
            let moved: String = chunk.selection.drain(..marker).collect();
            chunk.start_tag.push_str(&moved);
        }
    }
}

/// Whether every non-blank line of `text` is a quote line (and there is one).
fn is_quoted(text: &str) -> bool {
    let mut lines = text.split('\n').filter(|line| !is_blank(line)).peekable();
    lines.peek().is_some() && lines.all(|line| LineKind::of(line) == LineKind::Quote)
}

fn map_lines(text: &str, f: impl Fn(&str) -> String) -> String {
    text.split('\n').map(f).collect::<Vec<_>>().join("\n")
}

fn is_marker_or_space(c: char) -> bool {
    c == '>' || c.is_whitespace()
}

/// Rewrite the empty (or marker-only) lines between the selection and the
/// adjoining quote blocks held in the tags.
fn replace_blank_lines_in_tags(chunk: &mut Chunk, replacement: &str) {
    let replace = |middle: &str| {
        map_lines(middle, |line| {
            if EMPTY_QUOTE_LINE.is_match(line) {
                replacement.to_string()
            } else {
                line.to_string()
            }
        })
    };

    // start_tag: the lines between its last content line and its final newline
    if let Some(body) = chunk.start_tag.strip_suffix('\n') {
        let run_start = body.trim_end_matches(is_marker_or_space).len();
        if let Some(offset) = body[run_start..].find('\n') {
            let newline = run_start + offset;
            let middle = replace(&body[newline + 1..]);
            chunk.start_tag = format!("{}\n{}\n", &body[..newline], middle);
        }
    }

    // end_tag: the lines between its leading newline and its first content line
    if let Some(body) = chunk.end_tag.strip_prefix('\n') {
        let run_end = body.len() - body.trim_start_matches(is_marker_or_space).len();
        if let Some(newline) = body[..run_end].rfind('\n') {
            let middle = replace(&body[..newline]);
            chunk.end_tag = format!("\n{}\n{}", middle, &body[newline + 1..]);
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
