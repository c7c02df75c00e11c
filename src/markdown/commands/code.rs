//! Inline code spans and indented code blocks.

use super::CommandOptions;
use crate::markdown::chunk::{Chunk, TagPattern};
use crate::markdown::lines::{compile, is_blank};
use log::debug;
use regex::Regex;
use std::sync::LazyLock;

static BACKTICK: LazyLock<TagPattern> = LazyLock::new(|| TagPattern::fixed("`"));

static TEXT_BEFORE: LazyLock<Regex> = LazyLock::new(|| compile(r"\S[ ]*$"));
static TEXT_AFTER: LazyLock<Regex> = LazyLock::new(|| compile(r"^[ ]*\S"));

/// The line right before the caret is already an indented code line.
static CODE_LINE_BEFORE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?:^|\n)(?:\t|[ ]{4,}).*\n$"));
static CODE_LINE_AFTER: LazyLock<Regex> = LazyLock::new(|| compile(r"^\n(?:\t|[ ]{4,})"));

/// A line with content that is not indented as code.
static UNINDENTED_LINE: LazyLock<Regex> = LazyLock::new(|| compile(r"^[ ]{0,3}\S"));

const INDENT: &str = "    ";
const PLACEHOLDER: &str = "enter code here";

/// Toggle code markup: backticks when the selection sits inside a line of
/// text, a four-space indented block otherwise.
pub(super) fn toggle(chunk: &mut Chunk, options: &CommandOptions) {
    let text_before = TEXT_BEFORE.is_match(&chunk.before);
    let text_after = TEXT_AFTER.is_match(&chunk.after);

    // Text touching either side puts the selection inside a line; a block
    // there would split the line, so only a bare line becomes a block.
    if chunk.selection.contains('\n') || !(text_before || text_after) {
        toggle_block(chunk, options);
    } else {
        toggle_inline(chunk, options);
    }
}

fn toggle_block(chunk: &mut Chunk, options: &CommandOptions) {
    if chunk.before.ends_with(INDENT) {
        chunk.before.truncate(chunk.before.len() - INDENT.len());
        chunk.selection.insert_str(0, INDENT);
    }

    let continues_block =
        CODE_LINE_BEFORE.is_match(&chunk.before) || CODE_LINE_AFTER.is_match(&chunk.after);
    chunk.add_blank_lines(usize::from(!continues_block), 1, false);

    if chunk.selection.is_empty() {
        debug!("Starting code block");
        chunk.start_tag = INDENT.to_string();
        if !options.prevent_placeholder {
            chunk.selection = PLACEHOLDER.to_string();
        }
    } else if chunk.selection.lines().any(|line| UNINDENTED_LINE.is_match(line)) {
        debug!("Indenting code block");
        chunk.selection = map_lines(&chunk.selection, |line| {
            if is_blank(line) {
                line.to_string()
            } else {
                format!("{}{}", INDENT, line)
            }
        });
    } else {
        debug!("Outdenting code block");
        chunk.selection = map_lines(&chunk.selection, |line| {
            line.strip_prefix(INDENT).unwrap_or(line).to_string()
        });
    }
}

fn toggle_inline(chunk: &mut Chunk, options: &CommandOptions) {
    chunk.trim_whitespace(false);
    chunk.set_tags(Some(&BACKTICK), Some(&BACKTICK));

    match (chunk.start_tag.is_empty(), chunk.end_tag.is_empty()) {
        (true, true) => {
            debug!("Adding code span");
            chunk.start_tag = "`".to_string();
            chunk.end_tag = "`".to_string();
            if chunk.selection.is_empty() && !options.prevent_placeholder {
                chunk.selection = PLACEHOLDER.to_string();
            }
        }
        (true, false) => {
            // A closing backtick alone: a bare caret steps over it
            let tick = std::mem::take(&mut chunk.end_tag);
            if chunk.selection.is_empty() {
                chunk.before.push_str(&tick);
            } else {
                chunk.after.insert_str(0, &tick);
            }
        }
        (false, true) => {
            let tick = std::mem::take(&mut chunk.start_tag);
            chunk.before.push_str(&tick);
        }
        (false, false) => {
            debug!("Removing code span");
            chunk.start_tag.clear();
            chunk.end_tag.clear();
        }
    }
}

fn map_lines(text: &str, f: impl Fn(&str) -> String) -> String {
    text.split('\n').map(f).collect::<Vec<_>>().join("\n")
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
