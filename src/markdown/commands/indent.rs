//! Block continuation after Enter.
//!
//! Runs right after the editing surface inserted a newline. A list item,
//! quote or code line directly above the caret is continued with an empty
//! one; an empty item or quote line ends the block instead.

use super::{blockquote, code, list, CommandOptions};
use crate::markdown::chunk::Chunk;
use crate::markdown::lines::{compile, LineKind};
use log::debug;
use regex::Regex;
use std::sync::LazyLock;

static EMPTY_ITEM_LINE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?:^|\n)[ ]{0,3}(?:[*+-]|\d+[.])[ \t]*\n$"));
static EMPTY_QUOTE_LINE: LazyLock<Regex> = LazyLock::new(|| compile(r"(?:^|\n)[ ]{0,3}>[ \t]*\n$"));
static WHITESPACE_LINE: LazyLock<Regex> = LazyLock::new(|| compile(r"(?:^|\n)[ \t]+\n$"));

/// Continue (or end) the block the caret's previous line belongs to.
pub(super) fn continue_block(chunk: &mut Chunk, options: &CommandOptions) {
    for pattern in [&EMPTY_ITEM_LINE, &EMPTY_QUOTE_LINE, &WHITESPACE_LINE] {
        if let Some(start) = pattern.find(&chunk.before).map(|m| m.start()) {
            debug!("Ending block at empty line");
            chunk.before.truncate(start);
            chunk.before.push_str("\n\n");
        }
    }

    let Some(previous) = chunk.before.strip_suffix('\n') else {
        return;
    };
    let line = previous.rsplit('\n').next().unwrap_or_default();

    let options = CommandOptions {
        prevent_placeholder: true,
        ..*options
    };

    match LineKind::of(line) {
        LineKind::ListItem(kind) => {
            debug!("Continuing {:?} list", kind);
            list::toggle(chunk, kind, &options);
        }
        LineKind::Quote => {
            debug!("Continuing blockquote");
            blockquote::toggle(chunk, &options);
        }
        LineKind::IndentedCode => {
            debug!("Continuing code block");
            code::toggle(chunk, &options);
        }
        _ => {}
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn run(before: &str, after: &str) -> Chunk {
        let mut chunk = Chunk::from_parts(before, "", after);
        continue_block(&mut chunk, &CommandOptions::default());
        chunk
    }

    #[test]
    fn test_continues_bullet_list() {
        let chunk = run("- a\n", "");
        assert_eq!(chunk.text(), "- a\n- ");
        assert!(chunk.selection.is_empty());
    }

    #[test]
    fn test_continues_numbered_list() {
        let chunk = run("1. a\n", "");
        assert_eq!(chunk.text(), "1. a\n2. ");
    }

    #[test]
    fn test_empty_item_ends_list() {
        let chunk = run("- a\n- \n", "");
        assert_eq!(chunk.text(), "- a\n\n");
    }

    #[test]
    fn test_continues_quote() {
        let chunk = run("> hello\n", "");
        assert_eq!(chunk.text(), "> hello\n> ");
        assert!(chunk.selection.is_empty());
    }

    #[test]
    fn test_empty_quote_line_ends_quote() {
        let chunk = run("> hello\n>\n", "");
        assert_eq!(chunk.text(), "> hello\n\n");
    }

    #[test]
    fn test_continues_code_block() {
        let chunk = run("    x = 1\n", "");
        assert_eq!(chunk.text(), "    x = 1\n    ");
    }

    #[test]
    fn test_plain_line_is_left_alone() {
        let chunk = run("text\n", "more");
        assert_eq!(chunk.text(), "text\nmore");
    }

    #[test]
    fn test_caret_mid_line_is_left_alone() {
        let chunk = run("- a", "");
        assert_eq!(chunk.text(), "- a");
    }
}
