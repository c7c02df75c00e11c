//! Ordered and unordered list items.
//!
//! Toggling a list item on also renumbers the sibling items directly above
//! and below it, so an ordered list stays sequential, and re-flows the
//! item's text to the line width with continuation lines aligned under it.

use super::CommandOptions;
use crate::markdown::chunk::{Chunk, TagPattern};
use crate::markdown::lines::{
    compile, has_blank_line_gap, leading_list_block, trailing_list_block, ListKind,
};
use log::debug;
use regex::Regex;
use std::sync::LazyLock;

/// A list marker bracketing the selection, with any newlines before it.
static MARKER: LazyLock<TagPattern> =
    LazyLock::new(|| TagPattern::fixed(r"\n*[ ]{0,3}(?:[*+-]|\d+[.])\s+"));

/// The marker of one item line, up to and including one space.
static ITEM_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^[ ]{0,3}(?:[*+-]|\d+[.])[ \t]"));

const PLACEHOLDER: &str = "List item";

// ─────────────────────────────────────────────────────────────────────────────
// Numbering
// ─────────────────────────────────────────────────────────────────────────────

/// Hands out item prefixes (`"1. "`, `"2. "`, ... or `"- "`) in order.
#[derive(Debug)]
struct Numbering {
    kind: ListKind,
    bullet: char,
    next: usize,
}

impl Numbering {
    fn new(kind: ListKind) -> Self {
        Self {
            kind,
            bullet: '-',
            next: 1,
        }
    }

    fn next_prefix(&mut self) -> String {
        match self.kind {
            ListKind::Ordered => {
                let prefix = format!("{}. ", self.next);
                self.next += 1;
                prefix
            }
            ListKind::Unordered => format!("{} ", self.bullet),
        }
    }

    /// Rewrite the marker of every item line in `block`.
    fn apply(&mut self, block: &str) -> String {
        let mut lines = Vec::new();
        for line in block.split('\n') {
            match ITEM_PREFIX.find(line) {
                Some(marker) => lines.push(format!("{}{}", self.next_prefix(), &line[marker.end()..])),
                None => lines.push(line.to_string()),
            }
        }
        lines.join("\n")
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Runner
// ─────────────────────────────────────────────────────────────────────────────

/// Toggle a `kind` list item at the selection.
pub(super) fn toggle(chunk: &mut Chunk, kind: ListKind, options: &CommandOptions) {
    chunk.set_tags(Some(&MARKER), None);

    // A marker in the middle of a line is just text
    if !chunk.before.is_empty() && !chunk.before.ends_with('\n') && !chunk.start_tag.starts_with('\n') {
        let marker = std::mem::take(&mut chunk.start_tag);
        chunk.before.push_str(&marker);
    }

    if !chunk.start_tag.is_empty() {
        let detected = if chunk.start_tag.bytes().any(|b| b.is_ascii_digit()) {
            ListKind::Ordered
        } else {
            ListKind::Unordered
        };
        let marker_width = chunk.start_tag.trim_matches('\n').chars().count();

        chunk.start_tag.clear();
        chunk.selection = outdent_continuation_lines(&chunk.selection, marker_width);
        chunk.unwrap_lines();
        chunk.add_blank_lines(1, 1, false);

        // The items below now start a list of their own
        if detected == ListKind::Ordered {
            renumber_following(chunk, &mut Numbering::new(kind));
        }

        if detected == kind {
            debug!("Removed {:?} list marker", detected);
            return;
        }
        debug!("Converting {:?} list item to {:?}", detected, kind);
    }

    let mut numbering = Numbering::new(kind);

    let mut lines_before = 1;
    if let Some(start) = trailing_list_block(&chunk.before) {
        let block = chunk.before.split_off(start);
        if let Some(bullet) = block
            .trim_start()
            .chars()
            .next()
            .filter(|c| matches!(c, '*' | '+' | '-'))
        {
            numbering.bullet = bullet;
        }
        lines_before = usize::from(has_blank_line_gap(&block));
        let renumbered = numbering.apply(&block);
        chunk.before.push_str(&renumbered);
    }

    if chunk.selection.is_empty() {
        chunk.selection = if options.prevent_placeholder { " " } else { PLACEHOLDER }.to_string();
    }

    let prefix = numbering.next_prefix();
    let lines_after = renumber_following(chunk, &mut numbering).unwrap_or(1);

    debug!("Inserting list item {:?}", prefix);
    chunk.trim_whitespace(true);
    chunk.add_blank_lines(lines_before, lines_after, true);

    let indent = " ".repeat(prefix.chars().count());
    chunk.start_tag = prefix;
    chunk.wrap_lines(options.line_width.saturating_sub(indent.len()));
    chunk.selection = chunk.selection.replace('\n', &format!("\n{}", indent));
}

/// Renumber the list block at the start of `after`. Returns the number of
/// blank lines the block wants around its items (0 for a tight list, 1 for
/// a loose one), or `None` when no list follows.
fn renumber_following(chunk: &mut Chunk, numbering: &mut Numbering) -> Option<usize> {
    let end = leading_list_block(&chunk.after)?;
    let rest = chunk.after.split_off(end);
    let block = std::mem::replace(&mut chunk.after, rest);
    chunk.after.insert_str(0, &numbering.apply(&block));
    Some(usize::from(has_blank_line_gap(&block)))
}

/// Remove up to `width` spaces of continuation indent from every line but
/// the first.
fn outdent_continuation_lines(text: &str, width: usize) -> String {
    text.split('\n')
        .enumerate()
        .map(|(i, line)| {
            if i == 0 {
                return line;
            }
            let spaces = line.bytes().take(width).take_while(|&b| b == b' ').count();
            &line[spaces..]
        })
        .collect::<Vec<_>>()
        .join("\n")
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
