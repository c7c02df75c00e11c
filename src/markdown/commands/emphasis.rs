//! Strong and emphasis toggling with `*` markers.

use crate::markdown::chunk::Chunk;
use crate::markdown::lines::compile;
use log::debug;
use regex::Regex;
use std::sync::LazyLock;

static BLANK_LINES: LazyLock<Regex> = LazyLock::new(|| compile(r"\n{2,}"));

/// Toggle `weight` asterisks (1 = emphasis, 2 = strong) around the selection.
pub(super) fn toggle(chunk: &mut Chunk, weight: usize, placeholder: &str) {
    chunk.trim_whitespace(false);

    // Emphasis cannot span a paragraph break
    if chunk.selection.contains("\n\n") {
        chunk.selection = BLANK_LINES.replace_all(&chunk.selection, "\n").into_owned();
    }

    let stars_before = chunk.before.len() - chunk.before.trim_end_matches('*').len();
    let stars_after = chunk.after.len() - chunk.after.trim_start_matches('*').len();
    let common = stars_before.min(stars_after);

    if common >= weight && !(common == 2 && weight == 1) {
        debug!("Removing {} emphasis marker(s)", weight);
        chunk.before.truncate(chunk.before.len() - weight);
        chunk.after.drain(..weight);
    } else if chunk.selection.is_empty() && stars_after > 0 {
        // Caret sits just before closing markers: step over them
        debug!("Moving caret past {} closing marker(s)", stars_after);
        let stars: String = chunk.after.drain(..stars_after).collect();
        let space = match chunk.before.chars().next_back() {
            Some(c) if c.is_whitespace() => {
                chunk.before.pop();
                c.to_string()
            }
            _ => String::new(),
        };
        chunk.before.push_str(&stars);
        chunk.before.push_str(&space);
    } else {
        if chunk.selection.is_empty() {
            chunk.selection = placeholder.to_string();
        }
        debug!("Adding {} emphasis marker(s)", weight);
        let markup = "*".repeat(weight);
        chunk.before.push_str(&markup);
        chunk.after.insert_str(0, &markup);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strong(before: &str, selection: &str, after: &str) -> Chunk {
        let mut chunk = Chunk::from_parts(before, selection, after);
        toggle(&mut chunk, 2, "strong text");
        chunk
    }

    fn em(before: &str, selection: &str, after: &str) -> Chunk {
        let mut chunk = Chunk::from_parts(before, selection, after);
        toggle(&mut chunk, 1, "emphasized text");
        chunk
    }

    #[test]
    fn test_strong_wraps_selection() {
        let chunk = strong("a ", "word", " b");
        assert_eq!(chunk.text(), "a **word** b");
        assert_eq!(chunk.selection, "word");
    }

    #[test]
    fn test_strong_moves_whitespace_outside_markers() {
        let chunk = strong("a", " word ", "b");
        assert_eq!(chunk.text(), "a **word** b");
    }

    #[test]
    fn test_empty_selection_gets_placeholder() {
        let chunk = em("a ", "", " b");
        assert_eq!(chunk.text(), "a *emphasized text* b");
        assert_eq!(chunk.selection, "emphasized text");
    }

    #[test]
    fn test_em_inside_strong_adds_markers() {
        let chunk = em("**", "both", "**");
        assert_eq!(chunk.text(), "***both***");
    }

    #[test]
    fn test_em_removed_from_strong_em() {
        let chunk = em("***", "both", "***");
        assert_eq!(chunk.text(), "**both**");
    }

    #[test]
    fn test_strong_removed_from_strong_em() {
        let chunk = strong("***", "both", "***");
        assert_eq!(chunk.text(), "*both*");
    }

    #[test]
    fn test_caret_before_closing_markers() {
        let chunk = strong("**text ", "", "** more");
        assert_eq!(chunk.before, "**text** ");
        assert_eq!(chunk.after, " more");
        assert_eq!(chunk.text(), "**text**  more");
    }

    #[test]
    fn test_paragraph_breaks_collapsed() {
        let chunk = strong("", "one\n\n\ntwo", "");
        assert_eq!(chunk.text(), "**one\ntwo**");
    }
}
