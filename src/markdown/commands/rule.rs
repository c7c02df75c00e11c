//! Horizontal rules.

use crate::markdown::chunk::Chunk;

const RULE: &str = "----------";

/// Replace the selection with a horizontal rule on its own paragraph.
pub(super) fn insert(chunk: &mut Chunk) {
    chunk.start_tag = RULE.to_string();
    chunk.selection.clear();
    chunk.add_blank_lines(2, 1, true);
}
