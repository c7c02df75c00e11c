//! Reference-style link bookkeeping
//!
//! Every link or image command rebuilds the buffer's reference definitions
//! from scratch: definitions are pulled out of all three chunk regions, the
//! usages are renumbered densely from 1 in reading order, and the surviving
//! definitions are appended as one block at the end of the buffer.

use crate::markdown::chunk::Chunk;
use crate::markdown::lines::compile;
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::sync::LazyLock;

/// `[id]: url "title"`, where the url may be wrapped in `<>` and url and
/// title may each sit on the following line.
static DEFINITION: LazyLock<Regex> = LazyLock::new(|| {
    compile(
        r#"(?m)^[ ]{0,3}\[(\d+)\]:[ \t]*\n?[ \t]*<?(\S+?)>?[ \t]*\n?[ \t]*(?:(\n*)["'(].+?["')][ \t]*)?(?:\n+|$)"#,
    )
});

/// `[text][id]` with an optional space or line break between the brackets.
static USAGE: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(\[(?:\[[^\]]*\]|[^\[\]])*\][ ]?(?:\n[ ]*)?\[)(\d+)(\])")
});

static DEFINITION_ID: LazyLock<Regex> = LazyLock::new(|| compile(r"^[ ]{0,3}\[\d+\]:"));

/// The definitions found in a chunk and the dense numbering being built
/// for them.
#[derive(Debug, Default)]
pub struct LinkReferenceTable {
    /// Original id → definition text (still carrying the original id)
    definitions: HashMap<String, String>,
    /// Original id → newly assigned number
    assigned: HashMap<String, usize>,
    /// Renumbered definition lines, in allocation order
    output: Vec<String>,
}

impl LinkReferenceTable {
    /// Renumber the reference links already in `chunk`.
    pub fn renumber(chunk: &mut Chunk) {
        Self::rebuild(chunk, None);
    }

    /// Renumber the reference links in `chunk` and add a definition for a
    /// new link placed at the selection, returning its number.
    ///
    /// `definition` is a full definition line such as `" [999]: url"`; its
    /// id is replaced. The selection's own usages are left alone and the new
    /// definition takes the next number after those used in `before`.
    pub fn add_definition(chunk: &mut Chunk, definition: &str) -> usize {
        Self::rebuild(chunk, Some(definition))
    }

    fn rebuild(chunk: &mut Chunk, new_definition: Option<&str>) -> usize {
        let mut table = Self::default();
        chunk.before = table.strip_definitions(&chunk.before);
        chunk.selection = table.strip_definitions(&chunk.selection);
        chunk.after = table.strip_definitions(&chunk.after);

        chunk.before = table.renumber_usages(&chunk.before);
        let number = match new_definition {
            Some(definition) => table.push_definition(definition),
            None => {
                chunk.selection = table.renumber_usages(&chunk.selection);
                0
            }
        };
        chunk.after = table.renumber_usages(&chunk.after);

        if table.definitions.is_empty() && table.output.is_empty() {
            return number;
        }

        // The definitions block always closes the buffer
        trim_trailing_newlines(&mut chunk.after);
        if chunk.after.is_empty() {
            trim_trailing_newlines(&mut chunk.selection);
            // A new link still has its text to insert after `before`
            if chunk.selection.is_empty() && new_definition.is_none() {
                trim_trailing_newlines(&mut chunk.before);
            }
        }

        if !table.output.is_empty() {
            chunk.after.push_str("\n\n");
            for definition in &table.output {
                chunk.after.push('\n');
                chunk.after.push_str(definition);
            }
        }

        number
    }

    /// Remove definition lines from `text`, remembering them by id.
    ///
    /// A quoted line separated from the url by blank lines is not a title;
    /// it stays in the text.
    fn strip_definitions(&mut self, text: &str) -> String {
        DEFINITION
            .replace_all(text, |caps: &Captures| {
                let whole = &caps[0];
                let id = caps[1].to_string();

                match caps.get(3).filter(|gap| !gap.is_empty()) {
                    Some(gap) => {
                        let offset = gap.start() - caps.get(0).map_or(0, |m| m.start());
                        self.definitions
                            .insert(id, whole[..offset].trim_end().to_string());
                        whole[offset..].to_string()
                    }
                    None => {
                        self.definitions.insert(id, whole.trim_end().to_string());
                        String::new()
                    }
                }
            })
            .into_owned()
    }

    /// Rewrite `[text][id]` usages whose id has a definition.
    fn renumber_usages(&mut self, text: &str) -> String {
        USAGE
            .replace_all(text, |caps: &Captures| {
                let id = &caps[2];
                match self.number_for(id) {
                    Some(number) => format!("{}{}{}", &caps[1], number, &caps[3]),
                    None => caps[0].to_string(),
                }
            })
            .into_owned()
    }

    fn number_for(&mut self, id: &str) -> Option<usize> {
        if let Some(&number) = self.assigned.get(id) {
            return Some(number);
        }
        let definition = self.definitions.get(id)?.clone();
        let number = self.push_definition(&definition);
        self.assigned.insert(id.to_string(), number);
        Some(number)
    }

    fn push_definition(&mut self, definition: &str) -> usize {
        let number = self.output.len() + 1;
        let renumbered = DEFINITION_ID.replace(definition, format!("  [{}]:", number).as_str());
        self.output.push(renumbered.into_owned());
        number
    }
}

fn trim_trailing_newlines(text: &mut String) {
    let keep = text.trim_end_matches('\n').len();
    text.truncate(keep);
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renumbers_densely_in_reading_order() {
        let mut chunk = Chunk::from_parts(
            "See [x][5] and [y][9].",
            "",
            "\n\n  [9]: http://nine\n  [5]: http://five\n",
        );
        LinkReferenceTable::renumber(&mut chunk);

        assert_eq!(
            chunk.text(),
            "See [x][1] and [y][2].\n\n\n  [1]: http://five\n  [2]: http://nine"
        );
    }

    #[test]
    fn test_new_definition_slots_between_before_and_after() {
        let mut chunk = Chunk::from_parts(
            "[a][3] ",
            "new",
            " [b][4]\n\n[3]: http://a\n[4]: http://b",
        );
        let number = LinkReferenceTable::add_definition(&mut chunk, " [999]: http://new");

        assert_eq!(number, 2);
        assert_eq!(chunk.before, "[a][1] ");
        assert_eq!(
            chunk.after,
            " [b][3]\n\n\n  [1]: http://a\n  [2]: http://new\n  [3]: http://b"
        );
    }

    #[test]
    fn test_repeated_id_shares_one_number() {
        let mut chunk = Chunk::from_parts("[a][7] and [b][7]\n\n[7]: http://x", "", "");
        LinkReferenceTable::renumber(&mut chunk);
        assert_eq!(chunk.text(), "[a][1] and [b][1]\n\n\n  [1]: http://x");
    }

    #[test]
    fn test_definitions_block_follows_text_in_before() {
        let mut chunk = Chunk::from_parts("Read [doc][3]\n\n\n\n[3]: http://x\n\n", "", "");
        LinkReferenceTable::renumber(&mut chunk);
        assert_eq!(chunk.text(), "Read [doc][1]\n\n\n  [1]: http://x");
    }

    #[test]
    fn test_undefined_usage_left_alone() {
        let text = "only [a][7] here\n";
        let mut chunk = Chunk::from_parts(text, "", "");
        LinkReferenceTable::renumber(&mut chunk);
        assert_eq!(chunk.text(), text);
    }

    #[test]
    fn test_unused_definition_dropped() {
        let mut chunk = Chunk::from_parts("text\n\n[2]: http://unused\n", "", "");
        LinkReferenceTable::renumber(&mut chunk);
        assert_eq!(chunk.text(), "text");
    }

    #[test]
    fn test_removing_last_link_drops_definition_block() {
        let mut chunk = Chunk::from_parts("", "text", "\n\n\n  [1]: http://x");
        LinkReferenceTable::renumber(&mut chunk);
        assert_eq!(chunk.text(), "text");
    }

    #[test]
    fn test_definition_keeps_title() {
        let mut chunk = Chunk::from_parts("[a][4]", "", "\n\n[4]: <http://x> \"Title\"");
        LinkReferenceTable::renumber(&mut chunk);
        assert!(chunk.after.ends_with("\n  [1]: <http://x> \"Title\""));
    }

    #[test]
    fn test_title_on_following_line() {
        let mut chunk = Chunk::from_parts("[a][4]", "", "\n\n[4]: http://x\n   (Title)\n");
        LinkReferenceTable::renumber(&mut chunk);
        assert!(chunk.after.ends_with("  [1]: http://x\n   (Title)"));
    }

    #[test]
    fn test_quote_after_blank_line_is_not_a_title() {
        let mut chunk = Chunk::from_parts("[a][4]\n[4]: http://x\n\n\"Quoted\"\nmore", "", "");
        LinkReferenceTable::renumber(&mut chunk);
        let text = chunk.text();
        assert!(text.starts_with("[a][1]\n\n\"Quoted\"\nmore"));
        assert!(text.ends_with("  [1]: http://x"));
    }

    #[test]
    fn test_usage_split_across_lines() {
        let mut chunk = Chunk::from_parts("[a]\n   [6] text\n\n[6]: http://x", "", "");
        LinkReferenceTable::renumber(&mut chunk);
        assert!(chunk.text().starts_with("[a]\n   [1] text"));
    }
}
