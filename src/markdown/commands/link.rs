//! Reference-style links and images.
//!
//! Adding a link needs a URL from the user, so the command is split in two:
//! [`start`] inspects the chunk and either finishes (removing existing link
//! markup) or hands back a [`LinkRequest`]; [`LinkRequest::complete`] then
//! builds the markup once the URL is known.

use super::{Command, Outcome};
use crate::markdown::chunk::{Chunk, TagPattern};
use crate::markdown::lines::compile;
use crate::markdown::references::LinkReferenceTable;
use log::debug;
use regex::Regex;
use std::sync::LazyLock;

static OPEN: LazyLock<TagPattern> = LazyLock::new(|| TagPattern::fixed(r"\s*!?\["));
static CLOSE: LazyLock<TagPattern> =
    LazyLock::new(|| TagPattern::fixed(r"\][ ]?(?:\n[ ]*)?(\[.*?\])?"));

static OPEN_BRACKET: LazyLock<Regex> = LazyLock::new(|| compile(r"!?\["));

/// Whether the command builds a link or an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkKind {
    Link,
    Image,
}

impl LinkKind {
    pub fn command(self) -> Command {
        match self {
            Self::Link => Command::Link,
            Self::Image => Command::Image,
        }
    }

    /// Title of the URL prompt.
    pub fn prompt_title(self) -> &'static str {
        match self {
            Self::Link => "Insert link",
            Self::Image => "Insert image",
        }
    }

    /// Label of the URL field.
    pub fn prompt_label(self) -> &'static str {
        match self {
            Self::Link => "Link URL",
            Self::Image => "Image URL",
        }
    }

    fn open_tag(self) -> &'static str {
        match self {
            Self::Link => "[",
            Self::Image => "![",
        }
    }
}

/// A link or image edit waiting for its URL.
///
/// Dropping the request (or completing it with an empty URL) is a
/// cancellation: the buffer the chunk came from should be left as it was.
#[derive(Debug, Clone)]
pub struct LinkRequest {
    chunk: Chunk,
    kind: LinkKind,
}

impl LinkRequest {
    pub fn kind(&self) -> LinkKind {
        self.kind
    }

    pub fn title(&self) -> &'static str {
        self.kind.prompt_title()
    }

    pub fn label(&self) -> &'static str {
        self.kind.prompt_label()
    }

    /// The chunk as it was when the prompt was issued.
    pub fn chunk(&self) -> &Chunk {
        &self.chunk
    }

    /// Finish the edit with `url`, which may carry a title
    /// (`http://x "Title"`). Returns `None` when the URL is blank.
    pub fn complete(self, url: &str) -> Option<Chunk> {
        let url = url.trim();
        if url.is_empty() {
            debug!("{} prompt cancelled", self.kind.command());
            return None;
        }

        let Self { mut chunk, kind } = self;
        release_brackets(&mut chunk);

        let number = LinkReferenceTable::add_definition(&mut chunk, &format!(" [999]: {}", url));
        debug!("Added {:?} reference [{}]", kind, number);

        chunk.start_tag = kind.open_tag().to_string();
        chunk.end_tag = format!("][{}]", number);
        if chunk.selection.is_empty() {
            chunk.selection = kind
                .command()
                .definition()
                .placeholder
                .unwrap_or_default()
                .to_string();
        }
        Some(chunk)
    }
}

/// First phase of the link and image commands.
pub(super) fn start(mut chunk: Chunk, kind: LinkKind) -> Outcome {
    chunk.trim_whitespace(false);
    chunk.set_tags(Some(&OPEN), Some(&CLOSE));

    if chunk.end_tag.contains('[') {
        debug!("Removing link markup");
        chunk.start_tag = OPEN_BRACKET.replace(&chunk.start_tag, "").into_owned();
        chunk.end_tag.clear();
        LinkReferenceTable::renumber(&mut chunk);
        Outcome::Complete(chunk)
    } else if chunk.selection.contains("\n\n") {
        debug!("Selection spans paragraphs, only renumbering links");
        LinkReferenceTable::renumber(&mut chunk);
        Outcome::Complete(chunk)
    } else {
        Outcome::NeedsUrl(LinkRequest { chunk, kind })
    }
}

/// Give the text matched by the link patterns back to `before`/`after`.
///
/// A bracket pair around the selection is dropped, to be replaced by the new
/// link markup; a lone bracket is kept as text.
fn release_brackets(chunk: &mut Chunk) {
    let start = std::mem::take(&mut chunk.start_tag);
    let end = std::mem::take(&mut chunk.end_tag);

    if !start.is_empty() && !end.is_empty() {
        let space = start.len() - start.trim_start().len();
        chunk.before.push_str(&start[..space]);
        chunk.after.insert_str(0, end.strip_prefix(']').unwrap_or(&end));
    } else {
        chunk.before.push_str(&start);
        chunk.after.insert_str(0, &end);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn request(text: &str, start_at: usize, end: usize, kind: LinkKind) -> LinkRequest {
        match start(Chunk::new(text, start_at, end, 0.0), kind) {
            Outcome::NeedsUrl(request) => request,
            Outcome::Complete(chunk) => panic!("completed without a URL: {:?}", chunk.text()),
        }
    }

    fn completed(text: &str, start_at: usize, end: usize, kind: LinkKind) -> Chunk {
        match start(Chunk::new(text, start_at, end, 0.0), kind) {
            Outcome::Complete(chunk) => chunk,
            Outcome::NeedsUrl(_) => panic!("unexpected URL prompt"),
        }
    }

    #[test]
    fn test_link_added() {
        let chunk = request("Visit site today", 6, 10, LinkKind::Link)
            .complete("http://x")
            .unwrap();
        assert_eq!(chunk.text(), "Visit [site][1] today\n\n\n  [1]: http://x");
        assert_eq!(chunk.selection, "site");
    }

    #[test]
    fn test_link_removed() {
        let chunk = completed(
            "Visit [site][1] today\n\n\n  [1]: http://x",
            7,
            11,
            LinkKind::Link,
        );
        assert_eq!(chunk.text(), "Visit site today");
    }

    #[test]
    fn test_image_placeholder_and_prompt() {
        let request = request("Go ", 3, 3, LinkKind::Image);
        assert_eq!(request.title(), "Insert image");
        assert_eq!(request.label(), "Image URL");

        let chunk = request.complete("http://img.png").unwrap();
        assert_eq!(chunk.text(), "Go ![alt text][1]\n\n\n  [1]: http://img.png");
        assert_eq!(chunk.selection, "alt text");
    }

    #[test]
    fn test_new_link_numbered_after_existing() {
        let chunk = request("[a][5] x\n\n  [5]: http://a", 7, 8, LinkKind::Link)
            .complete("http://b")
            .unwrap();
        assert_eq!(
            chunk.text(),
            "[a][1] [x][2]\n\n\n  [1]: http://a\n  [2]: http://b"
        );
    }

    #[test]
    fn test_url_with_title_kept_verbatim() {
        let chunk = request("word", 0, 4, LinkKind::Link)
            .complete("http://x \"Home\"")
            .unwrap();
        assert!(chunk.text().ends_with("  [1]: http://x \"Home\""));
    }

    #[test]
    fn test_blank_url_cancels() {
        let request = request("word", 0, 4, LinkKind::Link);
        assert!(request.clone().complete("").is_none());
        assert!(request.complete("   ").is_none());
    }

    #[test]
    fn test_plain_brackets_become_link() {
        let chunk = request("see [foo] now", 5, 8, LinkKind::Link)
            .complete("http://x")
            .unwrap();
        assert_eq!(chunk.text(), "see [foo][1] now\n\n\n  [1]: http://x");
    }

    #[test]
    fn test_paragraph_span_only_renumbers() {
        let chunk = completed("a [x][4]\n\nb\n\n[4]: http://x", 0, 11, LinkKind::Link);
        assert_eq!(chunk.text(), "a [x][1]\n\nb\n\n\n  [1]: http://x");
    }
}
