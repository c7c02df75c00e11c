//! Formatting Commands
//!
//! One runner per Markdown construct, each mutating a single [`Chunk`]:
//!
//! - **Inline**: strong, emphasis, inline code
//! - **Links**: reference-style links and images (two-phase, see [`LinkRequest`])
//! - **Blocks**: lists, blockquotes, indented code, headings, horizontal rules
//! - **Editing**: auto-indent continuation after Enter
//!
//! # Usage
//! ```
//! use wmd::config::Settings;
//! use wmd::markdown::{Chunk, Command, Outcome};
//!
//! let chunk = Chunk::new("Hello world", 0, 11, 0.0);
//! match Command::Strong.run(chunk, &Settings::default()) {
//!     Outcome::Complete(chunk) => assert_eq!(chunk.text(), "**Hello world**"),
//!     Outcome::NeedsUrl(_) => unreachable!(),
//! }
//! ```

mod blockquote;
mod code;
mod emphasis;
mod heading;
mod indent;
mod link;
mod list;
mod rule;

pub use link::{LinkKind, LinkRequest};

use crate::config::Settings;
use crate::error::Error;
use crate::markdown::chunk::Chunk;
use crate::markdown::lines::ListKind;
use log::debug;
use std::fmt;
use std::str::FromStr;

// ─────────────────────────────────────────────────────────────────────────────
// Command Definitions
// ─────────────────────────────────────────────────────────────────────────────

/// Static description of a command, for toolbars, menus and help output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandDefinition {
    /// Stable identifier, also accepted by `Command::from_str`
    pub name: &'static str,
    /// Short button label
    pub label: &'static str,
    /// Tooltip text
    pub title: &'static str,
    /// Ctrl+<key> shortcut
    pub shortcut: Option<char>,
    /// Text inserted when the selection is empty
    pub placeholder: Option<&'static str>,
}

const STRONG: CommandDefinition = CommandDefinition {
    name: "strong",
    label: "Bold",
    title: "Strong <strong> Ctrl+B",
    shortcut: Some('b'),
    placeholder: Some("strong text"),
};

const EM: CommandDefinition = CommandDefinition {
    name: "em",
    label: "Italic",
    title: "Emphasis <em> Ctrl+I",
    shortcut: Some('i'),
    placeholder: Some("emphasized text"),
};

const LINK: CommandDefinition = CommandDefinition {
    name: "link",
    label: "Link",
    title: "Hyperlink <a> Ctrl+L",
    shortcut: Some('l'),
    placeholder: Some("link text"),
};

const IMAGE: CommandDefinition = CommandDefinition {
    name: "image",
    label: "Image",
    title: "Image <img> Ctrl+G",
    shortcut: Some('g'),
    placeholder: Some("alt text"),
};

const BLOCKQUOTE: CommandDefinition = CommandDefinition {
    name: "blockquote",
    label: "Blockquote",
    title: "Blockquote <blockquote> Ctrl+Q",
    shortcut: Some('q'),
    placeholder: Some("Blockquote"),
};

const CODE: CommandDefinition = CommandDefinition {
    name: "code",
    label: "Code",
    title: "Code Sample <pre><code> Ctrl+K",
    shortcut: Some('k'),
    placeholder: Some("enter code here"),
};

const ORDERED_LIST: CommandDefinition = CommandDefinition {
    name: "ol",
    label: "Numbered List",
    title: "Numbered List <ol> Ctrl+O",
    shortcut: Some('o'),
    placeholder: Some("List item"),
};

const UNORDERED_LIST: CommandDefinition = CommandDefinition {
    name: "ul",
    label: "Bulleted List",
    title: "Bulleted List <ul> Ctrl+U",
    shortcut: Some('u'),
    placeholder: Some("List item"),
};

const HEADING: CommandDefinition = CommandDefinition {
    name: "heading",
    label: "Heading",
    title: "Heading <h1>/<h2> Ctrl+H",
    shortcut: Some('h'),
    placeholder: Some("Heading"),
};

const HORIZONTAL_RULE: CommandDefinition = CommandDefinition {
    name: "hr",
    label: "Horizontal Rule",
    title: "Horizontal Rule <hr> Ctrl+R",
    shortcut: Some('r'),
    placeholder: None,
};

const AUTO_INDENT: CommandDefinition = CommandDefinition {
    name: "autoindent",
    label: "Auto-indent",
    title: "Continue the list, quote or code block after Enter",
    shortcut: None,
    placeholder: None,
};

// ─────────────────────────────────────────────────────────────────────────────
// Command Enum
// ─────────────────────────────────────────────────────────────────────────────

/// Markdown formatting commands that can be applied to a chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Bold text (**text**)
    Strong,
    /// Italic text (*text*)
    Em,
    /// Reference link ([text][1])
    Link,
    /// Reference image (![alt][1])
    Image,
    /// Blockquote (> text)
    Blockquote,
    /// Inline code or 4-space indented block
    Code,
    /// Numbered list (1. item)
    OrderedList,
    /// Bulleted list (- item)
    UnorderedList,
    /// Setext/ATX heading, cycling through levels
    Heading,
    /// Horizontal rule (----------)
    HorizontalRule,
    /// Continue the current block after a newline
    AutoIndent,
}

impl Command {
    /// Every command, in toolbar order.
    pub const ALL: [Command; 11] = [
        Command::Strong,
        Command::Em,
        Command::Link,
        Command::Blockquote,
        Command::Code,
        Command::Image,
        Command::OrderedList,
        Command::UnorderedList,
        Command::Heading,
        Command::HorizontalRule,
        Command::AutoIndent,
    ];

    pub fn definition(self) -> &'static CommandDefinition {
        match self {
            Self::Strong => &STRONG,
            Self::Em => &EM,
            Self::Link => &LINK,
            Self::Image => &IMAGE,
            Self::Blockquote => &BLOCKQUOTE,
            Self::Code => &CODE,
            Self::OrderedList => &ORDERED_LIST,
            Self::UnorderedList => &UNORDERED_LIST,
            Self::Heading => &HEADING,
            Self::HorizontalRule => &HORIZONTAL_RULE,
            Self::AutoIndent => &AUTO_INDENT,
        }
    }

    pub fn name(self) -> &'static str {
        self.definition().name
    }

    /// Look up the command bound to Ctrl+`key` (case-insensitive).
    pub fn from_shortcut(key: char) -> Option<Command> {
        let key = key.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|command| command.definition().shortcut == Some(key))
    }

    /// Run this command on `chunk` with the user's settings.
    pub fn run(self, chunk: Chunk, settings: &Settings) -> Outcome {
        self.run_with(chunk, &CommandOptions::from(settings))
    }

    /// Run this command on `chunk` with explicit options.
    ///
    /// Every command except links and images completes immediately. Links
    /// and images return [`Outcome::NeedsUrl`] unless they are removing
    /// existing markup.
    pub fn run_with(self, mut chunk: Chunk, options: &CommandOptions) -> Outcome {
        debug!(
            "Running {} command on {} selected bytes",
            self.name(),
            chunk.selection.len()
        );

        match self {
            Self::Strong => emphasis::toggle(&mut chunk, 2, placeholder(&STRONG)),
            Self::Em => emphasis::toggle(&mut chunk, 1, placeholder(&EM)),
            Self::Link => return link::start(chunk, LinkKind::Link),
            Self::Image => return link::start(chunk, LinkKind::Image),
            Self::Blockquote => blockquote::toggle(&mut chunk, options),
            Self::Code => code::toggle(&mut chunk, options),
            Self::OrderedList => list::toggle(&mut chunk, ListKind::Ordered, options),
            Self::UnorderedList => list::toggle(&mut chunk, ListKind::Unordered, options),
            Self::Heading => heading::cycle(&mut chunk, options.line_width),
            Self::HorizontalRule => rule::insert(&mut chunk),
            Self::AutoIndent => indent::continue_block(&mut chunk, options),
        }

        Outcome::Complete(chunk)
    }
}

fn placeholder(definition: &CommandDefinition) -> &'static str {
    definition.placeholder.unwrap_or_default()
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Command {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strong" | "bold" => Ok(Self::Strong),
            "em" | "italic" => Ok(Self::Em),
            "a" | "link" => Ok(Self::Link),
            "img" | "image" => Ok(Self::Image),
            "blockquote" | "quote" => Ok(Self::Blockquote),
            "code" => Ok(Self::Code),
            "ol" => Ok(Self::OrderedList),
            "ul" => Ok(Self::UnorderedList),
            "h" | "heading" => Ok(Self::Heading),
            "hr" => Ok(Self::HorizontalRule),
            "autoindent" => Ok(Self::AutoIndent),
            _ => Err(Error::UnknownCommand(s.to_string())),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Options and Outcome
// ─────────────────────────────────────────────────────────────────────────────

/// Per-run knobs for the command runners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandOptions {
    /// Column limit for re-flowed list and quote text
    pub line_width: usize,
    /// Leave new list items, quotes and code lines empty instead of
    /// inserting placeholder text
    pub prevent_placeholder: bool,
}

impl Default for CommandOptions {
    fn default() -> Self {
        Self::from(&Settings::default())
    }
}

impl From<&Settings> for CommandOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            line_width: settings.line_width,
            prevent_placeholder: false,
        }
    }
}

/// What a command run produced.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// The edit is finished
    Complete(Chunk),
    /// The edit is waiting for a URL; nothing has been changed yet
    NeedsUrl(LinkRequest),
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
