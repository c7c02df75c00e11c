//! Markdown formatting engine
//!
//! Toggles Markdown markup around a selection in a plain-text buffer.
//!
//! # Structure
//! - [`chunk`]: the before/selection/after split every command works on
//! - [`lines`]: per-line block classification and list-block scanning
//! - [`references`]: renumbering of reference-style link definitions
//! - [`commands`]: the command registry and one runner per construct
//!
//! # Example
//! ```
//! use wmd::markdown::{Chunk, Command, CommandOptions, Outcome};
//!
//! let chunk = Chunk::new("item", 0, 4, 0.0);
//! if let Outcome::Complete(chunk) = Command::OrderedList.run_with(chunk, &CommandOptions::default()) {
//!     assert_eq!(chunk.text(), "1. item");
//! }
//! ```

pub mod chunk;
pub mod commands;
pub mod lines;
pub mod references;

pub use chunk::{Chunk, TagPattern};
pub use commands::{
    Command, CommandDefinition, CommandOptions, LinkKind, LinkRequest, Outcome,
};
pub use lines::{LineKind, ListKind};
pub use references::LinkReferenceTable;
