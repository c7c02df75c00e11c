//! wmd - Markdown authoring commands for plain-text editors
//!
//! Applies or removes Markdown markup (strong, emphasis, links, images,
//! blockquotes, code, lists, headings, horizontal rules) around the selection
//! of a text buffer, keeping the selected text selected across the edit.
//!
//! # Example
//! ```
//! use wmd::{Command, Edit, Editor, EditorState};
//!
//! let editor = Editor::default();
//! let state = EditorState::new("Hello world").with_selection(6, 11);
//! if let Edit::Applied(next) = editor.apply(&state, Command::Em) {
//!     assert_eq!(next.text, "Hello *world*");
//!     assert_eq!(next.selected_text(), "world");
//! }
//! ```

pub mod config;
pub mod editor;
pub mod error;
pub mod markdown;
pub mod string_utils;

pub use config::Settings;
pub use editor::{Edit, EditingSurface, Editor, EditorState, PendingEdit, TextBuffer, UrlPrompt};
pub use error::{Error, Result};
pub use markdown::{Chunk, Command, CommandOptions, Outcome};
