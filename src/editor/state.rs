//! Editor state and the seams to a host editing surface
//!
//! The engine never touches a live text control. A surface hands over an
//! [`EditorState`] snapshot, the engine computes a new one, and the surface
//! applies it in one step.

use crate::markdown::Chunk;
use crate::string_utils::clamp_selection;
use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Editor State
// ─────────────────────────────────────────────────────────────────────────────

/// A snapshot of a text control: its buffer, selection and scroll offset.
///
/// Selection offsets are byte offsets into `text`. They are not trusted:
/// turning the state into a [`Chunk`] clamps them first.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorState {
    pub text: String,
    pub selection_start: usize,
    pub selection_end: usize,
    /// Vertical scroll offset, passed through untouched
    pub scroll_top: f32,
}

impl EditorState {
    /// A state with the caret at the end of `text`.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let end = text.len();
        Self {
            text,
            selection_start: end,
            selection_end: end,
            scroll_top: 0.0,
        }
    }

    /// Replace the selection range.
    pub fn with_selection(mut self, start: usize, end: usize) -> Self {
        self.selection_start = start;
        self.selection_end = end;
        self
    }

    /// The selection after clamping to the text.
    pub fn selection(&self) -> (usize, usize) {
        clamp_selection(&self.text, self.selection_start, self.selection_end)
    }

    /// The selected text.
    pub fn selected_text(&self) -> &str {
        let (start, end) = self.selection();
        &self.text[start..end]
    }

    pub fn to_chunk(&self) -> Chunk {
        Chunk::new(
            &self.text,
            self.selection_start,
            self.selection_end,
            self.scroll_top,
        )
    }

    /// Reassemble a chunk; the new selection covers exactly `chunk.selection`.
    pub fn from_chunk(chunk: &Chunk) -> Self {
        let start = chunk.before.len() + chunk.start_tag.len();
        Self {
            text: chunk.text(),
            selection_start: start,
            selection_end: start + chunk.selection.len(),
            scroll_top: chunk.scroll_top,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Surface Traits
// ─────────────────────────────────────────────────────────────────────────────

/// A text control the engine can read from and write back to.
pub trait EditingSurface {
    fn capture_state(&self) -> EditorState;
    fn apply_state(&mut self, state: EditorState);
}

/// Asks the user for a link or image URL.
///
/// `None` or a blank string cancels the command.
pub trait UrlPrompt {
    fn prompt_for_url(&mut self, title: &str, label: &str) -> Option<String>;
}

impl<F> UrlPrompt for F
where
    F: FnMut(&str, &str) -> Option<String>,
{
    fn prompt_for_url(&mut self, title: &str, label: &str) -> Option<String> {
        self(title, label)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// In-Memory Surface
// ─────────────────────────────────────────────────────────────────────────────

/// An [`EditingSurface`] backed by a plain string.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextBuffer {
    state: EditorState,
}

impl TextBuffer {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            state: EditorState::new(text),
        }
    }

    pub fn from_state(state: EditorState) -> Self {
        Self { state }
    }

    pub fn text(&self) -> &str {
        &self.state.text
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn into_state(self) -> EditorState {
        self.state
    }

    /// Move the selection.
    pub fn select(&mut self, start: usize, end: usize) {
        let (start, end) = clamp_selection(&self.state.text, start, end);
        self.state.selection_start = start;
        self.state.selection_end = end;
    }

    /// Type `text` over the selection, leaving the caret after it.
    pub fn insert(&mut self, text: &str) {
        let (start, end) = self.state.selection();
        self.state.text.replace_range(start..end, text);
        let caret = start + text.len();
        self.state.selection_start = caret;
        self.state.selection_end = caret;
    }
}

impl EditingSurface for TextBuffer {
    fn capture_state(&self) -> EditorState {
        self.state.clone()
    }

    fn apply_state(&mut self, state: EditorState) {
        self.state = state;
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
