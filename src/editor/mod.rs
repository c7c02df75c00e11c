//! Editor module for wmd
//!
//! Drives formatting commands against an editing surface: capture the
//! surface's state, run the command on a fresh chunk, ask for a URL when a
//! link or image needs one, and apply the result in a single step.

mod state;

pub use state::{EditingSurface, EditorState, TextBuffer, UrlPrompt};

use crate::config::Settings;
use crate::markdown::{Command, CommandOptions, LinkKind, LinkRequest, Outcome};
use log::{debug, info};

/// Result of [`Editor::apply`].
#[derive(Debug, Clone)]
pub enum Edit {
    /// The new state to hand to the surface
    Applied(EditorState),
    /// Nothing changes until a URL is supplied
    AwaitingUrl(PendingEdit),
}

/// A link or image edit suspended on the URL prompt.
#[derive(Debug, Clone)]
pub struct PendingEdit {
    request: LinkRequest,
}

impl PendingEdit {
    pub fn kind(&self) -> LinkKind {
        self.request.kind()
    }

    pub fn title(&self) -> &'static str {
        self.request.title()
    }

    pub fn label(&self) -> &'static str {
        self.request.label()
    }

    /// Finish the edit. `None` means the prompt was cancelled and the
    /// surface must be left as it was.
    pub fn resolve(self, url: &str) -> Option<EditorState> {
        self.request
            .complete(url)
            .map(|chunk| EditorState::from_chunk(&chunk))
    }
}

/// Runs commands with one set of user settings.
#[derive(Debug, Clone, Default)]
pub struct Editor {
    settings: Settings,
}

impl Editor {
    pub fn new(mut settings: Settings) -> Self {
        settings.sanitize();
        Self { settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Run `command` against a snapshot.
    pub fn apply(&self, state: &EditorState, command: Command) -> Edit {
        let options = CommandOptions::from(&self.settings);
        match command.run_with(state.to_chunk(), &options) {
            Outcome::Complete(chunk) => Edit::Applied(EditorState::from_chunk(&chunk)),
            Outcome::NeedsUrl(request) => Edit::AwaitingUrl(PendingEdit { request }),
        }
    }

    /// Run `command` on `surface`, prompting for a URL if needed. Returns
    /// whether a new state was applied.
    pub fn execute<S, P>(&self, surface: &mut S, command: Command, prompt: &mut P) -> bool
    where
        S: EditingSurface + ?Sized,
        P: UrlPrompt + ?Sized,
    {
        let state = surface.capture_state();
        let next = match self.apply(&state, command) {
            Edit::Applied(next) => next,
            Edit::AwaitingUrl(pending) => {
                let url = prompt.prompt_for_url(pending.title(), pending.label());
                match url.and_then(|url| pending.resolve(&url)) {
                    Some(next) => next,
                    None => {
                        info!("{} cancelled", command);
                        return false;
                    }
                }
            }
        };

        debug!(
            "Applying {}: {} -> {} bytes",
            command,
            state.text.len(),
            next.text.len()
        );
        surface.apply_state(next);
        true
    }

    /// Continue the block above the caret after Enter, if auto-indent is on.
    pub fn continue_block<S>(&self, surface: &mut S) -> bool
    where
        S: EditingSurface + ?Sized,
    {
        if !self.settings.auto_indent {
            return false;
        }
        let mut never = |_: &str, _: &str| -> Option<String> { None };
        self.execute(surface, Command::AutoIndent, &mut never)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
