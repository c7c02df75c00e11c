//! User settings for the formatting engine
//!
//! This module defines the `Settings` struct that holds the options the
//! command runners consume, with serde support for JSON persistence.

use serde::{Deserialize, Serialize};

/// Formatting engine settings.
///
/// All fields have sensible defaults via the `Default` trait and `#[serde(default)]`,
/// so a partial or older config file still loads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Column limit used when re-flowing paragraph, list and quote text
    pub line_width: usize,

    /// Continue lists, quotes and code blocks when Enter is pressed
    pub auto_indent: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            line_width: Self::DEFAULT_LINE_WIDTH,
            auto_indent: true,
        }
    }
}

impl Settings {
    pub const DEFAULT_LINE_WIDTH: usize = 40;
    pub const MIN_LINE_WIDTH: usize = 8;
    pub const MAX_LINE_WIDTH: usize = 400;

    /// Create settings with a specific line width, sanitized.
    pub fn with_line_width(line_width: usize) -> Self {
        let mut settings = Self {
            line_width,
            ..Self::default()
        };
        settings.sanitize();
        settings
    }

    /// Clamp every value into its valid range.
    ///
    /// Called after loading from disk so a hand-edited file can never hand
    /// the wrapper a zero or absurd width.
    pub fn sanitize(&mut self) {
        self.line_width = self
            .line_width
            .clamp(Self::MIN_LINE_WIDTH, Self::MAX_LINE_WIDTH);
    }

    /// Parse settings from JSON and sanitize the result.
    pub fn from_json_sanitized(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Settings = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
