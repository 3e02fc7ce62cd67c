//! The common cue model every decoder produces.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Style label assigned to a cue before merging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Style {
    /// Regular dialogue caption.
    #[default]
    Default,
    /// Signage text: all caps or fully bracketed.
    #[serde(rename = "tanda")]
    Tanda,
}

impl Style {
    /// Name of the matching `Style:` line in the generated document.
    pub fn as_str(self) -> &'static str {
        match self {
            Style::Default => "Default",
            Style::Tanda => "tanda",
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One timed subtitle cue.
///
/// `start_ms <= end_ms` is expected but not enforced. `text` may hold line
/// breaks and `{\tag}` overrides, which decoders keep verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimedTextBlock {
    pub start_ms: i64,
    pub end_ms: i64,
    pub text: String,
    #[serde(default)]
    pub style: Style,
}

impl TimedTextBlock {
    /// Create an unclassified block.
    pub fn new(start_ms: i64, end_ms: i64, text: impl Into<String>) -> Self {
        Self {
            start_ms,
            end_ms,
            text: text.into(),
            style: Style::Default,
        }
    }

    /// Builder-style setter used by tests and the pipeline.
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }
}
