//! Errors raised when an input cannot be read as any known subtitle schema.

use thiserror::Error;

/// Fatal decode failure for a single input document.
///
/// Malformed entries inside an otherwise recognized document never produce
/// this error; they are skipped and the decode carries on.
#[derive(Error, Debug)]
pub enum FormatError {
    /// The file extension does not map to a decoder.
    #[error("unsupported input format: {0}")]
    Unsupported(String),

    /// The JSON document could not be parsed at all.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// JSON object without an `events` key.
    #[error("no events array found in JSON")]
    MissingEvents,

    /// `events` key present but not an array.
    #[error("events is not an array")]
    EventsNotArray,

    /// The TTML document is not well-formed XML even after `<br>` cleanup.
    #[error("invalid TTML document: {0}")]
    Xml(#[from] roxmltree::Error),

    /// Nothing in the input looks like a cue for this format.
    #[error("no {format} cues found in input")]
    NoCues { format: &'static str },
}
