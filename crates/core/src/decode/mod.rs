//! Format decoders turning raw subtitle files into [`TimedTextBlock`] lists.
//! Decoders never merge or classify; they only map a native schema onto the
//! common model.

use crate::block::TimedTextBlock;
use crate::config::Config;
use crate::error::FormatError;
use std::fmt;
use std::path::Path;
use tracing::{debug, trace};

pub mod json;
pub mod srt;
pub mod ttml;
pub mod xml;

/// Timed-text input formats understood by the converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Srt,
    Json,
    Xml,
    Ttml,
}

impl Format {
    /// Map a file extension (with or without the dot) to a format.
    pub fn from_extension(ext: &str) -> Result<Self, FormatError> {
        let ext = ext.trim_start_matches('.').to_ascii_lowercase();
        match ext.as_str() {
            "srt" => Ok(Format::Srt),
            "json" => Ok(Format::Json),
            "xml" => Ok(Format::Xml),
            "ttml" => Ok(Format::Ttml),
            _ => Err(FormatError::Unsupported(format!(".{ext}"))),
        }
    }

    /// Detect the format from a path's extension.
    pub fn from_path(path: &Path) -> Result<Self, FormatError> {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::from_extension(&ext)
    }

    pub fn name(self) -> &'static str {
        match self {
            Format::Srt => "srt",
            Format::Json => "json",
            Format::Xml => "xml",
            Format::Ttml => "ttml",
        }
    }

    /// Decode raw file contents with this format's decoder.
    pub fn decode(self, raw: &[u8], config: &Config) -> Result<Vec<TimedTextBlock>, FormatError> {
        trace!("decode format={} bytes={}", self.name(), raw.len());
        let text = to_text(raw);
        let blocks = match self {
            Format::Srt => srt::parse(&text)?,
            Format::Json => json::parse(&text, config.default_duration_ms)?,
            Format::Xml => xml::parse(&text, config.default_duration_ms)?,
            Format::Ttml => ttml::parse(&text, config.default_duration_ms)?,
        };
        debug!("decoded {} {} blocks", blocks.len(), self.name());
        Ok(blocks)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Lossy UTF-8 view of the input with any byte-order mark removed.
fn to_text(raw: &[u8]) -> String {
    let text = String::from_utf8_lossy(raw);
    text.strip_prefix('\u{feff}').unwrap_or(&text).to_string()
}

/// Unify CRLF and lone CR line endings to LF.
pub(crate) fn normalize_newlines(s: &str) -> String {
    s.replace("\r\n", "\n").replace('\r', "\n")
}

/// Trim every line while keeping the line structure.
pub(crate) fn trim_lines(text: &str) -> String {
    text.split('\n').map(str::trim).collect::<Vec<_>>().join("\n")
}
