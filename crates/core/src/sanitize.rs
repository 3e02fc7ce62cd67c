//! Strip conflicting override tags and add the default caption effect.

use crate::block::{Style, TimedTextBlock};
use once_cell::sync::Lazy;
use regex::Regex;

/// Blur plus short fade prepended to every non-signage event.
pub const DEFAULT_EFFECT: &str = "{\\blur3}{\\fad(00,40)}";

/// Patterns removed from cue text, applied in order.
static STRIP_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)\\fn[^\\}]+",
        r"(?i)\\fs\d+",
        r"(?i)\{\\blur[^}]*\}",
        r"(?i)\{\\fad\([^}]*\)\}",
        r"(?i)\\blur[0-9.]+",
        r"(?i)\\fad\([^)]*\)",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Remove font name, font size, blur and fade overrides, then drop any
/// tag wrapper left empty.
pub fn strip_conflicting_tags(text: &str) -> String {
    let mut out = text.to_string();
    for re in STRIP_PATTERNS.iter() {
        out = re.replace_all(&out, "").into_owned();
    }
    out.replace("{}", "")
}

/// Sanitize every block and prefix [`DEFAULT_EFFECT`] unless it is signage.
pub fn annotate(blocks: &mut [TimedTextBlock]) {
    for block in blocks.iter_mut() {
        let clean = strip_conflicting_tags(&block.text);
        block.text = match block.style {
            Style::Tanda => clean,
            Style::Default => format!("{DEFAULT_EFFECT}{clean}"),
        };
    }
}
