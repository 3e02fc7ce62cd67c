//! Heuristic caption vs. signage classification.

use crate::block::Style;
use once_cell::sync::Lazy;
use regex::Regex;

static OVERRIDE_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{.*?\}").unwrap());

/// Classify a line of cue text.
///
/// Override tags are ignored. Text with no lowercase ASCII letter, or text
/// wrapped entirely in one `(...)` or `[...]` pair, is signage (`tanda`).
pub fn classify(text: &str) -> Style {
    let clean = OVERRIDE_TAG.replace_all(text, "");
    let clean = clean.trim();
    if clean.is_empty() {
        return Style::Default;
    }
    if !clean.chars().any(|c| c.is_ascii_lowercase()) {
        return Style::Tanda;
    }
    if is_wrapped(clean) {
        return Style::Tanda;
    }
    Style::Default
}

/// True when the opening bracket's matching close is the last character.
fn is_wrapped(s: &str) -> bool {
    let (open, close) = match s.chars().next() {
        Some('(') => ('(', ')'),
        Some('[') => ('[', ']'),
        _ => return false,
    };
    let mut depth = 0usize;
    for (i, c) in s.char_indices() {
        if c == open {
            depth += 1;
        } else if c == close {
            depth = depth.saturating_sub(1);
            if depth == 0 {
                return i + c.len_utf8() == s.len();
            }
        }
    }
    false
}
