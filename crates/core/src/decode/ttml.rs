//! TTML (`<tt>` documents with timed `<p>` paragraphs).

use super::{normalize_newlines, trim_lines};
use crate::block::TimedTextBlock;
use crate::error::FormatError;
use crate::time::parse_ms;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

static BR_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<br\s*/?>(\s*</br\s*>)?").unwrap());

/// Parse a TTML document into blocks sorted by start time.
///
/// `<br>` variants become newlines before the XML parse because some
/// producers never close them. Remaining inline markup (`<span>` and the
/// like) is dropped; each line is trimmed.
pub fn parse(input: &str, default_duration_ms: i64) -> Result<Vec<TimedTextBlock>, FormatError> {
    let text = normalize_br(input);
    let mut opts = roxmltree::ParsingOptions::default();
    opts.allow_dtd = true;
    let doc = roxmltree::Document::parse_with_options(&text, opts)?;

    let paragraphs: Vec<_> = doc
        .descendants()
        .filter(|n| n.is_element() && n.tag_name().name().eq_ignore_ascii_case("p"))
        .collect();
    if paragraphs.is_empty() {
        return Err(FormatError::NoCues { format: "ttml" });
    }

    let mut blocks = Vec::with_capacity(paragraphs.len());
    for p in paragraphs {
        let start_ms = parse_ms(p.attribute("begin").unwrap_or(""));
        let end_ms = match parse_ms(p.attribute("end").unwrap_or("")) {
            0 => match p.attribute("dur") {
                Some(dur) if !dur.trim().is_empty() => start_ms.saturating_add(parse_ms(dur)),
                _ => start_ms.saturating_add(default_duration_ms),
            },
            end => end,
        };
        let body: String = p
            .descendants()
            .filter(|n| n.is_text())
            .filter_map(|n| n.text())
            .collect();
        let body = trim_lines(&body);
        if body.trim().is_empty() {
            debug!("skipping empty ttml paragraph at {start_ms}ms");
            continue;
        }
        blocks.push(TimedTextBlock::new(start_ms, end_ms, body));
    }
    blocks.sort_by_key(|b| b.start_ms);
    Ok(blocks)
}

/// Replace `<br>`, `<br/>`, `<br />` and `<br></br>` (any case) with a newline.
fn normalize_br(s: &str) -> String {
    let s = normalize_newlines(s);
    BR_TAG.replace_all(&s, "\n").into_owned()
}
