//! Generic timed XML: `<dia>`, `<entry>` or `<p>` elements with `st`, `et`
//! and `sub` children.
//!
//! Well-formed documents are walked as a tree. When that yields nothing
//! (broken markup is common in this format) a textual scan picks up
//! `<dia>` blocks with CDATA-wrapped `<sub>` text.

use super::{normalize_newlines, trim_lines};
use crate::block::TimedTextBlock;
use crate::error::FormatError;
use crate::time::parse_ms;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, trace};

const ENTRY_NAMES: &[&str] = &["dia", "entry", "p"];

static DIA_BLOCK: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<dia>.*?</dia>").unwrap());
static ST_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<st>(.*?)</st>").unwrap());
static ET_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<et>(.*?)</et>").unwrap());
static SUB_CDATA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<sub><!\[CDATA\[(.*?)\]\]></sub>").unwrap());

/// Parse generic subtitle XML into blocks sorted by start time.
pub fn parse(input: &str, default_duration_ms: i64) -> Result<Vec<TimedTextBlock>, FormatError> {
    let input = normalize_newlines(input);
    let (mut blocks, mut candidates) = parse_tree(&input, default_duration_ms);
    if blocks.is_empty() {
        trace!("xml tree walk found nothing, falling back to text scan");
        let (fallback, found) = parse_loose(&input, default_duration_ms);
        blocks = fallback;
        candidates += found;
    }
    if candidates == 0 {
        return Err(FormatError::NoCues { format: "xml" });
    }
    blocks.sort_by_key(|b| b.start_ms);
    Ok(blocks)
}

/// Structured walk. Returns the blocks and how many candidate elements were seen.
fn parse_tree(input: &str, default_duration_ms: i64) -> (Vec<TimedTextBlock>, usize) {
    let mut opts = roxmltree::ParsingOptions::default();
    opts.allow_dtd = true;
    let doc = match roxmltree::Document::parse_with_options(input, opts) {
        Ok(doc) => doc,
        Err(err) => {
            debug!("xml is not well-formed: {err}");
            return (Vec::new(), 0);
        }
    };

    let mut blocks = Vec::new();
    let mut candidates = 0;
    for node in doc.descendants().filter(|n| is_entry(n)) {
        candidates += 1;
        let mut st = String::new();
        let mut et = String::new();
        let mut sub = String::new();
        for child in node.children().filter(|c| c.is_element()) {
            match child.tag_name().name().to_ascii_lowercase().as_str() {
                "st" => st = element_text(&child),
                "et" => et = element_text(&child),
                "sub" => sub = element_text(&child),
                _ => {}
            }
        }
        if sub.is_empty() {
            continue;
        }
        let start_ms = parse_ms(&st);
        let end_ms = match parse_ms(&et) {
            0 => start_ms.saturating_add(default_duration_ms),
            end => end,
        };
        blocks.push(TimedTextBlock::new(start_ms, end_ms, trim_lines(&sub)));
    }
    (blocks, candidates)
}

/// Textual scan for `<dia>` blocks.
/// Times here are plain integer milliseconds.
fn parse_loose(input: &str, default_duration_ms: i64) -> (Vec<TimedTextBlock>, usize) {
    let mut blocks = Vec::new();
    let mut candidates = 0;
    for m in DIA_BLOCK.find_iter(input) {
        candidates += 1;
        let block = m.as_str();
        let Some(sub) = SUB_CDATA.captures(block) else {
            debug!("skipping <dia> without CDATA <sub>");
            continue;
        };
        let int_field = |re: &Regex| {
            re.captures(block)
                .and_then(|c| c[1].trim().parse::<i64>().ok())
                .unwrap_or(0)
        };
        let start_ms = int_field(&*ST_TAG);
        let end_ms = match int_field(&*ET_TAG) {
            0 => start_ms.saturating_add(default_duration_ms),
            end => end,
        };
        blocks.push(TimedTextBlock::new(start_ms, end_ms, trim_lines(&sub[1])));
    }
    (blocks, candidates)
}

fn is_entry(node: &roxmltree::Node) -> bool {
    node.is_element()
        && ENTRY_NAMES
            .iter()
            .any(|n| node.tag_name().name().eq_ignore_ascii_case(n))
}

/// All text below an element, CDATA included, with markup dropped.
fn element_text(node: &roxmltree::Node) -> String {
    node.descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect()
}
