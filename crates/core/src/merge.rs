//! Merge engine: collapse duplicate and continuous cues, then stack cues that
//! share an interval and style into one multi-line event.

use crate::block::{Style, TimedTextBlock};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use tracing::{debug, trace};

/// ASS hard line break placed between stacked cue texts.
pub const LINE_BREAK: &str = "\\N";

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Split multi-line cues into one block per trimmed line.
///
/// Each line keeps the parent's full time range and style. Leading and
/// trailing blank lines are dropped, interior ones are kept as empty rows so
/// they survive regrouping.
pub fn split_lines(blocks: Vec<TimedTextBlock>) -> Vec<TimedTextBlock> {
    let mut out = Vec::with_capacity(blocks.len());
    for block in blocks {
        let lines: Vec<&str> = block.text.split('\n').map(str::trim).collect();
        let Some(first) = lines.iter().position(|l| !l.is_empty()) else {
            continue;
        };
        let last = lines.iter().rposition(|l| !l.is_empty()).unwrap_or(first);
        for line in &lines[first..=last] {
            out.push(TimedTextBlock {
                text: line.to_string(),
                ..block.clone()
            });
        }
    }
    out
}

/// Sort by start and coalesce repeats of the same line.
///
/// A block is folded into the previous accumulator when style and normalized
/// text match and either the interval is identical (dropped as a duplicate)
/// or the gap between the two is within `tolerance_ms` (the accumulator's end
/// is extended). Equal start times keep input order.
pub fn merge_continuous(mut blocks: Vec<TimedTextBlock>, tolerance_ms: i64) -> Vec<TimedTextBlock> {
    trace!("merge_continuous blocks={} tolerance_ms={}", blocks.len(), tolerance_ms);
    blocks.sort_by_key(|b| b.start_ms);
    let mut merged: Vec<TimedTextBlock> = Vec::with_capacity(blocks.len());
    for block in blocks {
        if let Some(last) = merged.last_mut() {
            if last.style == block.style && normalize_spaces(&last.text) == normalize_spaces(&block.text) {
                if last.start_ms == block.start_ms && last.end_ms == block.end_ms {
                    continue;
                }
                if block.start_ms.saturating_sub(last.end_ms).saturating_abs() <= tolerance_ms {
                    last.end_ms = last.end_ms.max(block.end_ms);
                    continue;
                }
            }
        }
        merged.push(block);
    }
    debug!("merge_continuous kept {} blocks", merged.len());
    merged
}

/// Join blocks sharing `(start, end, style)` into one block with `\N` breaks.
///
/// Groups come out in the order their key is first seen, and member texts in
/// input order. Input is expected to be start-sorted already.
pub fn merge_same_interval(blocks: Vec<TimedTextBlock>) -> Vec<TimedTextBlock> {
    trace!("merge_same_interval blocks={}", blocks.len());
    let mut index: HashMap<(i64, i64, Style), usize> = HashMap::new();
    let mut out: Vec<TimedTextBlock> = Vec::new();
    for block in blocks {
        let key = (block.start_ms, block.end_ms, block.style);
        match index.get(&key) {
            Some(&i) => {
                let group = &mut out[i];
                group.text.push_str(LINE_BREAK);
                group.text.push_str(&block.text);
            }
            None => {
                index.insert(key, out.len());
                out.push(block);
            }
        }
    }
    // A group made only of blank rows has nothing to show.
    out.retain(|b| b.text.split(LINE_BREAK).any(|l| !l.trim().is_empty()));
    debug!("merge_same_interval produced {} blocks", out.len());
    out
}

/// Collapse whitespace runs to one space and trim.
pub fn normalize_spaces(s: &str) -> String {
    WHITESPACE_RUN.replace_all(s, " ").trim().to_string()
}
