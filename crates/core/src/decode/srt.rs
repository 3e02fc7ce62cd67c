//! SRT reading and writing.
//! Blocks are blank-line separated; the line holding `-->` carries the times
//! and every line after it is cue text.

use super::normalize_newlines;
use crate::block::TimedTextBlock;
use crate::error::FormatError;
use crate::time::{format_srt, parse_ms};
use tracing::{debug, trace};

/// Parse SRT text into blocks, preserving document order.
/// Blocks without a timing line are skipped. Input that is not blank but holds
/// no timing line at all is rejected.
pub fn parse(input: &str) -> Result<Vec<TimedTextBlock>, FormatError> {
    let content = normalize_newlines(input);
    let mut blocks = Vec::new();
    let mut chunk: Vec<&str> = Vec::new();
    for line in content.lines().chain(std::iter::once("")) {
        if !line.trim().is_empty() {
            chunk.push(line);
            continue;
        }
        if chunk.is_empty() {
            continue;
        }
        match parse_chunk(&chunk) {
            Some(block) => blocks.push(block),
            None => debug!("skipping srt block without timing line: {:?}", chunk[0]),
        }
        chunk.clear();
    }
    if blocks.is_empty() && !content.trim().is_empty() {
        return Err(FormatError::NoCues { format: "srt" });
    }
    Ok(blocks)
}

/// Turn one blank-line delimited chunk into a block.
fn parse_chunk(lines: &[&str]) -> Option<TimedTextBlock> {
    let pos = lines.iter().position(|l| l.contains("-->"))?;
    let (start_ms, end_ms) = parse_times(lines[pos]);
    let text = lines[pos + 1..].join("\n");
    Some(TimedTextBlock::new(start_ms, end_ms, text))
}

/// Parse a time range like `00:00:01,000 --> 00:00:02,000` to milliseconds.
/// Anything after the end time (position hints) is ignored.
fn parse_times(line: &str) -> (i64, i64) {
    trace!("parse_times line={line}");
    let Some((start, end)) = line.split_once("-->") else {
        return (0, 0);
    };
    let end = end.split_whitespace().next().unwrap_or("");
    (parse_ms(start), parse_ms(end))
}

/// Write blocks as SRT, renumbered from 1 in slice order.
/// Source indices are not kept; every cue ends with an empty line.
pub fn format(blocks: &[TimedTextBlock]) -> String {
    let mut out = String::new();
    for (i, block) in blocks.iter().enumerate() {
        out.push_str(&format!(
            "{}\n{} --> {}\n{}\n\n",
            i + 1,
            format_srt(block.start_ms),
            format_srt(block.end_ms),
            block.text
        ));
    }
    out
}
