//! Conversion pipeline from decoded cues to an ASS document.
//! This module wires decoding, classification, merging, tag cleanup and
//! rendering. Nothing here touches the filesystem.

use crate::ass;
use crate::block::TimedTextBlock;
use crate::classify::classify;
use crate::config::Config;
use crate::decode::Format;
use crate::error::FormatError;
use crate::merge::{merge_continuous, merge_same_interval, split_lines};
use crate::sanitize::annotate;
use tracing::{debug, trace};

/// Run the normalization and merge pipeline over decoded blocks.
///
/// Steps: split to one block per line, classify each line, collapse
/// duplicate and continuous repeats, stack same-interval lines, then strip
/// conflicting tags and add the default effect.
pub fn normalize(blocks: Vec<TimedTextBlock>, config: &Config) -> Vec<TimedTextBlock> {
    trace!("normalize blocks={}", blocks.len());
    let mut lines = split_lines(blocks);
    for line in lines.iter_mut() {
        line.style = classify(&line.text);
    }
    debug!("split into {} classified lines", lines.len());
    let merged = merge_continuous(lines, config.tolerance_ms());
    let mut events = merge_same_interval(merged);
    annotate(&mut events);
    events
}

/// Convert decoded blocks into a full ASS document.
pub fn blocks_to_ass(blocks: Vec<TimedTextBlock>, config: &Config) -> String {
    let events = normalize(blocks, config);
    debug!("rendering {} events", events.len());
    ass::render(&events, config)
}

/// Decode `raw` as `format` and convert it into a full ASS document.
pub fn convert(format: Format, raw: &[u8], config: &Config) -> Result<String, FormatError> {
    let blocks = format.decode(raw, config)?;
    Ok(blocks_to_ass(blocks, config))
}
