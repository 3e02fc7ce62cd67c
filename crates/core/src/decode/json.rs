//! JSON caption events (YouTube `json3` style and simpler variants).
//!
//! Each logical attribute is looked up through an ordered alias list; the
//! first key present on the event wins, even if its value is unusable.

use crate::block::TimedTextBlock;
use crate::error::FormatError;
use serde_json::{Map, Value};
use tracing::debug;

/// Keys holding the start time in milliseconds.
pub const START_KEYS: &[&str] = &["tStartMs", "start"];
/// Keys holding the duration in milliseconds.
pub const DURATION_KEYS: &[&str] = &["dDurationMs", "duration"];
/// Keys inside a `segs` entry holding a text fragment.
pub const SEGMENT_TEXT_KEYS: &[&str] = &["utf8", "text"];
/// Key holding the text directly on the event.
pub const TEXT_KEY: &str = "text";
/// Key holding the list of text segments.
pub const SEGMENTS_KEY: &str = "segs";

/// Parse a JSON event list into blocks sorted by start time.
/// Accepts a bare array or an object with an `events` array. Events that are
/// not objects or carry no text are skipped.
pub fn parse(input: &str, default_duration_ms: i64) -> Result<Vec<TimedTextBlock>, FormatError> {
    let root: Value = serde_json::from_str(input)?;
    let events = match &root {
        Value::Array(events) => events,
        Value::Object(obj) => match obj.get("events") {
            Some(Value::Array(events)) => events,
            Some(_) => return Err(FormatError::EventsNotArray),
            None => return Err(FormatError::MissingEvents),
        },
        _ => return Err(FormatError::MissingEvents),
    };

    let mut blocks = Vec::with_capacity(events.len());
    for (i, event) in events.iter().enumerate() {
        let Some(event) = event.as_object() else {
            debug!("skipping json event {i}: not an object");
            continue;
        };
        match parse_event(event, default_duration_ms) {
            Some(block) => blocks.push(block),
            None => debug!("skipping json event {i}: no text"),
        }
    }
    // Stable: equal start times keep document order.
    blocks.sort_by_key(|b| b.start_ms);
    Ok(blocks)
}

fn parse_event(event: &Map<String, Value>, default_duration_ms: i64) -> Option<TimedTextBlock> {
    let start_ms = lookup(event, START_KEYS).map(as_millis).unwrap_or(0);
    let duration_ms = match lookup(event, DURATION_KEYS).map(as_millis) {
        Some(d) if d != 0 => d,
        _ => default_duration_ms,
    };
    let text = event_text(event);
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    Some(TimedTextBlock::new(start_ms, start_ms.saturating_add(duration_ms), text))
}

/// Concatenate `segs` fragments, or fall back to a direct `text` field.
fn event_text(event: &Map<String, Value>) -> String {
    if let Some(Value::Array(segs)) = event.get(SEGMENTS_KEY) {
        let mut out = String::new();
        for seg in segs {
            match seg {
                Value::Object(seg) => {
                    if let Some(v) = lookup(seg, SEGMENT_TEXT_KEYS) {
                        out.push_str(&value_text(v));
                    }
                }
                other => out.push_str(&value_text(other)),
            }
        }
        return out;
    }
    event.get(TEXT_KEY).map(value_text).unwrap_or_default()
}

/// First value whose key is present, in alias order.
fn lookup<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|k| obj.get(*k))
}

/// Numbers truncate to integers; numeric strings are parsed; anything else is 0.
fn as_millis(v: &Value) -> i64 {
    match v {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .unwrap_or(0),
        Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

fn value_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_youtube_events() {
        let input = r#"{"events":[
            {"tStartMs":3000,"dDurationMs":1000,"segs":[{"utf8":"second"}]},
            {"tStartMs":1000,"dDurationMs":1500,"segs":[{"utf8":"Hel"},{"utf8":"lo"}]}
        ]}"#;
        let blocks = parse(input, 2000).unwrap();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0], TimedTextBlock::new(1000, 2500, "Hello"));
        assert_eq!(blocks[1].text, "second");
    }

    #[test]
    fn parses_bare_array_with_aliases() {
        let input = r#"[{"start":"500","text":"plain"},{"start":100,"duration":0,"segs":[{"text":"seg"}]}]"#;
        let blocks = parse(input, 2000).unwrap();
        assert_eq!(blocks[0], TimedTextBlock::new(100, 2100, "seg"));
        assert_eq!(blocks[1], TimedTextBlock::new(500, 2500, "plain"));
    }

    /// The first alias present wins even when a later alias also exists.
    #[test]
    fn first_alias_wins() {
        let input = r#"[{"tStartMs":10,"start":99,"dDurationMs":5,"duration":7,"text":"x"}]"#;
        let blocks = parse(input, 2000).unwrap();
        assert_eq!((blocks[0].start_ms, blocks[0].end_ms), (10, 15));
    }

    #[test]
    fn sort_keeps_document_order_for_ties() {
        let input = r#"[{"start":0,"text":"a"},{"start":0,"text":"b"},{"start":0,"text":"c"}]"#;
        let texts: Vec<_> = parse(input, 2000).unwrap().into_iter().map(|b| b.text).collect();
        assert_eq!(texts, vec!["a", "b", "c"]);
    }

    #[test]
    fn skips_malformed_events() {
        let input = r#"{"events":[42,{"tStartMs":0},{"tStartMs":0,"segs":[{"utf8":"\n"}]},{"tStartMs":1,"text":"ok"}]}"#;
        let blocks = parse(input, 2000).unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].text, "ok");
    }

    /// Huge start times clamp the end instead of overflowing.
    #[test]
    fn saturates_end_time() {
        let input = r#"[{"start":9223372036854775807,"text":"x"},{"start":9223372036854775000,"duration":5000,"text":"y"}]"#;
        let blocks = parse(input, 2000).unwrap();
        assert_eq!(blocks[0].end_ms, i64::MAX);
        assert_eq!(blocks[1].end_ms, i64::MAX);
    }

    #[test]
    fn rejects_unknown_schema() {
        assert!(matches!(parse(r#"{"body":[]}"#, 2000), Err(FormatError::MissingEvents)));
        assert!(matches!(parse(r#"{"events":{}}"#, 2000), Err(FormatError::EventsNotArray)));
        assert!(matches!(parse("42", 2000), Err(FormatError::MissingEvents)));
        assert!(matches!(parse("{not json", 2000), Err(FormatError::Json(_))));
    }
}
