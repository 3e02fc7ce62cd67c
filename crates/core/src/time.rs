//! Timestamp parsing for every supported input format.
//!
//! All formats collapse to signed integer milliseconds. Parsing is lenient:
//! [`parse_ms`] never fails and yields 0 for anything it cannot read.

/// Parse a timestamp into milliseconds, falling back to 0 on garbage.
///
/// Accepted shapes: `HH:MM:SS,mmm`, `HH:MM:SS.mmm`, `MM:SS.mmm`, `1500ms`,
/// `1.5s` and bare numbers. A bare number above 1000 is taken as
/// milliseconds, anything else as seconds. That cut-off is a guess about the
/// producer and is lossy around the threshold (`"1000"` means 1000 seconds).
pub fn parse_ms(input: &str) -> i64 {
    try_parse_ms(input).unwrap_or(0)
}

/// Strict variant of [`parse_ms`] returning `None` when the input is unreadable.
pub fn try_parse_ms(input: &str) -> Option<i64> {
    let s = input.trim().replace(',', ".");
    if s.is_empty() {
        return None;
    }
    let lower = s.to_ascii_lowercase();
    if let Some(num) = lower.strip_suffix("ms") {
        return parse_number(num).map(|v| v.trunc() as i64);
    }
    if let Some(num) = lower.strip_suffix('s') {
        return parse_number(num).map(seconds_to_ms);
    }
    if s.contains(':') {
        let parts: Vec<&str> = s.split(':').collect();
        let (h, m, sec) = match parts.as_slice() {
            [h, m, sec] => (parse_number(h)?, parse_number(m)?, parse_number(sec)?),
            [m, sec] => (0.0, parse_number(m)?, parse_number(sec)?),
            _ => return None,
        };
        return Some(seconds_to_ms(h * 3600.0 + m * 60.0 + sec));
    }
    let value = parse_number(&s)?;
    if value > 1000.0 {
        Some(value.trunc() as i64)
    } else {
        Some(seconds_to_ms(value))
    }
}

/// Format milliseconds as an SRT timestamp (`HH:MM:SS,mmm`).
pub fn format_srt(ms: i64) -> String {
    let ms = ms.max(0);
    let h = ms / 3_600_000;
    let m = (ms % 3_600_000) / 60_000;
    let s = (ms % 60_000) / 1000;
    let ms = ms % 1000;
    format!("{h:02}:{m:02}:{s:02},{ms:03}")
}

/// Format milliseconds as an ASS timestamp (`H:MM:SS.cc`).
///
/// Hours are not wrapped at 24; negative input clamps to zero.
pub fn format_ass(ms: i64) -> String {
    let ms = ms.max(0);
    let total_secs = ms / 1000;
    let h = total_secs / 3600;
    let m = (total_secs % 3600) / 60;
    let s = total_secs % 60;
    let cs = (ms / 10) % 100;
    format!("{h}:{m:02}:{s:02}.{cs:02}")
}

fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Seconds to truncated milliseconds.
///
/// Rounds to the microsecond first so `2.05` gives 2050 rather than the
/// 2049 that plain binary truncation produces.
fn seconds_to_ms(secs: f64) -> i64 {
    let micros = (secs * 1_000_000.0).round();
    (micros / 1000.0).trunc() as i64
}
