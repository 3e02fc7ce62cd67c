//! Rescale an existing ASS document to a new `PlayRes`.
//!
//! Only the geometry-bearing style fields and a fixed set of override tags
//! (`\pos`, `\move`, `\org`, `\iclip`, `\fs`, `\fsp`, `\bord`, `\shad`,
//! `\blur`) are touched. Every other tag passes through unchanged.

use crate::config::{Config, Resolution};
use once_cell::sync::Lazy;
use regex::{Captures, NoExpand, Regex};
use tracing::{debug, trace};

/// Assumed source resolution when the header does not declare one.
pub const FALLBACK_RESOLUTION: Resolution = Resolution::new(1280, 720);

// Field positions in a `Style:` line, see `ass::STYLES_FORMAT`.
const FONTNAME: usize = 1;
const FONTSIZE: usize = 2;
const SPACING: usize = 13;
const OUTLINE: usize = 16;
const SHADOW: usize = 17;
const MARGIN_L: usize = 19;
const MARGIN_R: usize = 20;
const MARGIN_V: usize = 21;

static PLAYRES_X: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^PlayResX\s*:\s*([0-9]+)").unwrap());
static PLAYRES_Y: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^PlayResY\s*:\s*([0-9]+)").unwrap());

const NUM: &str = r"\s*([0-9.+-]+)\s*";

static POS: Lazy<Regex> = Lazy::new(|| Regex::new(&format!(r"(?i)\\pos\({NUM},{NUM}\)")).unwrap());
static ORG: Lazy<Regex> = Lazy::new(|| Regex::new(&format!(r"(?i)\\org\({NUM},{NUM}\)")).unwrap());
static MOVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)\\move\({NUM},{NUM},{NUM},{NUM}(,[^)]*)?\)")).unwrap()
});
static ICLIP: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"(?i)\\iclip\({NUM},{NUM},{NUM},{NUM}\)")).unwrap());
static SIZE_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\\(fsp|fs|bord|shad|blur)(-?[0-9.]+)").unwrap());
static FONT_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\\fn[^\\}]+").unwrap());

/// Per-axis and uniform scale factors between two resolutions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleFactors {
    pub x: f64,
    pub y: f64,
    /// Mean of `x` and `y`, used for sizes that have no axis.
    pub uniform: f64,
}

impl ScaleFactors {
    pub fn between(from: Resolution, to: Resolution) -> Self {
        let x = f64::from(to.width) / f64::from(from.width);
        let y = f64::from(to.height) / f64::from(from.height);
        Self {
            x,
            y,
            uniform: (x + y) / 2.0,
        }
    }
}

/// Read `PlayResX`/`PlayResY`, falling back to 1280x720 when either is
/// missing or zero.
pub fn detect_play_res(content: &str) -> Resolution {
    let read = |re: &Regex| {
        re.captures(content)
            .and_then(|c| c[1].parse::<u32>().ok())
            .unwrap_or(0)
    };
    let (width, height) = (read(&*PLAYRES_X), read(&*PLAYRES_Y));
    if width == 0 || height == 0 {
        return FALLBACK_RESOLUTION;
    }
    Resolution::new(width, height)
}

/// Rescale a whole document to `config.target` and force `config.font_name`.
pub fn resample(content: &str, config: &Config) -> String {
    let source = detect_play_res(content);
    let factors = ScaleFactors::between(source, config.target);
    debug!(
        "resampling {}x{} -> {}x{} (fx={:.4} fy={:.4})",
        source.width, source.height, config.target.width, config.target.height, factors.x, factors.y
    );

    let mut lines: Vec<String> = content.lines().map(str::to_string).collect();
    set_play_res(&mut lines, config.target);
    insert_provenance(&mut lines, config.target);
    for line in lines.iter_mut() {
        if let Some(fields) = line.strip_prefix("Style:") {
            *line = rescale_style(fields, &factors, &config.font_name);
        }
    }
    let newline = if content.contains("\r\n") { "\r\n" } else { "\n" };
    let mut out = lines.join(newline);
    if content.ends_with('\n') {
        out.push_str(newline);
    }
    rescale_override_tags(&out, &factors, &config.font_name)
}

/// Overwrite existing `PlayRes` lines and add missing ones to `[Script Info]`.
fn set_play_res(lines: &mut Vec<String>, target: Resolution) {
    let mut seen_x = false;
    let mut seen_y = false;
    for line in lines.iter_mut() {
        if PLAYRES_X.is_match(line) {
            *line = format!("PlayResX: {}", target.width);
            seen_x = true;
        } else if PLAYRES_Y.is_match(line) {
            *line = format!("PlayResY: {}", target.height);
            seen_y = true;
        }
    }
    let mut missing = Vec::new();
    if !seen_x {
        missing.push(format!("PlayResX: {}", target.width));
    }
    if !seen_y {
        missing.push(format!("PlayResY: {}", target.height));
    }
    if missing.is_empty() {
        return;
    }
    trace!("inserting {} PlayRes lines", missing.len());

    let Some(info) = lines
        .iter()
        .position(|l| l.trim().eq_ignore_ascii_case("[script info]"))
    else {
        let mut head = vec!["[Script Info]".to_string()];
        head.extend(missing);
        head.push(String::new());
        lines.splice(0..0, head);
        return;
    };
    let section_end = lines[info + 1..]
        .iter()
        .position(|l| l.trim_start().starts_with('['))
        .map_or(lines.len(), |i| info + 1 + i);
    let mut at = section_end;
    while at > info + 1 && lines[at - 1].trim().is_empty() {
        at -= 1;
    }
    lines.splice(at..at, missing);
}

/// Add a one-line resample note ahead of `[V4+ Styles]`, once.
fn insert_provenance(lines: &mut Vec<String>, target: Resolution) {
    let note = format!(
        "; Resampled to {}x{} and normalized by Limesub v3",
        target.width, target.height
    );
    if lines.iter().any(|l| l.trim() == note) {
        return;
    }
    if let Some(i) = lines.iter().position(|l| l.trim() == "[V4+ Styles]") {
        lines.splice(i..i, [note, String::new()]);
    }
}

/// Rewrite the fields of one `Style:` line (text after the prefix).
fn rescale_style(fields: &str, factors: &ScaleFactors, font: &str) -> String {
    let mut parts: Vec<String> = fields.split(',').map(|p| p.trim().to_string()).collect();
    if parts.len() > FONTNAME {
        parts[FONTNAME] = font.to_string();
    }
    let mut scale = |idx: usize, factor: f64, whole: bool| {
        if let Some(v) = parts.get(idx).and_then(|p| p.parse::<f64>().ok()) {
            let v = v * factor;
            parts[idx] = if whole { format_whole(v) } else { format_real(v) };
        }
    };
    scale(FONTSIZE, factors.uniform, true);
    scale(SPACING, factors.uniform, false);
    scale(OUTLINE, factors.uniform, false);
    scale(SHADOW, factors.uniform, false);
    scale(MARGIN_L, factors.x, true);
    scale(MARGIN_R, factors.x, true);
    scale(MARGIN_V, factors.y, true);
    format!("Style: {}", parts.join(","))
}

/// Rescale positional and size override tags and force the font name.
pub fn rescale_override_tags(content: &str, factors: &ScaleFactors, font: &str) -> String {
    let (fx, fy) = (factors.x, factors.y);
    let out = rescale_args(content, &POS, "pos", &[fx, fy]);
    let out = rescale_args(&out, &ORG, "org", &[fx, fy]);
    let out = rescale_args(&out, &MOVE, "move", &[fx, fy, fx, fy]);
    let out = rescale_args(&out, &ICLIP, "iclip", &[fx, fy, fx, fy]);
    let out = SIZE_TAG.replace_all(&out, |caps: &Captures| match caps[2].parse::<f64>() {
        Ok(v) => format!("\\{}{}", &caps[1], format_real(v * factors.uniform)),
        Err(_) => caps[0].to_string(),
    });
    let font_tag = format!("\\fn{font}");
    FONT_TAG.replace_all(&out, NoExpand(&font_tag)).into_owned()
}

/// Multiply the numeric captures of `re` by `scales`, keeping any trailing
/// capture (the `\move` timing pair) verbatim.
fn rescale_args(content: &str, re: &Regex, tag: &str, scales: &[f64]) -> String {
    re.replace_all(content, |caps: &Captures| {
        let mut args = Vec::with_capacity(scales.len());
        for (i, scale) in scales.iter().enumerate() {
            match caps[i + 1].parse::<f64>() {
                Ok(v) => args.push(format_real(v * scale)),
                Err(_) => return caps[0].to_string(),
            }
        }
        let extra = caps.get(scales.len() + 1).map_or("", |m| m.as_str());
        format!("\\{tag}({}{extra})", args.join(","))
    })
    .into_owned()
}

fn format_whole(v: f64) -> String {
    format!("{}", v.round() as i64)
}

/// At most two decimals, trailing zeros trimmed.
fn format_real(v: f64) -> String {
    let s = format!("{v:.2}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}
