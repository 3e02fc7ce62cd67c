//! ASS document output and resolution resampling.

use crate::block::TimedTextBlock;
use crate::config::Config;
use crate::time::format_ass;

pub mod resample;

/// Column order of `[Events]` lines written by [`dialogue_line`].
pub const EVENTS_FORMAT: &str =
    "Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text";

/// Column order of `[V4+ Styles]` lines; the resampler relies on these positions.
pub const STYLES_FORMAT: &str = "Format: Name, Fontname, Fontsize, PrimaryColour, SecondaryColour, OutlineColour, BackColour, Bold, Italic, Underline, StrikeOut, ScaleX, ScaleY, Spacing, Angle, BorderStyle, Outline, Shadow, Alignment, MarginL, MarginR, MarginV, Encoding";

/// Script info, styles and events header of a generated document.
/// With the default config this reproduces the published header byte for byte.
pub fn header(config: &Config) -> String {
    let font = &config.font_name;
    format!(
        "[Script Info]
; Script generated by Limesub v2
; https://t.me/s/limenime
; https://www.facebook.com/limenime.official
; https://discord.gg/7XS7MCvVwh
; https://x.com/limenime
Title: Default Limenime Subtitle File
ScriptType: v4.00+
WrapStyle: 0
ScaledBorderAndShadow: yes
YCbCr Matrix: None
PlayResX: {width}
PlayResY: {height}
Timer: 100.0000

[V4+ Styles]
{STYLES_FORMAT}
Style: Default,{font},70,&H00FFFFFF,&H00FFFFFF,&H00000000,&H80000000,0,0,0,0,100,100,0,0,1,1.5,1,2,64,64,33,1
Style: tanda,{font},75,&H00FFFFFF,&H000000FF,&H00000000,&H00000000,-1,0,0,0,100,100,0,0,1,1,0,8,0,0,0,1

[Events]
{EVENTS_FORMAT}
",
        width = config.target.width,
        height = config.target.height,
    )
}

/// Render one event as a `Dialogue:` line (no trailing newline).
/// Text is the last field, so commas inside it need no escaping.
pub fn dialogue_line(block: &TimedTextBlock) -> String {
    format!(
        "Dialogue: 0,{},{},{},,0,0,0,,{}",
        format_ass(block.start_ms),
        format_ass(block.end_ms),
        block.style,
        block.text
    )
}

/// Render a complete document: header followed by one line per block.
pub fn render(blocks: &[TimedTextBlock], config: &Config) -> String {
    let mut out = header(config);
    for block in blocks {
        out.push_str(&dialogue_line(block));
        out.push('\n');
    }
    out
}
