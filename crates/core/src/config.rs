//! Conversion settings threaded through every pipeline call.

use serde::{Deserialize, Serialize};

/// Default continuity merge window in seconds.
pub const DEFAULT_TOLERANCE_SECS: f64 = 0.1;

/// Length given to cues whose source carries no usable end time.
pub const DEFAULT_DURATION_MS: i64 = 2000;

/// Font written into generated styles and forced by the resampler.
pub const DEFAULT_FONT_NAME: &str = "Basic Comical NC";

/// A render resolution in pixels (`PlayResX` x `PlayResY`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Self::new(1920, 1080)
    }
}

/// Settings for one conversion or resample run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Maximum gap, in seconds, between two identical cues that still get joined.
    pub tolerance_secs: f64,
    /// Fallback cue length when a source omits the end time or duration.
    pub default_duration_ms: i64,
    /// Resolution written into generated documents and targeted by the resampler.
    pub target: Resolution,
    /// Font name used by the generated styles and the resampler.
    pub font_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tolerance_secs: DEFAULT_TOLERANCE_SECS,
            default_duration_ms: DEFAULT_DURATION_MS,
            target: Resolution::default(),
            font_name: DEFAULT_FONT_NAME.to_string(),
        }
    }
}

impl Config {
    /// Merge tolerance expressed in whole milliseconds.
    pub fn tolerance_ms(&self) -> i64 {
        (self.tolerance_secs * 1000.0).round() as i64
    }
}
