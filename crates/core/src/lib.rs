//! Core library for converting timed-text subtitles to ASS and resampling
//! existing ASS documents. All entry points work on in-memory text.

pub mod ass;
pub mod block;
pub mod classify;
pub mod config;
pub mod convert;
pub mod decode;
pub mod error;
pub mod merge;
pub mod sanitize;
pub mod time;

pub use ass::resample::resample;
pub use block::{Style, TimedTextBlock};
pub use config::{Config, Resolution};
pub use convert::convert;
pub use decode::Format;
pub use error::FormatError;
