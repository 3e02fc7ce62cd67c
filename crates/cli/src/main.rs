//! Binary entry point for the subtitle converter.

use anyhow::{Context, Result};
use clap::Parser;
use limesub_core::config::{DEFAULT_FONT_NAME, DEFAULT_TOLERANCE_SECS};
use limesub_core::decode::srt;
use limesub_core::{resample, Config, Format, Resolution};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, error, info, trace};
use tracing_subscriber::EnvFilter;

/// Suffix appended to the input stem for every output file.
const OUTPUT_SUFFIX: &str = "_Limenime";

/// Command line options for the binary.
#[derive(Parser)]
#[command(about = "Convert SRT, JSON, XML and TTML subtitles to ASS, or resample ASS files")]
struct Cli {
    /// Gap in seconds under which identical consecutive lines are joined.
    #[arg(long, default_value_t = DEFAULT_TOLERANCE_SECS)]
    tolerance: f64,

    /// Write outputs here instead of next to each input.
    #[arg(long)]
    outdir: Option<PathBuf>,

    /// Target PlayResX.
    #[arg(long, default_value_t = 1920)]
    width: u32,

    /// Target PlayResY.
    #[arg(long, default_value_t = 1080)]
    height: u32,

    /// Font used by generated styles and forced when resampling.
    #[arg(long, default_value = DEFAULT_FONT_NAME)]
    font: String,

    /// Also write the decoded cues as SRT next to the ASS output.
    #[arg(long)]
    dump_srt: bool,

    /// Enable verbose debug and trace logs.
    #[arg(long)]
    debug: bool,

    /// Subtitle files to process (.srt, .json, .xml, .ttml or .ass).
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
}

impl Cli {
    fn config(&self) -> Config {
        Config {
            tolerance_secs: self.tolerance,
            target: Resolution::new(self.width, self.height),
            font_name: self.font.clone(),
            ..Config::default()
        }
    }
}

/// Application entry point which parses CLI args and processes each input.
/// A failing input is logged and the run moves on to the next one.
fn main() -> ExitCode {
    let cli = Cli::parse();
    let filter = if cli.debug {
        EnvFilter::default()
            .add_directive("limesub=trace".parse().unwrap())
            .add_directive("limesub_core=trace".parse().unwrap())
            .add_directive("info".parse().unwrap())
    } else {
        EnvFilter::default()
            .add_directive("limesub=info".parse().unwrap())
            .add_directive("limesub_core=info".parse().unwrap())
            .add_directive("warn".parse().unwrap())
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = cli.config();
    let mut failed = 0;
    for input in &cli.inputs {
        match process_file(input, cli.outdir.as_deref(), &config, cli.dump_srt) {
            Ok(out) => info!("converted {} -> {}", input.display(), out.display()),
            Err(err) => {
                error!("failed to process {}: {:#}", input.display(), err);
                failed += 1;
            }
        }
    }
    if failed > 0 {
        error!("{failed} of {} inputs failed", cli.inputs.len());
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

/// Convert or resample one file and return the path written.
/// `.ass` inputs go through the resampler; everything else is decoded by
/// extension and converted.
fn process_file(input: &Path, outdir: Option<&Path>, config: &Config, dump_srt: bool) -> Result<PathBuf> {
    trace!("process_file input={}", input.display());
    let raw = fs::read(input).with_context(|| format!("reading {}", input.display()))?;
    let is_ass = input
        .extension()
        .map(|e| e.eq_ignore_ascii_case("ass"))
        .unwrap_or(false);

    let document = if is_ass {
        info!("resampling {}", input.display());
        let text = String::from_utf8_lossy(&raw);
        resample(text.trim_start_matches('\u{feff}'), config)
    } else {
        let format = Format::from_path(input)?;
        info!("converting {} as {}", input.display(), format);
        let blocks = format.decode(&raw, config)?;
        if dump_srt {
            let srt_path = next_output_path(input, outdir, "srt");
            fs::write(&srt_path, srt::format(&blocks))
                .with_context(|| format!("writing {}", srt_path.display()))?;
            debug!("dumped decoded cues to {}", srt_path.display());
        }
        limesub_core::convert::blocks_to_ass(blocks, config)
    };

    let out_path = next_output_path(input, outdir, "ass");
    fs::write(&out_path, document).with_context(|| format!("writing {}", out_path.display()))?;
    Ok(out_path)
}

/// Pick `<stem>_Limenime.<ext>`, or the first free `<stem>_Limenime(N).<ext>`.
fn next_output_path(input: &Path, outdir: Option<&Path>, ext: &str) -> PathBuf {
    let dir = outdir
        .map(Path::to_path_buf)
        .unwrap_or_else(|| input.parent().map(Path::to_path_buf).unwrap_or_default());
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    let first = dir.join(format!("{stem}{OUTPUT_SUFFIX}.{ext}"));
    if !first.exists() {
        return first;
    }
    (1..)
        .map(|i| dir.join(format!("{stem}{OUTPUT_SUFFIX}({i}).{ext}")))
        .find(|p| !p.exists())
        .unwrap_or(first)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    /// Existing outputs are never overwritten.
    #[test]
    fn numbers_colliding_outputs() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("ep01.srt");
        let first = next_output_path(&input, None, "ass");
        assert_eq!(first, dir.path().join("ep01_Limenime.ass"));
        fs::write(&first, "").unwrap();
        assert_eq!(next_output_path(&input, None, "ass"), dir.path().join("ep01_Limenime(1).ass"));
        fs::write(dir.path().join("ep01_Limenime(1).ass"), "").unwrap();
        assert_eq!(next_output_path(&input, None, "ass"), dir.path().join("ep01_Limenime(2).ass"));
    }

    #[test]
    fn converts_srt_file() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("orig.srt");
        fs::write(&input, "1\n00:00:00,000 --> 00:00:01,000\nhello\n\n").unwrap();
        let out = process_file(&input, None, &Config::default(), true).unwrap();
        assert_eq!(out, dir.path().join("orig_Limenime.ass"));
        let doc = fs::read_to_string(out).unwrap();
        assert!(doc.contains("Dialogue: 0,0:00:00.00,0:00:01.00,Default,,0,0,0,,{\\blur3}{\\fad(00,40)}hello"));
        let dumped = fs::read_to_string(dir.path().join("orig_Limenime.srt")).unwrap();
        assert_eq!(dumped, "1\n00:00:00,000 --> 00:00:01,000\nhello\n\n");
    }

    #[test]
    fn resamples_ass_into_outdir() {
        let dir = tempdir().unwrap();
        let outdir = dir.path().join("out");
        fs::create_dir(&outdir).unwrap();
        let input = dir.path().join("show.ass");
        fs::write(&input, "[Script Info]\nPlayResX: 1280\nPlayResY: 720\n\n[V4+ Styles]\n").unwrap();
        let out = process_file(&input, Some(outdir.as_path()), &Config::default(), false).unwrap();
        assert_eq!(out, outdir.join("show_Limenime.ass"));
        assert!(fs::read_to_string(out).unwrap().contains("PlayResX: 1920"));
    }

    /// One bad input does not stop the others from converting.
    #[test]
    fn failures_are_isolated_per_file() {
        let dir = tempdir().unwrap();
        let bad = dir.path().join("bad.json");
        let unknown = dir.path().join("notes.txt");
        let good = dir.path().join("good.json");
        fs::write(&bad, "{\"body\": []}").unwrap();
        fs::write(&unknown, "hi").unwrap();
        fs::write(&good, r#"[{"start":0,"text":"ok"}]"#).unwrap();
        let cfg = Config::default();
        let results: Vec<_> = [&bad, &unknown, &good]
            .iter()
            .map(|p| process_file(p, None, &cfg, false))
            .collect();
        assert!(results[0].is_err());
        assert!(results[1].is_err());
        assert!(results[2].is_ok());
        assert!(!dir.path().join("bad_Limenime.ass").exists());
    }

    #[test]
    fn cli_builds_config() {
        let cli = Cli::parse_from(["limesub", "--tolerance", "0.25", "--width", "1280", "--height", "720", "a.srt"]);
        let cfg = cli.config();
        assert_eq!(cfg.tolerance_ms(), 250);
        assert_eq!(cfg.target, Resolution::new(1280, 720));
        assert_eq!(cfg.font_name, DEFAULT_FONT_NAME);
    }
}
