//! Source duration probing via ffprobe.
//!
//! Runs `ffprobe -v error -print_format json -show_format` and pulls the
//! container duration out of the JSON. Only the duration matters to the
//! pipeline; everything else in the probe output is ignored.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use loopsmith_core::{Error, Result};

use crate::command::ToolCommand;
use crate::tools::ToolRegistry;

/// Top-level ffprobe JSON output (the parts we read).
#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    format: FfprobeFormat,
}

/// The `format` section of ffprobe output.
#[derive(Debug, Default, Deserialize)]
struct FfprobeFormat {
    /// Container duration in seconds, as a decimal string.
    duration: Option<String>,
}

/// Probe the duration of a media file.
///
/// # Errors
/// Returns [`Error::Tool`] when ffprobe is missing, fails, or times out,
/// and [`Error::Probe`] when it succeeds but reports no usable duration.
pub async fn probe_duration(
    tools: &ToolRegistry,
    path: &Path,
    timeout: Duration,
) -> Result<Duration> {
    let ffprobe = tools.require("ffprobe")?;

    let mut cmd = ToolCommand::new(ffprobe.path.clone());
    cmd.timeout(timeout);
    cmd.args(["-v", "error", "-print_format", "json", "-show_format"]);
    cmd.arg(path.to_string_lossy());

    let output = cmd.execute().await?;
    let duration = parse_duration_json(&output.stdout)
        .map_err(|e| annotate_with_path(e, path))?;
    tracing::debug!("{} is {:.1}s long", path.display(), duration.as_secs_f64());
    Ok(duration)
}

/// Extract `format.duration` from raw ffprobe JSON.
fn parse_duration_json(json: &str) -> Result<Duration> {
    let parsed: FfprobeOutput = serde_json::from_str(json)
        .map_err(|e| Error::Probe(format!("ffprobe JSON parse error: {e}")))?;

    let secs = parsed
        .format
        .duration
        .as_deref()
        .and_then(|s| s.trim().parse::<f64>().ok())
        .ok_or_else(|| Error::Probe("no duration reported".to_string()))?;

    // Duration::from_secs_f64 panics on negative or non-finite input.
    if !secs.is_finite() || secs < 0.0 {
        return Err(Error::Probe(format!("unusable duration {secs}")));
    }

    Ok(Duration::from_secs_f64(secs))
}

fn annotate_with_path(err: Error, path: &Path) -> Error {
    match err {
        Error::Probe(msg) => Error::Probe(format!("{msg} for {}", path.display())),
        other => other,
    }
}
