//! ffprobe invocation and metadata decoding.
//!
//! The decoder types only the fields the controller consumes: stream codec
//! types, the video stream's reported frame count, and the container
//! duration. Everything else in ffprobe's output is ignored.

use crate::error::{CoreError, CoreResult};
use crate::external::command::run_tool;
use serde::Deserialize;
use std::path::Path;
use std::process::Command;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    streams: Vec<ProbeStream>,
    format: ProbeFormat,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    codec_type: String,
    nb_frames: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProbeFormat {
    duration: Option<String>,
}

/// Metadata the pipeline consumes from the source video.
#[derive(Debug, Clone, Default)]
pub struct MediaInfo {
    /// The video stream's reported frame count. Used for progress
    /// estimation only; the extracted frame set is authoritative.
    pub frame_count: Option<u64>,
    /// Container duration in seconds.
    pub duration_secs: Option<f64>,
    /// Whether the source carries at least one audio stream.
    pub has_audio: bool,
}

/// Probes `input` with ffprobe and decodes the JSON it prints.
pub fn probe_media(input: &Path, timeout: Option<Duration>) -> CoreResult<MediaInfo> {
    log::debug!("probing {}", input.display());

    let mut cmd = Command::new("ffprobe");
    cmd.args([
        "-v",
        "quiet",
        "-print_format",
        "json",
        "-show_format",
        "-show_streams",
    ])
    .arg(input);

    let stdout = run_tool(cmd, "ffprobe", timeout)?;
    parse_probe_output(&stdout, input)
}

/// Decodes ffprobe JSON into the fields the controller needs.
fn parse_probe_output(json: &str, input: &Path) -> CoreResult<MediaInfo> {
    let probe: ProbeOutput =
        serde_json::from_str(json).map_err(|e| CoreError::ProbeSchema(e.to_string()))?;

    let video = probe
        .streams
        .iter()
        .find(|s| s.codec_type == "video")
        .ok_or_else(|| CoreError::NoVideoStream(input.display().to_string()))?;

    let frame_count = video.nb_frames.as_deref().and_then(|f| f.parse().ok());
    if frame_count.is_none() {
        log::debug!(
            "no nb_frames reported for {}; progress totals will come from extraction",
            input.display()
        );
    }

    Ok(MediaInfo {
        frame_count,
        duration_secs: probe.format.duration.as_deref().and_then(|d| d.parse().ok()),
        has_audio: probe.streams.iter().any(|s| s.codec_type == "audio"),
    })
}
