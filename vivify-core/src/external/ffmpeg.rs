//! ffmpeg command building and execution, one invocation per pipeline stage.
//!
//! Each stage is a plain argument list executed to completion. The event
//! stream is drained for advisory progress and for an error tail to attach
//! to failures; no correctness decision is made from it.

use crate::error::{CoreError, CoreResult, command_failed_error, command_start_error};
use crate::progress::{PipelineEvent, PipelineStage, ProgressObserver};
use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::{FfmpegEvent, LogLevel as FfmpegLogLevel};
use std::path::Path;
use std::time::{Duration, Instant};

/// Zero-padded frame naming scheme, good for correct lexicographic ordering
/// up to 99,999 frames.
pub const FRAME_PATTERN: &str = "%05d.png";

/// Fixed name of the extracted audio track inside the staging directory.
/// Matroska audio holds whatever codec the stream copy carries.
pub const AUDIO_FILE: &str = "audio.mka";

/// Fixed name of the reassembled silent video inside the staging directory.
pub const VIDEO_FILE: &str = "video.mp4";

/// Lines of error output kept for failure reports.
const STDERR_TAIL_LINES: usize = 32;

/// Stream-copies the audio track of `input` into `audio_path`.
pub fn extract_audio_command(input: &Path, audio_path: &Path) -> FfmpegCommand {
    let mut cmd = FfmpegCommand::new();
    cmd.hide_banner()
        .overwrite()
        .input(input.to_string_lossy().as_ref())
        .args(["-vn", "-c:a", "copy"])
        .output(audio_path.to_string_lossy().as_ref());
    cmd
}

/// Writes one PNG per video frame of `input` into `frames_dir`.
pub fn extract_frames_command(input: &Path, frames_dir: &Path) -> FfmpegCommand {
    let pattern = frames_dir.join(FRAME_PATTERN);
    let mut cmd = FfmpegCommand::new();
    cmd.hide_banner()
        .overwrite()
        .input(input.to_string_lossy().as_ref())
        .output(pattern.to_string_lossy().as_ref());
    cmd
}

/// Encodes the enhanced frames, read in strict sequence-number order, into
/// a silent video at `video_path`.
pub fn assemble_command(
    frames_dir: &Path,
    video_path: &Path,
    frame_rate: u32,
    codec: &str,
    bitrate: &str,
) -> FfmpegCommand {
    let pattern = frames_dir.join(FRAME_PATTERN);
    let mut cmd = FfmpegCommand::new();
    cmd.hide_banner()
        .overwrite()
        .args(["-framerate", &frame_rate.to_string()])
        .input(pattern.to_string_lossy().as_ref())
        .args(["-c:v", codec, "-b:v", bitrate, "-pix_fmt", "yuv420p"])
        .output(video_path.to_string_lossy().as_ref());
    cmd
}

/// Stream-copies the silent video and the extracted audio into the final
/// output. No re-encode on either stream.
pub fn mux_command(video_path: &Path, audio_path: &Path, output: &Path) -> FfmpegCommand {
    let mut cmd = FfmpegCommand::new();
    cmd.hide_banner()
        .overwrite()
        .input(video_path.to_string_lossy().as_ref())
        .input(audio_path.to_string_lossy().as_ref())
        .args(["-map", "0:v:0", "-map", "1:a:0", "-c", "copy"])
        .output(output.to_string_lossy().as_ref());
    cmd
}

/// Stream-copies the silent video into the final output path, letting the
/// output extension pick its own container. Used when the source has no
/// audio track to mux.
pub fn remux_command(video_path: &Path, output: &Path) -> FfmpegCommand {
    let mut cmd = FfmpegCommand::new();
    cmd.hide_banner()
        .overwrite()
        .input(video_path.to_string_lossy().as_ref())
        .args(["-c", "copy"])
        .output(output.to_string_lossy().as_ref());
    cmd
}

/// Spawns an ffmpeg command and blocks until it exits.
///
/// Progress events are forwarded to the observer; error-level log lines are
/// collected so a nonzero exit can report what ffmpeg actually complained
/// about. The timeout is checked between events, so a process that hangs
/// without emitting anything is only reaped once its streams close.
pub fn run_ffmpeg(
    mut cmd: FfmpegCommand,
    stage: PipelineStage,
    timeout: Option<Duration>,
    observer: &dyn ProgressObserver,
) -> CoreResult<()> {
    log::debug!("ffmpeg ({stage}): {cmd:?}");

    let start = Instant::now();
    let mut child = cmd.spawn().map_err(|e| command_start_error("ffmpeg", e))?;

    let mut stderr_tail: Vec<String> = Vec::new();
    let mut timed_out = false;

    let events = child.iter().map_err(|e| {
        CoreError::OperationFailed(format!("failed to read ffmpeg output while {stage}: {e}"))
    })?;

    for event in events {
        match event {
            FfmpegEvent::Progress(progress) => {
                observer.handle_event(PipelineEvent::ToolProgress {
                    stage,
                    frame: progress.frame,
                });
            }
            FfmpegEvent::Log(FfmpegLogLevel::Error | FfmpegLogLevel::Fatal, message) => {
                log::warn!("ffmpeg ({stage}): {message}");
                push_tail(&mut stderr_tail, message);
            }
            FfmpegEvent::Error(message) => {
                push_tail(&mut stderr_tail, message);
            }
            FfmpegEvent::Log(_, message) => {
                log::trace!("ffmpeg ({stage}): {message}");
            }
            _ => {}
        }

        if let Some(limit) = timeout {
            if start.elapsed() >= limit {
                timed_out = true;
                break;
            }
        }
    }

    if timed_out {
        let _ = child.kill();
        let _ = child.wait();
        return Err(CoreError::CommandTimeout {
            tool: format!("ffmpeg ({stage})"),
            seconds: timeout.map(|t| t.as_secs()).unwrap_or_default(),
        });
    }

    let status = child
        .wait()
        .map_err(|e| CoreError::OperationFailed(format!("error waiting for ffmpeg: {e}")))?;

    if !status.success() {
        return Err(command_failed_error(
            &format!("ffmpeg ({stage})"),
            status,
            stderr_tail.join("\n"),
        ));
    }

    Ok(())
}

fn push_tail(tail: &mut Vec<String>, line: String) {
    if tail.len() == STDERR_TAIL_LINES {
        tail.remove(0);
    }
    tail.push(line);
}
