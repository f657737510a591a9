//! End-to-end pipeline controller.
//!
//! Runs the stages strictly in order, each one a blocking call:
//! probe, extract audio, extract frames, enhance, reassemble, mux.
//! The two working directories are owned by a guard created up front and
//! removed on every exit path.

use crate::config::PipelineConfig;
use crate::dispatch;
use crate::error::{CoreError, CoreResult};
use crate::external::ffmpeg::{
    AUDIO_FILE, VIDEO_FILE, assemble_command, extract_audio_command, extract_frames_command,
    mux_command, remux_command, run_ffmpeg,
};
use crate::external::{check_dependency, probe_media};
use crate::progress::{PipelineEvent, PipelineStage, ProgressObserver};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tempfile::{Builder as TempFileBuilder, TempDir};

/// Statistics for a completed run.
#[derive(Debug, Clone)]
pub struct PipelineSummary {
    /// Number of frames extracted and enhanced.
    pub frame_count: usize,
    /// Wall-clock time for the whole run.
    pub elapsed: Duration,
    /// Where the final video was written.
    pub output_path: PathBuf,
}

/// The two ephemeral working directories of one run.
///
/// `frames` receives the raw extracted frames; `staging` receives the
/// enhanced frames and the audio/video intermediates. Both are `TempDir`s
/// with unique suffixes, so concurrent runs never share a path, and both
/// are removed when this guard drops, whichever way the run ends.
struct WorkDirs {
    frames: TempDir,
    staging: TempDir,
}

impl WorkDirs {
    fn create(base: &Path) -> CoreResult<Self> {
        std::fs::create_dir_all(base)?;
        let frames = TempFileBuilder::new()
            .prefix("vivify-frames-")
            .tempdir_in(base)?;
        let staging = TempFileBuilder::new()
            .prefix("vivify-staging-")
            .tempdir_in(base)?;
        Ok(Self { frames, staging })
    }

    /// Removes both directories now, surfacing deletion errors. Drop covers
    /// the failure paths where this is never reached.
    fn close(self) -> CoreResult<()> {
        self.frames.close()?;
        self.staging.close()?;
        Ok(())
    }
}

/// Orchestrates one video enhancement run.
pub struct VideoPipeline {
    config: PipelineConfig,
}

impl VideoPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Runs every stage in order and returns the run summary.
    ///
    /// Any stage failure is fatal: there are no retries, and partial output
    /// is never reported as success. The working directories are removed on
    /// both the success and every failure path.
    pub fn run(&self, observer: &dyn ProgressObserver) -> CoreResult<PipelineSummary> {
        let started = Instant::now();

        self.config.validate()?;
        check_dependency("ffmpeg")?;
        check_dependency("ffprobe")?;

        let work = WorkDirs::create(&self.config.work_base())?;
        log::debug!(
            "working directories: {} / {}",
            work.frames.path().display(),
            work.staging.path().display()
        );

        let result = self.run_stages(&work, observer);

        observer.handle_event(PipelineEvent::StageStarted {
            stage: PipelineStage::Cleanup,
        });
        let cleaned = match result {
            Ok(frame_count) => work.close().map(|()| frame_count),
            Err(err) => {
                // Drop removes the directories; the stage error wins.
                drop(work);
                Err(err)
            }
        };
        observer.handle_event(PipelineEvent::StageFinished {
            stage: PipelineStage::Cleanup,
        });

        let frame_count = cleaned?;
        Ok(PipelineSummary {
            frame_count,
            elapsed: started.elapsed(),
            output_path: self.config.output_path.clone(),
        })
    }

    fn run_stages(
        &self,
        work: &WorkDirs,
        observer: &dyn ProgressObserver,
    ) -> CoreResult<usize> {
        let cfg = &self.config;
        let timeout = cfg.tool_timeout;

        // Probe: fatal on malformed metadata, before any extraction work.
        let media = Self::stage(observer, PipelineStage::Probe, || {
            probe_media(&cfg.input_path, timeout)
        })?;
        observer.handle_event(PipelineEvent::MediaProbed {
            frame_count: media.frame_count,
            duration_secs: media.duration_secs,
            has_audio: media.has_audio,
        });
        log::info!(
            "probed {}: ~{} frames, {:.2}s, audio: {}",
            cfg.input_path.display(),
            media
                .frame_count
                .map_or_else(|| "?".to_string(), |n| n.to_string()),
            media.duration_secs.unwrap_or(0.0),
            media.has_audio
        );

        // ExtractAudio: a source without audio skips this stage and the
        // final mux degrades to a remux of the silent video.
        let audio_path = work.staging.path().join(AUDIO_FILE);
        if media.has_audio {
            Self::stage(observer, PipelineStage::ExtractAudio, || {
                run_ffmpeg(
                    extract_audio_command(&cfg.input_path, &audio_path),
                    PipelineStage::ExtractAudio,
                    timeout,
                    observer,
                )
            })?;
        } else {
            log::info!("input has no audio stream; skipping audio extraction");
        }

        // ExtractFrames: producing nothing to enhance fails the stage itself.
        let extracted = Self::stage(observer, PipelineStage::ExtractFrames, || {
            run_ffmpeg(
                extract_frames_command(&cfg.input_path, work.frames.path()),
                PipelineStage::ExtractFrames,
                timeout,
                observer,
            )?;
            extracted_frame_count(work.frames.path(), &cfg.input_path)
        })?;
        log::debug!("extracted {extracted} frames");

        // EnhanceFrames
        let frame_count = Self::stage(observer, PipelineStage::EnhanceFrames, || {
            dispatch::enhance_frames(
                work.frames.path(),
                work.staging.path(),
                cfg.workers,
                observer,
            )
        })?;

        // Reassemble
        let video_path = work.staging.path().join(VIDEO_FILE);
        Self::stage(observer, PipelineStage::Reassemble, || {
            run_ffmpeg(
                assemble_command(
                    work.staging.path(),
                    &video_path,
                    cfg.frame_rate,
                    &cfg.video_codec,
                    &cfg.video_bitrate,
                ),
                PipelineStage::Reassemble,
                timeout,
                observer,
            )
        })?;

        // MuxAudio: without an audio track there is nothing to mux, but the
        // silent intermediate is still remuxed so the output extension gets
        // its own container rather than mp4 bytes under a foreign name.
        Self::stage(observer, PipelineStage::MuxAudio, || {
            let cmd = if media.has_audio {
                mux_command(&video_path, &audio_path, &cfg.output_path)
            } else {
                remux_command(&video_path, &cfg.output_path)
            };
            run_ffmpeg(cmd, PipelineStage::MuxAudio, timeout, observer)
        })?;

        Ok(frame_count)
    }

    fn stage<T>(
        observer: &dyn ProgressObserver,
        stage: PipelineStage,
        body: impl FnOnce() -> CoreResult<T>,
    ) -> CoreResult<T> {
        observer.handle_event(PipelineEvent::StageStarted { stage });
        let value = body()?;
        observer.handle_event(PipelineEvent::StageFinished { stage });
        Ok(value)
    }
}

/// Counts the frames extraction produced. An empty frame set means the
/// extraction stage has nothing for the rest of the pipeline to work on,
/// which is fatal.
fn extracted_frame_count(frames_dir: &Path, input: &Path) -> CoreResult<usize> {
    let count = dispatch::list_frames(frames_dir)?.len();
    if count == 0 {
        return Err(CoreError::OperationFailed(format!(
            "no frames were extracted from {}",
            input.display()
        )));
    }
    Ok(count)
}
