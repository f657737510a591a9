//! Terminal progress rendering for pipeline events.

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use vivify_core::{PipelineEvent, PipelineStage, ProgressObserver};

/// Renders pipeline events as stage lines plus an indicatif bar for the
/// frame-enhancement region.
pub struct ProgressReporter {
    frames: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            frames: Mutex::new(None),
        }
    }

    fn frame_bar(total: usize) -> ProgressBar {
        let bar = ProgressBar::new(total as u64);
        bar.set_style(
            ProgressStyle::with_template(
                "  {bar:40.cyan/blue} {pos}/{len} frames ({eta})",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        bar
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressObserver for ProgressReporter {
    fn handle_event(&self, event: PipelineEvent) {
        match event {
            PipelineEvent::MediaProbed {
                frame_count,
                has_audio,
                ..
            } => {
                if let Some(frames) = frame_count {
                    println!("Source reports {frames} frames");
                }
                if !has_audio {
                    println!("Source has no audio track; output will be silent");
                }
            }
            PipelineEvent::StageStarted { stage } => {
                // The cleanup stage is instantaneous; don't narrate it.
                if stage != PipelineStage::Cleanup {
                    println!("{} {stage}...", style("::").bold().cyan());
                }
            }
            PipelineEvent::FramesQueued { total } => {
                if let Ok(mut guard) = self.frames.lock() {
                    *guard = Some(Self::frame_bar(total));
                }
            }
            PipelineEvent::FrameCompleted { completed, .. } => {
                if let Ok(guard) = self.frames.lock() {
                    if let Some(bar) = guard.as_ref() {
                        bar.set_position(completed as u64);
                    }
                }
            }
            PipelineEvent::StageFinished { stage } => {
                if stage == PipelineStage::EnhanceFrames {
                    if let Ok(mut guard) = self.frames.lock() {
                        if let Some(bar) = guard.take() {
                            bar.finish();
                        }
                    }
                }
            }
            // ffmpeg's own frame counters are advisory; keep them in the logs.
            PipelineEvent::ToolProgress { stage, frame } => {
                log::debug!("{stage}: ffmpeg at frame {frame}");
            }
        }
    }
}
