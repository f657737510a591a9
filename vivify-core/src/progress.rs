//! Progress reporting abstractions.
//!
//! The pipeline reports what it is doing through an observer trait so the
//! core stays decoupled from presentation. Events are advisory only; no
//! correctness decision is made from them.

use std::fmt;

/// The sequential stages of one pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Probe,
    ExtractAudio,
    ExtractFrames,
    EnhanceFrames,
    Reassemble,
    MuxAudio,
    Cleanup,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Probe => "probing source",
            Self::ExtractAudio => "extracting audio",
            Self::ExtractFrames => "extracting frames",
            Self::EnhanceFrames => "enhancing frames",
            Self::Reassemble => "reassembling video",
            Self::MuxAudio => "muxing audio",
            Self::Cleanup => "cleaning up",
        };
        f.write_str(name)
    }
}

/// Events emitted while a pipeline run progresses.
#[derive(Debug, Clone)]
pub enum PipelineEvent {
    /// Probe results, before any extraction. `frame_count` is the source's
    /// reported count and is an estimate only.
    MediaProbed {
        frame_count: Option<u64>,
        duration_secs: Option<f64>,
        has_audio: bool,
    },
    /// A stage began.
    StageStarted { stage: PipelineStage },
    /// A stage finished successfully.
    StageFinished { stage: PipelineStage },
    /// The dispatcher submitted `total` frames to the worker pool.
    FramesQueued { total: usize },
    /// One frame finished enhancement. `completed` advances monotonically
    /// up to `total`.
    FrameCompleted { completed: usize, total: usize },
    /// Advisory progress parsed from an external tool's output stream.
    ToolProgress { stage: PipelineStage, frame: u32 },
}

/// Receiver for pipeline events. Implementations must tolerate being called
/// from worker threads.
pub trait ProgressObserver: Send + Sync {
    fn handle_event(&self, event: PipelineEvent);
}

/// No-op observer for callers that do not care about progress.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullProgressObserver;

impl ProgressObserver for NullProgressObserver {
    fn handle_event(&self, _event: PipelineEvent) {}
}
