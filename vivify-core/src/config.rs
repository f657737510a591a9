//! Run-scoped pipeline configuration.
//!
//! Every knob the controller consumes lives here and is passed in at
//! construction, so concurrent runs stay isolated: no process-wide state,
//! no shared working-directory paths.

use crate::error::{CoreError, CoreResult};
use std::path::PathBuf;
use std::time::Duration;

/// Frame rate used when reassembling enhanced frames into a video.
pub const DEFAULT_FRAME_RATE: u32 = 30;

/// Video codec used for the reassembled (silent) video.
pub const DEFAULT_VIDEO_CODEC: &str = "libx264";

/// Bitrate target for the reassembled video.
pub const DEFAULT_VIDEO_BITRATE: &str = "4000k";

/// Configuration for one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Source video file.
    pub input_path: PathBuf,
    /// Final output video file.
    pub output_path: PathBuf,
    /// Base directory for the two working directories. Defaults to the
    /// system temp directory; each run gets uniquely named subdirectories.
    pub work_dir: Option<PathBuf>,
    /// Frame rate for reassembly.
    pub frame_rate: u32,
    /// Codec for the reassembled video.
    pub video_codec: String,
    /// Bitrate target for the reassembled video.
    pub video_bitrate: String,
    /// Worker-pool size for frame enhancement. `None` uses the host's
    /// available parallelism.
    pub workers: Option<usize>,
    /// Optional time limit for each external-tool invocation.
    pub tool_timeout: Option<Duration>,
}

impl PipelineConfig {
    /// Creates a configuration with default encoding parameters.
    pub fn new(input_path: PathBuf, output_path: PathBuf) -> Self {
        Self {
            input_path,
            output_path,
            work_dir: None,
            frame_rate: DEFAULT_FRAME_RATE,
            video_codec: DEFAULT_VIDEO_CODEC.to_string(),
            video_bitrate: DEFAULT_VIDEO_BITRATE.to_string(),
            workers: None,
            tool_timeout: None,
        }
    }

    /// Checks the configuration before any stage runs.
    pub fn validate(&self) -> CoreResult<()> {
        if !self.input_path.is_file() {
            return Err(CoreError::Validation(format!(
                "input file {} does not exist or is not a file",
                self.input_path.display()
            )));
        }
        if self.frame_rate == 0 {
            return Err(CoreError::Validation(
                "frame rate must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Base directory under which the working directories are created.
    pub(crate) fn work_base(&self) -> PathBuf {
        self.work_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}
