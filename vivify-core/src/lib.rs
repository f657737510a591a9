//! Core library for the vivify video enhancement pipeline.
//!
//! Decomposes a video into frames with ffmpeg, sharpens and smooths every
//! frame in parallel, and reassembles the frames into a video with the
//! original audio stream-copied back in.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use vivify_core::{NullProgressObserver, PipelineConfig, VideoPipeline};
//! use std::path::PathBuf;
//!
//! let mut config = PipelineConfig::new(
//!     PathBuf::from("input.mp4"),
//!     PathBuf::from("enhanced.mp4"),
//! );
//! config.frame_rate = 24;
//!
//! let pipeline = VideoPipeline::new(config);
//! let summary = pipeline.run(&NullProgressObserver).unwrap();
//! println!("enhanced {} frames", summary.frame_count);
//! ```

pub mod config;
pub mod dispatch;
pub mod enhance;
pub mod error;
pub mod external;
pub mod pipeline;
pub mod progress;
pub mod utils;

// Re-exports for public API
pub use config::{DEFAULT_FRAME_RATE, DEFAULT_VIDEO_BITRATE, DEFAULT_VIDEO_CODEC, PipelineConfig};
pub use error::{CoreError, CoreResult};
pub use external::{MediaInfo, probe_media};
pub use pipeline::{PipelineSummary, VideoPipeline};
pub use progress::{NullProgressObserver, PipelineEvent, PipelineStage, ProgressObserver};
pub use utils::format_duration;
