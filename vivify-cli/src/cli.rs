// vivify-cli/src/cli.rs
//
// Defines the command-line argument structure using clap.

use clap::Parser;
use std::path::PathBuf;
use vivify_core::{DEFAULT_FRAME_RATE, DEFAULT_VIDEO_BITRATE, DEFAULT_VIDEO_CODEC};

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "Vivify: sharpen and smooth every frame of a video",
    long_about = "Extracts the frames of a video, enhances each one in parallel \
                  (unsharp mask + smoothing), and reassembles them with the \
                  original audio stream-copied back in."
)]
pub struct Cli {
    /// Source video file
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Destination video file
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Frame rate for the reassembled video
    #[arg(long, value_name = "FPS", default_value_t = DEFAULT_FRAME_RATE)]
    pub fps: u32,

    /// Worker-pool size for frame enhancement (defaults to available cores)
    #[arg(long, value_name = "N")]
    pub workers: Option<usize>,

    /// Video codec for the reassembled video
    #[arg(long, value_name = "CODEC", default_value = DEFAULT_VIDEO_CODEC)]
    pub codec: String,

    /// Bitrate target for the reassembled video
    #[arg(long, value_name = "BITRATE", default_value = DEFAULT_VIDEO_BITRATE)]
    pub bitrate: String,

    /// Base directory for temporary working directories
    #[arg(long, value_name = "DIR")]
    pub work_dir: Option<PathBuf>,

    /// Time limit in seconds for each external-tool invocation
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Overwrite the output file without asking
    #[arg(short = 'y', long = "yes", default_value_t = false)]
    pub yes: bool,
}
