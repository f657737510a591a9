//! Error types shared across the pipeline.

use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// Custom error types for vivify
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("required external tool '{0}' not found in PATH")]
    DependencyNotFound(String),

    #[error("failed to start {tool}: {message}")]
    CommandStart { tool: String, message: String },

    #[error("{tool} failed ({status}): {stderr}")]
    CommandFailed {
        tool: String,
        status: String,
        stderr: String,
    },

    #[error("{tool} did not finish within {seconds}s")]
    CommandTimeout { tool: String, seconds: u64 },

    #[error("ffprobe output did not match the expected schema: {0}")]
    ProbeSchema(String),

    #[error("no video stream found in {0}")]
    NoVideoStream(String),

    #[error("failed to decode frame {}: {source}", .path.display())]
    FrameDecode {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("failed to write enhanced frame {}: {source}", .path.display())]
    FrameWrite {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("{0}")]
    OperationFailed(String),
}

/// Result type for vivify operations
pub type CoreResult<T> = std::result::Result<T, CoreError>;

/// Builds a `CommandStart` error for a tool that could not be spawned.
pub fn command_start_error(tool: &str, err: impl std::fmt::Display) -> CoreError {
    CoreError::CommandStart {
        tool: tool.to_string(),
        message: err.to_string(),
    }
}

/// Builds a `CommandFailed` error from a nonzero exit status and stderr tail.
pub fn command_failed_error(
    tool: &str,
    status: ExitStatus,
    stderr: impl Into<String>,
) -> CoreError {
    CoreError::CommandFailed {
        tool: tool.to_string(),
        status: status.to_string(),
        stderr: stderr.into(),
    }
}
