//! Input/output path validation, run before any pipeline stage.

use std::path::Path;
use vivify_core::{CoreError, CoreResult};

/// File extensions accepted for both input and output videos.
pub const VALID_VIDEO_EXTENSIONS: [&str; 5] = ["mp4", "mkv", "mov", "avi", "webm"];

/// Checks that the input exists, is a regular file, and looks like a video.
pub fn validate_input(path: &Path) -> CoreResult<()> {
    if !path.exists() {
        return Err(CoreError::Validation(format!(
            "input file {} does not exist",
            path.display()
        )));
    }
    if !path.is_file() {
        return Err(CoreError::Validation(format!(
            "input file {} is not a file",
            path.display()
        )));
    }
    if !has_video_extension(path) {
        return Err(CoreError::Validation(format!(
            "input file {} is not a recognized video format",
            path.display()
        )));
    }
    Ok(())
}

/// Checks that the output path looks like a video.
pub fn validate_output(path: &Path) -> CoreResult<()> {
    if !has_video_extension(path) {
        return Err(CoreError::Validation(format!(
            "output file {} is not a recognized video format",
            path.display()
        )));
    }
    Ok(())
}

fn has_video_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            VALID_VIDEO_EXTENSIONS
                .iter()
                .any(|valid| ext.eq_ignore_ascii_case(valid))
        })
}
