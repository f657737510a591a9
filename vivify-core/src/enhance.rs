//! Per-frame enhancement: a fixed sharpen-then-smooth filter chain.

use crate::error::{CoreError, CoreResult};
use std::path::{Path, PathBuf};

/// Gaussian sigma for the unsharp-mask pass.
const UNSHARP_SIGMA: f32 = 2.0;

/// Unsharp-mask threshold: pixels whose contrast with the blurred copy is
/// below this are left alone.
const UNSHARP_THRESHOLD: i32 = 3;

/// 3x3 smoothing kernel, center-weighted, normalized to 1.
const SMOOTH_KERNEL: [f32; 9] = [
    1.0 / 13.0,
    1.0 / 13.0,
    1.0 / 13.0,
    1.0 / 13.0,
    5.0 / 13.0,
    1.0 / 13.0,
    1.0 / 13.0,
    1.0 / 13.0,
    1.0 / 13.0,
];

/// Enhances a single frame image.
///
/// Decodes `input`, applies the unsharp mask and the smoothing kernel, and
/// writes the result under the same file name into `output_dir`. Both
/// passes are pure functions of the pixel data and preserve dimensions.
/// A frame that cannot be decoded is an error, never skipped: a missing
/// output frame would break the one-output-per-input invariant the
/// reassembly stage relies on.
pub fn enhance_frame(input: &Path, output_dir: &Path) -> CoreResult<PathBuf> {
    let image = image::open(input).map_err(|source| CoreError::FrameDecode {
        path: input.to_path_buf(),
        source,
    })?;

    let enhanced = image
        .unsharpen(UNSHARP_SIGMA, UNSHARP_THRESHOLD)
        .filter3x3(&SMOOTH_KERNEL);

    let file_name = input.file_name().ok_or_else(|| {
        CoreError::OperationFailed(format!("frame path {} has no file name", input.display()))
    })?;
    let output_path = output_dir.join(file_name);

    enhanced
        .save(&output_path)
        .map_err(|source| CoreError::FrameWrite {
            path: output_path.clone(),
            source,
        })?;

    Ok(output_path)
}
