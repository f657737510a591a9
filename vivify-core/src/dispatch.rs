//! Parallel frame dispatcher.
//!
//! Fans a directory of extracted frames out across a worker pool and joins
//! on completion. Failure policy: every submitted frame is attempted (no
//! early cancellation), and after the pool drains the first error in
//! sequence order is returned. No retries.

use crate::enhance::enhance_frame;
use crate::error::{CoreError, CoreResult};
use crate::progress::{PipelineEvent, ProgressObserver};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Enhances every frame in `input_dir` into `output_dir`.
///
/// `workers` bounds the pool; `None` uses the host's available parallelism.
/// Blocks until all frames have been processed and returns how many were
/// enhanced. Workers touch disjoint files (one read, one distinct write
/// each), so no locking is needed over frame data.
pub fn enhance_frames(
    input_dir: &Path,
    output_dir: &Path,
    workers: Option<usize>,
    observer: &dyn ProgressObserver,
) -> CoreResult<usize> {
    let frames = list_frames(input_dir)?;
    let total = frames.len();
    observer.handle_event(PipelineEvent::FramesQueued { total });
    log::info!("dispatching {total} frames for enhancement");

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(threads) = workers {
        builder = builder.num_threads(threads);
    }
    let pool = builder
        .build()
        .map_err(|e| CoreError::OperationFailed(format!("failed to build worker pool: {e}")))?;

    let completed = AtomicUsize::new(0);
    let results: Vec<CoreResult<PathBuf>> = pool.install(|| {
        frames
            .par_iter()
            .map(|frame| {
                let result = enhance_frame(frame, output_dir);
                let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                observer.handle_event(PipelineEvent::FrameCompleted {
                    completed: done,
                    total,
                });
                result
            })
            .collect()
    });

    // Pool fully drained; surface the first failure in sequence order.
    for result in results {
        result?;
    }

    Ok(total)
}

/// Lists the PNG frames of `dir` in sequence (lexicographic) order.
pub(crate) fn list_frames(dir: &Path) -> CoreResult<Vec<PathBuf>> {
    let mut frames: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("png"))
        })
        .collect();
    frames.sort();
    Ok(frames)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::NullProgressObserver;
    use image::{Rgb, RgbImage};
    use std::collections::BTreeSet;
    use std::sync::atomic::AtomicBool;

    fn write_frames(dir: &Path, count: usize) {
        for i in 1..=count {
            let frame = RgbImage::from_pixel(6, 4, Rgb([i as u8, 0, 255 - i as u8]));
            frame.save(dir.join(format!("{i:05}.png"))).unwrap();
        }
    }

    fn file_names(dir: &Path) -> BTreeSet<String> {
        std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect()
    }

    struct CountingObserver {
        queued: AtomicUsize,
        completions: AtomicUsize,
        saw_final: AtomicBool,
    }

    impl CountingObserver {
        fn new() -> Self {
            Self {
                queued: AtomicUsize::new(0),
                completions: AtomicUsize::new(0),
                saw_final: AtomicBool::new(false),
            }
        }
    }

    impl ProgressObserver for CountingObserver {
        fn handle_event(&self, event: PipelineEvent) {
            match event {
                PipelineEvent::FramesQueued { total } => {
                    self.queued.store(total, Ordering::SeqCst);
                }
                PipelineEvent::FrameCompleted { completed, total } => {
                    self.completions.fetch_add(1, Ordering::SeqCst);
                    if completed == total {
                        self.saw_final.store(true, Ordering::SeqCst);
                    }
                }
                _ => {}
            }
        }
    }

    #[test]
    fn produces_exactly_one_output_per_input_frame() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in");
        let output = dir.path().join("out");
        std::fs::create_dir_all(&input).unwrap();
        std::fs::create_dir_all(&output).unwrap();
        write_frames(&input, 7);

        let count = enhance_frames(&input, &output, Some(2), &NullProgressObserver).unwrap();
        assert_eq!(count, 7);
        assert_eq!(file_names(&input), file_names(&output));
    }

    #[test]
    fn progress_counter_reaches_the_submitted_total() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in");
        let output = dir.path().join("out");
        std::fs::create_dir_all(&input).unwrap();
        std::fs::create_dir_all(&output).unwrap();
        write_frames(&input, 5);

        let observer = CountingObserver::new();
        enhance_frames(&input, &output, Some(3), &observer).unwrap();
        assert_eq!(observer.queued.load(Ordering::SeqCst), 5);
        assert_eq!(observer.completions.load(Ordering::SeqCst), 5);
        assert!(observer.saw_final.load(Ordering::SeqCst));
    }

    #[test]
    fn one_corrupt_frame_fails_the_batch_after_draining() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in");
        let output = dir.path().join("out");
        std::fs::create_dir_all(&input).unwrap();
        std::fs::create_dir_all(&output).unwrap();
        write_frames(&input, 4);
        std::fs::write(input.join("00003.png"), b"garbage").unwrap();

        let err =
            enhance_frames(&input, &output, Some(2), &NullProgressObserver).unwrap_err();
        assert!(matches!(err, CoreError::FrameDecode { .. }));

        // Drain policy: the healthy frames were still enhanced.
        let produced = file_names(&output);
        assert!(produced.contains("00001.png"));
        assert!(produced.contains("00002.png"));
        assert!(produced.contains("00004.png"));
        assert!(!produced.contains("00003.png"));
    }

    #[test]
    fn non_png_files_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in");
        let output = dir.path().join("out");
        std::fs::create_dir_all(&input).unwrap();
        std::fs::create_dir_all(&output).unwrap();
        write_frames(&input, 2);
        std::fs::write(input.join("notes.txt"), b"not a frame").unwrap();

        let count = enhance_frames(&input, &output, None, &NullProgressObserver).unwrap();
        assert_eq!(count, 2);
    }
}
