//! End-to-end pipeline test against real ffmpeg/ffprobe binaries.
//!
//! Skipped (returns early) when the tools are not installed.

use std::path::Path;
use std::process::{Command, Stdio};
use vivify_core::{NullProgressObserver, PipelineConfig, VideoPipeline, probe_media};

fn tool_available(name: &str) -> bool {
    Command::new(name)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok_and(|status| status.success())
}

/// Generates a 1-second, 10-frame test video with a sine audio track.
fn generate_test_video(path: &Path) {
    let status = Command::new("ffmpeg")
        .args([
            "-y",
            "-f",
            "lavfi",
            "-i",
            "testsrc2=duration=1:size=64x48:rate=10",
            "-f",
            "lavfi",
            "-i",
            "sine=frequency=440:duration=1",
            "-map",
            "0:v:0",
            "-map",
            "1:a:0",
            "-c:v",
            "libx264",
            "-pix_fmt",
            "yuv420p",
            "-c:a",
            "aac",
            "-shortest",
        ])
        .arg(path)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .expect("failed to run ffmpeg");
    assert!(status.success(), "test video generation failed");
}

/// Generates a 1-second, 10-frame test video with no audio stream.
fn generate_silent_test_video(path: &Path) {
    let status = Command::new("ffmpeg")
        .args([
            "-y",
            "-f",
            "lavfi",
            "-i",
            "testsrc2=duration=1:size=64x48:rate=10",
            "-c:v",
            "libx264",
            "-pix_fmt",
            "yuv420p",
        ])
        .arg(path)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .expect("failed to run ffmpeg");
    assert!(status.success(), "silent test video generation failed");
}

/// Asks ffprobe for the container format name of `path`.
fn container_format(path: &Path) -> String {
    let output = Command::new("ffprobe")
        .args(["-v", "quiet", "-print_format", "json", "-show_format"])
        .arg(path)
        .output()
        .expect("failed to run ffprobe");
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn enhances_a_ten_frame_video_and_keeps_its_audio() {
    if !tool_available("ffmpeg") || !tool_available("ffprobe") {
        eprintln!("skipping: ffmpeg/ffprobe not installed");
        return;
    }

    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("source.mp4");
    generate_test_video(&input);

    let work_base = dir.path().join("work");
    let output = dir.path().join("enhanced.mp4");

    let mut config = PipelineConfig::new(input.clone(), output.clone());
    config.frame_rate = 10;
    config.work_dir = Some(work_base.clone());

    let pipeline = VideoPipeline::new(config);
    let summary = pipeline.run(&NullProgressObserver).unwrap();

    assert_eq!(summary.frame_count, 10);
    assert!(output.is_file());

    // Working directories are gone; only the (possibly empty) base remains.
    let leftovers: Vec<_> = std::fs::read_dir(&work_base)
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    assert!(leftovers.is_empty(), "orphaned workdirs: {leftovers:?}");

    // The output carries the same frame count and an audio track.
    let info = probe_media(&output, None).unwrap();
    assert_eq!(info.frame_count, Some(10));
    assert!(info.has_audio);

    // Duration matches the 1-second source.
    let duration = info.duration_secs.unwrap();
    assert!((duration - 1.0).abs() < 0.2, "duration was {duration}");
}

#[test]
fn silent_source_gets_the_container_its_output_extension_names() {
    if !tool_available("ffmpeg") || !tool_available("ffprobe") {
        eprintln!("skipping: ffmpeg/ffprobe not installed");
        return;
    }

    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("source.mp4");
    generate_silent_test_video(&input);

    // Matroska output: the silent-source fallback must remux, not copy the
    // mp4 intermediate under the .mkv name.
    let output = dir.path().join("enhanced.mkv");
    let mut config = PipelineConfig::new(input, output.clone());
    config.frame_rate = 10;
    config.work_dir = Some(dir.path().join("work"));

    let summary = VideoPipeline::new(config).run(&NullProgressObserver).unwrap();
    assert_eq!(summary.frame_count, 10);
    assert!(output.is_file());

    let info = probe_media(&output, None).unwrap();
    assert!(!info.has_audio);

    let format = container_format(&output);
    assert!(
        format.contains("matroska"),
        "expected a matroska container, ffprobe reported: {format}"
    );
}

#[test]
fn overwrite_of_an_existing_output_succeeds() {
    if !tool_available("ffmpeg") || !tool_available("ffprobe") {
        eprintln!("skipping: ffmpeg/ffprobe not installed");
        return;
    }

    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("source.mp4");
    generate_test_video(&input);

    let output = dir.path().join("enhanced.mp4");
    std::fs::write(&output, b"stale output").unwrap();

    let mut config = PipelineConfig::new(input, output.clone());
    config.frame_rate = 10;
    config.work_dir = Some(dir.path().join("work"));

    let summary = VideoPipeline::new(config).run(&NullProgressObserver).unwrap();
    assert_eq!(summary.frame_count, 10);
    assert!(output.metadata().unwrap().len() > b"stale output".len() as u64);
}
