// vivify-cli/src/main.rs
//
// Binary entry point: argument parsing, path validation, overwrite
// confirmation, then one pipeline run.

mod cli;
mod progress;
mod validate;

use clap::Parser;
use cli::Cli;
use progress::ProgressReporter;
use std::process::ExitCode;
use std::time::Duration;
use validate::{validate_input, validate_output};
use vivify_core::{CoreError, CoreResult, PipelineConfig, VideoPipeline, format_duration};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> CoreResult<ExitCode> {
    validate_input(&cli.input)?;
    validate_output(&cli.output)?;

    if cli.output.exists() && !cli.yes && !confirm_overwrite(&cli)? {
        println!("File will not be overwritten, exiting...");
        return Ok(ExitCode::SUCCESS);
    }

    let mut config = PipelineConfig::new(cli.input, cli.output);
    config.frame_rate = cli.fps;
    config.video_codec = cli.codec;
    config.video_bitrate = cli.bitrate;
    config.workers = cli.workers;
    config.work_dir = cli.work_dir;
    config.tool_timeout = cli.timeout.map(Duration::from_secs);

    let reporter = ProgressReporter::new();
    let summary = VideoPipeline::new(config).run(&reporter)?;

    println!(
        "Enhanced {} frames in {} -> {}",
        summary.frame_count,
        format_duration(summary.elapsed),
        summary.output_path.display()
    );
    Ok(ExitCode::SUCCESS)
}

/// Asks whether an existing output file may be overwritten.
///
/// Without an interactive terminal there is nobody to ask, so the answer is
/// "no": the run exits cleanly without touching the output. `--yes` is the
/// non-interactive affirmative.
fn confirm_overwrite(cli: &Cli) -> CoreResult<bool> {
    if !console::user_attended() {
        eprintln!(
            "Output file {} already exists and no terminal is attached; pass --yes to overwrite",
            cli.output.display()
        );
        return Ok(false);
    }

    dialoguer::Confirm::new()
        .with_prompt(format!(
            "Output file {} already exists. Overwrite?",
            cli.output.display()
        ))
        .default(false)
        .interact()
        .map_err(|e| CoreError::Validation(format!("failed to read confirmation: {e}")))
}
