//! Blocking subprocess execution with captured output and optional timeout.

use crate::error::{CoreError, CoreResult, command_failed_error, command_start_error};
use std::io::{BufRead, BufReader};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

/// Runs a command to completion, returning its stdout on success.
///
/// Stdout and stderr are drained on reader threads so a chatty child cannot
/// deadlock on a full pipe. With a timeout, the child is polled via
/// `try_wait` and killed once the deadline passes; without one, this blocks
/// until the child exits. A nonzero exit becomes `CommandFailed` carrying
/// the captured stderr.
pub fn run_tool(
    mut cmd: Command,
    tool: &str,
    timeout: Option<Duration>,
) -> CoreResult<String> {
    log::debug!("running {tool}: {cmd:?}");

    let mut child = cmd
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| command_start_error(tool, e))?;

    let stdout = child.stdout.take().map(BufReader::new);
    let stderr = child.stderr.take().map(BufReader::new);

    let stdout_handle = std::thread::spawn(move || read_lines(stdout));
    let stderr_handle = std::thread::spawn(move || read_lines(stderr));

    let status = match timeout {
        Some(limit) => {
            let start = Instant::now();
            loop {
                match child.try_wait() {
                    Ok(Some(status)) => break status,
                    Ok(None) if start.elapsed() >= limit => {
                        let _ = child.kill();
                        let _ = child.wait();
                        return Err(CoreError::CommandTimeout {
                            tool: tool.to_string(),
                            seconds: limit.as_secs(),
                        });
                    }
                    Ok(None) => std::thread::sleep(Duration::from_millis(100)),
                    Err(e) => {
                        return Err(CoreError::OperationFailed(format!(
                            "error waiting for {tool}: {e}"
                        )));
                    }
                }
            }
        }
        None => child.wait().map_err(|e| {
            CoreError::OperationFailed(format!("error waiting for {tool}: {e}"))
        })?,
    };

    let stdout_text = stdout_handle.join().unwrap_or_default();
    let stderr_text = stderr_handle.join().unwrap_or_default();

    if !status.success() {
        log::error!("{tool} exited with {status}: {stderr_text}");
        return Err(command_failed_error(tool, status, stderr_text));
    }

    Ok(stdout_text)
}

fn read_lines<R: BufRead>(reader: Option<R>) -> String {
    let mut lines = Vec::new();
    if let Some(reader) = reader {
        for line in reader.lines().map_while(Result::ok) {
            lines.push(line);
        }
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_stdout_of_successful_command() {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", "echo hello"]);
        let out = run_tool(cmd, "sh", None).unwrap();
        assert_eq!(out.trim(), "hello");
    }

    #[test]
    fn nonzero_exit_surfaces_stderr() {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", "echo boom >&2; exit 3"]);
        let err = run_tool(cmd, "sh", None).unwrap_err();
        match err {
            CoreError::CommandFailed { tool, stderr, .. } => {
                assert_eq!(tool, "sh");
                assert!(stderr.contains("boom"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_binary_is_a_start_error() {
        let cmd = Command::new("vivify-no-such-tool");
        let err = run_tool(cmd, "vivify-no-such-tool", None).unwrap_err();
        assert!(matches!(err, CoreError::CommandStart { .. }));
    }

    #[test]
    fn slow_command_times_out() {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", "sleep 5"]);
        let err = run_tool(cmd, "sh", Some(Duration::from_millis(200))).unwrap_err();
        assert!(matches!(err, CoreError::CommandTimeout { .. }));
    }
}
