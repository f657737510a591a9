//! Interactions with external command-line tools.
//!
//! Everything that crosses a process boundary lives here: the generic
//! subprocess runner, the ffprobe metadata decoder, and the per-stage
//! ffmpeg invocations.

use crate::error::{CoreError, CoreResult, command_start_error};
use std::io;
use std::process::{Command, Stdio};

pub mod command;
pub mod ffmpeg;
pub mod probe;

pub use probe::{MediaInfo, probe_media};

/// Checks that a required external command is available and executable.
///
/// Runs `<cmd_name> -version` and discards its output; only presence and
/// startability matter.
pub fn check_dependency(cmd_name: &str) -> CoreResult<()> {
    let result = Command::new(cmd_name)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match result {
        Ok(_) => {
            log::debug!("found dependency: {cmd_name}");
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::warn!("dependency '{cmd_name}' not found");
            Err(CoreError::DependencyNotFound(cmd_name.to_string()))
        }
        Err(e) => {
            log::error!("failed to start dependency check for '{cmd_name}': {e}");
            Err(command_start_error(cmd_name, e))
        }
    }
}
