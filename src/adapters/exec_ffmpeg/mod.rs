//! FFmpeg execution adapter
//!
//! Spawns the `ffmpeg` command line as a child process. The child is killed
//! when the returned future is dropped.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::domain::errors::DomainError;
use crate::ports::{ExecutePort, ExecutionOutcome};

/// FFmpeg-based execution adapter
pub struct FFmpegAdapter {
    program: PathBuf,
}

impl FFmpegAdapter {
    /// Create new FFmpeg adapter for the given binary
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

/// Command with no console window, no stdin and kill-on-drop
pub(crate) fn tool_command(program: &Path) -> Command {
    let mut command = Command::new(program);
    command.stdin(Stdio::null()).kill_on_drop(true);

    #[cfg(windows)]
    {
        const CREATE_NO_WINDOW: u32 = 0x0800_0000;
        command.creation_flags(CREATE_NO_WINDOW);
    }

    command
}

#[async_trait]
impl ExecutePort for FFmpegAdapter {
    async fn check_available(&self) -> Result<String, DomainError> {
        let output = tool_command(&self.program)
            .arg("-version")
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .output()
            .await
            .map_err(|e| {
                DomainError::ToolUnavailable(format!(
                    "ffmpeg could not be started ({}): {}. Install ffmpeg or set FFMPEG_BIN",
                    self.program.display(),
                    e
                ))
            })?;

        if !output.status.success() {
            return Err(DomainError::ToolUnavailable(format!(
                "{} -version exited with {}",
                self.program.display(),
                output.status
            )));
        }

        let version = String::from_utf8_lossy(&output.stdout)
            .lines()
            .next()
            .unwrap_or_default()
            .trim()
            .to_string();
        debug!("Transcoder available: {}", version);
        Ok(version)
    }

    async fn run(&self, args: &[OsString]) -> Result<ExecutionOutcome, DomainError> {
        let output = tool_command(&self.program)
            .args(args)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| {
                DomainError::Transcode(format!(
                    "Failed to start {}: {}",
                    self.program.display(),
                    e
                ))
            })?;

        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        if output.status.success() {
            Ok(ExecutionOutcome {
                exit_code: Some(0),
                stderr,
            })
        } else {
            debug!("ffmpeg exited with {}: {}", output.status, stderr.trim());
            Ok(ExecutionOutcome::failure(output.status.code(), stderr))
        }
    }
}
