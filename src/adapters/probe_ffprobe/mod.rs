//! FFprobe adapter for media file probing

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;

use crate::adapters::exec_ffmpeg::tool_command;
use crate::domain::errors::DomainError;
use crate::ports::ProbePort;

/// FFprobe-based probe adapter
pub struct FFprobeAdapter {
    program: PathBuf,
}

impl FFprobeAdapter {
    /// Create new FFprobe adapter for the given binary
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

/// Audio probe output: any non-blank line means a stream index was printed
pub fn parse_audio_probe(stdout: &str) -> bool {
    stdout.lines().any(|line| !line.trim().is_empty())
}

#[async_trait]
impl ProbePort for FFprobeAdapter {
    async fn has_audio_stream(&self, file_path: &Path) -> Result<bool, DomainError> {
        let output = tool_command(&self.program)
            .args([
                "-v",
                "error",
                "-select_streams",
                "a:0",
                "-show_entries",
                "stream=index",
                "-of",
                "csv=p=0",
            ])
            .arg(file_path)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| {
                DomainError::ToolUnavailable(format!(
                    "Failed to start {}: {}",
                    self.program.display(),
                    e
                ))
            })?;

        if !output.status.success() {
            return Err(DomainError::Decode(format!(
                "ffprobe failed on {}: {}",
                file_path.display(),
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(parse_audio_probe(&String::from_utf8_lossy(&output.stdout)))
    }
}
