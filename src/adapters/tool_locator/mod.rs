//! External tool lookup
//!
//! Resolution order: explicit override, configured tools directory, copy
//! bundled next to the executable, system `PATH`. When nothing matches the
//! bare program name is returned and the spawn error surfaces later.

use std::path::{Path, PathBuf};

use tracing::debug;

/// Bundled tools live here, relative to the executable's directory
pub const BUNDLED_TOOLS_DIR: &str = "resources/ffmpeg/bin";

/// Locates `ffmpeg`/`ffprobe` binaries
#[derive(Debug, Clone, Default)]
pub struct ToolLocator {
    tools_dir: Option<PathBuf>,
    bundled_dir: Option<PathBuf>,
}

impl ToolLocator {
    /// Locator that also searches next to the running executable
    pub fn new(tools_dir: Option<PathBuf>) -> Self {
        let bundled_dir = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join(BUNDLED_TOOLS_DIR)));
        Self {
            tools_dir,
            bundled_dir,
        }
    }

    /// Override the bundled directory
    pub fn with_bundled_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.bundled_dir = dir;
        self
    }

    /// Resolve a program, honouring an explicit override first
    pub fn locate(&self, program: &str, override_path: Option<&Path>) -> PathBuf {
        if let Some(path) = override_path {
            debug!("Using configured {}: {}", program, path.display());
            return path.to_path_buf();
        }

        let file_name = executable_name(program);
        for dir in [self.tools_dir.as_deref(), self.bundled_dir.as_deref()]
            .into_iter()
            .flatten()
        {
            let candidate = dir.join(&file_name);
            if candidate.is_file() {
                debug!("Found {} at {}", program, candidate.display());
                return candidate;
            }
        }

        match which::which(program) {
            Ok(path) => {
                debug!("Found {} on PATH at {}", program, path.display());
                path
            }
            Err(_) => {
                debug!("{} not found, falling back to bare name", program);
                PathBuf::from(program)
            }
        }
    }
}

fn executable_name(program: &str) -> String {
    if cfg!(windows) {
        format!("{}.exe", program)
    } else {
        program.to_string()
    }
}
