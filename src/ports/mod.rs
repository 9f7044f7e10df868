// Ports - Interface definitions (contracts)

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::domain::errors::*;
use crate::domain::model::*;

/// Port for media file probing
#[async_trait]
pub trait ProbePort: Send + Sync {
    /// Check whether the file has at least one audio stream
    async fn has_audio_stream(&self, file_path: &Path) -> Result<bool, DomainError>;
}

/// Result of one transcoder invocation
#[derive(Debug, Clone)]
pub struct ExecutionOutcome {
    pub exit_code: Option<i32>,
    pub stderr: String,
}

impl ExecutionOutcome {
    pub fn success() -> Self {
        Self {
            exit_code: Some(0),
            stderr: String::new(),
        }
    }

    pub fn failure(exit_code: Option<i32>, stderr: impl Into<String>) -> Self {
        Self {
            exit_code,
            stderr: stderr.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Port for running the external transcoder
#[async_trait]
pub trait ExecutePort: Send + Sync {
    /// Verify the transcoder can be launched, returning its version line
    async fn check_available(&self) -> Result<String, DomainError>;

    /// Run the transcoder with the given arguments and wait for it to exit.
    ///
    /// Dropping the returned future terminates the child process.
    async fn run(&self, args: &[OsString]) -> Result<ExecutionOutcome, DomainError>;
}

/// Port for the once-per-batch collision decision
#[async_trait]
pub trait ConflictPromptPort: Send + Sync {
    /// Choose a policy given the prospective outputs that already exist
    async fn choose_policy(&self, conflicts: &[PathBuf]) -> Result<CollisionPolicy, DomainError>;
}

/// Observer for batch progress (progress indicator, logging)
pub trait BatchObserver: Send + Sync {
    /// Called before a file is converted
    fn file_started(&self, index: usize, total: usize, source: &Path);

    /// Called after a file is converted or has failed
    fn file_finished(&self, source: &Path, outcome: Result<&Path, &DomainError>);

    /// Called once the batch is over
    fn batch_finished(&self, result: &BatchResult);
}

/// Observer that ignores every event
pub struct NoopObserver;

impl BatchObserver for NoopObserver {
    fn file_started(&self, _index: usize, _total: usize, _source: &Path) {}

    fn file_finished(&self, _source: &Path, _outcome: Result<&Path, &DomainError>) {}

    fn batch_finished(&self, _result: &BatchResult) {}
}
