// Batch result - Aggregated outcome of one batch run

use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::errors::{DomainError, FailureKind};

/// One failed file
#[derive(Debug, Clone, Serialize)]
pub struct FileFailure {
    pub file_name: String,
    pub path: PathBuf,
    pub kind: FailureKind,
    pub message: String,
}

impl FileFailure {
    pub fn from_error(path: &Path, error: &DomainError) -> Self {
        Self {
            file_name: path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| path.to_string_lossy().to_string()),
            path: path.to_path_buf(),
            kind: error.kind(),
            message: error.to_string(),
        }
    }
}

/// Outcome of a batch: attempted/succeeded counts and ordered failures
#[derive(Debug, Clone, Serialize)]
pub struct BatchResult {
    pub attempted: usize,
    pub succeeded: usize,
    pub failures: Vec<FileFailure>,
    pub outputs: Vec<PathBuf>,
    pub started_at: DateTime<Utc>,
    pub elapsed_secs: f64,
    #[serde(skip)]
    clock: Option<Instant>,
}

impl BatchResult {
    pub fn new() -> Self {
        Self {
            attempted: 0,
            succeeded: 0,
            failures: Vec::new(),
            outputs: Vec::new(),
            started_at: Utc::now(),
            elapsed_secs: 0.0,
            clock: Some(Instant::now()),
        }
    }

    pub fn record_success(&mut self, output: PathBuf) {
        self.attempted += 1;
        self.succeeded += 1;
        self.outputs.push(output);
    }

    pub fn record_failure(&mut self, source: &Path, error: &DomainError) {
        self.attempted += 1;
        self.failures.push(FileFailure::from_error(source, error));
    }

    /// Stop the clock
    pub fn finish(&mut self) {
        if let Some(clock) = self.clock.take() {
            self.elapsed_secs = clock.elapsed().as_secs_f64();
        }
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn is_complete_success(&self) -> bool {
        self.failures.is_empty()
    }
}

impl Default for BatchResult {
    fn default() -> Self {
        Self::new()
    }
}
