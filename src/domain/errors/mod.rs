// Domain errors - Error types for the domain layer

use serde::Serialize;
use thiserror::Error;

/// Domain-specific error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Invalid arguments or batch configuration
    #[error("Bad arguments: {0}")]
    BadArgs(String),
    /// Nothing was collected for the batch
    #[error("No files to convert")]
    EmptyBatch,
    /// External transcoder or probe binary missing or unusable
    #[error("Tool unavailable: {0}")]
    ToolUnavailable(String),
    /// Source could not be opened or decoded
    #[error("Decode failed: {0}")]
    Decode(String),
    /// Target could not be encoded
    #[error("Encode failed: {0}")]
    Encode(String),
    /// Transcoder exited unsuccessfully
    #[error("Transcode failed: {0}")]
    Transcode(String),
    /// File system operation failed
    #[error("File system error: {0}")]
    FsFail(String),
    /// Blocking work was cancelled or panicked
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Whether this error aborts a whole batch rather than a single file
    pub fn is_batch_level(&self) -> bool {
        matches!(
            self,
            DomainError::BadArgs(_) | DomainError::EmptyBatch | DomainError::ToolUnavailable(_)
        )
    }

    /// Classify the error for a per-file failure entry
    pub fn kind(&self) -> FailureKind {
        match self {
            DomainError::Decode(_) => FailureKind::Decode,
            DomainError::Encode(_) => FailureKind::Encode,
            DomainError::Transcode(_) => FailureKind::Transcode,
            DomainError::FsFail(_) => FailureKind::Io,
            _ => FailureKind::Other,
        }
    }
}

impl From<std::io::Error> for DomainError {
    fn from(err: std::io::Error) -> Self {
        DomainError::FsFail(err.to_string())
    }
}

/// Category of a per-file failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureKind {
    Decode,
    Encode,
    Transcode,
    Io,
    Other,
}
