//! Artifact retrieval port interfaces

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::workflow::{ArtifactKind, WorkflowStage};

/// Artifact download errors.
///
/// Every variant is reported to the user as `DownloadFailed`; the variants
/// only exist for logs. None of them touches the workflow state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DownloadError {
    #[error("Artifact reference is empty")]
    EmptyReference,

    #[error("No {0} is available for this submission")]
    Unavailable(ArtifactKind),

    #[error("Artifacts are only available after a completed submission (current state: {0})")]
    NotCompleted(WorkflowStage),

    #[error("Invalid artifact reference '{reference}': {reason}")]
    InvalidReference { reference: String, reason: String },

    #[error("Artifact fetch failed: {0}")]
    FetchFailed(String),

    #[error("Artifact fetch returned HTTP {0}")]
    HttpStatus(u16),

    #[error("Failed to save artifact: {0}")]
    SaveFailed(String),
}

impl DownloadError {
    /// Symbolic key for text lookup
    pub const fn key(&self) -> &'static str {
        "DownloadFailed"
    }
}

/// Port for fetching artifact bytes by reference
#[async_trait]
pub trait ArtifactFetcher: Send + Sync {
    /// Fetch the bytes behind a reference (relative path or absolute URL).
    async fn fetch(&self, reference: &str) -> Result<Vec<u8>, DownloadError>;
}

/// Port for the host's "save as local file" behavior
#[async_trait]
pub trait ArtifactSink: Send + Sync {
    /// Save bytes under the suggested name.
    ///
    /// # Returns
    /// The location the file was actually written to
    async fn save(&self, suggested_name: &str, data: &[u8]) -> Result<PathBuf, DownloadError>;
}
