//! Artifact download use case

use std::path::PathBuf;

use tracing::{info, warn};

use crate::domain::upload::Language;
use crate::domain::workflow::{ArtifactKind, WorkflowState};

use super::ports::{ArtifactFetcher, ArtifactSink, DownloadError};

/// A saved artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedArtifact {
    /// Where the file was written
    pub path: PathBuf,
    /// Number of bytes written
    pub size: usize,
}

/// Re-fetches remote artifacts and saves them as local files.
///
/// Reads workflow snapshots only; downloads never change the workflow and
/// may run concurrently with each other.
pub struct ArtifactDownloader<F, K>
where
    F: ArtifactFetcher,
    K: ArtifactSink,
{
    fetcher: F,
    sink: K,
    language: Language,
}

impl<F, K> ArtifactDownloader<F, K>
where
    F: ArtifactFetcher,
    K: ArtifactSink,
{
    /// Create a downloader naming files for the given display language
    pub fn new(fetcher: F, sink: K, language: Language) -> Self {
        Self {
            fetcher,
            sink,
            language,
        }
    }

    /// Fetch `reference` and save it under `suggested_name`
    pub async fn download(
        &self,
        reference: &str,
        suggested_name: &str,
    ) -> Result<SavedArtifact, DownloadError> {
        if reference.trim().is_empty() {
            warn!(name = suggested_name, "download requested with an empty reference");
            return Err(DownloadError::EmptyReference);
        }

        let data = self.fetcher.fetch(reference).await.inspect_err(|e| {
            warn!(reference, error = %e, "artifact fetch failed");
        })?;

        let path = self.sink.save(suggested_name, &data).await.inspect_err(|e| {
            warn!(name = suggested_name, error = %e, "artifact save failed");
        })?;

        info!(reference, path = %path.display(), bytes = data.len(), "artifact saved");
        Ok(SavedArtifact {
            path,
            size: data.len(),
        })
    }

    /// Download one artifact of a completed submission.
    ///
    /// The local name is derived from the selected file's name.
    pub async fn download_artifact(
        &self,
        state: &WorkflowState,
        kind: ArtifactKind,
    ) -> Result<SavedArtifact, DownloadError> {
        let WorkflowState::Completed { file, result } = state else {
            return Err(DownloadError::NotCompleted(state.stage()));
        };

        let reference = result
            .reference(kind)
            .ok_or(DownloadError::Unavailable(kind))?;
        let name = kind.suggested_name(Some(file.name()), self.language);

        self.download(reference, &name).await
    }
}
