//! HTTP artifact fetcher adapter

use async_trait::async_trait;
use tracing::debug;

use crate::application::ports::{ArtifactFetcher, DownloadError};

use super::endpoint::Endpoint;

/// Fetches artifacts from the processing service over HTTP
pub struct HttpArtifactFetcher {
    endpoint: Endpoint,
}

impl HttpArtifactFetcher {
    pub fn new(endpoint: Endpoint) -> Self {
        Self { endpoint }
    }
}

#[async_trait]
impl ArtifactFetcher for HttpArtifactFetcher {
    async fn fetch(&self, reference: &str) -> Result<Vec<u8>, DownloadError> {
        if reference.trim().is_empty() {
            return Err(DownloadError::EmptyReference);
        }

        let url = self
            .endpoint
            .resolve(reference)
            .map_err(|e| DownloadError::InvalidReference {
                reference: reference.to_string(),
                reason: e.to_string(),
            })?;

        debug!(%url, "fetching artifact");

        let response = self
            .endpoint
            .client()
            .get(url)
            .send()
            .await
            .map_err(|e| DownloadError::FetchFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::HttpStatus(status.as_u16()));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| DownloadError::FetchFailed(e.to_string()))?;

        Ok(bytes.to_vec())
    }
}
