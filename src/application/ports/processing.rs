//! Processing service port interface

use async_trait::async_trait;

use crate::domain::workflow::{SubmissionRequest, SubmissionResult};

pub use crate::domain::workflow::SubmissionError;

/// Port for the remote audio processing service
#[async_trait]
pub trait ProcessingService: Send + Sync {
    /// Submit one request and wait for the artifact set.
    ///
    /// Implementations classify every failure into a [`SubmissionError`]
    /// and never retry on their own.
    async fn submit(&self, request: &SubmissionRequest) -> Result<SubmissionResult, SubmissionError>;
}

#[async_trait]
impl<T: ProcessingService + ?Sized> ProcessingService for std::sync::Arc<T> {
    async fn submit(&self, request: &SubmissionRequest) -> Result<SubmissionResult, SubmissionError> {
        self.as_ref().submit(request).await
    }
}
