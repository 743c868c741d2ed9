//! Submission failure classification

use thiserror::Error;

/// Classified outcome of a failed submission.
///
/// Classification happens at the service boundary; the workflow only ever
/// sees these kinds, never raw transport errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    /// No response could be obtained from the service
    #[error("Service unreachable: {0}")]
    ServiceUnreachable(String),

    /// The service refused the request (HTTP 4xx)
    #[error("Request rejected (HTTP {status}){}", format_detail(.detail))]
    RequestRejected { status: u16, detail: Option<String> },

    /// The service failed while handling the request (HTTP 5xx)
    #[error("Service failure (HTTP {status})")]
    ServiceFailure { status: u16 },

    /// A success status with an unusable body
    #[error("Malformed service response: {0}")]
    MalformedResponse(String),
}

impl SubmissionError {
    /// Symbolic key for text lookup
    pub const fn key(&self) -> &'static str {
        match self {
            Self::ServiceUnreachable(_) => "ServiceUnreachable",
            Self::RequestRejected { .. } => "RequestRejected",
            Self::ServiceFailure { .. } => "ServiceFailure",
            Self::MalformedResponse(_) => "MalformedResponse",
        }
    }

    /// Service-provided detail to show verbatim, if any
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::RequestRejected { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// Whether resubmitting the same file may succeed
    pub const fn is_retryable(&self) -> bool {
        !matches!(self, Self::RequestRejected { .. })
    }
}

fn format_detail(detail: &Option<String>) -> String {
    detail.as_deref().map(|d| format!(": {}", d)).unwrap_or_default()
}
