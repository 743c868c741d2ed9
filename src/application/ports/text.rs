//! Text lookup port interface

use crate::application::workflow::WorkflowError;
use crate::domain::upload::{RejectionReason, MAX_UPLOAD_BYTES};
use crate::domain::workflow::SubmissionError;

use super::artifacts::DownloadError;

/// Port for turning symbolic keys into user-facing text.
///
/// Implementations must degrade to returning the key itself when no
/// mapping exists. `{name}` placeholders are replaced from `substitutions`.
pub trait TextResolver: Send + Sync {
    fn resolve(&self, key: &str, substitutions: &[(&str, &str)]) -> String;
}

/// Something that can be described to the user through a [`TextResolver`]
pub trait Describe {
    fn describe(&self, text: &dyn TextResolver) -> String;
}

impl Describe for RejectionReason {
    fn describe(&self, text: &dyn TextResolver) -> String {
        let limit_mb = (MAX_UPLOAD_BYTES / (1024 * 1024)).to_string();
        text.resolve(self.key(), &[("limit_mb", limit_mb.as_str())])
    }
}

impl Describe for SubmissionError {
    fn describe(&self, text: &dyn TextResolver) -> String {
        // Service detail is surfaced verbatim when present
        match self.detail() {
            Some(detail) => detail.to_string(),
            None => text.resolve(self.key(), &[]),
        }
    }
}

impl Describe for DownloadError {
    fn describe(&self, text: &dyn TextResolver) -> String {
        text.resolve(self.key(), &[])
    }
}

impl Describe for WorkflowError {
    fn describe(&self, text: &dyn TextResolver) -> String {
        match self {
            WorkflowError::Rejected(reason) => reason.describe(text),
            WorkflowError::SelectionLocked => text.resolve(self.key(), &[]),
        }
    }
}
