//! Submission workflow domain module

mod failure;
mod state;
mod submission;

pub use failure::SubmissionError;
pub use state::{InvalidStateTransition, WorkflowStage, WorkflowState};
pub use submission::{AnalysisRecord, ArtifactKind, SubmissionRequest, SubmissionResult};
