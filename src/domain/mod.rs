//! Domain layer - Core business logic
//!
//! Contains value objects, the workflow state machine, and domain errors.
//! This layer has no dependencies on external systems.

pub mod config;
pub mod error;
pub mod upload;
pub mod workflow;

// Re-export common types
pub use config::AppConfig;
pub use error::*;
pub use upload::{
    validate, AudioFormat, Language, ProcessingMode, RejectionReason, SelectedFile,
    ValidationOutcome, MAX_UPLOAD_BYTES,
};
pub use workflow::{
    AnalysisRecord, ArtifactKind, InvalidStateTransition, SubmissionError, SubmissionRequest,
    SubmissionResult, WorkflowStage, WorkflowState,
};
