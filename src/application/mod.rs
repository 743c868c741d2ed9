//! Application layer - Use cases and port interfaces
//!
//! Contains the workflow engine, the artifact downloader, and trait
//! definitions for external system interactions.

pub mod download;
pub mod ports;
pub mod workflow;

// Re-export use cases
pub use download::{ArtifactDownloader, SavedArtifact};
pub use workflow::{SubmissionSettings, SubmitOutcome, WorkflowEngine, WorkflowError};
