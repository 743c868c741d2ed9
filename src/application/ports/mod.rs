//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod artifacts;
pub mod config;
pub mod processing;
pub mod text;

// Re-export common types
pub use artifacts::{ArtifactFetcher, ArtifactSink, DownloadError};
pub use config::ConfigStore;
pub use processing::{ProcessingService, SubmissionError};
pub use text::{Describe, TextResolver};
