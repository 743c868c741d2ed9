//! Remote processing service adapters

pub mod artifacts;
pub mod endpoint;
pub mod processing;

pub use artifacts::HttpArtifactFetcher;
pub use endpoint::{Endpoint, EndpointError};
pub use processing::HttpProcessingService;
