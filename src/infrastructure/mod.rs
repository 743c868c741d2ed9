//! Infrastructure layer - Adapter implementations
//!
//! Concrete implementations of the application ports: the HTTP processing
//! service, artifact fetching and saving, local file picking, text lookup
//! and the XDG config file.

pub mod config;
pub mod picker;
pub mod remote;
pub mod storage;
pub mod text;

// Re-export adapters
pub use config::XdgConfigStore;
pub use picker::{pick_file, PickError};
pub use remote::{Endpoint, EndpointError, HttpArtifactFetcher, HttpProcessingService};
pub use storage::DirectorySink;
pub use text::Catalog;
