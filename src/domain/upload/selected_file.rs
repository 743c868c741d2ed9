//! Selected file value object

use std::sync::Arc;

/// A candidate input file as handed over by the host.
///
/// The declared size and media type come from the host and are not derived
/// from the payload: a host may decline to load a payload it already knows is
/// too large. A new selection always replaces the previous value wholesale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    name: String,
    size: u64,
    media_type: Option<String>,
    payload: Arc<[u8]>,
}

impl SelectedFile {
    /// Create a selected file with an explicitly declared size
    pub fn new(
        name: impl Into<String>,
        size: u64,
        media_type: Option<String>,
        payload: impl Into<Arc<[u8]>>,
    ) -> Self {
        Self {
            name: name.into(),
            size,
            media_type: media_type.filter(|m| !m.trim().is_empty()),
            payload: payload.into(),
        }
    }

    /// Create a selected file whose declared size is the payload length
    pub fn from_bytes(name: impl Into<String>, media_type: Option<String>, data: Vec<u8>) -> Self {
        let size = data.len() as u64;
        Self::new(name, size, media_type, data)
    }

    /// Declared file name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared size in bytes
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Declared media type hint, if any
    pub fn media_type(&self) -> Option<&str> {
        self.media_type.as_deref()
    }

    /// Shared handle to the payload bytes
    pub fn payload(&self) -> Arc<[u8]> {
        Arc::clone(&self.payload)
    }

    /// Get human-readable size
    pub fn human_readable_size(&self) -> String {
        format_size(self.size)
    }
}

/// Byte count as B, KB or MB with one decimal
pub fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
