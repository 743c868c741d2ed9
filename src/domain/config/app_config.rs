//! Application configuration value object

use serde::{Deserialize, Serialize};

use crate::domain::upload::{Language, ProcessingMode};

/// Default processing service address
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8000";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub server_url: Option<String>,
    pub mode: Option<String>,
    pub language: Option<String>,
    pub output_dir: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            server_url: Some(DEFAULT_SERVER_URL.to_string()),
            mode: Some(ProcessingMode::default().to_string()),
            language: Some(Language::default().to_string()),
            output_dir: Some(".".to_string()),
            timeout_secs: Some(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            server_url: other.server_url.or(self.server_url),
            mode: other.mode.or(self.mode),
            language: other.language.or(self.language),
            output_dir: other.output_dir.or(self.output_dir),
            timeout_secs: other.timeout_secs.or(self.timeout_secs),
        }
    }

    /// Get server URL, or the default if not set
    pub fn server_url_or_default(&self) -> &str {
        self.server_url.as_deref().unwrap_or(DEFAULT_SERVER_URL)
    }

    /// Get mode as parsed ProcessingMode, or default if not set/invalid
    pub fn mode_or_default(&self) -> ProcessingMode {
        self.mode
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    /// Get language as parsed Language, or default if not set/invalid
    pub fn language_or_default(&self) -> Language {
        self.language
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    /// Get output directory, or the current directory if not set
    pub fn output_dir_or_default(&self) -> &str {
        self.output_dir.as_deref().unwrap_or(".")
    }

    /// Get timeout, or the default if not set or zero
    pub fn timeout_secs_or_default(&self) -> u64 {
        self.timeout_secs
            .filter(|t| *t > 0)
            .unwrap_or(DEFAULT_TIMEOUT_SECS)
    }
}
