//! File intake validation

use std::fmt;

use thiserror::Error;

use super::audio_format::AudioFormat;
use super::selected_file::SelectedFile;

/// Client-side upload ceiling: 20 MiB
pub const MAX_UPLOAD_BYTES: u64 = 20 * 1024 * 1024;

/// Why a candidate file was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum RejectionReason {
    #[error("No file provided")]
    NoFileProvided,

    #[error("File does not look like audio")]
    UnrecognizedMediaType,

    #[error("File exceeds the {} MiB upload limit", MAX_UPLOAD_BYTES / (1024 * 1024))]
    SizeExceedsLimit,
}

impl RejectionReason {
    /// Symbolic key for text lookup
    pub const fn key(&self) -> &'static str {
        match self {
            Self::NoFileProvided => "NoFileProvided",
            Self::UnrecognizedMediaType => "UnrecognizedMediaType",
            Self::SizeExceedsLimit => "SizeExceedsLimit",
        }
    }
}

/// Result of validating a candidate file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationOutcome {
    Accepted,
    Rejected(RejectionReason),
}

impl ValidationOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }

    /// Convert into a `Result` for `?` propagation
    pub fn into_result(self) -> Result<(), RejectionReason> {
        match self {
            Self::Accepted => Ok(()),
            Self::Rejected(reason) => Err(reason),
        }
    }
}

impl fmt::Display for ValidationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Accepted => write!(f, "accepted"),
            Self::Rejected(reason) => write!(f, "rejected ({})", reason.key()),
        }
    }
}

/// Validate a candidate file.
///
/// Checks run in a fixed order and stop at the first failure: presence, then
/// audio-ness (declared media type or extension allow-list), then size.
/// The extension check is a best-effort backstop, the service re-validates.
pub fn validate(file: Option<&SelectedFile>) -> ValidationOutcome {
    let Some(file) = file else {
        return ValidationOutcome::Rejected(RejectionReason::NoFileProvided);
    };

    if !looks_like_audio(file) {
        return ValidationOutcome::Rejected(RejectionReason::UnrecognizedMediaType);
    }

    if file.size() > MAX_UPLOAD_BYTES {
        return ValidationOutcome::Rejected(RejectionReason::SizeExceedsLimit);
    }

    ValidationOutcome::Accepted
}

fn looks_like_audio(file: &SelectedFile) -> bool {
    let declared_audio = file
        .media_type()
        .map(|m| m.trim().to_ascii_lowercase().starts_with("audio/"))
        .unwrap_or(false);

    declared_audio || AudioFormat::from_file_name(file.name()).is_some()
}
