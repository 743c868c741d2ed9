//! Known audio container formats

use std::fmt;
use std::path::Path;

/// Audio formats recognised by file extension.
///
/// This table is the extension allow-list used when the declared media type
/// of a file is missing or unhelpful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioFormat {
    Wav,
    Mp3,
    M4a,
    Aac,
    Flac,
    Ogg,
    Opus,
    Webm,
    Aiff,
}

impl AudioFormat {
    /// Get the canonical media type string
    pub const fn media_type(&self) -> &'static str {
        match self {
            Self::Wav => "audio/wav",
            Self::Mp3 => "audio/mpeg",
            Self::M4a => "audio/mp4",
            Self::Aac => "audio/aac",
            Self::Flac => "audio/flac",
            Self::Ogg => "audio/ogg",
            Self::Opus => "audio/opus",
            Self::Webm => "audio/webm",
            Self::Aiff => "audio/aiff",
        }
    }

    /// Look up a format by extension (case-insensitive, without the dot)
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "wav" => Some(Self::Wav),
            "mp3" => Some(Self::Mp3),
            "m4a" => Some(Self::M4a),
            "aac" => Some(Self::Aac),
            "flac" => Some(Self::Flac),
            "ogg" => Some(Self::Ogg),
            "opus" => Some(Self::Opus),
            "webm" => Some(Self::Webm),
            "aiff" | "aif" => Some(Self::Aiff),
            _ => None,
        }
    }

    /// Look up a format from the extension of a file name
    pub fn from_file_name(name: &str) -> Option<Self> {
        Path::new(name)
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.media_type())
    }
}
