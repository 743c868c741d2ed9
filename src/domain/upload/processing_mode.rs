//! Processing mode value object

use std::fmt;
use std::str::FromStr;

use crate::domain::error::InvalidModeError;

/// All available processing modes
pub const ALL_MODES: &[ProcessingMode] = &[ProcessingMode::LaptopOrPhone, ProcessingMode::ExternalMic];

/// How the recording was captured. Passed through to the service untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ProcessingMode {
    #[default]
    LaptopOrPhone,
    ExternalMic,
}

impl ProcessingMode {
    /// Get the CLI/config identifier
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::LaptopOrPhone => "laptop",
            Self::ExternalMic => "external",
        }
    }

    /// Get the value sent in the `mode` form field
    pub const fn wire_value(&self) -> &'static str {
        match self {
            Self::LaptopOrPhone => "LAPTOP_CELULAR",
            Self::ExternalMic => "MICROFONO_EXTERNO",
        }
    }

    /// Text-lookup key for the selector label
    pub const fn label_key(&self) -> &'static str {
        match self {
            Self::LaptopOrPhone => "mode.laptop",
            Self::ExternalMic => "mode.external",
        }
    }
}

impl FromStr for ProcessingMode {
    type Err = InvalidModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "laptop" | "phone" | "laptop_celular" => Ok(Self::LaptopOrPhone),
            "external" | "mic" | "microfono_externo" => Ok(Self::ExternalMic),
            _ => Err(InvalidModeError { input: s.to_string() }),
        }
    }
}

impl fmt::Display for ProcessingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
