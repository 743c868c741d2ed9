//! Display language value object

use std::fmt;
use std::str::FromStr;

use crate::domain::error::InvalidLanguageError;

/// Display language, also sent to the service as the `lang` tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Language {
    #[default]
    Es,
    En,
}

impl Language {
    /// Get the language tag
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::Es => "es",
            Self::En => "en",
        }
    }
}

impl FromStr for Language {
    type Err = InvalidLanguageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        // Accept regional tags such as "en-US" or "es_CL"
        let primary = lower.split(['-', '_']).next().unwrap_or_default();
        match primary {
            "es" => Ok(Self::Es),
            "en" => Ok(Self::En),
            _ => Err(InvalidLanguageError { input: s.to_string() }),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}
