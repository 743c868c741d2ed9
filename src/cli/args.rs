//! CLI argument definitions using Clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::domain::upload::{Language, ProcessingMode};

/// Environment variable overriding the configured server URL
pub const ENV_SERVER_URL: &str = "PODPOLISH_SERVER_URL";

/// PodPolish - upload an audio file for cleanup and fetch the results
#[derive(Parser, Debug)]
#[command(name = "podpolish")]
#[command(version)]
#[command(about = "Upload a podcast recording for processing and download the polished audio")]
#[command(long_about = None)]
pub struct Cli {
    /// Audio file to process (WAV, MP3, M4A, ...; at most 20 MB)
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// How the recording was captured
    #[arg(short = 'm', long, value_name = "MODE")]
    pub mode: Option<ModeArg>,

    /// Display language for messages and artifact names
    #[arg(short = 'l', long = "lang", value_name = "LANG")]
    pub language: Option<LanguageArg>,

    /// Processing service base URL
    #[arg(short = 's', long = "server", value_name = "URL")]
    pub server_url: Option<String>,

    /// Directory where downloaded artifacts are saved
    #[arg(short = 'o', long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Override the media type declared for FILE
    #[arg(long, value_name = "TYPE")]
    pub media_type: Option<String>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Only print the artifact references, do not download them
    #[arg(long)]
    pub no_download: bool,

    /// Verbose diagnostic logging on stderr
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Config subcommand
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Processing mode argument for clap ValueEnum
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Built-in laptop or phone microphone
    Laptop,
    /// External USB microphone or audio interface
    External,
}

impl From<ModeArg> for ProcessingMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Laptop => ProcessingMode::LaptopOrPhone,
            ModeArg::External => ProcessingMode::ExternalMic,
        }
    }
}

/// Language argument for clap ValueEnum
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LanguageArg {
    Es,
    En,
}

impl From<LanguageArg> for Language {
    fn from(arg: LanguageArg) -> Self {
        match arg {
            LanguageArg::Es => Language::Es,
            LanguageArg::En => Language::En,
        }
    }
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &[
    "server_url",
    "mode",
    "language",
    "output_dir",
    "timeout_secs",
];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}
