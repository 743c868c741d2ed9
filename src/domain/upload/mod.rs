//! File intake domain module

mod audio_format;
mod language;
mod processing_mode;
mod selected_file;
mod validator;

pub use audio_format::AudioFormat;
pub use language::Language;
pub use processing_mode::{ProcessingMode, ALL_MODES};
pub use selected_file::{format_size, SelectedFile};
pub use validator::{validate, RejectionReason, ValidationOutcome, MAX_UPLOAD_BYTES};
