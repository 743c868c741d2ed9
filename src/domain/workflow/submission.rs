//! Submission request and result value objects

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde_json::Value;

use crate::domain::upload::{Language, ProcessingMode, SelectedFile};

/// Outbound payload for one submission attempt. Immutable once built.
#[derive(Debug, Clone)]
pub struct SubmissionRequest {
    file_name: String,
    media_type: Option<String>,
    audio: Arc<[u8]>,
    mode: ProcessingMode,
    language: Language,
}

impl SubmissionRequest {
    /// Build a request from the selected file and the current settings
    pub fn new(file: &SelectedFile, mode: ProcessingMode, language: Language) -> Self {
        Self {
            file_name: file.name().to_string(),
            media_type: file.media_type().map(String::from),
            audio: file.payload(),
            mode,
            language,
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn media_type(&self) -> Option<&str> {
        self.media_type.as_deref()
    }

    pub fn audio(&self) -> &[u8] {
        &self.audio
    }

    pub fn mode(&self) -> ProcessingMode {
        self.mode
    }

    pub fn language(&self) -> Language {
        self.language
    }
}

/// Kinds of downloadable artifacts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    ProcessedAudio,
    Report,
}

impl ArtifactKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ProcessedAudio => "processed audio",
            Self::Report => "report",
        }
    }

    /// Suffix appended to the original file stem
    pub const fn suffix(&self, language: Language) -> &'static str {
        match (self, language) {
            (Self::ProcessedAudio, Language::Es) => "_PROCESADO.wav",
            (Self::ProcessedAudio, Language::En) => "_PROCESSED.wav",
            (Self::Report, Language::Es) => "_INFORME.txt",
            (Self::Report, Language::En) => "_REPORT.txt",
        }
    }

    /// Name used when the original file name is unknown
    pub const fn default_name(&self) -> &'static str {
        match self {
            Self::ProcessedAudio => "processed_audio.wav",
            Self::Report => "report.txt",
        }
    }

    /// Derive the suggested local file name from the original file name.
    ///
    /// The original extension is stripped and the kind-specific suffix
    /// appended. Directory components in `original` are ignored.
    pub fn suggested_name(&self, original: Option<&str>, language: Language) -> String {
        let stem = original
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .and_then(|name| Path::new(name).file_stem())
            .and_then(|stem| stem.to_str())
            .filter(|stem| !stem.is_empty());

        match stem {
            Some(stem) => format!("{}{}", stem, self.suffix(language)),
            None => self.default_name().to_string(),
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Opaque quality analysis returned by the service.
///
/// The record is kept as raw JSON; the accessors only pick out the few
/// fields a presenter commonly wants.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRecord(Value);

impl AnalysisRecord {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Overall quality score (0–100), if reported
    pub fn quality_score(&self) -> Option<i64> {
        self.0.get("quality_score").and_then(Value::as_i64)
    }

    /// Quality label, if reported
    pub fn quality_label(&self) -> Option<&str> {
        self.0.get("quality_label").and_then(Value::as_str)
    }

    /// Recommendation lines, if reported
    pub fn recommendations(&self) -> Vec<&str> {
        ["recomendaciones", "recommendations"]
            .iter()
            .find_map(|key| self.0.get(*key).and_then(Value::as_array))
            .map(|items| items.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    /// Remaining scalar metrics as `(name, value)` pairs, in key order
    pub fn metrics(&self) -> Vec<(&str, String)> {
        let Some(object) = self.0.as_object() else {
            return Vec::new();
        };

        let mut metrics: Vec<(&str, String)> = object
            .iter()
            .filter(|(key, _)| {
                !matches!(
                    key.as_str(),
                    "quality_score" | "quality_label" | "recomendaciones" | "recommendations"
                )
            })
            .filter_map(|(key, value)| {
                let rendered = match value {
                    Value::String(s) => s.clone(),
                    Value::Number(n) => n.to_string(),
                    Value::Bool(b) => b.to_string(),
                    _ => return None,
                };
                Some((key.as_str(), rendered))
            })
            .collect();
        metrics.sort_by(|a, b| a.0.cmp(b.0));
        metrics
    }

    /// The record as plain text when the service sent a string
    pub fn as_text(&self) -> Option<&str> {
        self.0.as_str()
    }
}

/// Artifact set produced by one successful submission
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionResult {
    processed_audio: String,
    original_audio: Option<String>,
    report: Option<String>,
    analysis: Option<AnalysisRecord>,
    original_filename: Option<String>,
}

impl SubmissionResult {
    /// Create a result; `None` when the processed reference is empty
    pub fn new(processed_audio: impl Into<String>) -> Option<Self> {
        let processed_audio = processed_audio.into();
        if processed_audio.trim().is_empty() {
            return None;
        }
        Some(Self {
            processed_audio,
            original_audio: None,
            report: None,
            analysis: None,
            original_filename: None,
        })
    }

    pub fn with_original_audio(mut self, reference: Option<String>) -> Self {
        self.original_audio = non_empty(reference);
        self
    }

    pub fn with_report(mut self, reference: Option<String>) -> Self {
        self.report = non_empty(reference);
        self
    }

    pub fn with_analysis(mut self, analysis: Option<AnalysisRecord>) -> Self {
        self.analysis = analysis;
        self
    }

    pub fn with_original_filename(mut self, name: Option<String>) -> Self {
        self.original_filename = non_empty(name);
        self
    }

    pub fn processed_audio(&self) -> &str {
        &self.processed_audio
    }

    pub fn original_audio(&self) -> Option<&str> {
        self.original_audio.as_deref()
    }

    pub fn report(&self) -> Option<&str> {
        self.report.as_deref()
    }

    pub fn analysis(&self) -> Option<&AnalysisRecord> {
        self.analysis.as_ref()
    }

    /// Original file name as echoed back by the service
    pub fn original_filename(&self) -> Option<&str> {
        self.original_filename.as_deref()
    }

    /// Reference for a downloadable artifact kind
    pub fn reference(&self, kind: ArtifactKind) -> Option<&str> {
        match kind {
            ArtifactKind::ProcessedAudio => Some(self.processed_audio.as_str()),
            ArtifactKind::Report => self.report(),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_carries_file_and_settings() {
        let file = SelectedFile::from_bytes("ep.wav", Some("audio/wav".into()), vec![1, 2, 3]);
        let request = SubmissionRequest::new(&file, ProcessingMode::ExternalMic, Language::En);

        assert_eq!(request.file_name(), "ep.wav");
        assert_eq!(request.media_type(), Some("audio/wav"));
        assert_eq!(request.audio(), &[1, 2, 3]);
        assert_eq!(request.mode(), ProcessingMode::ExternalMic);
        assert_eq!(request.language(), Language::En);
    }

    #[test]
    fn suggested_name_strips_extension() {
        let name = ArtifactKind::ProcessedAudio.suggested_name(Some("episode.wav"), Language::Es);
        assert_eq!(name, "episode_PROCESADO.wav");

        let report = ArtifactKind::Report.suggested_name(Some("episode.mp3"), Language::En);
        assert_eq!(report, "episode_REPORT.txt");
    }

    #[test]
    fn suggested_name_keeps_inner_dots_and_drops_directories() {
        let name = ArtifactKind::ProcessedAudio.suggested_name(Some("dir/my.show.m4a"), Language::En);
        assert_eq!(name, "my.show_PROCESSED.wav");
    }

    #[test]
    fn suggested_name_without_extension() {
        let name = ArtifactKind::Report.suggested_name(Some("take1"), Language::Es);
        assert_eq!(name, "take1_INFORME.txt");
    }

    #[test]
    fn suggested_name_falls_back_to_default() {
        assert_eq!(
            ArtifactKind::ProcessedAudio.suggested_name(None, Language::Es),
            "processed_audio.wav"
        );
        assert_eq!(ArtifactKind::Report.suggested_name(Some("  "), Language::En), "report.txt");
    }

    #[test]
    fn result_requires_processed_reference() {
        assert!(SubmissionResult::new("").is_none());
        assert!(SubmissionResult::new("   ").is_none());
        assert!(SubmissionResult::new("/files/a.wav").is_some());
    }

    #[test]
    fn result_drops_empty_optional_references() {
        let result = SubmissionResult::new("/files/a.wav")
            .unwrap()
            .with_report(Some(String::new()))
            .with_original_audio(Some("/files/orig.wav".into()));

        assert_eq!(result.report(), None);
        assert_eq!(result.reference(ArtifactKind::Report), None);
        assert_eq!(result.original_audio(), Some("/files/orig.wav"));
        assert_eq!(result.reference(ArtifactKind::ProcessedAudio), Some("/files/a.wav"));
    }

    #[test]
    fn analysis_accessors() {
        let record = AnalysisRecord::new(json!({
            "quality_score": 72,
            "quality_label": "Listo para podcast con pequeños ajustes",
            "recomendaciones": ["Baja la ganancia", "Acércate al micrófono"],
            "snr_db": 31.5,
            "clip_detectado": false,
            "nested": {"ignored": true}
        }));

        assert_eq!(record.quality_score(), Some(72));
        assert_eq!(record.quality_label(), Some("Listo para podcast con pequeños ajustes"));
        assert_eq!(record.recommendations().len(), 2);

        let metrics = record.metrics();
        assert_eq!(
            metrics,
            vec![("clip_detectado", "false".to_string()), ("snr_db", "31.5".to_string())]
        );
    }

    #[test]
    fn analysis_as_text() {
        let record = AnalysisRecord::new(json!("plain summary"));
        assert_eq!(record.as_text(), Some("plain summary"));
        assert!(record.metrics().is_empty());
        assert!(record.recommendations().is_empty());
    }
}
