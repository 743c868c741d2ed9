//! HTTP processing service adapter

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::application::ports::{ProcessingService, SubmissionError};
use crate::domain::upload::AudioFormat;
use crate::domain::workflow::{AnalysisRecord, SubmissionRequest, SubmissionResult};

use super::endpoint::Endpoint;

/// Processing endpoint path, relative to the server base URL
pub const PROCESS_PATH: &str = "api/process_audio";

/// Multipart field carrying the audio bytes
pub const FIELD_AUDIO: &str = "audio_file";
/// Multipart field carrying the processing mode
pub const FIELD_MODE: &str = "mode";
/// Multipart field carrying the display language tag
pub const FIELD_LANG: &str = "lang";

const FALLBACK_MEDIA_TYPE: &str = "application/octet-stream";

// Response types

// Older services send `processed_url`/`original_url`; some send both names
#[derive(Debug, Deserialize)]
struct ProcessResponse {
    #[serde(default)]
    processed_audio_url: Option<String>,
    #[serde(default)]
    processed_url: Option<String>,
    #[serde(default)]
    original_audio_url: Option<String>,
    #[serde(default)]
    original_url: Option<String>,
    #[serde(default)]
    report_url: Option<String>,
    #[serde(default)]
    analysis: Option<Value>,
    #[serde(default)]
    original_filename: Option<String>,
}

impl ProcessResponse {
    fn processed_reference(&mut self) -> Option<String> {
        prefer(self.processed_audio_url.take(), self.processed_url.take())
    }

    fn original_reference(&mut self) -> Option<String> {
        prefer(self.original_audio_url.take(), self.original_url.take())
    }
}

/// The current field name wins unless it is blank
fn prefer(current: Option<String>, older: Option<String>) -> Option<String> {
    current.filter(|s| !s.trim().is_empty()).or(older)
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<Value>,
}

/// Processing service reached over HTTP with a multipart upload
pub struct HttpProcessingService {
    endpoint: Endpoint,
}

impl HttpProcessingService {
    pub fn new(endpoint: Endpoint) -> Self {
        Self { endpoint }
    }

    /// Build the multipart form
    fn build_form(request: &SubmissionRequest) -> Form {
        Form::new()
            .part(FIELD_AUDIO, Self::audio_part(request))
            .text(FIELD_MODE, request.mode().wire_value())
            .text(FIELD_LANG, request.language().tag())
    }

    fn audio_part(request: &SubmissionRequest) -> Part {
        let media_type = request
            .media_type()
            .map(String::from)
            .or_else(|| {
                AudioFormat::from_file_name(request.file_name()).map(|f| f.media_type().to_string())
            })
            .unwrap_or_else(|| FALLBACK_MEDIA_TYPE.to_string());

        let part = |data: Vec<u8>| Part::bytes(data).file_name(request.file_name().to_string());

        // Hosts sometimes declare media types reqwest cannot parse
        part(request.audio().to_vec())
            .mime_str(&media_type)
            .unwrap_or_else(|_| part(request.audio().to_vec()))
    }

    /// Parse a success body into a result
    fn parse_response(body: &[u8]) -> Result<SubmissionResult, SubmissionError> {
        let mut response: ProcessResponse = serde_json::from_slice(body)
            .map_err(|e| SubmissionError::MalformedResponse(e.to_string()))?;

        let processed = response.processed_reference().ok_or_else(|| {
            SubmissionError::MalformedResponse("missing processed audio reference".to_string())
        })?;
        let result = SubmissionResult::new(processed).ok_or_else(|| {
            SubmissionError::MalformedResponse("empty processed audio reference".to_string())
        })?;

        Ok(result
            .with_original_audio(response.original_reference())
            .with_report(response.report_url)
            .with_analysis(response.analysis.filter(|a| !a.is_null()).map(AnalysisRecord::new))
            .with_original_filename(response.original_filename))
    }

    /// Extract a human-readable `detail` from an error body.
    ///
    /// A string detail is returned verbatim; a list of validation errors is
    /// flattened to their `msg` fields.
    fn extract_detail(body: &str) -> Option<String> {
        let parsed: ErrorBody = serde_json::from_str(body).ok()?;
        let detail = match parsed.detail? {
            Value::String(s) => s,
            Value::Array(items) => items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect::<Vec<_>>()
                .join("; "),
            _ => return None,
        };

        let trimmed = detail.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}

#[async_trait]
impl ProcessingService for HttpProcessingService {
    async fn submit(&self, request: &SubmissionRequest) -> Result<SubmissionResult, SubmissionError> {
        let url = self
            .endpoint
            .resolve(PROCESS_PATH)
            .map_err(|e| SubmissionError::ServiceUnreachable(e.to_string()))?;
        let form = Self::build_form(request);

        debug!(%url, bytes = request.audio().len(), "posting audio");

        let response = self
            .endpoint
            .client()
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| SubmissionError::ServiceUnreachable(e.to_string()))?;

        let status = response.status();
        debug!(%status, "service responded");

        if status.is_client_error() {
            let detail = response
                .text()
                .await
                .ok()
                .and_then(|body| Self::extract_detail(&body));
            return Err(SubmissionError::RequestRejected {
                status: status.as_u16(),
                detail,
            });
        }

        if status.is_server_error() {
            return Err(SubmissionError::ServiceFailure {
                status: status.as_u16(),
            });
        }

        if !status.is_success() {
            return Err(SubmissionError::MalformedResponse(format!(
                "unexpected HTTP status {}",
                status
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| SubmissionError::MalformedResponse(e.to_string()))?;

        Self::parse_response(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_response() {
        let body = br#"{
            "processed_audio_url": "/files/abc_processed.wav",
            "original_audio_url": "/files/abc.wav",
            "report_url": "/files/abc_report.txt",
            "analysis": {"quality_score": 80}
        }"#;

        let result = HttpProcessingService::parse_response(body).unwrap();
        assert_eq!(result.processed_audio(), "/files/abc_processed.wav");
        assert_eq!(result.original_audio(), Some("/files/abc.wav"));
        assert_eq!(result.report(), Some("/files/abc_report.txt"));
        assert_eq!(result.analysis().unwrap().quality_score(), Some(80));
    }

    #[test]
    fn parse_accepts_older_field_names() {
        let body = br#"{
            "original_url": "/media/original/1_ep.wav",
            "processed_url": "/media/processed/1_ep_PROCESADO.wav",
            "report_url": "/media/reports/1_ep_PROCESADO_report.txt",
            "original_filename": "ep.wav",
            "analysis": {"snr_db": 30.1}
        }"#;

        let result = HttpProcessingService::parse_response(body).unwrap();
        assert_eq!(result.processed_audio(), "/media/processed/1_ep_PROCESADO.wav");
        assert_eq!(result.original_audio(), Some("/media/original/1_ep.wav"));
        assert_eq!(result.original_filename(), Some("ep.wav"));
    }

    #[test]
    fn parse_accepts_both_field_names() {
        let body = br#"{
            "processed_audio_url": "/media/processed/new.wav",
            "processed_url": "/media/processed/old.wav",
            "original_audio_url": "/media/original/new.wav",
            "original_url": "/media/original/old.wav"
        }"#;

        let result = HttpProcessingService::parse_response(body).unwrap();
        assert_eq!(result.processed_audio(), "/media/processed/new.wav");
        assert_eq!(result.original_audio(), Some("/media/original/new.wav"));
    }

    #[test]
    fn parse_blank_current_name_falls_back_to_older() {
        let body = br#"{"processed_audio_url": "", "processed_url": "/media/processed/old.wav"}"#;
        let result = HttpProcessingService::parse_response(body).unwrap();
        assert_eq!(result.processed_audio(), "/media/processed/old.wav");
    }

    #[test]
    fn parse_only_processed_reference() {
        let body = br#"{"processed_audio_url": "/files/a.wav"}"#;
        let result = HttpProcessingService::parse_response(body).unwrap();
        assert_eq!(result.report(), None);
        assert_eq!(result.original_audio(), None);
        assert!(result.analysis().is_none());
    }

    #[test]
    fn parse_string_analysis() {
        let body = br#"{"processed_audio_url": "/files/a.wav", "analysis": "ok"}"#;
        let result = HttpProcessingService::parse_response(body).unwrap();
        assert_eq!(result.analysis().unwrap().as_text(), Some("ok"));
    }

    #[test]
    fn parse_missing_processed_reference_is_malformed() {
        let body = br#"{"report_url": "/files/a_report.txt"}"#;
        let err = HttpProcessingService::parse_response(body).unwrap_err();
        assert_eq!(err.key(), "MalformedResponse");
    }

    #[test]
    fn parse_empty_processed_reference_is_malformed() {
        let body = br#"{"processed_audio_url": ""}"#;
        assert!(matches!(
            HttpProcessingService::parse_response(body),
            Err(SubmissionError::MalformedResponse(_))
        ));
    }

    #[test]
    fn parse_non_json_is_malformed() {
        let err = HttpProcessingService::parse_response(b"<html>oops</html>").unwrap_err();
        assert_eq!(err.key(), "MalformedResponse");
    }

    #[test]
    fn detail_string_is_verbatim() {
        let detail = HttpProcessingService::extract_detail(r#"{"detail": "File too large"}"#);
        assert_eq!(detail, Some("File too large".to_string()));
    }

    #[test]
    fn detail_list_is_flattened() {
        let body = r#"{"detail": [{"loc": ["body", "mode"], "msg": "field required"}]}"#;
        assert_eq!(
            HttpProcessingService::extract_detail(body),
            Some("field required".to_string())
        );
    }

    #[test]
    fn detail_missing_or_unparseable() {
        assert_eq!(HttpProcessingService::extract_detail(r#"{"error": "x"}"#), None);
        assert_eq!(HttpProcessingService::extract_detail("Payload Too Large"), None);
        assert_eq!(HttpProcessingService::extract_detail(r#"{"detail": "  "}"#), None);
    }
}
