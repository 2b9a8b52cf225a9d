//! Wire DTOs for the runner API
//!
//! Request and response bodies exchanged with the render runner, including
//! the error `detail` shape, which is either a single string or a list of
//! field-level validation errors.

use serde::{Deserialize, Serialize};

use crate::domain::job::JobStatus;

/// Response to a successful job submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartResponse {
    /// Opaque job identifier assigned by the runner.
    pub job_id: String,
}

/// One poll response from `GET /status/{job_id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: JobStatus,
    /// Percentage 0-100; absent responses display as 0.
    #[serde(default)]
    pub progress: Option<u8>,
    /// Present only when `status` is `error`.
    #[serde(default)]
    pub error: Option<String>,
    /// Download path, present once `status` is `done`.
    #[serde(default)]
    pub output_url: Option<String>,
}

/// Error body returned by the runner on a rejected request.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub detail: ApiDetail,
}

/// The runner's `detail` field: a plain message, or a structured list of
/// field validation errors when the request body itself was malformed.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ApiDetail {
    Message(String),
    Fields(Vec<FieldError>),
}

/// One entry of a structured validation error list.
#[derive(Debug, Clone, Deserialize)]
pub struct FieldError {
    pub msg: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl ApiDetail {
    /// Collapses the detail into a single displayable message; a field-error
    /// list joins its messages with `" | "`.
    pub fn flatten(&self) -> String {
        match self {
            ApiDetail::Message(msg) => msg.clone(),
            ApiDetail::Fields(errors) => errors
                .iter()
                .map(|e| e.msg.as_str())
                .collect::<Vec<_>>()
                .join(" | "),
        }
    }
}

/// Metadata returned by `POST /analyze_url` before committing to a URL job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UrlMetadata {
    pub url: String,
    pub content_type: String,
    #[serde(default)]
    pub content_length: Option<u64>,
}

/// Capability probe response from `GET /elevenlabs/status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioCapabilities {
    pub enabled: bool,
    #[serde(default)]
    pub capabilities: std::collections::HashMap<String, bool>,
}

/// Body for `POST /elevenlabs/tts`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TtsRequest {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_format: Option<String>,
    pub speed: f32,
}

impl TtsRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            voice_id: None,
            model_id: None,
            output_format: None,
            speed: 1.0,
        }
    }
}

/// Body for `POST /elevenlabs/sfx` and `/elevenlabs/music`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoundRequest {
    pub prompt: String,
    pub duration_s: f32,
}

/// Body for `POST /elevenlabs/voice`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceRequest {
    pub name: String,
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_string_detail() {
        let body: ErrorBody = serde_json::from_str(r#"{"detail": "Invalid platform."}"#).unwrap();
        assert_eq!(body.detail.flatten(), "Invalid platform.");
    }

    #[test]
    fn test_flatten_field_error_list() {
        let body: ErrorBody = serde_json::from_str(
            r#"{"detail": [
                {"msg": "field required", "type": "missing"},
                {"msg": "too long", "type": "value_error"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(body.detail.flatten(), "field required | too long");
    }

    #[test]
    fn test_status_response_defaults() {
        let status: StatusResponse = serde_json::from_str(r#"{"status": "queued"}"#).unwrap();
        assert_eq!(status.status, JobStatus::Queued);
        assert_eq!(status.progress, None);
        assert_eq!(status.error, None);
        assert_eq!(status.output_url, None);
    }

    #[test]
    fn test_done_status_carries_output_url() {
        let status: StatusResponse = serde_json::from_str(
            r#"{"status": "done", "progress": 100, "output_url": "/download/abc"}"#,
        )
        .unwrap();
        assert_eq!(status.status, JobStatus::Done);
        assert_eq!(status.output_url.as_deref(), Some("/download/abc"));
    }

    #[test]
    fn test_tts_request_skips_absent_fields() {
        let req = TtsRequest::new("bonjour");
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["text"], "bonjour");
        assert_eq!(value["speed"], 1.0);
        assert!(value.get("voice_id").is_none());
        assert!(value.get("model_id").is_none());
    }
}
