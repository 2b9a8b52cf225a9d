//! Error types for the Reelcut client

use reelcut_core::dto::ErrorBody;
use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when talking to the render runner
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed before a response was received
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Runner returned an error status code
    #[error("API error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Flattened error message from the runner
        message: String,
    },

    /// Failed to parse a response body
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Request rejected locally before any network call
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ClientError {
    /// Builds an API error from a raw response body.
    ///
    /// The runner reports failures as `{"detail": ...}` where `detail` is
    /// either a string or a list of `{msg, type}` field errors; the list is
    /// flattened by joining its messages with `" | "`. Bodies that are not in
    /// that shape are used verbatim, and an empty body falls back to the
    /// operation-specific `fallback` string.
    pub fn from_error_body(status: u16, body: &str, fallback: &str) -> Self {
        let message = match serde_json::from_str::<ErrorBody>(body) {
            Ok(parsed) => parsed.detail.flatten(),
            Err(_) => {
                let text = body.trim();
                if text.is_empty() {
                    fallback.to_string()
                } else {
                    text.to_string()
                }
            }
        };
        Self::ApiError { status, message }
    }

    /// Check if this error is a client error (4xx status)
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::ApiError { status, .. } if *status >= 400 && *status < 500)
    }

    /// Check if this error is a server error (5xx status)
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::ApiError { status, .. } if *status >= 500)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_detail_body() {
        let err = ClientError::from_error_body(400, r#"{"detail": "Invalid platform."}"#, "x");
        assert_eq!(err.to_string(), "API error (status 400): Invalid platform.");
        assert!(err.is_client_error());
    }

    #[test]
    fn test_field_list_detail_is_joined() {
        let body = r#"{"detail": [
            {"msg": "field required", "type": "missing"},
            {"msg": "too long", "type": "value_error"}
        ]}"#;
        let err = ClientError::from_error_body(422, body, "x");
        match err {
            ClientError::ApiError { status, message } => {
                assert_eq!(status, 422);
                assert_eq!(message, "field required | too long");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_plain_text_body_used_verbatim() {
        let err = ClientError::from_error_body(502, "upstream exploded", "TTS failed.");
        match err {
            ClientError::ApiError { message, .. } => assert_eq!(message, "upstream exploded"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_empty_body_uses_fallback() {
        let err = ClientError::from_error_body(502, "  \n", "TTS failed.");
        match err {
            ClientError::ApiError { message, .. } => assert_eq!(message, "TTS failed."),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(ClientError::from_error_body(500, "", "x").is_server_error());
    }
}
