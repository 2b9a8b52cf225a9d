//! Reelcut HTTP Client
//!
//! A type-safe HTTP client for the Reelcut render runner API.
//!
//! The runner turns a source video (uploaded file or remote URL) into a
//! rendered vertical clip; this crate covers job submission, status reads,
//! artifact download, and the stateless audio-generation endpoints.
//!
//! # Example
//!
//! ```no_run
//! use reelcut_client::{FilePayload, JobAttachments, RunnerClient};
//! use reelcut_core::domain::options::RenderOptions;
//!
//! #[tokio::main]
//! async fn main() -> reelcut_client::Result<()> {
//!     let client = RunnerClient::new("http://localhost:8000");
//!
//!     let file = FilePayload::new("talk.mp4", std::fs::read("talk.mp4").unwrap());
//!     let job_id = client
//!         .start_job(&RenderOptions::default(), file, JobAttachments::default())
//!         .await?;
//!
//!     println!("Submitted job: {job_id}");
//!     Ok(())
//! }
//! ```

pub mod error;
mod audio;
mod jobs;

// Re-export commonly used types
pub use error::{ClientError, Result};
pub use jobs::{FilePayload, JobAttachments};

use reqwest::Client;
use serde::de::DeserializeOwned;

/// Generic fallback when the runner gives no usable error body.
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// HTTP client for the render runner API
///
/// Endpoint groups:
/// - Job lifecycle (submit from file or URL, status, download)
/// - URL pre-flight analysis
/// - Audio generation (TTS, STS, STT, SFX, isolation, music, voices)
#[derive(Debug, Clone)]
pub struct RunnerClient {
    /// Base URL of the runner (e.g., "http://localhost:8000")
    base_url: String,
    /// HTTP client instance
    client: Client,
}

impl RunnerClient {
    /// Create a new runner client
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the runner API (e.g., "http://localhost:8000")
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    /// Create a new runner client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Get the base URL of the runner
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    async fn handle_json<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        self.handle_json_fallback(response, UNKNOWN_ERROR).await
    }

    /// Like [`Self::handle_json`], with an operation-specific message used
    /// when the runner returns an error without a body.
    async fn handle_json_fallback<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
        fallback: &str,
    ) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::from_error_body(status.as_u16(), &body, fallback));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }

    /// Handle an API response whose success body is raw bytes (audio, video)
    async fn handle_bytes(&self, response: reqwest::Response, fallback: &str) -> Result<Vec<u8>> {
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::from_error_body(status.as_u16(), &body, fallback));
        }

        Ok(response.bytes().await?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = RunnerClient::new("http://localhost:8000");
        assert_eq!(client.base_url(), "http://localhost:8000");
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = RunnerClient::new("http://localhost:8000/");
        assert_eq!(client.base_url(), "http://localhost:8000");
    }

    #[test]
    fn test_client_with_custom_client() {
        let http_client = Client::new();
        let client = RunnerClient::with_client("http://localhost:8000", http_client);
        assert_eq!(client.base_url(), "http://localhost:8000");
    }
}
