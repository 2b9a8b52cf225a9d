//! Job lifecycle endpoints
//!
//! A submission carries exactly one content source: an uploaded file
//! (multipart `/start`) or a remote URL (JSON `/start_from_url`). The two
//! paths are mutually exclusive; which one runs is decided solely by which
//! method the caller picks.

use std::path::Path;

use reqwest::multipart::{Form, Part};
use tracing::{debug, info};

use crate::error::{ClientError, Result};
use crate::RunnerClient;
use reelcut_core::domain::options::RenderOptions;
use reelcut_core::dto::{StartResponse, StatusResponse, UrlMetadata};

/// An in-memory file destined for a multipart part.
#[derive(Debug, Clone)]
pub struct FilePayload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl FilePayload {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
        }
    }

    /// Reads a payload from disk, keeping only the file name for the part.
    pub async fn read(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload.bin".to_string());
        let bytes = tokio::fs::read(path).await?;
        Ok(Self { filename, bytes })
    }

    fn into_part(self) -> Part {
        Part::bytes(self.bytes).file_name(self.filename)
    }
}

/// Optional auxiliary media sent alongside a file submission.
///
/// A pre-generated voice-over clip or a background-music file produced in the
/// audio workflow; both ride the same multipart form as the main upload.
#[derive(Debug, Clone, Default)]
pub struct JobAttachments {
    pub voiceover: Option<FilePayload>,
    pub music: Option<FilePayload>,
}

impl RunnerClient {
    // =============================================================================
    // Job Submission
    // =============================================================================

    /// Submit a job from an uploaded file via multipart `POST /start`
    ///
    /// # Arguments
    /// * `options` - The render option set (validated locally first)
    /// * `file` - The source video payload
    /// * `attachments` - Optional voice-over / music attachments
    ///
    /// # Returns
    /// The runner-assigned job id
    pub async fn start_job(
        &self,
        options: &RenderOptions,
        file: FilePayload,
        attachments: JobAttachments,
    ) -> Result<String> {
        options.validate().map_err(ClientError::InvalidRequest)?;

        debug!("Submitting file job: {}", file.filename);

        let mut form = Form::new();
        for (name, value) in options.form_fields() {
            form = form.text(name, value);
        }
        form = form.part("file", file.into_part());
        if let Some(voiceover) = attachments.voiceover {
            form = form.part("voiceover_file", voiceover.into_part());
        }
        if let Some(music) = attachments.music {
            form = form.part("music_file", music.into_part());
        }

        let url = format!("{}/start", self.base_url());
        let response = self.client.post(&url).multipart(form).send().await?;

        let started: StartResponse = self.handle_json(response).await?;
        info!("Job submitted: {}", started.job_id);
        Ok(started.job_id)
    }

    /// Submit a job from a remote URL via JSON `POST /start_from_url`
    ///
    /// # Arguments
    /// * `options` - The render option set (validated locally first)
    /// * `source_url` - The video URL the runner should fetch
    ///
    /// # Returns
    /// The runner-assigned job id
    pub async fn start_job_from_url(
        &self,
        options: &RenderOptions,
        source_url: &str,
    ) -> Result<String> {
        if source_url.trim().is_empty() {
            return Err(ClientError::InvalidRequest("URL is required.".to_string()));
        }
        options.validate().map_err(ClientError::InvalidRequest)?;

        let mut body = serde_json::to_value(options)
            .map_err(|e| ClientError::ParseError(format!("Failed to encode options: {}", e)))?;
        body["url"] = serde_json::Value::String(source_url.to_string());

        let url = format!("{}/start_from_url", self.base_url());
        let response = self.client.post(&url).json(&body).send().await?;

        let started: StartResponse = self.handle_json(response).await?;
        info!("URL job submitted: {}", started.job_id);
        Ok(started.job_id)
    }

    /// Pre-flight a URL via `POST /analyze_url` without creating a job
    pub async fn analyze_url(&self, source_url: &str) -> Result<UrlMetadata> {
        if source_url.trim().is_empty() {
            return Err(ClientError::InvalidRequest("URL is required.".to_string()));
        }

        let url = format!("{}/analyze_url", self.base_url());
        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "url": source_url }))
            .send()
            .await?;

        self.handle_json(response).await
    }

    // =============================================================================
    // Job Status and Artifact
    // =============================================================================

    /// Read the current status of a job via `GET /status/{job_id}`
    pub async fn job_status(&self, job_id: &str) -> Result<StatusResponse> {
        let url = format!("{}/status/{}", self.base_url(), job_id);
        let response = self.client.get(&url).send().await?;

        self.handle_json(response).await
    }

    /// Fetch the rendered artifact via `GET /download/{job_id}`
    ///
    /// Valid only once the job reports `done`; the runner rejects earlier
    /// calls with an error detail.
    pub async fn download(&self, job_id: &str) -> Result<Vec<u8>> {
        let url = format!("{}/download/{}", self.base_url(), job_id);
        let response = self.client.get(&url).send().await?;

        self.handle_bytes(response, crate::UNKNOWN_ERROR).await
    }
}
