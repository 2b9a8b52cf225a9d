//! Client session state
//!
//! The single mutable state object of the client side: which source is
//! active, which job is tracked, and any generated audio waiting to be
//! attached. One writer, no locking; every exit path goes through
//! [`Session::reset`], which drops held buffers and cancels any active poll
//! so a later submission can never reuse stale state.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::config::Config;
use crate::poller::JobWatcher;
use reelcut_client::{ClientError, FilePayload, JobAttachments, Result, RunnerClient};
use reelcut_core::domain::job::JobUpdate;
use reelcut_core::domain::options::RenderOptions;
use reelcut_core::dto::TtsRequest;

/// The content source of the next submission; exactly one may be active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobSource {
    File(PathBuf),
    Url(String),
}

/// Client-side session driving one job at a time.
pub struct Session {
    client: Arc<RunnerClient>,
    watcher: JobWatcher,
    source: Option<JobSource>,
    job_id: Option<String>,
    voiceover: Option<FilePayload>,
    music: Option<FilePayload>,
}

impl Session {
    pub fn new(config: &Config) -> Self {
        let client = Arc::new(RunnerClient::new(config.runner_url.clone()));
        let watcher = JobWatcher::new(client.clone(), config);
        Self {
            client,
            watcher,
            source: None,
            job_id: None,
            voiceover: None,
            music: None,
        }
    }

    /// The underlying runner client, for one-off calls outside the session flow.
    pub fn client(&self) -> &RunnerClient {
        &self.client
    }

    pub fn source(&self) -> Option<&JobSource> {
        self.source.as_ref()
    }

    pub fn job_id(&self) -> Option<&str> {
        self.job_id.as_deref()
    }

    pub fn has_voiceover(&self) -> bool {
        self.voiceover.is_some()
    }

    /// Selects a local file as the source, starting a fresh flow.
    ///
    /// Any tracked job belongs to the previous flow: the watch is cancelled
    /// and the job id cleared.
    pub fn set_file_source(&mut self, path: PathBuf) {
        self.watcher.cancel();
        self.job_id = None;
        self.source = Some(JobSource::File(path));
    }

    /// Selects a remote URL as the source, starting a fresh flow.
    pub fn set_url_source(&mut self, url: impl Into<String>) {
        self.watcher.cancel();
        self.job_id = None;
        self.source = Some(JobSource::Url(url.into()));
    }

    /// Keeps a background-music clip to ride along with the next file submission.
    pub fn set_music(&mut self, clip: FilePayload) {
        self.music = Some(clip);
    }

    /// Generates a voice-over via TTS and holds it for the next submission.
    ///
    /// The runner applies the requested speed before returning, so the held
    /// clip is already time-adjusted; submission will flag it `pre_sped`.
    pub async fn generate_voiceover(&mut self, request: &TtsRequest) -> Result<usize> {
        let bytes = self.client.text_to_speech(request).await?;
        let size = bytes.len();
        debug!("Holding generated voice-over ({} bytes)", size);
        self.voiceover = Some(FilePayload::new("voiceover.mp3", bytes));
        Ok(size)
    }

    /// Submits a job from the active source and tracks the returned id.
    ///
    /// A held voice-over clip is only valid for file submissions: the clip
    /// rides the multipart form, the textual voice-over fields are
    /// suppressed, and the speed reset to neutral. Submitting a URL source
    /// with a held clip fails validation before any request.
    pub async fn submit(&mut self, options: &RenderOptions) -> Result<String> {
        let source = self
            .source
            .clone()
            .ok_or_else(|| ClientError::InvalidRequest("No source selected.".to_string()))?;

        let job_id = match source {
            JobSource::File(path) => {
                let (options, attachments) = self.prepare_file_submission(options);
                let file = FilePayload::read(&path).await.map_err(|e| {
                    ClientError::InvalidRequest(format!("Cannot read {}: {}", path.display(), e))
                })?;
                self.client.start_job(&options, file, attachments).await?
            }
            JobSource::Url(url) => {
                if self.voiceover.is_some() {
                    return Err(ClientError::InvalidRequest(
                        "A generated voice-over can only be attached to a file upload."
                            .to_string(),
                    ));
                }
                let mut options = options.clone();
                options.clamp_ranges();
                self.client.start_job_from_url(&options, &url).await?
            }
        };

        info!("Session tracking job {}", job_id);
        self.job_id = Some(job_id.clone());
        Ok(job_id)
    }

    /// Builds the effective options and attachments for a file submission.
    fn prepare_file_submission(&self, options: &RenderOptions) -> (RenderOptions, JobAttachments) {
        let mut options = options.clone();
        options.clamp_ranges();

        let mut attachments = JobAttachments {
            voiceover: None,
            music: self.music.clone(),
        };
        if let Some(clip) = &self.voiceover {
            options.mark_voiceover_pre_sped();
            attachments.voiceover = Some(clip.clone());
        }
        (options, attachments)
    }

    /// Starts polling the tracked job, cancelling any previous watch.
    pub fn watch(&mut self) -> Result<mpsc::UnboundedReceiver<JobUpdate>> {
        let job_id = self
            .job_id
            .clone()
            .ok_or_else(|| ClientError::InvalidRequest("No job submitted.".to_string()))?;
        Ok(self.watcher.watch(job_id))
    }

    /// Returns the session to its initial values.
    ///
    /// Cancels any active poll and drops the tracked job id, source, and any
    /// held audio buffers. Called on every exit path.
    pub fn reset(&mut self) {
        debug!("Resetting session");
        self.watcher.cancel();
        self.job_id = None;
        self.source = None;
        self.voiceover = None;
        self.music = None;
    }
}
