//! Status poller
//!
//! Drives one job through its lifecycle by polling the status endpoint on a
//! fixed cadence until a terminal state is observed. Every failure is final
//! for that job: a transport error, a runner-reported error, or a timeout
//! each stop the poll with a terminal update. No retry, no backoff.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::time::{self, Duration, Instant};
use tracing::{debug, info, warn};

use crate::config::Config;
use reelcut_client::{Result as ClientResult, RunnerClient};
use reelcut_core::domain::job::{JobStatus, JobUpdate};
use reelcut_core::dto::StatusResponse;

/// Shown when the runner reports `error` without a message.
pub const GENERIC_JOB_ERROR: &str = "Unknown error";

/// Anything the poller can read a job status from.
///
/// The seam exists so the poll state machine is testable against a scripted
/// sequence of responses.
#[async_trait]
pub trait StatusSource: Send + Sync {
    async fn job_status(&self, job_id: &str) -> ClientResult<StatusResponse>;
}

#[async_trait]
impl StatusSource for RunnerClient {
    async fn job_status(&self, job_id: &str) -> ClientResult<StatusResponse> {
        RunnerClient::job_status(self, job_id).await
    }
}

/// Watches at most one job at a time.
///
/// Starting a new watch aborts the previous polling task, so at most one
/// poll timer ever exists per watcher; a job that was being watched before a
/// restart never delivers a late terminal update.
pub struct JobWatcher {
    source: Arc<dyn StatusSource>,
    poll_interval: Duration,
    max_poll_duration: Option<Duration>,
    active: Option<tokio::task::JoinHandle<()>>,
}

impl JobWatcher {
    /// Creates a watcher polling `source` with the configured cadence
    pub fn new(source: Arc<dyn StatusSource>, config: &Config) -> Self {
        Self {
            source,
            poll_interval: config.poll_interval,
            max_poll_duration: config.max_poll_duration,
            active: None,
        }
    }

    /// Starts polling `job_id`, cancelling any previous watch
    ///
    /// # Returns
    /// A receiver of [`JobUpdate`]s. The channel closes after the terminal
    /// update, or without one if the watch is cancelled.
    pub fn watch(&mut self, job_id: impl Into<String>) -> mpsc::UnboundedReceiver<JobUpdate> {
        self.cancel();

        let job_id = job_id.into();
        info!("Watching job {}", job_id);

        let (tx, rx) = mpsc::unbounded_channel();
        let source = Arc::clone(&self.source);
        let poll_interval = self.poll_interval;
        let max_poll_duration = self.max_poll_duration;

        self.active = Some(tokio::spawn(async move {
            poll_until_terminal(source, job_id, poll_interval, max_poll_duration, tx).await;
        }));

        rx
    }

    /// Aborts the active polling task, if any
    pub fn cancel(&mut self) {
        if let Some(handle) = self.active.take() {
            handle.abort();
        }
    }

    /// Whether a polling task is currently running
    pub fn is_watching(&self) -> bool {
        self.active.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for JobWatcher {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// The poll loop proper: one status request per tick until terminal.
async fn poll_until_terminal(
    source: Arc<dyn StatusSource>,
    job_id: String,
    poll_interval: Duration,
    max_poll_duration: Option<Duration>,
    tx: mpsc::UnboundedSender<JobUpdate>,
) {
    let deadline = max_poll_duration.map(|d| Instant::now() + d);
    let mut ticker = time::interval(poll_interval);

    loop {
        ticker.tick().await;

        if let Some(deadline) = deadline {
            if Instant::now() >= deadline {
                warn!("Polling for job {} timed out", job_id);
                let _ = tx.send(JobUpdate::Failed {
                    message: "Polling timed out before the job finished.".to_string(),
                });
                return;
            }
        }

        debug!("Polling status for job {}", job_id);

        match source.job_status(&job_id).await {
            Ok(status) => {
                let progress = status.progress.unwrap_or(0);
                match status.status {
                    JobStatus::Done => {
                        let download_path = status
                            .output_url
                            .unwrap_or_else(|| format!("/download/{}", job_id));
                        info!("Job {} done, artifact at {}", job_id, download_path);
                        let _ = tx.send(JobUpdate::Done { download_path });
                        return;
                    }
                    JobStatus::Error => {
                        let message = status
                            .error
                            .unwrap_or_else(|| GENERIC_JOB_ERROR.to_string());
                        warn!("Job {} failed: {}", job_id, message);
                        let _ = tx.send(JobUpdate::Failed { message });
                        return;
                    }
                    active => {
                        let _ = tx.send(JobUpdate::Progress {
                            status: active.normalized(),
                            progress,
                            received_at: chrono::Utc::now(),
                        });
                    }
                }
            }
            Err(e) => {
                // Hard transport failure ends the watch; the user restarts.
                warn!("Poll for job {} failed: {}", job_id, e);
                let _ = tx.send(JobUpdate::Failed {
                    message: e.to_string(),
                });
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelcut_client::ClientError;
    use std::collections::HashMap;
    use std::sync::Mutex;

    enum ScriptStep {
        Ok(StatusResponse),
        TransportError(String),
    }

    /// Scripted status source: pops one step per poll and keeps repeating the
    /// last one, so non-terminal scripts poll forever.
    struct ScriptedSource {
        scripts: Mutex<HashMap<String, Vec<ScriptStep>>>,
    }

    impl ScriptedSource {
        fn new() -> Self {
            Self {
                scripts: Mutex::new(HashMap::new()),
            }
        }

        fn with_job(self, job_id: &str, steps: Vec<ScriptStep>) -> Self {
            assert!(!steps.is_empty());
            self.scripts.lock().unwrap().insert(job_id.to_string(), steps);
            self
        }
    }

    #[async_trait]
    impl StatusSource for ScriptedSource {
        async fn job_status(&self, job_id: &str) -> ClientResult<StatusResponse> {
            let mut scripts = self.scripts.lock().unwrap();
            let steps = scripts.get_mut(job_id).expect("unscripted job id");
            let step = if steps.len() > 1 {
                steps.remove(0)
            } else {
                match &steps[0] {
                    ScriptStep::Ok(status) => ScriptStep::Ok(status.clone()),
                    ScriptStep::TransportError(msg) => ScriptStep::TransportError(msg.clone()),
                }
            };
            match step {
                ScriptStep::Ok(status) => Ok(status),
                ScriptStep::TransportError(msg) => Err(ClientError::ParseError(msg)),
            }
        }
    }

    fn progress(status: JobStatus, progress: u8) -> ScriptStep {
        ScriptStep::Ok(StatusResponse {
            status,
            progress: Some(progress),
            error: None,
            output_url: None,
        })
    }

    fn fast_config() -> Config {
        let mut config = Config::default();
        config.poll_interval = Duration::from_millis(5);
        config
    }

    async fn drain(mut rx: mpsc::UnboundedReceiver<JobUpdate>) -> Vec<JobUpdate> {
        let mut updates = Vec::new();
        while let Ok(Some(update)) = time::timeout(Duration::from_secs(2), rx.recv()).await {
            updates.push(update);
        }
        updates
    }

    #[tokio::test]
    async fn test_progress_tracks_runner_and_stops_at_done() {
        let source = ScriptedSource::new().with_job(
            "job-1",
            vec![
                progress(JobStatus::Queued, 0),
                progress(JobStatus::Analyzing, 30),
                progress(JobStatus::Rendering, 70),
                ScriptStep::Ok(StatusResponse {
                    status: JobStatus::Done,
                    progress: Some(100),
                    error: None,
                    output_url: Some("/download/job-1".to_string()),
                }),
            ],
        );
        let mut watcher = JobWatcher::new(Arc::new(source), &fast_config());

        let updates = drain(watcher.watch("job-1")).await;

        assert_eq!(updates.len(), 4);
        let seen: Vec<(JobStatus, u8)> = updates[..3]
            .iter()
            .map(|u| match u {
                JobUpdate::Progress { status, progress, .. } => (*status, *progress),
                other => panic!("unexpected terminal before done: {other:?}"),
            })
            .collect();
        assert_eq!(
            seen,
            vec![
                (JobStatus::Queued, 0),
                (JobStatus::Analyzing, 30),
                (JobStatus::Rendering, 70),
            ]
        );
        match &updates[3] {
            JobUpdate::Done { download_path } => assert_eq!(download_path, "/download/job-1"),
            other => panic!("expected done, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_progress_displays_as_zero() {
        let source = ScriptedSource::new().with_job(
            "job-2",
            vec![
                ScriptStep::Ok(StatusResponse {
                    status: JobStatus::Queued,
                    progress: None,
                    error: None,
                    output_url: None,
                }),
                ScriptStep::Ok(StatusResponse {
                    status: JobStatus::Done,
                    progress: None,
                    error: None,
                    output_url: None,
                }),
            ],
        );
        let mut watcher = JobWatcher::new(Arc::new(source), &fast_config());

        let updates = drain(watcher.watch("job-2")).await;

        match &updates[0] {
            JobUpdate::Progress { progress, .. } => assert_eq!(*progress, 0),
            other => panic!("expected progress, got {other:?}"),
        }
        // Done without output_url falls back to the conventional path.
        match &updates[1] {
            JobUpdate::Done { download_path } => assert_eq!(download_path, "/download/job-2"),
            other => panic!("expected done, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_error_status_surfaces_runner_message() {
        let source = ScriptedSource::new().with_job(
            "job-3",
            vec![ScriptStep::Ok(StatusResponse {
                status: JobStatus::Error,
                progress: Some(100),
                error: Some("disk full".to_string()),
                output_url: None,
            })],
        );
        let mut watcher = JobWatcher::new(Arc::new(source), &fast_config());

        let updates = drain(watcher.watch("job-3")).await;

        assert_eq!(updates.len(), 1);
        match &updates[0] {
            JobUpdate::Failed { message } => assert_eq!(message, "disk full"),
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_error_status_without_message_uses_generic_fallback() {
        let source = ScriptedSource::new().with_job(
            "job-4",
            vec![ScriptStep::Ok(StatusResponse {
                status: JobStatus::Error,
                progress: None,
                error: None,
                output_url: None,
            })],
        );
        let mut watcher = JobWatcher::new(Arc::new(source), &fast_config());

        let updates = drain(watcher.watch("job-4")).await;

        match &updates[0] {
            JobUpdate::Failed { message } => assert_eq!(message, GENERIC_JOB_ERROR),
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_transport_failure_ends_the_watch() {
        let source = ScriptedSource::new().with_job(
            "job-5",
            vec![
                progress(JobStatus::Queued, 0),
                ScriptStep::TransportError("connection reset".to_string()),
            ],
        );
        let mut watcher = JobWatcher::new(Arc::new(source), &fast_config());

        let updates = drain(watcher.watch("job-5")).await;

        assert_eq!(updates.len(), 2);
        match &updates[1] {
            JobUpdate::Failed { message } => assert!(message.contains("connection reset")),
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unrecognized_status_displays_as_initial_state() {
        let source = ScriptedSource::new().with_job(
            "job-6",
            vec![
                progress(JobStatus::Unknown, 15),
                ScriptStep::Ok(StatusResponse {
                    status: JobStatus::Done,
                    progress: Some(100),
                    error: None,
                    output_url: None,
                }),
            ],
        );
        let mut watcher = JobWatcher::new(Arc::new(source), &fast_config());

        let updates = drain(watcher.watch("job-6")).await;

        match &updates[0] {
            JobUpdate::Progress { status, progress, .. } => {
                assert_eq!(*status, JobStatus::Queued);
                assert_eq!(*progress, 15);
            }
            other => panic!("expected progress, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_second_watch_cancels_first() {
        let source = ScriptedSource::new()
            .with_job("stuck", vec![progress(JobStatus::Rendering, 50)])
            .with_job(
                "fresh",
                vec![ScriptStep::Ok(StatusResponse {
                    status: JobStatus::Done,
                    progress: Some(100),
                    error: None,
                    output_url: None,
                })],
            );
        let mut watcher = JobWatcher::new(Arc::new(source), &fast_config());

        let rx_first = watcher.watch("stuck");
        time::sleep(Duration::from_millis(20)).await;
        assert!(watcher.is_watching());

        let rx_second = watcher.watch("fresh");

        let first_updates = drain(rx_first).await;
        assert!(
            first_updates.iter().all(|u| !u.is_terminal()),
            "cancelled watch must not deliver a terminal update"
        );

        let second_updates = drain(rx_second).await;
        let terminal: Vec<_> = second_updates.iter().filter(|u| u.is_terminal()).collect();
        assert_eq!(terminal.len(), 1);
        assert!(matches!(terminal[0], JobUpdate::Done { .. }));
    }

    #[tokio::test]
    async fn test_cancel_stops_polling_without_terminal_update() {
        let source =
            ScriptedSource::new().with_job("stuck", vec![progress(JobStatus::Planning, 60)]);
        let mut watcher = JobWatcher::new(Arc::new(source), &fast_config());

        let rx = watcher.watch("stuck");
        time::sleep(Duration::from_millis(20)).await;
        watcher.cancel();
        assert!(!watcher.is_watching());

        let updates = drain(rx).await;
        assert!(updates.iter().all(|u| !u.is_terminal()));
    }

    #[tokio::test]
    async fn test_max_poll_duration_surfaces_timeout() {
        let source =
            ScriptedSource::new().with_job("stuck", vec![progress(JobStatus::Rendering, 80)]);
        let mut config = fast_config();
        config.max_poll_duration = Some(Duration::from_millis(30));
        let mut watcher = JobWatcher::new(Arc::new(source), &config);

        let updates = drain(watcher.watch("stuck")).await;

        match updates.last() {
            Some(JobUpdate::Failed { message }) => assert!(message.contains("timed out")),
            other => panic!("expected timeout failure, got {other:?}"),
        }
    }
}
