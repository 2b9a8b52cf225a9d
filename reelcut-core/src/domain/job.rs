//! Job domain types
//!
//! A job is the unit of work tracked by the runner: one source video in, one
//! rendered vertical clip out. The client only ever observes jobs through the
//! status endpoint, so the state set here mirrors what the runner reports.

use serde::{Deserialize, Serialize};

/// Lifecycle state of a render job as reported by the runner.
///
/// Unrecognized wire values deserialize to [`JobStatus::Unknown`] instead of
/// failing; callers display them as the initial state via [`JobStatus::normalized`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Queued,
    FetchingUrl,
    Downloading,
    Analyzing,
    Planning,
    Rendering,
    Done,
    Error,
    #[serde(other)]
    Unknown,
}

impl JobStatus {
    /// A terminal job is immutable; polling must stop once one is observed.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Done | JobStatus::Error)
    }

    /// Maps unrecognized statuses onto the initial display state.
    pub fn normalized(&self) -> JobStatus {
        match self {
            JobStatus::Unknown => JobStatus::Queued,
            other => *other,
        }
    }

    /// Human-readable label for status displays.
    pub fn label(&self) -> &'static str {
        match self.normalized() {
            JobStatus::Queued => "Queued",
            JobStatus::FetchingUrl => "Fetching URL",
            JobStatus::Downloading => "Downloading",
            JobStatus::Analyzing => "Analyzing",
            JobStatus::Planning => "Planning",
            JobStatus::Rendering => "Rendering",
            JobStatus::Done => "Done",
            JobStatus::Error => "Error",
            JobStatus::Unknown => unreachable!("normalized() never returns Unknown"),
        }
    }
}

/// Update emitted by the status poller, one per observed poll response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum JobUpdate {
    /// The job is still active; `progress` is the last value the runner
    /// reported (0 when absent).
    Progress {
        status: JobStatus,
        progress: u8,
        received_at: chrono::DateTime<chrono::Utc>,
    },
    /// Terminal success; the artifact can be fetched from `download_path`.
    Done { download_path: String },
    /// Terminal failure, either reported by the runner or raised by the
    /// transport. No retry follows.
    Failed { message: String },
}

impl JobUpdate {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobUpdate::Progress { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        let json = serde_json::to_string(&JobStatus::FetchingUrl).unwrap();
        assert_eq!(json, "\"fetching_url\"");
        let parsed: JobStatus = serde_json::from_str("\"rendering\"").unwrap();
        assert_eq!(parsed, JobStatus::Rendering);
    }

    #[test]
    fn test_unrecognized_status_is_unknown() {
        let parsed: JobStatus = serde_json::from_str("\"defragmenting\"").unwrap();
        assert_eq!(parsed, JobStatus::Unknown);
        assert_eq!(parsed.normalized(), JobStatus::Queued);
        assert_eq!(parsed.label(), "Queued");
    }

    #[test]
    fn test_terminal_states() {
        assert!(JobStatus::Done.is_terminal());
        assert!(JobStatus::Error.is_terminal());
        assert!(!JobStatus::Queued.is_terminal());
        assert!(!JobStatus::Rendering.is_terminal());
        assert!(!JobStatus::Unknown.is_terminal());
    }
}
