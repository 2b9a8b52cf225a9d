//! Session configuration
//!
//! Defines the configurable parameters for driving a job: runner connection
//! and polling cadence.

use std::time::Duration;

/// Default polling cadence between status requests.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1200);

/// Session configuration
///
/// The poll interval is configurable for tuning against slow runners; the
/// optional maximum poll duration bounds how long a job is watched before a
/// timeout failure is surfaced (unbounded when unset, which matches the
/// runner's own behavior of never expiring jobs).
#[derive(Debug, Clone)]
pub struct Config {
    /// Runner base URL (e.g., "http://localhost:8000")
    pub runner_url: String,

    /// How often to poll the status endpoint for the tracked job
    pub poll_interval: Duration,

    /// Upper bound on total polling time for one job, if any
    pub max_poll_duration: Option<Duration>,
}

impl Config {
    /// Creates a new configuration with default polling settings
    pub fn new(runner_url: impl Into<String>) -> Self {
        Self {
            runner_url: runner_url.into(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_poll_duration: None,
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - RUNNER_URL (optional, default: http://localhost:8000)
    /// - POLL_INTERVAL_MS (optional, milliseconds, default: 1200)
    /// - MAX_POLL_SECS (optional, seconds, default: unbounded)
    pub fn from_env() -> anyhow::Result<Self> {
        let runner_url =
            std::env::var("RUNNER_URL").unwrap_or_else(|_| "http://localhost:8000".to_string());

        let poll_interval = std::env::var("POLL_INTERVAL_MS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_POLL_INTERVAL);

        let max_poll_duration = std::env::var("MAX_POLL_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs);

        let config = Self {
            runner_url,
            poll_interval,
            max_poll_duration,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.runner_url.is_empty() {
            anyhow::bail!("runner_url cannot be empty");
        }

        if !self.runner_url.starts_with("http://") && !self.runner_url.starts_with("https://") {
            anyhow::bail!("runner_url must start with http:// or https://");
        }

        if self.poll_interval.is_zero() {
            anyhow::bail!("poll_interval must be greater than 0");
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new("http://localhost:8000")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.poll_interval, Duration::from_millis(1200));
        assert_eq!(config.max_poll_duration, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.runner_url = "not-a-url".to_string();
        assert!(config.validate().is_err());

        config.runner_url = "https://runner.example".to_string();
        assert!(config.validate().is_ok());

        config.poll_interval = Duration::ZERO;
        assert!(config.validate().is_err());
    }
}
