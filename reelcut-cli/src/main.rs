//! Reelcut CLI
//!
//! Command-line interface for the Reelcut render runner: submit a source
//! video (file or URL), watch the job to completion, download the rendered
//! clip, and drive the audio-generation endpoints.

mod commands;

use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use commands::{Commands, handle_command};
use reelcut_session::Config;

#[derive(Parser)]
#[command(name = "reelcut")]
#[command(about = "Reelcut vertical-video render CLI", long_about = None)]
struct Cli {
    /// Runner URL
    #[arg(long, env = "RUNNER_URL", default_value = "http://localhost:8000")]
    runner_url: String,

    /// Poll interval in milliseconds while watching a job
    #[arg(long, env = "POLL_INTERVAL_MS", default_value_t = 1200)]
    poll_interval_ms: u64,

    /// Stop watching a job after this many seconds
    #[arg(long, env = "MAX_POLL_SECS")]
    max_poll_secs: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reelcut_client=info,reelcut_session=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let mut config = Config::new(cli.runner_url);
    config.poll_interval = Duration::from_millis(cli.poll_interval_ms);
    config.max_poll_duration = cli.max_poll_secs.map(Duration::from_secs);
    config.validate()?;

    handle_command(cli.command, &config).await
}
