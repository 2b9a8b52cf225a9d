//! Job command handlers
//!
//! Status reads, watching a job to completion, and artifact download.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use colored::*;
use tokio::sync::mpsc;

use reelcut_client::RunnerClient;
use reelcut_core::domain::job::{JobStatus, JobUpdate};
use reelcut_session::{Config, JobWatcher};

/// Show the current status of a job
pub async fn handle_status(job_id: &str, config: &Config) -> Result<()> {
    let client = RunnerClient::new(&config.runner_url);
    let status = client.job_status(job_id).await?;

    println!("{}", "Job Status:".bold());
    println!("  ID:       {}", job_id.cyan());
    println!("  Status:   {}", colorize_status(status.status));
    println!("  Progress: {}%", status.progress.unwrap_or(0));
    if let Some(error) = &status.error {
        println!("  Error:    {}", error.red());
    }
    if let Some(output_url) = &status.output_url {
        println!("  Download: {}", output_url.green());
    }

    Ok(())
}

/// Poll a job until terminal, optionally downloading the artifact
pub async fn handle_watch(job_id: &str, output: Option<PathBuf>, config: &Config) -> Result<()> {
    let client = Arc::new(RunnerClient::new(&config.runner_url));
    let mut watcher = JobWatcher::new(client.clone(), config);

    let rx = watcher.watch(job_id);
    let download_path = stream_updates(rx).await;

    if download_path.is_some() {
        if let Some(output) = output {
            download_to(&client, job_id, &output).await?;
        }
    }

    Ok(())
}

/// Download the rendered clip of a finished job
pub async fn handle_download(job_id: &str, output: &Path, config: &Config) -> Result<()> {
    let client = RunnerClient::new(&config.runner_url);
    download_to(&client, job_id, output).await
}

/// Pre-flight a source URL without creating a job
pub async fn handle_analyze_url(url: &str, config: &Config) -> Result<()> {
    let client = RunnerClient::new(&config.runner_url);
    let metadata = client.analyze_url(url).await?;

    println!("{}", "URL Analysis:".bold());
    println!("  URL:          {}", metadata.url.cyan());
    println!("  Content-Type: {}", metadata.content_type);
    match metadata.content_length {
        Some(length) => println!("  Size:         {} bytes", length),
        None => println!("  Size:         {}", "unknown".dimmed()),
    }

    Ok(())
}

/// Print poll updates until the channel closes; returns the download path on
/// success, None on failure or cancellation.
pub async fn stream_updates(mut rx: mpsc::UnboundedReceiver<JobUpdate>) -> Option<String> {
    while let Some(update) = rx.recv().await {
        match update {
            JobUpdate::Progress {
                status, progress, ..
            } => {
                println!(
                    "  {} {:>3}%  {}",
                    "▸".cyan(),
                    progress,
                    colorize_status(status)
                );
            }
            JobUpdate::Done { download_path } => {
                println!("{} {}", "✓".green(), "Render complete".bold());
                return Some(download_path);
            }
            JobUpdate::Failed { message } => {
                println!("{} {}", "✗".red(), message.red());
                return None;
            }
        }
    }
    None
}

async fn download_to(client: &RunnerClient, job_id: &str, output: &Path) -> Result<()> {
    let bytes = client.download(job_id).await?;
    tokio::fs::write(output, &bytes)
        .await
        .with_context(|| format!("Failed to write {}", output.display()))?;
    println!(
        "{} Saved {} bytes to {}",
        "✓".green(),
        bytes.len(),
        output.display().to_string().cyan()
    );
    Ok(())
}

/// Colorize a job status for display
fn colorize_status(status: JobStatus) -> colored::ColoredString {
    let label = status.label();
    match status.normalized() {
        JobStatus::Queued => label.yellow(),
        JobStatus::FetchingUrl | JobStatus::Downloading => label.cyan(),
        JobStatus::Analyzing | JobStatus::Planning => label.cyan(),
        JobStatus::Rendering => label.blue(),
        JobStatus::Done => label.green(),
        JobStatus::Error => label.red(),
        JobStatus::Unknown => label.dimmed(),
    }
}
