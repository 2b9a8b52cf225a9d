//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod audio;
mod job;
mod submit;

pub use audio::AudioCommands;
pub use submit::SubmitArgs;

use std::path::PathBuf;

use anyhow::Result;
use clap::Subcommand;

use reelcut_session::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Submit a render job from a file or URL
    Submit(SubmitArgs),
    /// Show the current status of a job
    Status {
        /// Job id returned at submission
        job_id: String,
    },
    /// Poll a job until it finishes
    Watch {
        /// Job id returned at submission
        job_id: String,

        /// Download the rendered clip here once done
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Download the rendered clip of a finished job
    Download {
        /// Job id returned at submission
        job_id: String,

        /// Destination path
        output: PathBuf,
    },
    /// Pre-flight a source URL without creating a job
    AnalyzeUrl {
        /// Video URL to inspect
        url: String,
    },
    /// Audio generation (TTS, STS, STT, SFX, isolation, music, voices)
    Audio {
        #[command(subcommand)]
        command: AudioCommands,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Submit(args) => submit::handle_submit(args, config).await,
        Commands::Status { job_id } => job::handle_status(&job_id, config).await,
        Commands::Watch { job_id, output } => job::handle_watch(&job_id, output, config).await,
        Commands::Download { job_id, output } => {
            job::handle_download(&job_id, &output, config).await
        }
        Commands::AnalyzeUrl { url } => job::handle_analyze_url(&url, config).await,
        Commands::Audio { command } => audio::handle_audio_command(command, config).await,
    }
}
