//! Audio command handlers
//!
//! Stateless audio generation against the runner's provider proxy. Each
//! command is one request/response; binary results are written to disk,
//! structured results printed as JSON.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::*;

use reelcut_client::{FilePayload, RunnerClient};
use reelcut_core::dto::TtsRequest;
use reelcut_session::Config;

/// Audio subcommands
#[derive(Subcommand)]
pub enum AudioCommands {
    /// Synthesize speech from text
    Tts {
        /// Text to speak
        text: String,

        /// Voice id (runner default when omitted)
        #[arg(long)]
        voice_id: Option<String>,

        /// Playback speed (0.5-2.0)
        #[arg(long, default_value_t = 1.0)]
        speed: f32,

        /// Output file
        #[arg(short, long, default_value = "tts.mp3")]
        output: PathBuf,
    },
    /// Re-voice an audio clip
    Sts {
        /// Source audio file
        audio: PathBuf,

        /// Voice id (runner default when omitted)
        #[arg(long)]
        voice_id: Option<String>,

        /// Output file
        #[arg(short, long, default_value = "sts.mp3")]
        output: PathBuf,
    },
    /// Transcribe an audio clip
    Stt {
        /// Source audio file
        audio: PathBuf,

        /// Language hint (e.g. EN, FR)
        #[arg(long)]
        language: Option<String>,
    },
    /// Generate a sound effect from a prompt
    Sfx {
        /// Effect description
        prompt: String,

        /// Duration in seconds
        #[arg(long, default_value_t = 2.5)]
        duration: f32,

        /// Output file
        #[arg(short, long, default_value = "sfx.mp3")]
        output: PathBuf,
    },
    /// Isolate speech from background noise
    Isolate {
        /// Source audio file
        audio: PathBuf,

        /// Output file
        #[arg(short, long, default_value = "isolated.mp3")]
        output: PathBuf,
    },
    /// Generate a music bed from a prompt
    Music {
        /// Music description
        prompt: String,

        /// Duration in seconds
        #[arg(long, default_value_t = 10.0)]
        duration: f32,

        /// Output file
        #[arg(short, long, default_value = "music.mp3")]
        output: PathBuf,
    },
    /// Create a designed voice from a description
    Voice {
        /// Voice name
        name: String,

        /// Voice description
        description: String,
    },
    /// List available voices
    Voices,
    /// Show which audio capabilities the runner has enabled
    Capabilities,
}

/// Handle audio commands
pub async fn handle_audio_command(command: AudioCommands, config: &Config) -> Result<()> {
    let client = RunnerClient::new(&config.runner_url);

    match command {
        AudioCommands::Tts {
            text,
            voice_id,
            speed,
            output,
        } => {
            let mut request = TtsRequest::new(text);
            request.voice_id = voice_id;
            request.speed = speed;
            let bytes = client.text_to_speech(&request).await?;
            write_audio(&output, &bytes).await
        }
        AudioCommands::Sts {
            audio,
            voice_id,
            output,
        } => {
            let clip = read_audio(&audio).await?;
            let bytes = client.speech_to_speech(clip, voice_id.as_deref()).await?;
            write_audio(&output, &bytes).await
        }
        AudioCommands::Stt { audio, language } => {
            let clip = read_audio(&audio).await?;
            let transcript = client.speech_to_text(clip, language.as_deref()).await?;
            println!("{}", serde_json::to_string_pretty(&transcript)?);
            Ok(())
        }
        AudioCommands::Sfx {
            prompt,
            duration,
            output,
        } => {
            let bytes = client.sound_effect(&prompt, duration).await?;
            write_audio(&output, &bytes).await
        }
        AudioCommands::Isolate { audio, output } => {
            let clip = read_audio(&audio).await?;
            let bytes = client.isolate_audio(clip).await?;
            write_audio(&output, &bytes).await
        }
        AudioCommands::Music {
            prompt,
            duration,
            output,
        } => {
            let bytes = client.generate_music(&prompt, duration).await?;
            write_audio(&output, &bytes).await
        }
        AudioCommands::Voice { name, description } => {
            let descriptor = client.create_voice(&name, &description).await?;
            println!("{}", serde_json::to_string_pretty(&descriptor)?);
            Ok(())
        }
        AudioCommands::Voices => {
            let voices = client.list_voices().await?;
            println!("{}", serde_json::to_string_pretty(&voices)?);
            Ok(())
        }
        AudioCommands::Capabilities => {
            let caps = client.audio_capabilities().await?;
            let state = if caps.enabled {
                "enabled".green()
            } else {
                "disabled".red()
            };
            println!("{} Audio provider {}", "▸".cyan(), state);
            let mut names: Vec<_> = caps.capabilities.iter().collect();
            names.sort_by_key(|(name, _)| name.as_str());
            for (name, available) in names {
                let mark = if *available { "✓".green() } else { "✗".red() };
                println!("  {} {}", mark, name);
            }
            Ok(())
        }
    }
}

async fn read_audio(path: &Path) -> Result<FilePayload> {
    FilePayload::read(path)
        .await
        .with_context(|| format!("Failed to read audio file {}", path.display()))
}

async fn write_audio(path: &Path, bytes: &[u8]) -> Result<()> {
    tokio::fs::write(path, bytes)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!(
        "{} Saved {} bytes to {}",
        "✓".green(),
        bytes.len(),
        path.display().to_string().cyan()
    );
    Ok(())
}
