//! Submit command handler
//!
//! Collects the render options, selects the content source, and drives the
//! session through submission and (optionally) the watch/download flow.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Args;
use colored::*;

use crate::commands::job::stream_updates;
use reelcut_client::FilePayload;
use reelcut_core::domain::options::{
    CaptionPosition, CaptionSize, CaptionTemplate, CaptionsToggle, ContentPreset, CutIntensity,
    FilterPreset, Language, Platform, ReframeMode, RenderOptions, Resolution, Style,
    TransitionType, VoiceoverMode,
};
use reelcut_core::dto::TtsRequest;
use reelcut_session::{Config, Session};

/// Submit arguments; fields not exposed here keep the runner defaults.
#[derive(Args)]
pub struct SubmitArgs {
    /// Source video file
    #[arg(conflicts_with = "url", required_unless_present = "url")]
    pub file: Option<PathBuf>,

    /// Source video URL instead of a file
    #[arg(long)]
    pub url: Option<String>,

    /// Target platform (Shorts, TikTok, Reels)
    #[arg(long, default_value = "Shorts")]
    pub platform: Platform,

    /// Target duration in seconds (30-60)
    #[arg(long, default_value_t = 45)]
    pub duration: u32,

    /// Editing style (Energique, Pro, Storytelling, Tutorial)
    #[arg(long, default_value = "Storytelling")]
    pub style: Style,

    /// Cut intensity (Soft, Medium, Hard)
    #[arg(long, default_value = "Medium")]
    pub cut_intensity: CutIntensity,

    /// Spoken language (FR, EN)
    #[arg(long, default_value = "EN")]
    pub language: Language,

    /// Burn captions (ON, OFF)
    #[arg(long, default_value = "ON")]
    pub captions: CaptionsToggle,

    /// Working resolution (1080x1920, 720x1280)
    #[arg(long, default_value = "1080x1920")]
    pub resolution: Resolution,

    /// Output resolution (1080x1920, 720x1280)
    #[arg(long, default_value = "1080x1920")]
    pub output_resolution: Resolution,

    /// Content preset (auto, podcast, facecam, screen, vlog)
    #[arg(long, default_value = "auto")]
    pub content_preset: ContentPreset,

    /// Reframe mode (center, smart)
    #[arg(long, default_value = "center")]
    pub reframe_mode: ReframeMode,

    /// Output frame rate (24, 30, 60)
    #[arg(long, default_value_t = 30)]
    pub fps: u32,

    /// Color filter preset
    #[arg(long, default_value = "none")]
    pub filter_preset: FilterPreset,

    /// Caption template (tiktok_bold, minimal, creator, high_contrast)
    #[arg(long, default_value = "tiktok_bold")]
    pub caption_template: CaptionTemplate,

    /// Caption position (bottom, center, top)
    #[arg(long, default_value = "bottom")]
    pub caption_position: CaptionPosition,

    /// Caption size (sm, md, lg)
    #[arg(long, default_value = "md")]
    pub caption_size: CaptionSize,

    /// Transition between cuts (auto, none, fade, crossfade, dip_black, swipe)
    #[arg(long, default_value = "none")]
    pub transition: TransitionType,

    /// Transition duration in seconds
    #[arg(long, default_value_t = 0.3)]
    pub transition_duration: f32,

    /// Isolate speech from background noise before editing
    #[arg(long)]
    pub audio_isolation: bool,

    /// Generate sound effects from the edit plan
    #[arg(long)]
    pub sfx: bool,

    /// Build captions from a speech-to-text pass
    #[arg(long)]
    pub stt_captions: bool,

    /// Enable AI visual overlays
    #[arg(long)]
    pub ai_visuals: bool,

    /// Voice-over script to synthesize
    #[arg(long, default_value = "")]
    pub voiceover_text: String,

    /// Voice id for the voice-over
    #[arg(long, default_value = "")]
    pub voiceover_voice_id: String,

    /// Voice-over playback speed
    #[arg(long, default_value_t = 1.0)]
    pub voiceover_speed: f32,

    /// Voice-over mixing mode (replace, mix, duck)
    #[arg(long, default_value = "replace")]
    pub voiceover_mode: VoiceoverMode,

    /// Generate the voice-over via TTS first and attach it pre-sped
    #[arg(long, requires = "voiceover_text")]
    pub voiceover_tts: bool,

    /// Background music file to attach
    #[arg(long)]
    pub music_file: Option<PathBuf>,

    /// Background music volume (0.0-0.25)
    #[arg(long, default_value_t = 0.15)]
    pub music_volume: f32,

    /// Duck music under speech
    #[arg(long)]
    pub music_ducking: bool,

    /// Email to notify when the render is ready
    #[arg(long, default_value = "")]
    pub notify_email: String,

    /// Poll the job until it finishes
    #[arg(long)]
    pub watch: bool,

    /// Download the rendered clip here once done (implies --watch)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl SubmitArgs {
    fn render_options(&self) -> RenderOptions {
        let mut options = RenderOptions::default();
        options.platform = self.platform;
        options.duration_s = self.duration;
        options.style = self.style;
        options.cut_intensity = self.cut_intensity;
        options.language = self.language;
        options.captions = self.captions;
        options.resolution = self.resolution;
        options.output_resolution = self.output_resolution;
        options.content_preset = self.content_preset;
        options.reframe_mode = self.reframe_mode;
        options.fps = self.fps;
        options.filters_enabled = self.filter_preset != FilterPreset::None;
        options.filter_preset = self.filter_preset;
        options.caption_template = self.caption_template;
        options.caption_position = self.caption_position;
        options.caption_size = self.caption_size;
        options.transition_type = self.transition;
        options.transition_duration = self.transition_duration;
        options.audio_isolation_enabled = self.audio_isolation;
        options.sfx_enabled = self.sfx;
        options.stt_captions = self.stt_captions;
        options.ai_visuals_enabled = self.ai_visuals;
        options.voiceover_enabled = !self.voiceover_text.is_empty();
        options.voiceover_text = self.voiceover_text.clone();
        options.voiceover_voice_id = self.voiceover_voice_id.clone();
        options.voiceover_speed = self.voiceover_speed;
        options.voiceover_mode = self.voiceover_mode;
        options.music_enabled = self.music_file.is_some();
        options.music_volume = self.music_volume;
        options.music_ducking = self.music_ducking;
        options.notify_email = self.notify_email.clone();
        options
    }
}

/// Submit a render job and optionally watch it to completion
pub async fn handle_submit(args: SubmitArgs, config: &Config) -> Result<()> {
    let options = args.render_options();
    let mut session = Session::new(config);

    match (&args.file, &args.url) {
        (Some(path), None) => session.set_file_source(path.clone()),
        (None, Some(url)) => session.set_url_source(url.clone()),
        _ => bail!("Provide exactly one source: a file path or --url."),
    }

    if let Some(path) = &args.music_file {
        let clip = FilePayload::read(path)
            .await
            .with_context(|| format!("Failed to read music file {}", path.display()))?;
        session.set_music(clip);
    }

    if args.voiceover_tts {
        let mut request = TtsRequest::new(args.voiceover_text.clone());
        request.speed = args.voiceover_speed;
        if !args.voiceover_voice_id.is_empty() {
            request.voice_id = Some(args.voiceover_voice_id.clone());
        }
        let size = session.generate_voiceover(&request).await?;
        println!("{} Generated voice-over ({} bytes)", "✓".green(), size);
    }

    let job_id = session.submit(&options).await?;
    println!("{} Job {}", "✓".green(), job_id.cyan());

    if args.watch || args.output.is_some() {
        let rx = session.watch()?;
        let finished = stream_updates(rx).await;

        if finished.is_some() {
            if let Some(output) = &args.output {
                let bytes = session.client().download(&job_id).await?;
                tokio::fs::write(output, &bytes)
                    .await
                    .with_context(|| format!("Failed to write {}", output.display()))?;
                println!(
                    "{} Saved {} bytes to {}",
                    "✓".green(),
                    bytes.len(),
                    output.display().to_string().cyan()
                );
            }
        }
        session.reset();
    }

    Ok(())
}
