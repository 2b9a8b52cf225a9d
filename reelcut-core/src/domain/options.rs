//! Render options
//!
//! The flat configuration map attached to every job submission. Constrained
//! fields are typed enums that round-trip their exact wire strings; numeric
//! fields carry the runner's accepted ranges and are clamped client-side so a
//! submission never carries an out-of-range value.

use serde::{Deserialize, Serialize};

macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($variant:ident => $wire:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $wire)] $variant,)+
        }

        impl $name {
            /// The exact string the runner expects on the wire.
            pub fn as_str(&self) -> &'static str {
                match self { $(Self::$variant => $wire,)+ }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match value {
                    $($wire => Ok(Self::$variant),)+
                    other => Err(format!(
                        concat!("invalid ", stringify!($name), " value: {}"),
                        other
                    )),
                }
            }
        }
    };
}

wire_enum! {
    /// Target short-form platform.
    Platform {
        Shorts => "Shorts",
        TikTok => "TikTok",
        Reels => "Reels",
    }
}

wire_enum! {
    /// Editing style driving the plan generation.
    Style {
        Energique => "Energique",
        Pro => "Pro",
        Storytelling => "Storytelling",
        Tutorial => "Tutorial",
    }
}

wire_enum! {
    CutIntensity {
        Soft => "Soft",
        Medium => "Medium",
        Hard => "Hard",
    }
}

wire_enum! {
    Language {
        Fr => "FR",
        En => "EN",
    }
}

wire_enum! {
    /// Legacy coarse captions switch; finer control lives in the caption_* fields.
    CaptionsToggle {
        On => "ON",
        Off => "OFF",
    }
}

wire_enum! {
    /// Vertical output resolutions accepted by the runner.
    Resolution {
        Portrait1080 => "1080x1920",
        Portrait720 => "720x1280",
    }
}

wire_enum! {
    ContentPreset {
        Auto => "auto",
        Podcast => "podcast",
        Facecam => "facecam",
        Screen => "screen",
        Vlog => "vlog",
    }
}

wire_enum! {
    ReframeMode {
        Center => "center",
        Smart => "smart",
    }
}

wire_enum! {
    FilterPreset {
        None => "none",
        Clean => "clean",
        Cinematic => "cinematic",
        Vibrant => "vibrant",
        Bw => "bw",
        Retro => "retro",
        Sharp => "sharp",
        Soft => "soft",
    }
}

wire_enum! {
    CaptionTemplate {
        TiktokBold => "tiktok_bold",
        Minimal => "minimal",
        Creator => "creator",
        HighContrast => "high_contrast",
    }
}

wire_enum! {
    CaptionPosition {
        Bottom => "bottom",
        Center => "center",
        Top => "top",
    }
}

wire_enum! {
    CaptionSize {
        Sm => "sm",
        Md => "md",
        Lg => "lg",
    }
}

wire_enum! {
    VoiceoverMode {
        Replace => "replace",
        Mix => "mix",
        Duck => "duck",
    }
}

/// Transition applied between cut segments.
///
/// Parsing accepts the loose UI spellings the runner also tolerates
/// ("cross-fade", "dip to black", "auto (gemini)"); anything else falls back
/// to `Auto` rather than erroring, matching the runner's own normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransitionType {
    #[serde(rename = "auto")]
    Auto,
    #[serde(rename = "none")]
    None,
    #[serde(rename = "fade")]
    Fade,
    #[serde(rename = "crossfade")]
    Crossfade,
    #[serde(rename = "dip_black")]
    DipBlack,
    #[serde(rename = "swipe")]
    Swipe,
}

impl TransitionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::None => "none",
            Self::Fade => "fade",
            Self::Crossfade => "crossfade",
            Self::DipBlack => "dip_black",
            Self::Swipe => "swipe",
        }
    }

    /// Normalizes a free-form transition string, falling back to `Auto` for
    /// anything unrecognized.
    pub fn normalize(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "none" => Self::None,
            "fade" => Self::Fade,
            "crossfade" | "cross-fade" | "cross fade" => Self::Crossfade,
            "dip_black" | "dip to black" => Self::DipBlack,
            "swipe" => Self::Swipe,
            _ => Self::Auto,
        }
    }
}

impl std::fmt::Display for TransitionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TransitionType {
    type Err = std::convert::Infallible;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(Self::normalize(value))
    }
}

/// The full option set for one submission.
///
/// Serializes to the wire field names used by `/start_from_url`; multipart
/// submissions use [`RenderOptions::form_fields`] instead. Defaults match the
/// runner's own form defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderOptions {
    pub platform: Platform,
    #[serde(rename = "duration")]
    pub duration_s: u32,
    pub style: Style,
    pub cut_intensity: CutIntensity,
    pub language: Language,
    pub captions: CaptionsToggle,
    pub resolution: Resolution,
    pub content_preset: ContentPreset,
    pub output_resolution: Resolution,
    pub reframe_mode: ReframeMode,
    pub fps: u32,
    pub filters_enabled: bool,
    pub filter_preset: FilterPreset,
    pub brightness: f32,
    pub contrast: f32,
    pub saturation: f32,
    pub gamma: f32,
    pub sharpness: f32,
    pub denoise: bool,
    pub vignette: bool,
    pub grain: bool,
    pub captions_enabled: bool,
    pub caption_template: CaptionTemplate,
    pub caption_position: CaptionPosition,
    pub caption_size: CaptionSize,
    pub caption_safe_margin: u32,
    pub caption_highlight_keywords: bool,
    pub caption_max_chars_per_line: u32,
    pub transition_type: TransitionType,
    pub transition_duration: f32,
    pub audio_enhance: bool,
    pub audio_loudnorm: bool,
    pub audio_compressor: bool,
    pub audio_denoise: bool,
    pub audio_isolation_enabled: bool,
    pub sfx_enabled: bool,
    pub stt_captions: bool,
    pub voiceover_enabled: bool,
    pub voiceover_text: String,
    pub voiceover_voice_id: String,
    pub voiceover_speed: f32,
    pub voiceover_mode: VoiceoverMode,
    pub voiceover_pre_sped: bool,
    pub music_enabled: bool,
    pub music_volume: f32,
    pub music_ducking: bool,
    pub ai_visuals_enabled: bool,
    pub ai_visuals_style: String,
    pub ai_visuals_intensity: String,
    pub ai_visuals_max_overlays: u32,
    pub ai_visuals_transparent_png: bool,
    pub ai_broll_enabled: bool,
    pub ai_broll_mode: String,
    pub ai_video_model: String,
    pub notify_email: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            platform: Platform::Shorts,
            duration_s: 45,
            style: Style::Storytelling,
            cut_intensity: CutIntensity::Medium,
            language: Language::En,
            captions: CaptionsToggle::On,
            resolution: Resolution::Portrait1080,
            content_preset: ContentPreset::Auto,
            output_resolution: Resolution::Portrait1080,
            reframe_mode: ReframeMode::Center,
            fps: 30,
            filters_enabled: false,
            filter_preset: FilterPreset::None,
            brightness: 0.0,
            contrast: 1.0,
            saturation: 1.0,
            gamma: 1.0,
            sharpness: 0.0,
            denoise: false,
            vignette: false,
            grain: false,
            captions_enabled: true,
            caption_template: CaptionTemplate::TiktokBold,
            caption_position: CaptionPosition::Bottom,
            caption_size: CaptionSize::Md,
            caption_safe_margin: 40,
            caption_highlight_keywords: false,
            caption_max_chars_per_line: 32,
            transition_type: TransitionType::None,
            transition_duration: 0.3,
            audio_enhance: false,
            audio_loudnorm: false,
            audio_compressor: false,
            audio_denoise: false,
            audio_isolation_enabled: false,
            sfx_enabled: false,
            stt_captions: false,
            voiceover_enabled: false,
            voiceover_text: String::new(),
            voiceover_voice_id: String::new(),
            voiceover_speed: 1.0,
            voiceover_mode: VoiceoverMode::Replace,
            voiceover_pre_sped: false,
            music_enabled: false,
            music_volume: 0.15,
            music_ducking: false,
            ai_visuals_enabled: false,
            ai_visuals_style: "minimal_abstract".to_string(),
            ai_visuals_intensity: "low".to_string(),
            ai_visuals_max_overlays: 2,
            ai_visuals_transparent_png: true,
            ai_broll_enabled: false,
            ai_broll_mode: "off".to_string(),
            ai_video_model: "auto".to_string(),
            notify_email: String::new(),
        }
    }
}

impl RenderOptions {
    /// Clamps every numeric field into the range the runner accepts.
    pub fn clamp_ranges(&mut self) {
        self.brightness = self.brightness.clamp(-0.2, 0.2);
        self.contrast = self.contrast.clamp(0.8, 1.3);
        self.saturation = self.saturation.clamp(0.8, 1.4);
        self.gamma = self.gamma.clamp(0.8, 1.2);
        self.sharpness = self.sharpness.clamp(0.0, 1.0);
        self.transition_duration = self.transition_duration.clamp(0.1, 0.6);
        self.music_volume = self.music_volume.clamp(0.0, 0.25);
        self.caption_max_chars_per_line = self.caption_max_chars_per_line.max(10);
        self.ai_visuals_max_overlays = self.ai_visuals_max_overlays.min(4);
        self.voiceover_speed = self.voiceover_speed.clamp(0.5, 2.0);
        self.notify_email = self.notify_email.trim().to_string();
    }

    /// Checks the fields the runner would reject outright.
    ///
    /// These are client-local validation errors: a failing option set must
    /// never produce a network request.
    pub fn validate(&self) -> Result<(), String> {
        if !(30..=60).contains(&self.duration_s) {
            return Err("Duration must be 30-60 seconds.".to_string());
        }
        if !matches!(self.fps, 24 | 30 | 60) {
            return Err("Invalid fps.".to_string());
        }
        Ok(())
    }

    /// Rewrites the voice-over fields for a pre-generated clip attachment.
    ///
    /// The clip was already rendered at the requested speed, so the textual
    /// fields are suppressed and the speed reset to neutral; `pre_sped` tells
    /// the runner not to reapply its own speed pass.
    pub fn mark_voiceover_pre_sped(&mut self) {
        self.voiceover_enabled = true;
        self.voiceover_text = String::new();
        self.voiceover_speed = 1.0;
        self.voiceover_pre_sped = true;
    }

    /// Flat string fields for a multipart `/start` submission, in wire order.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("platform", self.platform.to_string()),
            ("duration", self.duration_s.to_string()),
            ("style", self.style.to_string()),
            ("cut_intensity", self.cut_intensity.to_string()),
            ("language", self.language.to_string()),
            ("captions", self.captions.to_string()),
            ("resolution", self.resolution.to_string()),
            ("content_preset", self.content_preset.to_string()),
            ("output_resolution", self.output_resolution.to_string()),
            ("reframe_mode", self.reframe_mode.to_string()),
            ("fps", self.fps.to_string()),
            ("filters_enabled", self.filters_enabled.to_string()),
            ("filter_preset", self.filter_preset.to_string()),
            ("brightness", self.brightness.to_string()),
            ("contrast", self.contrast.to_string()),
            ("saturation", self.saturation.to_string()),
            ("gamma", self.gamma.to_string()),
            ("sharpness", self.sharpness.to_string()),
            ("denoise", self.denoise.to_string()),
            ("vignette", self.vignette.to_string()),
            ("grain", self.grain.to_string()),
            ("captions_enabled", self.captions_enabled.to_string()),
            ("caption_template", self.caption_template.to_string()),
            ("caption_position", self.caption_position.to_string()),
            ("caption_size", self.caption_size.to_string()),
            ("caption_safe_margin", self.caption_safe_margin.to_string()),
            (
                "caption_highlight_keywords",
                self.caption_highlight_keywords.to_string(),
            ),
            (
                "caption_max_chars_per_line",
                self.caption_max_chars_per_line.to_string(),
            ),
            ("transition_type", self.transition_type.to_string()),
            ("transition_duration", self.transition_duration.to_string()),
            ("audio_enhance", self.audio_enhance.to_string()),
            ("audio_loudnorm", self.audio_loudnorm.to_string()),
            ("audio_compressor", self.audio_compressor.to_string()),
            ("audio_denoise", self.audio_denoise.to_string()),
            (
                "audio_isolation_enabled",
                self.audio_isolation_enabled.to_string(),
            ),
            ("sfx_enabled", self.sfx_enabled.to_string()),
            ("stt_captions", self.stt_captions.to_string()),
            ("voiceover_enabled", self.voiceover_enabled.to_string()),
            ("voiceover_text", self.voiceover_text.clone()),
            ("voiceover_voice_id", self.voiceover_voice_id.clone()),
            ("voiceover_speed", self.voiceover_speed.to_string()),
            ("voiceover_mode", self.voiceover_mode.to_string()),
            ("voiceover_pre_sped", self.voiceover_pre_sped.to_string()),
            ("music_enabled", self.music_enabled.to_string()),
            ("music_volume", self.music_volume.to_string()),
            ("music_ducking", self.music_ducking.to_string()),
            ("ai_visuals_enabled", self.ai_visuals_enabled.to_string()),
            ("ai_visuals_style", self.ai_visuals_style.clone()),
            ("ai_visuals_intensity", self.ai_visuals_intensity.clone()),
            (
                "ai_visuals_max_overlays",
                self.ai_visuals_max_overlays.to_string(),
            ),
            (
                "ai_visuals_transparent_png",
                self.ai_visuals_transparent_png.to_string(),
            ),
            ("ai_broll_enabled", self.ai_broll_enabled.to_string()),
            ("ai_broll_mode", self.ai_broll_mode.clone()),
            ("ai_video_model", self.ai_video_model.clone()),
            ("notify_email", self.notify_email.clone()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let opts = RenderOptions::default();
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn test_duration_bounds() {
        let mut opts = RenderOptions::default();
        opts.duration_s = 29;
        assert!(opts.validate().is_err());
        opts.duration_s = 61;
        assert!(opts.validate().is_err());
        opts.duration_s = 30;
        assert!(opts.validate().is_ok());
        opts.duration_s = 60;
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn test_fps_validation() {
        let mut opts = RenderOptions::default();
        opts.fps = 25;
        assert_eq!(opts.validate(), Err("Invalid fps.".to_string()));
        opts.fps = 60;
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn test_clamp_ranges() {
        let mut opts = RenderOptions::default();
        opts.brightness = 5.0;
        opts.contrast = 0.0;
        opts.music_volume = 1.0;
        opts.caption_max_chars_per_line = 3;
        opts.ai_visuals_max_overlays = 9;
        opts.voiceover_speed = 3.0;
        opts.clamp_ranges();
        assert_eq!(opts.brightness, 0.2);
        assert_eq!(opts.contrast, 0.8);
        assert_eq!(opts.music_volume, 0.25);
        assert_eq!(opts.caption_max_chars_per_line, 10);
        assert_eq!(opts.ai_visuals_max_overlays, 4);
        assert_eq!(opts.voiceover_speed, 2.0);
    }

    #[test]
    fn test_transition_aliases() {
        assert_eq!(TransitionType::normalize("cross-fade"), TransitionType::Crossfade);
        assert_eq!(TransitionType::normalize("Dip to Black"), TransitionType::DipBlack);
        assert_eq!(TransitionType::normalize("auto (gemini)"), TransitionType::Auto);
        assert_eq!(TransitionType::normalize("wipe-left"), TransitionType::Auto);
        assert_eq!(TransitionType::normalize(" fade "), TransitionType::Fade);
    }

    #[test]
    fn test_wire_enum_round_trip() {
        assert_eq!("TikTok".parse::<Platform>().unwrap(), Platform::TikTok);
        assert_eq!(Platform::TikTok.to_string(), "TikTok");
        assert_eq!(
            "1080x1920".parse::<Resolution>().unwrap(),
            Resolution::Portrait1080
        );
        assert!("4k".parse::<Resolution>().is_err());
        assert_eq!(
            serde_json::to_string(&CaptionTemplate::HighContrast).unwrap(),
            "\"high_contrast\""
        );
    }

    #[test]
    fn test_json_uses_wire_field_names() {
        let opts = RenderOptions::default();
        let value = serde_json::to_value(&opts).unwrap();
        assert_eq!(value["duration"], 45);
        assert_eq!(value["platform"], "Shorts");
        assert_eq!(value["output_resolution"], "1080x1920");
        assert_eq!(value["voiceover_mode"], "replace");
        assert!(value.get("duration_s").is_none());
    }

    #[test]
    fn test_mark_voiceover_pre_sped() {
        let mut opts = RenderOptions::default();
        opts.voiceover_text = "hello there".to_string();
        opts.voiceover_speed = 1.4;
        opts.mark_voiceover_pre_sped();
        assert!(opts.voiceover_enabled);
        assert!(opts.voiceover_pre_sped);
        assert_eq!(opts.voiceover_text, "");
        assert_eq!(opts.voiceover_speed, 1.0);
    }

    #[test]
    fn test_form_fields_cover_every_option() {
        let opts = RenderOptions::default();
        let fields = opts.form_fields();
        assert_eq!(fields.len(), 55);
        let lookup: std::collections::HashMap<_, _> = fields.into_iter().collect();
        assert_eq!(lookup["duration"], "45");
        assert_eq!(lookup["captions"], "ON");
        assert_eq!(lookup["voiceover_pre_sped"], "false");
        assert_eq!(lookup["transition_type"], "none");
    }
}
