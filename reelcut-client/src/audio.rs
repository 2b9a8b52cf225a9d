//! Audio generation endpoints
//!
//! Stateless request/response operations against the runner's audio proxy.
//! None of these participate in the job lifecycle; each call stands alone.
//! Every operation validates its required input locally and returns before
//! any network traffic when it is missing.

use reqwest::multipart::{Form, Part};
use tracing::debug;

use crate::error::{ClientError, Result};
use crate::jobs::FilePayload;
use crate::RunnerClient;
use reelcut_core::dto::{AudioCapabilities, SoundRequest, TtsRequest, VoiceRequest};

impl RunnerClient {
    /// Probe which audio capabilities the runner has enabled
    pub async fn audio_capabilities(&self) -> Result<AudioCapabilities> {
        let url = format!("{}/elevenlabs/status", self.base_url());
        let response = self.client.get(&url).send().await?;

        self.handle_json(response).await
    }

    /// List the voices available for speech synthesis
    pub async fn list_voices(&self) -> Result<serde_json::Value> {
        let url = format!("{}/elevenlabs/voices", self.base_url());
        let response = self.client.get(&url).send().await?;

        self.handle_json(response).await
    }

    /// Synthesize speech from text via `POST /elevenlabs/tts`
    ///
    /// # Returns
    /// The rendered audio clip. The runner applies `speed` before returning,
    /// so the clip is already time-adjusted ("pre-sped") when attached to a
    /// later submission.
    pub async fn text_to_speech(&self, request: &TtsRequest) -> Result<Vec<u8>> {
        if request.text.trim().is_empty() {
            return Err(ClientError::InvalidRequest("Missing text.".to_string()));
        }

        debug!("TTS request ({} chars)", request.text.len());

        let url = format!("{}/elevenlabs/tts", self.base_url());
        let response = self.client.post(&url).json(request).send().await?;

        self.handle_bytes(response, "TTS failed.").await
    }

    /// Re-voice an audio clip via multipart `POST /elevenlabs/sts`
    pub async fn speech_to_speech(
        &self,
        audio: FilePayload,
        voice_id: Option<&str>,
    ) -> Result<Vec<u8>> {
        if audio.bytes.is_empty() {
            return Err(ClientError::InvalidRequest("Missing audio.".to_string()));
        }

        let mut form = Form::new().part(
            "audio",
            Part::bytes(audio.bytes).file_name(audio.filename),
        );
        if let Some(voice_id) = voice_id {
            form = form.text("voice_id", voice_id.to_string());
        }

        let url = format!("{}/elevenlabs/sts", self.base_url());
        let response = self.client.post(&url).multipart(form).send().await?;

        self.handle_bytes(response, "STS failed.").await
    }

    /// Transcribe an audio clip via multipart `POST /elevenlabs/stt`
    ///
    /// # Returns
    /// The transcript document as returned by the provider (segments or
    /// word timings, depending on the model).
    pub async fn speech_to_text(
        &self,
        audio: FilePayload,
        language: Option<&str>,
    ) -> Result<serde_json::Value> {
        if audio.bytes.is_empty() {
            return Err(ClientError::InvalidRequest("Missing audio.".to_string()));
        }

        let mut form = Form::new().part(
            "audio",
            Part::bytes(audio.bytes).file_name(audio.filename),
        );
        if let Some(language) = language {
            form = form.text("language", language.to_string());
        }

        let url = format!("{}/elevenlabs/stt", self.base_url());
        let response = self.client.post(&url).multipart(form).send().await?;

        self.handle_json_fallback(response, "STT failed.").await
    }

    /// Generate a short sound effect via `POST /elevenlabs/sfx`
    pub async fn sound_effect(&self, prompt: &str, duration_s: f32) -> Result<Vec<u8>> {
        if prompt.trim().is_empty() {
            return Err(ClientError::InvalidRequest("Missing prompt.".to_string()));
        }

        let url = format!("{}/elevenlabs/sfx", self.base_url());
        let body = SoundRequest {
            prompt: prompt.to_string(),
            duration_s,
        };
        let response = self.client.post(&url).json(&body).send().await?;

        self.handle_bytes(response, "SFX failed.").await
    }

    /// Strip background noise from a clip via multipart `POST /elevenlabs/isolate`
    pub async fn isolate_audio(&self, audio: FilePayload) -> Result<Vec<u8>> {
        if audio.bytes.is_empty() {
            return Err(ClientError::InvalidRequest("Missing audio.".to_string()));
        }

        let form = Form::new().part(
            "audio",
            Part::bytes(audio.bytes).file_name(audio.filename),
        );

        let url = format!("{}/elevenlabs/isolate", self.base_url());
        let response = self.client.post(&url).multipart(form).send().await?;

        self.handle_bytes(response, "Isolation failed.").await
    }

    /// Generate a music bed via `POST /elevenlabs/music`
    pub async fn generate_music(&self, prompt: &str, duration_s: f32) -> Result<Vec<u8>> {
        if prompt.trim().is_empty() {
            return Err(ClientError::InvalidRequest("Missing prompt.".to_string()));
        }

        let url = format!("{}/elevenlabs/music", self.base_url());
        let body = SoundRequest {
            prompt: prompt.to_string(),
            duration_s,
        };
        let response = self.client.post(&url).json(&body).send().await?;

        self.handle_bytes(response, "Music failed.").await
    }

    /// Create a designed voice via `POST /elevenlabs/voice`
    ///
    /// # Returns
    /// The provider's voice descriptor document.
    pub async fn create_voice(&self, name: &str, description: &str) -> Result<serde_json::Value> {
        if name.trim().is_empty() || description.trim().is_empty() {
            return Err(ClientError::InvalidRequest(
                "Missing name or description.".to_string(),
            ));
        }

        let url = format!("{}/elevenlabs/voice", self.base_url());
        let body = VoiceRequest {
            name: name.to_string(),
            description: description.to_string(),
        };
        let response = self.client.post(&url).json(&body).send().await?;

        self.handle_json_fallback(response, "Voice creation failed.")
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelcut_core::dto::TtsRequest;

    fn offline_client() -> RunnerClient {
        RunnerClient::new("http://127.0.0.1:1")
    }

    #[tokio::test]
    async fn test_empty_text_short_circuits_tts() {
        let err = offline_client()
            .text_to_speech(&TtsRequest::new("   "))
            .await
            .unwrap_err();
        match err {
            ClientError::InvalidRequest(msg) => assert_eq!(msg, "Missing text."),
            other => panic!("expected local validation, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_audio_short_circuits_multipart_ops() {
        let client = offline_client();
        let empty = || FilePayload::new("a.wav", Vec::new());

        for err in [
            client.speech_to_speech(empty(), None).await.unwrap_err(),
            client.speech_to_text(empty(), Some("EN")).await.unwrap_err(),
            client.isolate_audio(empty()).await.unwrap_err(),
        ] {
            match err {
                ClientError::InvalidRequest(msg) => assert_eq!(msg, "Missing audio."),
                other => panic!("expected local validation, got {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn test_empty_prompt_and_voice_fields_short_circuit() {
        let client = offline_client();

        match client.sound_effect("", 2.5).await.unwrap_err() {
            ClientError::InvalidRequest(msg) => assert_eq!(msg, "Missing prompt."),
            other => panic!("expected local validation, got {other:?}"),
        }
        match client.generate_music("  ", 10.0).await.unwrap_err() {
            ClientError::InvalidRequest(msg) => assert_eq!(msg, "Missing prompt."),
            other => panic!("expected local validation, got {other:?}"),
        }
        match client.create_voice("Nova", "").await.unwrap_err() {
            ClientError::InvalidRequest(msg) => assert_eq!(msg, "Missing name or description."),
            other => panic!("expected local validation, got {other:?}"),
        }
    }
}
