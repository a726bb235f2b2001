use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use storyteller_core::TimingAlignment;
use storyteller_error::{ConfigError, NarrationError, NarrationErrorKind, StorytellerResult};
use storyteller_interface::{Narration, NarrationBackend};
use tracing::{debug, error, instrument};

const BACKEND: &str = "elevenlabs";

/// Cloud TTS with native character timestamps.
#[derive(Debug, Clone, derive_builder::Builder, derive_getters::Getters)]
#[builder(setter(into), build_fn(private, name = "build_internal"))]
pub struct ElevenLabsNarrator {
    /// Shared HTTP client
    #[getter(skip)]
    client: Client,
    /// API base URL
    endpoint: String,
    /// ElevenLabs API key
    #[getter(skip)]
    api_key: String,
    /// Voice every segment is spoken with
    voice_id: String,
    /// Model id; the service default applies when unset
    #[builder(default)]
    model_id: Option<String>,
}

impl ElevenLabsNarratorBuilder {
    /// Build the narrator.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] naming the first field that was never set.
    pub fn build(&self) -> StorytellerResult<ElevenLabsNarrator> {
        Ok(self
            .build_internal()
            .map_err(|e| ConfigError::new(format!("ElevenLabs narrator: {}", e)))?)
    }
}

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    model_id: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct TimestampedSpeech {
    audio_base64: String,
    alignment: Option<CharacterAlignment>,
}

#[derive(Debug, Deserialize)]
struct CharacterAlignment {
    #[serde(default)]
    characters: Vec<String>,
    #[serde(default)]
    character_start_times_seconds: Vec<f64>,
    #[serde(default)]
    character_end_times_seconds: Vec<f64>,
}

impl ElevenLabsNarrator {
    fn url(&self) -> String {
        format!(
            "{}/v1/text-to-speech/{}/with-timestamps",
            self.endpoint.trim_end_matches('/'),
            self.voice_id
        )
    }
}

/// Decode a `with-timestamps` response into audio plus its native alignment.
fn parse_timestamped_speech(body: &str) -> StorytellerResult<Narration> {
    let speech: TimestampedSpeech = serde_json::from_str(body)
        .map_err(|e| NarrationError::new(NarrationErrorKind::MalformedResponse(e.to_string())))?;

    let alignment = speech
        .alignment
        .filter(|alignment| !alignment.character_end_times_seconds.is_empty())
        .ok_or_else(|| NarrationError::new(NarrationErrorKind::MissingAlignment))?;

    let audio = STANDARD
        .decode(speech.audio_base64)
        .map_err(|e| NarrationError::new(NarrationErrorKind::Base64Decode(e.to_string())))?;

    Ok(Narration::aligned(
        audio,
        TimingAlignment {
            characters: alignment.characters,
            start_times_seconds: alignment.character_start_times_seconds,
            end_times_seconds: alignment.character_end_times_seconds,
        },
    ))
}

#[async_trait]
impl NarrationBackend for ElevenLabsNarrator {
    #[instrument(skip(self, text), fields(backend = BACKEND, voice = %self.voice_id, text_len = text.len()))]
    async fn synthesize(&self, text: &str) -> StorytellerResult<Narration> {
        let request = SpeechRequest {
            text,
            model_id: self.model_id.as_deref(),
        };

        let response = self
            .client
            .post(self.url())
            .header("xi-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                NarrationError::new(NarrationErrorKind::Request {
                    backend: BACKEND.to_string(),
                    message: e.to_string(),
                })
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            NarrationError::new(NarrationErrorKind::Request {
                backend: BACKEND.to_string(),
                message: e.to_string(),
            })
        })?;

        if !status.is_success() {
            error!(status = %status, "Speech synthesis failed");
            return Err(NarrationError::new(NarrationErrorKind::Api {
                backend: BACKEND.to_string(),
                status_code: status.as_u16(),
                message: body,
            })
            .into());
        }

        debug!(response_len = body.len(), "Received timestamped speech");
        parse_timestamped_speech(&body)
    }

    fn backend_name(&self) -> &'static str {
        BACKEND
    }
}
