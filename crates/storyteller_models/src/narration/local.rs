use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use storyteller_core::LocalTtsConfig;
use storyteller_error::{NarrationError, NarrationErrorKind, StorytellerResult};
use storyteller_interface::{Narration, NarrationBackend};
use tracing::{debug, error, instrument};

const BACKEND: &str = "local";

/// Self-hosted TTS returning raw audio without timing.
#[derive(Debug, Clone)]
pub struct LocalNarrator {
    client: Client,
    config: LocalTtsConfig,
}

#[derive(Debug, Serialize)]
struct LocalSpeechRequest<'a> {
    input: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    backend: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    voice: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    language: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<&'a str>,
}

impl<'a> LocalSpeechRequest<'a> {
    fn new(input: &'a str, config: &'a LocalTtsConfig) -> Self {
        Self {
            input,
            model: config.model.as_deref(),
            backend: config.backend.as_deref(),
            voice: config.voice.as_deref(),
            language: config.language.as_deref(),
            response_format: config.response_format.as_deref(),
        }
    }
}

impl LocalNarrator {
    /// Creates a narrator posting to `config.url`.
    pub fn new(client: Client, config: LocalTtsConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl NarrationBackend for LocalNarrator {
    #[instrument(skip(self, text), fields(backend = BACKEND, url = %self.config.url, text_len = text.len()))]
    async fn synthesize(&self, text: &str) -> StorytellerResult<Narration> {
        let request = LocalSpeechRequest::new(text, &self.config);
        let request_error = |message: String| {
            NarrationError::new(NarrationErrorKind::Request {
                backend: BACKEND.to_string(),
                message,
            })
        };

        let response = self
            .client
            .post(&self.config.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| request_error(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, "Local TTS failed");
            return Err(NarrationError::new(NarrationErrorKind::Api {
                backend: BACKEND.to_string(),
                status_code: status.as_u16(),
                message: body,
            })
            .into());
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| request_error(e.to_string()))?;
        debug!(bytes = audio.len(), "Received local audio");
        Ok(Narration::untimed(audio.to_vec()))
    }

    fn backend_name(&self) -> &'static str {
        BACKEND
    }
}
