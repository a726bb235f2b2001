use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use eventsource_stream::{EventStreamError, Eventsource};
use futures_util::{Stream, StreamExt};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::fmt::Display;
use storyteller_error::{ConfigError, ProviderError, ProviderErrorKind, StorytellerResult};
use storyteller_interface::{ImageProvider, RetryCallback};
use tracing::{debug, instrument, trace};

const PROVIDER: &str = "gemini";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StreamChunk {
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CandidateContent {
    parts: Vec<Part>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct Part {
    inline_data: Option<InlineData>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct InlineData {
    data: String,
}

impl StreamChunk {
    fn inline_image(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .filter_map(|part| part.inline_data)
            .map(|inline| inline.data)
            .find(|data| !data.is_empty())
    }
}

fn malformed(message: impl Display) -> ProviderError {
    ProviderError::new(ProviderErrorKind::MalformedResponse {
        provider: PROVIDER.to_string(),
        message: message.to_string(),
    })
}

/// Read a `streamGenerateContent` SSE body until the first inline image.
///
/// Returns the base64 payload of that image without polling the stream any
/// further, or `None` when the stream ends without one.
///
/// # Errors
///
/// Returns [`ProviderError`] when the transport fails, the body is not a
/// valid event stream, or an event is not valid JSON.
pub async fn first_inline_image<S, B, E>(body: S) -> StorytellerResult<Option<String>>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: Display,
{
    let mut events = std::pin::pin!(body.eventsource());
    let mut chunks = 0usize;

    while let Some(event) = events.next().await {
        let event = event.map_err(|e| match e {
            EventStreamError::Transport(e) => ProviderError::request(PROVIDER, e),
            other => malformed(other),
        })?;
        chunks += 1;

        let chunk: StreamChunk = serde_json::from_str(&event.data).map_err(malformed)?;
        if let Some(image) = chunk.inline_image() {
            debug!(chunks, "Inline image arrived");
            return Ok(Some(image));
        }
        trace!(chunks, "Chunk without image");
    }

    Ok(None)
}

/// Image-modality generation over a streamed response.
///
/// # Examples
///
/// ```
/// use storyteller_models::GeminiImageProviderBuilder;
///
/// let provider = GeminiImageProviderBuilder::default()
///     .client(reqwest::Client::new())
///     .endpoint("https://generativelanguage.googleapis.com/v1beta/models")
///     .api_key("key")
///     .model("gemini-2.5-flash-image")
///     .build()
///     .unwrap();
/// assert_eq!(provider.model(), "gemini-2.5-flash-image");
/// ```
#[derive(Debug, Clone, derive_builder::Builder, derive_getters::Getters)]
#[builder(setter(into), build_fn(private, name = "build_internal"))]
pub struct GeminiImageProvider {
    /// Shared HTTP client
    #[getter(skip)]
    client: Client,
    /// Models base URL
    endpoint: String,
    /// Gemini API key
    #[getter(skip)]
    api_key: String,
    /// Image-capable model name
    model: String,
}

impl GeminiImageProviderBuilder {
    /// Build the provider.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] naming the first field that was never set.
    pub fn build(&self) -> StorytellerResult<GeminiImageProvider> {
        Ok(self
            .build_internal()
            .map_err(|e| ConfigError::new(format!("Gemini image provider: {}", e)))?)
    }
}

impl GeminiImageProvider {
    fn stream_url(&self) -> String {
        format!(
            "{}/{}:streamGenerateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }
}

#[async_trait]
impl ImageProvider for GeminiImageProvider {
    #[instrument(skip(self, prompt, _on_retry), fields(provider = PROVIDER, model = %self.model))]
    async fn resolve(
        &self,
        prompt: &str,
        _on_retry: RetryCallback<'_>,
    ) -> StorytellerResult<Vec<u8>> {
        let body = json!({
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
            "generationConfig": { "responseModalities": ["IMAGE"] },
        });

        let response = self
            .client
            .post(self.stream_url())
            .query(&[("alt", "sse")])
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::request(PROVIDER, e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ProviderError::api(PROVIDER, status.as_u16(), text).into());
        }

        let encoded = first_inline_image(response.bytes_stream())
            .await?
            .ok_or_else(|| ProviderError::new(ProviderErrorKind::NoImage("Gemini".to_string())))?;

        Ok(STANDARD
            .decode(encoded)
            .map_err(|e| ProviderError::new(ProviderErrorKind::Base64Decode(e.to_string())))?)
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}
