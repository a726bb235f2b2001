use crate::BoundedRetry;
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use storyteller_error::{ConfigError, ProviderError, ProviderErrorKind, StorytellerResult};
use storyteller_interface::{ImageProvider, RetryCallback};
use tracing::{debug, instrument};

const PROVIDER: &str = "dalle";

/// Synchronous image generation with bounded retry on non-success responses.
///
/// # Examples
///
/// ```
/// use storyteller_models::DalleProviderBuilder;
///
/// let provider = DalleProviderBuilder::default()
///     .client(reqwest::Client::new())
///     .endpoint("https://api.openai.com/v1/images/generations")
///     .api_key("sk-test")
///     .model("dall-e-3")
///     .size("1024x1024")
///     .build()
///     .unwrap();
/// assert_eq!(*provider.retry().max_attempts(), 3);
/// ```
#[derive(Debug, Clone, derive_builder::Builder, derive_getters::Getters)]
#[builder(setter(into), build_fn(private, name = "build_internal"))]
pub struct DalleProvider {
    /// Shared HTTP client
    #[getter(skip)]
    client: Client,
    /// Image generations URL
    endpoint: String,
    /// OpenAI API key
    #[getter(skip)]
    api_key: String,
    /// Model name
    model: String,
    /// Image size as `WIDTHxHEIGHT`
    size: String,
    /// Attempts and backoff for non-success responses
    #[builder(default)]
    retry: BoundedRetry,
}

impl DalleProviderBuilder {
    /// Build the provider; the retry policy defaults to 3 attempts one second apart.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] naming the first field that was never set.
    pub fn build(&self) -> StorytellerResult<DalleProvider> {
        Ok(self
            .build_internal()
            .map_err(|e| ConfigError::new(format!("DALL-E provider: {}", e)))?)
    }
}

#[derive(Debug, Deserialize)]
struct GenerationResponse {
    #[serde(default)]
    data: Vec<GeneratedImage>,
}

#[derive(Debug, Deserialize)]
struct GeneratedImage {
    b64_json: Option<String>,
}

impl DalleProvider {
    #[instrument(skip(self, prompt), fields(model = %self.model))]
    async fn generate_once(&self, prompt: &str, attempt: u32) -> StorytellerResult<Vec<u8>> {
        let body = json!({
            "model": self.model,
            "prompt": prompt,
            "size": self.size,
            "response_format": "b64_json",
        });

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::request(PROVIDER, e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ProviderError::api(
                PROVIDER,
                status.as_u16(),
                format!("attempt {}: {}", attempt, text),
            )
            .into());
        }

        let text = response
            .text()
            .await
            .map_err(|e| ProviderError::request(PROVIDER, e))?;
        decode_generation(&text)
    }
}

fn decode_generation(body: &str) -> StorytellerResult<Vec<u8>> {
    let malformed = |message: String| {
        ProviderError::new(ProviderErrorKind::MalformedResponse {
            provider: PROVIDER.to_string(),
            message,
        })
    };

    let response: GenerationResponse =
        serde_json::from_str(body).map_err(|e| malformed(e.to_string()))?;
    let encoded = response
        .data
        .into_iter()
        .next()
        .and_then(|image| image.b64_json)
        .ok_or_else(|| malformed("no b64_json image in response".to_string()))?;

    let bytes = STANDARD
        .decode(encoded)
        .map_err(|e| ProviderError::new(ProviderErrorKind::Base64Decode(e.to_string())))?;
    debug!(bytes = bytes.len(), "Decoded generated image");
    Ok(bytes)
}

#[async_trait]
impl ImageProvider for DalleProvider {
    async fn resolve(
        &self,
        prompt: &str,
        on_retry: RetryCallback<'_>,
    ) -> StorytellerResult<Vec<u8>> {
        self.retry
            .run(|attempt| self.generate_once(prompt, attempt), on_retry)
            .await
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}
