use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use storyteller_core::RunConfig;
use storyteller_error::{CompletionError, CompletionErrorKind, ConfigError, StorytellerResult};
use storyteller_interface::CompletionClient;
use tracing::{debug, error, instrument};

/// Name under which the schema is sent; the API requires one.
const SCHEMA_NAME: &str = "response";

/// Chat completions client using strict `json_schema` structured outputs.
#[derive(Debug, Clone)]
pub struct OpenAiCompletionClient {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl OpenAiCompletionClient {
    /// Creates a client for `model` against `endpoint`.
    pub fn new(
        client: Client,
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    /// Creates a client from the run configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when no language model key is configured.
    pub fn from_config(client: Client, config: &RunConfig) -> StorytellerResult<Self> {
        let api_key = config
            .openai_api_key()
            .clone()
            .ok_or_else(|| ConfigError::new("OPENAI_API_KEY is required"))?;
        Ok(Self::new(
            client,
            config.settings().completion().endpoint(),
            api_key,
            config.completion_model(),
        ))
    }

    fn request_body(&self, prompt: &str, schema: &Value) -> Value {
        json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": prompt }],
            "response_format": {
                "type": "json_schema",
                "json_schema": {
                    "name": SCHEMA_NAME,
                    "schema": schema,
                    "strict": true,
                },
            },
        })
    }
}

/// Pull the JSON content out of a chat completions response body.
fn parse_content(body: &str) -> StorytellerResult<Value> {
    let response: ChatResponse = serde_json::from_str(body)
        .map_err(|e| CompletionError::new(CompletionErrorKind::InvalidJson(e.to_string())))?;

    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.is_empty())
        .ok_or_else(|| CompletionError::new(CompletionErrorKind::MissingContent))?;

    Ok(serde_json::from_str(&content)
        .map_err(|e| CompletionError::new(CompletionErrorKind::InvalidJson(e.to_string())))?)
}

#[async_trait]
impl CompletionClient for OpenAiCompletionClient {
    #[instrument(skip(self, prompt, schema), fields(model = %self.model, prompt_len = prompt.len()))]
    async fn complete_json(&self, prompt: &str, schema: &Value) -> StorytellerResult<Value> {
        let body = self.request_body(prompt, schema);
        debug!("Sending structured completion request");

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, "Failed to send completion request");
                CompletionError::new(CompletionErrorKind::Request(e.to_string()))
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| CompletionError::new(CompletionErrorKind::Request(e.to_string())))?;

        if !status.is_success() {
            error!(status = %status, body = %text, "Completion API returned error");
            return Err(CompletionError::new(CompletionErrorKind::Api {
                status_code: status.as_u16(),
                message: text,
            })
            .into());
        }

        debug!(response_len = text.len(), "Received completion response");
        parse_content(&text)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
