//! The two text stages: narrative and segmentation.

use crate::{segmentation_prompt, story_prompt};
use reqwest::Client;
use serde::Serialize;
use std::sync::Arc;
use storyteller_core::{Language, RunConfig, StoryScript, StorySegment, StorySegments};
use storyteller_error::{ConfigError, StorytellerResult};
use storyteller_interface::{CompletionClient, complete_structured};
use storyteller_models::OpenAiCompletionClient;
use tracing::{debug, info, instrument};

/// Story text produced without generating media or touching storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, derive_getters::Getters)]
pub struct StoryPreview {
    /// Title as requested
    title: String,
    /// Topic as requested
    topic: String,
    /// Generated narrative
    text: String,
}

/// Writes and segments stories through a schema-validated completion client.
///
/// Neither stage retries; a failed completion is returned to the caller.
#[derive(Clone)]
pub struct StoryWriter {
    client: Arc<dyn CompletionClient>,
    language: Language,
}

impl std::fmt::Debug for StoryWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoryWriter")
            .field("model", &self.client.model_name())
            .field("language", &self.language)
            .finish()
    }
}

impl StoryWriter {
    /// Writer using `client`, producing text in `language`.
    pub fn new(client: Arc<dyn CompletionClient>, language: Language) -> Self {
        Self { client, language }
    }

    /// Writer backed by the OpenAI completion client.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when `OPENAI_API_KEY` is missing.
    pub fn from_config(http: Client, config: &RunConfig) -> StorytellerResult<Self> {
        config.validate_for_completion()?;
        let client = OpenAiCompletionClient::from_config(http, config)?;
        Ok(Self::new(Arc::new(client), *config.language()))
    }

    /// Generate the full story for `title` and `topic`.
    ///
    /// # Errors
    ///
    /// Returns a completion error when the call fails or the output is invalid.
    #[instrument(skip(self), fields(model = self.client.model_name(), language = %self.language))]
    pub async fn write_story(&self, title: &str, topic: &str) -> StorytellerResult<StoryScript> {
        let prompt = story_prompt(title, topic, self.language);
        let story: StoryScript = complete_structured(self.client.as_ref(), &prompt).await?;
        debug!(chars = story.text.chars().count(), "Story written");
        Ok(story)
    }

    /// Split `story_text` into ordered segments with image descriptions.
    ///
    /// # Errors
    ///
    /// Returns a completion error when the call fails or yields no segments.
    #[instrument(skip(self, story_text), fields(model = self.client.model_name(), chars = story_text.chars().count()))]
    pub async fn segment(&self, story_text: &str) -> StorytellerResult<Vec<StorySegment>> {
        let prompt = segmentation_prompt(story_text, self.language);
        let segments: StorySegments = complete_structured(self.client.as_ref(), &prompt).await?;
        debug!(segments = segments.result.len(), "Story segmented");
        Ok(segments.result)
    }

    /// Generate only the story text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for a blank title or topic, otherwise the
    /// completion error.
    #[instrument(skip(self))]
    pub async fn preview(&self, title: &str, topic: &str) -> StorytellerResult<StoryPreview> {
        require_title_and_topic(title, topic)?;
        let story = self.write_story(title, topic).await?;
        info!("Story preview ready");
        Ok(StoryPreview {
            title: title.to_string(),
            topic: topic.to_string(),
            text: story.text,
        })
    }
}

pub(crate) fn require_title_and_topic(title: &str, topic: &str) -> StorytellerResult<()> {
    if title.trim().is_empty() || topic.trim().is_empty() {
        return Err(ConfigError::new("Title and topic are required").into());
    }
    Ok(())
}
