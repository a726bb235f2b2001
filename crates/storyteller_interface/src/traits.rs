//! Capability traits the pipeline is written against.

use crate::Narration;
use async_trait::async_trait;
use std::path::PathBuf;
use storyteller_core::{ContentDescriptor, Timeline};
use storyteller_error::StorytellerResult;

/// Called with the number of the attempt that just failed, before the next one.
///
/// Progress reporting only; it never changes control flow.
pub type RetryCallback<'a> = &'a (dyn Fn(u32) + Send + Sync);

/// Language model endpoint that can be constrained by a JSON schema.
///
/// Implementations make exactly one request per call. See
/// [`complete_structured`](crate::complete_structured) for the typed entry
/// point built on top of this.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send `prompt` with `schema` as the structured-output constraint and
    /// return the parsed JSON content of the reply.
    async fn complete_json(
        &self,
        prompt: &str,
        schema: &serde_json::Value,
    ) -> StorytellerResult<serde_json::Value>;

    /// Model identifier (e.g., "gpt-4o-mini").
    fn model_name(&self) -> &str;
}

/// One way of turning a text prompt into image bytes.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// Resolve one image for `prompt`.
    ///
    /// Providers that retry report each failed attempt through `on_retry`.
    async fn resolve(&self, prompt: &str, on_retry: RetryCallback<'_>)
    -> StorytellerResult<Vec<u8>>;

    /// Provider name (e.g., "pexels", "gemini", "dalle").
    fn provider_name(&self) -> &'static str;
}

/// One way of turning text into speech audio plus timing.
#[async_trait]
pub trait NarrationBackend: Send + Sync {
    /// Synthesize `text`.
    async fn synthesize(&self, text: &str) -> StorytellerResult<Narration>;

    /// Backend name (e.g., "elevenlabs", "local", "synthetic").
    fn backend_name(&self) -> &'static str;

    /// Whether narrating leaves an audio file behind.
    fn writes_audio(&self) -> bool {
        true
    }
}

/// Where one story's descriptor, timeline and media live.
///
/// A storage value is bound to a single story; its slug is derived from the
/// title it was opened with.
#[async_trait]
pub trait ContentStorage: Send + Sync {
    /// Directory-safe identifier of the story.
    fn slug(&self) -> &str;

    /// Persist the descriptor, replacing any previous version.
    async fn save_descriptor(&self, descriptor: &ContentDescriptor) -> StorytellerResult<()>;

    /// Persist the timeline, replacing any previous version.
    async fn save_timeline(&self, timeline: &Timeline) -> StorytellerResult<()>;

    /// Load the last persisted descriptor.
    async fn load_descriptor(&self) -> StorytellerResult<ContentDescriptor>;

    /// Write target for the image of item `uid`.
    fn image_path(&self, uid: &str) -> PathBuf;

    /// Write target for the audio of item `uid`.
    fn audio_path(&self, uid: &str) -> PathBuf;
}

/// Derives the render-ready timeline from a completed descriptor.
pub trait TimelineBuilder: Send + Sync {
    /// Build the timeline. Must not perform I/O.
    fn build(&self, descriptor: &ContentDescriptor) -> StorytellerResult<Timeline>;
}
