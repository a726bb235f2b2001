//! Provider integrations for storyteller.
//!
//! Each external service sits behind one of the capability traits from
//! `storyteller_interface`:
//!
//! - **Completion**: OpenAI chat completions with strict structured outputs
//! - **Images**: Pexels stock search, Gemini streamed generation, DALL-E with bounded retry
//! - **Narration**: ElevenLabs with timestamps, a self-hosted TTS endpoint, or synthetic timing
//!
//! [`ImageService`] and [`NarrationService`] pick one implementation per run
//! from the [`RunConfig`](storyteller_core::RunConfig).
//!
//! # Example
//!
//! ```no_run
//! use storyteller_core::{RunConfig, StorytellerSettings};
//! use storyteller_models::NarrationService;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = RunConfig::from_env(StorytellerSettings::load()?);
//! let narration = NarrationService::from_config(reqwest::Client::new(), &config)?;
//! let alignment = narration.narrate("Hello there.", "audio/hello.mp3".as_ref()).await?;
//! println!("{} characters", alignment.len());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod images;
mod narration;
mod openai;
mod retry;

pub use images::{
    GeminiImageProvider, GeminiImageProviderBuilder, ImageService, PexelsApi, PexelsProvider,
    PhotoSources, StockPhoto, StockPhotoApi, build_image_provider, first_inline_image,
    select_image_provider,
};
pub use narration::{
    ElevenLabsNarrator, ElevenLabsNarratorBuilder, LocalNarrator, NarrationBackendKind,
    NarrationService, SyntheticNarrator, build_narration_backend, probe_duration_seconds,
    select_narration_backend,
};
pub use openai::{DalleProvider, DalleProviderBuilder, OpenAiCompletionClient};
pub use retry::BoundedRetry;
