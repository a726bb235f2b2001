//! Storyteller - narrated, illustrated stories from a title and a topic
//!
//! Storyteller asks a language model for a short story, splits it into
//! sentence-aligned segments with image descriptions, resolves an image and
//! narrated audio with character timing for every segment, and persists a
//! content descriptor plus a timeline for a downstream renderer.
//!
//! # Features
//!
//! - **Schema-validated completions**: strict JSON schema upstream, typed validation after
//! - **Interchangeable image providers**: Pexels, Gemini streaming, DALL-E with bounded retry
//! - **Normalized narration timing**: ElevenLabs, self-hosted TTS or synthetic timing
//! - **Plain files**: one directory per story, JSON descriptor and timeline
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use storyteller::{ContentFs, ContentPipeline, RunConfig, SilentObserver, StorytellerSettings};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RunConfig::from_env(StorytellerSettings::load()?);
//!     let pipeline = ContentPipeline::from_config(reqwest::Client::new(), &config)?;
//!     let storage = ContentFs::new(config.settings().storage().content_root(), "Mars")?;
//!
//!     let result = pipeline.generate("Mars", "Facts", &storage, &SilentObserver).await?;
//!     println!("Saved {}", result.slug());
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! Storyteller is organized as a workspace with focused crates:
//!
//! - `storyteller_error` - Error types
//! - `storyteller_core` - Data model, settings and run configuration
//! - `storyteller_interface` - Capability traits and structured completion
//! - `storyteller_models` - Completion, image and narration providers
//! - `storyteller_storage` - Per-story filesystem layout
//! - `storyteller_pipeline` - The generation pipeline
//!
//! This crate (`storyteller`) re-exports everything for convenience.

pub use storyteller_core::*;
pub use storyteller_error::*;
pub use storyteller_interface::*;
pub use storyteller_models::*;
pub use storyteller_pipeline::*;
pub use storyteller_storage::*;

pub mod telemetry;
