//! Story generation pipeline.
//!
//! Turns a title and topic into a narrated, illustrated story bundle:
//!
//! 1. the completion client writes the story as one paragraph
//! 2. a second completion splits it into segments with image descriptions
//! 3. each segment gets an image and narration with character timing, in order
//! 4. the descriptor and a timeline built from it are persisted
//!
//! Two smaller entry points reuse the same services: [`StoryWriter::preview`]
//! runs only the first stage, and [`AudioRegenerator`] re-narrates a story
//! that is already on disk.
//!
//! # Example
//!
//! ```rust,ignore
//! use storyteller_core::{RunConfig, StorytellerSettings};
//! use storyteller_pipeline::{ContentPipeline, SilentObserver};
//! use storyteller_storage::ContentFs;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = RunConfig::from_env(StorytellerSettings::load()?);
//! let pipeline = ContentPipeline::from_config(reqwest::Client::new(), &config)?;
//! let storage = ContentFs::new(config.settings().storage().content_root(), "Mars")?;
//!
//! let result = pipeline.generate("Mars", "Facts", &storage, &SilentObserver).await?;
//! println!("{} segments", result.descriptor().content().len());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod observer;
mod pipeline;
mod prompts;
mod regenerate;
mod timeline;
mod writer;

pub use observer::{MediaStep, PipelineObserver, SilentObserver, Stage, StepProgress};
pub use pipeline::{ContentPipeline, GenerationResult};
pub use prompts::{segmentation_prompt, story_prompt};
pub use regenerate::{AudioRegenerator, RegenerationResult};
pub use timeline::SequentialTimelineBuilder;
pub use writer::{StoryPreview, StoryWriter};
