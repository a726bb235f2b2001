//! The content generation orchestrator.

use crate::regenerate::renarrate;
use crate::writer::require_title_and_topic;
use crate::{
    MediaStep, PipelineObserver, RegenerationResult, SequentialTimelineBuilder, Stage,
    StepProgress, StoryPreview, StoryWriter,
};
use reqwest::Client;
use serde::Serialize;
use storyteller_core::{ContentDescriptor, RunConfig};
use storyteller_error::StorytellerResult;
use storyteller_interface::{ContentStorage, TimelineBuilder};
use storyteller_models::{ImageService, NarrationService};
use tracing::{info, instrument, warn};

/// Outcome of a full generation run.
#[derive(Debug, Clone, PartialEq, Serialize, derive_getters::Getters)]
pub struct GenerationResult {
    /// Directory name the story was stored under
    slug: String,
    /// Title as requested
    title: String,
    /// Topic as requested
    topic: String,
    /// Descriptor as finally persisted
    #[serde(skip)]
    descriptor: ContentDescriptor,
}

/// Turns a title and topic into a persisted, narrated, illustrated story.
///
/// One run moves through [`Stage`]s strictly in order, and each segment's
/// image and narration finish before the next segment starts. A failure at
/// any point aborts the run; the descriptor written before media generation
/// stays on disk.
///
/// # Example
///
/// ```rust,ignore
/// use storyteller_core::{RunConfig, StorytellerSettings};
/// use storyteller_pipeline::{ContentPipeline, SilentObserver};
/// use storyteller_storage::ContentFs;
///
/// let config = RunConfig::from_env(StorytellerSettings::load()?);
/// let pipeline = ContentPipeline::from_config(reqwest::Client::new(), &config)?;
/// let storage = ContentFs::new(config.settings().storage().content_root(), "Mars")?;
/// let result = pipeline.generate("Mars", "Facts", &storage, &SilentObserver).await?;
/// println!("Saved {}", result.slug());
/// ```
pub struct ContentPipeline {
    writer: StoryWriter,
    images: Option<ImageService>,
    narration: NarrationService,
    timeline: Option<Box<dyn TimelineBuilder>>,
}

impl std::fmt::Debug for ContentPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentPipeline")
            .field("writer", &self.writer)
            .field("images", &self.images)
            .field("narration", &self.narration)
            .finish_non_exhaustive()
    }
}

impl ContentPipeline {
    /// Pipeline with images disabled and the sequential timeline builder.
    pub fn new(writer: StoryWriter, narration: NarrationService) -> Self {
        Self {
            writer,
            images: None,
            narration,
            timeline: None,
        }
    }

    /// Resolve an image per segment with `images`.
    pub fn with_images(mut self, images: ImageService) -> Self {
        self.images = Some(images);
        self
    }

    /// Use `builder` for the persisted timeline.
    pub fn with_timeline_builder(mut self, builder: Box<dyn TimelineBuilder>) -> Self {
        self.timeline = Some(builder);
        self
    }

    /// Build every service this run needs from `config`.
    ///
    /// Image and narration providers are chosen here, once per run.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`](storyteller_error::ConfigError) when a required
    /// credential is missing, or a provider error when the chosen image
    /// provider cannot be constructed. No network call is made.
    pub fn from_config(http: Client, config: &RunConfig) -> StorytellerResult<Self> {
        config.validate_for_generation()?;

        let writer = StoryWriter::from_config(http.clone(), config)?;
        let narration = NarrationService::from_config(http.clone(), config)?;
        let pipeline = Self::new(writer, narration);

        if *config.disable_images() {
            info!("Image generation disabled");
            return Ok(pipeline);
        }
        Ok(pipeline.with_images(ImageService::from_config(http, config)?))
    }

    /// Whether segments get images.
    pub fn images_enabled(&self) -> bool {
        self.images.is_some()
    }

    /// Run only the narrative stage; storage is not touched.
    ///
    /// # Errors
    ///
    /// See [`StoryWriter::preview`].
    pub async fn preview_story(&self, title: &str, topic: &str) -> StorytellerResult<StoryPreview> {
        self.writer.preview(title, topic).await
    }

    /// Narrate the story in `storage` again with this pipeline's backend.
    ///
    /// # Errors
    ///
    /// See [`AudioRegenerator::regenerate`](crate::AudioRegenerator::regenerate).
    pub async fn regenerate_audio(
        &self,
        storage: &dyn ContentStorage,
        observer: &dyn PipelineObserver,
    ) -> StorytellerResult<RegenerationResult> {
        renarrate(&self.narration, self.timeline.as_deref(), storage, observer).await
    }

    /// Generate the story for `title` and `topic` and persist it to `storage`.
    ///
    /// # Errors
    ///
    /// Returns the first completion, provider, narration or storage error.
    #[instrument(skip(self, storage, observer), fields(slug = storage.slug()))]
    pub async fn generate(
        &self,
        title: &str,
        topic: &str,
        storage: &dyn ContentStorage,
        observer: &dyn PipelineObserver,
    ) -> StorytellerResult<GenerationResult> {
        require_title_and_topic(title, topic)?;

        enter(Stage::AwaitingStory, observer);
        let story = self.writer.write_story(title, topic).await?;

        enter(Stage::AwaitingSegmentation, observer);
        let segments = self.writer.segment(&story.text).await?;

        let mut descriptor = ContentDescriptor::from_segments(title, segments);
        storage.save_descriptor(&descriptor).await?;
        info!(segments = descriptor.content().len(), "Pre-media descriptor saved");

        let total = descriptor.content().len();
        let steps_per_segment = if self.images.is_some() { 2 } else { 1 };
        for index in 0..total {
            enter(Stage::GeneratingMedia { index, total }, observer);

            let item = &descriptor.content()[index];
            let uid = item.uid().clone();
            let text = item.text().clone();
            let mut step = index * steps_per_segment;

            if let Some(images) = &self.images {
                step += 1;
                let progress = StepProgress {
                    step,
                    total: total * steps_per_segment,
                    kind: MediaStep::Image,
                    text: &text,
                    backend: images.provider_name(),
                };
                observer.step_started(&progress);
                let on_retry = |attempt: u32| {
                    warn!(uid = %uid, attempt, "Image generation retrying");
                    observer.image_retry(&progress, attempt);
                };
                images
                    .resolve_image(
                        item.image_description(),
                        &storage.image_path(&uid),
                        &on_retry,
                    )
                    .await?;
            }

            step += 1;
            observer.step_started(&StepProgress {
                step,
                total: total * steps_per_segment,
                kind: MediaStep::Voice,
                text: &text,
                backend: self.narration.backend_name(),
            });
            let alignment = self
                .narration
                .narrate(&text, &storage.audio_path(&uid))
                .await?;
            descriptor.content_mut()[index].set_audio_timestamps(alignment);
        }

        storage.save_descriptor(&descriptor).await?;
        let timeline = match &self.timeline {
            Some(builder) => builder.build(&descriptor)?,
            None => SequentialTimelineBuilder::default()
                .with_images(self.images.is_some())
                .with_audio(self.narration.writes_audio())
                .build(&descriptor)?,
        };
        storage.save_timeline(&timeline).await?;
        enter(Stage::Persisted, observer);

        Ok(GenerationResult {
            slug: storage.slug().to_string(),
            title: title.to_string(),
            topic: topic.to_string(),
            descriptor,
        })
    }
}

fn enter(stage: Stage, observer: &dyn PipelineObserver) {
    info!(%stage, "Pipeline stage");
    observer.stage_changed(stage);
}
