//! Re-narrating an existing story.

use crate::{MediaStep, PipelineObserver, SequentialTimelineBuilder, StepProgress};
use reqwest::Client;
use serde::Serialize;
use storyteller_core::RunConfig;
use storyteller_error::StorytellerResult;
use storyteller_interface::{ContentStorage, TimelineBuilder};
use storyteller_models::NarrationService;
use tracing::{info, instrument};

/// Outcome of an audio regeneration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, derive_getters::Getters)]
#[serde(rename_all = "camelCase")]
pub struct RegenerationResult {
    /// Directory name of the story
    slug: String,
    /// Title stored in the descriptor
    title: String,
    /// Number of items that were narrated again
    updated_count: usize,
}

/// Replaces the narration of a persisted story, leaving its text and
/// images alone.
///
/// Used to switch narration backend without paying for new completions or
/// images. Only `audioTimestamps` and the audio files change; every uid is
/// preserved.
pub struct AudioRegenerator {
    narration: NarrationService,
    timeline: Option<Box<dyn TimelineBuilder>>,
}

impl std::fmt::Debug for AudioRegenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioRegenerator")
            .field("narration", &self.narration)
            .finish_non_exhaustive()
    }
}

impl AudioRegenerator {
    /// Regenerator using `narration` and the sequential timeline builder.
    pub fn new(narration: NarrationService) -> Self {
        Self {
            narration,
            timeline: None,
        }
    }

    /// Use `builder` for the rebuilt timeline.
    pub fn with_timeline_builder(mut self, builder: Box<dyn TimelineBuilder>) -> Self {
        self.timeline = Some(builder);
        self
    }

    /// Select the narration backend from `config`.
    ///
    /// Follows the same precedence as generation: synthetic, then local,
    /// then ElevenLabs.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`](storyteller_error::ConfigError) when no
    /// narration backend is usable.
    pub fn from_config(http: Client, config: &RunConfig) -> StorytellerResult<Self> {
        config.validate_for_narration()?;
        Ok(Self::new(NarrationService::from_config(http, config)?))
    }

    /// Narrate every item of the story in `storage` again and persist the
    /// descriptor and a rebuilt timeline.
    ///
    /// # Errors
    ///
    /// Returns [`StorageErrorKind::DescriptorNotFound`](storyteller_error::StorageErrorKind::DescriptorNotFound)
    /// when nothing was generated for this slug, otherwise the first
    /// narration or storage error. Nothing is persisted after a failure.
    pub async fn regenerate(
        &self,
        storage: &dyn ContentStorage,
        observer: &dyn PipelineObserver,
    ) -> StorytellerResult<RegenerationResult> {
        renarrate(&self.narration, self.timeline.as_deref(), storage, observer).await
    }
}

#[instrument(skip_all, fields(slug = storage.slug(), backend = narration.backend_name()))]
pub(crate) async fn renarrate(
    narration: &NarrationService,
    timeline: Option<&dyn TimelineBuilder>,
    storage: &dyn ContentStorage,
    observer: &dyn PipelineObserver,
) -> StorytellerResult<RegenerationResult> {
    let mut descriptor = storage.load_descriptor().await?;
    let total = descriptor.content().len();

    for (index, item) in descriptor.content_mut().iter_mut().enumerate() {
        let audio_path = storage.audio_path(item.uid());
        observer.step_started(&StepProgress {
            step: index + 1,
            total,
            kind: MediaStep::Voice,
            text: item.text(),
            backend: narration.backend_name(),
        });
        let alignment = narration.narrate(item.text(), &audio_path).await?;
        item.set_audio_timestamps(alignment);
    }

    storage.save_descriptor(&descriptor).await?;
    let rebuilt = match timeline {
        Some(builder) => builder.build(&descriptor)?,
        None => {
            let images_on_disk = descriptor
                .content()
                .iter()
                .all(|item| storage.image_path(item.uid()).is_file());
            SequentialTimelineBuilder::default()
                .with_images(images_on_disk)
                .with_audio(narration.writes_audio())
                .build(&descriptor)?
        }
    };
    storage.save_timeline(&rebuilt).await?;
    info!(updated = total, "Narration regenerated");

    Ok(RegenerationResult {
        slug: storage.slug().to_string(),
        title: descriptor.short_title().clone(),
        updated_count: total,
    })
}
