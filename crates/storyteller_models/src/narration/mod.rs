//! Narration: speech backends and the service that normalizes their timing.

mod elevenlabs;
mod local;
mod probe;
mod synthetic;

pub use elevenlabs::{ElevenLabsNarrator, ElevenLabsNarratorBuilder};
pub use local::LocalNarrator;
pub use probe::probe_duration_seconds;
pub use synthetic::SyntheticNarrator;

use reqwest::Client;
use std::path::Path;
use storyteller_core::{RunConfig, TimingAlignment, estimate_duration_seconds};
use storyteller_error::{ConfigError, NarrationError, NarrationErrorKind, StorytellerResult};
use storyteller_interface::{NarrationBackend, NarrationTiming};
use tracing::{debug, info, instrument, warn};

/// Narration backends, in selection precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NarrationBackendKind {
    /// No audio, estimated timing
    Synthetic,
    /// Self-hosted TTS, timing from audio duration
    Local,
    /// ElevenLabs, native timing
    ElevenLabs,
}

type Availability = fn(&RunConfig) -> bool;

const PRECEDENCE: [(NarrationBackendKind, Availability); 2] = [
    (NarrationBackendKind::Synthetic, |config| {
        config.narration().synthetic_only
    }),
    (NarrationBackendKind::Local, |config| {
        config.narration().local.is_some()
    }),
];

/// Decide which backend a run uses: synthetic, then local, then ElevenLabs.
///
/// Evaluated once per run.
pub fn select_narration_backend(config: &RunConfig) -> NarrationBackendKind {
    PRECEDENCE
        .iter()
        .find(|(_, available)| available(config))
        .map(|(kind, _)| *kind)
        .unwrap_or(NarrationBackendKind::ElevenLabs)
}

/// Construct the backend for `kind` from the run configuration.
///
/// # Errors
///
/// Returns [`ConfigError`] when the chosen backend lacks its URL or key.
pub fn build_narration_backend(
    kind: NarrationBackendKind,
    client: Client,
    config: &RunConfig,
) -> StorytellerResult<Box<dyn NarrationBackend>> {
    let backend: Box<dyn NarrationBackend> = match kind {
        NarrationBackendKind::Synthetic => Box::new(SyntheticNarrator),
        NarrationBackendKind::Local => {
            let local = config
                .narration()
                .local
                .clone()
                .ok_or_else(|| ConfigError::new("LOCAL_TTS_URL is required"))?;
            Box::new(LocalNarrator::new(client, local))
        }
        NarrationBackendKind::ElevenLabs => {
            let key = config
                .narration()
                .elevenlabs_api_key
                .clone()
                .ok_or_else(|| {
                    ConfigError::new("Either LOCAL_TTS_URL or ELEVENLABS_API_KEY is required")
                })?;
            let settings = config.settings().narration();
            Box::new(
                ElevenLabsNarratorBuilder::default()
                    .client(client)
                    .endpoint(settings.elevenlabs_endpoint().clone())
                    .api_key(key)
                    .voice_id(settings.voice_id().clone())
                    .model_id(settings.model_id().clone())
                    .build()?,
            )
        }
    };
    Ok(backend)
}

/// Produces audio files and normalized character alignments.
pub struct NarrationService {
    backend: Box<dyn NarrationBackend>,
}

impl std::fmt::Debug for NarrationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NarrationService")
            .field("backend", &self.backend.backend_name())
            .finish()
    }
}

impl NarrationService {
    /// Wrap an already constructed backend.
    pub fn new(backend: Box<dyn NarrationBackend>) -> Self {
        Self { backend }
    }

    /// Select and construct the backend for this run.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the selected backend is not configured.
    pub fn from_config(client: Client, config: &RunConfig) -> StorytellerResult<Self> {
        let kind = select_narration_backend(config);
        info!(backend = ?kind, "Selected narration backend");
        Ok(Self::new(build_narration_backend(kind, client, config)?))
    }

    /// Name of the backend in use.
    pub fn backend_name(&self) -> &'static str {
        self.backend.backend_name()
    }

    /// Whether narration writes audio files.
    pub fn writes_audio(&self) -> bool {
        self.backend.writes_audio()
    }

    /// Narrate `text`, writing any audio to `destination`.
    ///
    /// Backends without timing get the audio's probed duration spread evenly
    /// over the characters; if probing fails the word-count estimate is used.
    /// A service-supplied alignment is returned unmodified.
    ///
    /// # Errors
    ///
    /// Returns the backend's error, [`NarrationErrorKind::Write`] when the
    /// audio cannot be written, or [`NarrationErrorKind::InvalidAlignment`]
    /// when an estimated or duration-derived alignment breaks its invariants.
    #[instrument(skip(self, text), fields(backend = self.backend.backend_name(), path = %destination.display(), chars = text.chars().count()))]
    pub async fn narrate(&self, text: &str, destination: &Path) -> StorytellerResult<TimingAlignment> {
        let narration = self.backend.synthesize(text).await?;

        if let Some(audio) = &narration.audio {
            let write_error = |e: std::io::Error| {
                NarrationError::new(NarrationErrorKind::Write(format!(
                    "{}: {}",
                    destination.display(),
                    e
                )))
            };
            if let Some(parent) = destination.parent() {
                tokio::fs::create_dir_all(parent).await.map_err(write_error)?;
            }
            tokio::fs::write(destination, audio)
                .await
                .map_err(write_error)?;
            debug!(bytes = audio.len(), "Wrote audio");
        }

        let alignment = match narration.timing {
            NarrationTiming::Aligned(alignment) => {
                if let Err(reason) = alignment.validate() {
                    warn!(%reason, "Backend alignment breaks timing invariants, keeping it unmodified");
                }
                return Ok(alignment);
            }
            NarrationTiming::Estimated(alignment) => alignment,
            NarrationTiming::FromAudioDuration => {
                let duration = audio_duration(destination, text).await;
                TimingAlignment::from_text(text, duration)
            }
        };

        alignment
            .validate()
            .map_err(|reason| NarrationError::new(NarrationErrorKind::InvalidAlignment(reason)))?;
        Ok(alignment)
    }
}

async fn audio_duration(path: &Path, text: &str) -> f64 {
    let owned = path.to_path_buf();
    let probed = tokio::task::spawn_blocking(move || probe_duration_seconds(&owned)).await;

    match probed {
        Ok(Ok(seconds)) => {
            debug!(seconds, "Probed audio duration");
            seconds
        }
        Ok(Err(warning)) => {
            warn!(%warning, "Falling back to estimated duration");
            estimate_duration_seconds(text)
        }
        Err(e) => {
            warn!(error = %e, "Duration probe did not complete, falling back to estimated duration");
            estimate_duration_seconds(text)
        }
    }
}
