//! Run-scoped configuration.
//!
//! A [`RunConfig`] is built once per pipeline run from the environment and the
//! file settings, validated, and then passed by reference to every stage. No
//! credential is stored anywhere else.

use crate::{Language, StorytellerSettings};
use storyteller_error::{ConfigError, StorytellerResult};

/// Image provider strategies, in the order they are listed to users.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::EnumString,
    strum::Display,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ImageProviderKind {
    /// Stock photo search
    Pexels,
    /// Generative, streamed response
    Gemini,
    /// Generative, bounded retry
    Dalle,
}

/// Self-hosted TTS endpoint and its optional request parameters.
///
/// Each optional field is sent only when set.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LocalTtsConfig {
    /// Endpoint receiving `POST { input, ... }`
    pub url: String,
    /// `model` parameter
    pub model: Option<String>,
    /// `backend` parameter
    pub backend: Option<String>,
    /// `voice` parameter
    pub voice: Option<String>,
    /// `language` parameter
    pub language: Option<String>,
    /// `response_format` parameter
    pub response_format: Option<String>,
}

/// Narration backend inputs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NarrationConfig {
    /// Skip audio entirely and synthesize timings from text
    pub synthetic_only: bool,
    /// Self-hosted TTS, when `LOCAL_TTS_URL` is set
    pub local: Option<LocalTtsConfig>,
    /// Cloud TTS credential
    pub elevenlabs_api_key: Option<String>,
}

/// Everything one pipeline run reads.
#[derive(Debug, Clone, PartialEq, derive_getters::Getters)]
pub struct RunConfig {
    /// File-based tunables
    settings: StorytellerSettings,
    /// Language model credential
    openai_api_key: Option<String>,
    /// Language model name
    completion_model: String,
    /// Explicit image provider override
    image_provider: Option<ImageProviderKind>,
    /// Stock photo credential
    pexels_api_key: Option<String>,
    /// Generative streaming credential
    gemini_api_key: Option<String>,
    /// Generative streaming model
    gemini_image_model: String,
    /// Narration backend inputs
    narration: NarrationConfig,
    /// Skip image resolution and only narrate
    disable_images: bool,
    /// Output language for prompts
    language: Language,
}

impl RunConfig {
    /// Build from the process environment.
    ///
    /// Call `dotenvy::dotenv()` first if a `.env` file should be honoured.
    pub fn from_env(settings: StorytellerSettings) -> Self {
        Self::from_lookup(settings, |key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup.
    ///
    /// Blank values count as unset.
    ///
    /// # Examples
    ///
    /// ```
    /// use storyteller_core::{ImageProviderKind, Language, RunConfig, StorytellerSettings};
    ///
    /// let config = RunConfig::from_lookup(StorytellerSettings::default(), |key| match key {
    ///     "OPENAI_API_KEY" => Some("sk-test".to_string()),
    ///     "IMAGE_PROVIDER" => Some("Gemini".to_string()),
    ///     "LANGUAGE" => Some("pt-br".to_string()),
    ///     "SYNTHETIC_TIMESTAMPS_ONLY" => Some("true".to_string()),
    ///     _ => None,
    /// });
    ///
    /// assert_eq!(config.image_provider(), &Some(ImageProviderKind::Gemini));
    /// assert_eq!(config.language(), &Language::BrazilianPortuguese);
    /// assert!(config.narration().synthetic_only);
    /// assert_eq!(config.completion_model(), "gpt-4o-mini");
    /// ```
    pub fn from_lookup(
        settings: StorytellerSettings,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let var = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let flag = |key: &str| matches!(var(key).as_deref(), Some("1" | "true"));

        let image_provider = var("IMAGE_PROVIDER").and_then(|name| {
            name.parse::<ImageProviderKind>()
                .inspect_err(|_| {
                    tracing::warn!(provider = %name, "Ignoring unknown IMAGE_PROVIDER");
                })
                .ok()
        });

        let local = var("LOCAL_TTS_URL").map(|url| LocalTtsConfig {
            url,
            model: var("LOCAL_TTS_MODEL"),
            backend: var("LOCAL_TTS_BACKEND"),
            voice: var("LOCAL_TTS_VOICE"),
            language: var("LOCAL_TTS_LANGUAGE"),
            response_format: var("LOCAL_TTS_RESPONSE_FORMAT"),
        });

        Self {
            completion_model: var("OPENAI_MODEL")
                .unwrap_or_else(|| settings.completion().model().clone()),
            gemini_image_model: var("GEMINI_IMAGE_MODEL")
                .unwrap_or_else(|| settings.images().gemini_model().clone()),
            openai_api_key: var("OPENAI_API_KEY"),
            image_provider,
            pexels_api_key: var("PEXELS_API_KEY"),
            gemini_api_key: var("GEMINI_API_KEY").or_else(|| var("GEMINI_API")),
            narration: NarrationConfig {
                synthetic_only: flag("SYNTHETIC_TIMESTAMPS_ONLY"),
                local,
                elevenlabs_api_key: var("ELEVENLABS_API_KEY"),
            },
            disable_images: flag("DISABLE_IMAGE_GENERATION"),
            language: Language::from_region_code(var("LANGUAGE").as_deref()),
            settings,
        }
    }

    /// Prefer an explicitly supplied language model key over the environment.
    pub fn with_openai_api_key(mut self, key: Option<String>) -> Self {
        if let Some(key) = key.filter(|k| !k.trim().is_empty()) {
            self.openai_api_key = Some(key);
        }
        self
    }

    /// Prefer an explicitly supplied cloud TTS key over the environment.
    pub fn with_elevenlabs_api_key(mut self, key: Option<String>) -> Self {
        if let Some(key) = key.filter(|k| !k.trim().is_empty()) {
            self.narration.elevenlabs_api_key = Some(key);
        }
        self
    }

    /// Override the narration inputs.
    pub fn with_narration(mut self, narration: NarrationConfig) -> Self {
        self.narration = narration;
        self
    }

    /// Turn image resolution on or off.
    pub fn with_images_disabled(mut self, disabled: bool) -> Self {
        self.disable_images = disabled;
        self
    }

    /// Fail fast when a full generation run could not complete.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the language model key is missing or no
    /// narration backend is usable.
    pub fn validate_for_generation(&self) -> StorytellerResult<()> {
        self.validate_for_completion()?;
        self.validate_for_narration()
    }

    /// Fail fast when no completion call could succeed.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when `OPENAI_API_KEY` is missing.
    pub fn validate_for_completion(&self) -> StorytellerResult<()> {
        if self.openai_api_key.is_none() {
            return Err(ConfigError::new("OPENAI_API_KEY is required").into());
        }
        Ok(())
    }

    /// Fail fast when no narration backend is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] unless timings are synthetic, a local TTS URL is
    /// set, or an ElevenLabs key is present.
    pub fn validate_for_narration(&self) -> StorytellerResult<()> {
        let narration = &self.narration;
        if !narration.synthetic_only
            && narration.local.is_none()
            && narration.elevenlabs_api_key.is_none()
        {
            return Err(ConfigError::new(
                "Either LOCAL_TTS_URL or ELEVENLABS_API_KEY is required",
            )
            .into());
        }
        Ok(())
    }
}
