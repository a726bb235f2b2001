//! Non-secret tunables loaded from TOML.
//!
//! Sources, lowest precedence first:
//! 1. Bundled defaults (`storyteller.toml` compiled into the binary)
//! 2. `~/.config/storyteller/storyteller.toml`
//! 3. `./storyteller.toml`
//!
//! User files are optional and skipped when absent.

use config::{Config, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use storyteller_error::{ConfigError, StorytellerResult};
use tracing::{debug, instrument};

const DEFAULT_CONFIG: &str = include_str!("../../../storyteller.toml");

/// Language model endpoint settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
#[serde(default, deny_unknown_fields)]
pub struct CompletionSettings {
    /// Chat completions URL
    endpoint: String,
    /// Model used when `OPENAI_MODEL` is unset
    model: String,
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            model: "gpt-4o-mini".to_string(),
        }
    }
}

/// Image provider settings.
///
/// # Examples
///
/// ```
/// use storyteller_core::ImageSettings;
///
/// let images = ImageSettings::default();
/// assert_eq!(images.dalle_size(), "1792x1024");
/// assert_eq!(*images.retry_attempts(), 3);
/// assert_eq!(images.retry_backoff().as_millis(), 1000);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
#[serde(default, deny_unknown_fields)]
pub struct ImageSettings {
    /// Requested image width in pixels
    width: u32,
    /// Requested image height in pixels
    height: u32,
    /// DALL-E generations URL
    dalle_endpoint: String,
    /// DALL-E model name
    dalle_model: String,
    /// Gemini models base URL
    gemini_endpoint: String,
    /// Gemini model used when `GEMINI_IMAGE_MODEL` is unset
    gemini_model: String,
    /// Pexels search URL
    pexels_endpoint: String,
    /// Total attempts for the generative-with-retry provider
    retry_attempts: u32,
    /// Fixed delay between those attempts, in milliseconds
    retry_backoff_ms: u64,
}

impl Default for ImageSettings {
    fn default() -> Self {
        Self {
            width: 1792,
            height: 1024,
            dalle_endpoint: "https://api.openai.com/v1/images/generations".to_string(),
            dalle_model: "dall-e-3".to_string(),
            gemini_endpoint: "https://generativelanguage.googleapis.com/v1beta/models".to_string(),
            gemini_model: "gemini-2.5-flash-image".to_string(),
            pexels_endpoint: "https://api.pexels.com/v1/search".to_string(),
            retry_attempts: 3,
            retry_backoff_ms: 1000,
        }
    }
}

impl ImageSettings {
    /// Size string in the `WIDTHxHEIGHT` form DALL-E expects.
    pub fn dalle_size(&self) -> String {
        format!("{}x{}", self.width, self.height)
    }

    /// Delay between retry attempts.
    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }
}

/// Cloud TTS settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
#[serde(default, deny_unknown_fields)]
pub struct NarrationSettings {
    /// ElevenLabs API base URL
    elevenlabs_endpoint: String,
    /// Voice every segment is read with
    voice_id: String,
    /// Optional ElevenLabs model id; the provider default applies when unset
    model_id: Option<String>,
}

impl Default for NarrationSettings {
    fn default() -> Self {
        Self {
            elevenlabs_endpoint: "https://api.elevenlabs.io".to_string(),
            voice_id: "21m00Tcm4TlvDq8ikWAM".to_string(),
            model_id: None,
        }
    }
}

/// Where generated stories are written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
#[serde(default, deny_unknown_fields)]
pub struct StorageSettings {
    /// Directory holding one sub-directory per story slug
    content_root: PathBuf,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            content_root: PathBuf::from("public/content"),
        }
    }
}

/// All file-based settings.
#[derive(
    Debug, Clone, PartialEq, Default, Serialize, Deserialize, derive_getters::Getters,
)]
#[serde(default, deny_unknown_fields)]
pub struct StorytellerSettings {
    /// Language model settings
    completion: CompletionSettings,
    /// Image provider settings
    images: ImageSettings,
    /// Cloud TTS settings
    narration: NarrationSettings,
    /// Output location
    storage: StorageSettings,
}

impl StorytellerSettings {
    /// Load settings with precedence: current dir > home dir > bundled defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a present file cannot be parsed or the merged
    /// settings fail [`StorytellerSettings::validate`].
    #[instrument]
    pub fn load() -> StorytellerResult<Self> {
        debug!("Loading settings: current dir > home dir > bundled defaults");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(config_dir) = dirs::config_dir() {
            let home_config = config_dir.join("storyteller/storyteller.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("storyteller").required(false));

        let settings: Self = builder
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to build settings: {}", e)))?
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Failed to parse settings: {}", e)))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a single file layered over the bundled defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> StorytellerResult<Self> {
        let settings: Self = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(|e| {
                ConfigError::new(format!(
                    "Failed to read settings from {}: {}",
                    path.as_ref().display(),
                    e
                ))
            })?
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Failed to parse settings: {}", e)))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Reject values no provider can work with.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for zero image dimensions or zero retry attempts.
    pub fn validate(&self) -> StorytellerResult<()> {
        if self.images.width == 0 || self.images.height == 0 {
            return Err(ConfigError::new(format!(
                "Image size must be non-zero, got {}",
                self.images.dalle_size()
            ))
            .into());
        }
        if self.images.retry_attempts == 0 {
            return Err(ConfigError::new("images.retry_attempts must be at least 1").into());
        }
        Ok(())
    }
}
