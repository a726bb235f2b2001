//! Image resolution: provider strategies and the service that picks one.

mod gemini;
mod pexels;

pub use gemini::{GeminiImageProvider, GeminiImageProviderBuilder, first_inline_image};
pub use pexels::{PexelsApi, PexelsProvider, PhotoSources, StockPhoto, StockPhotoApi};

use crate::{BoundedRetry, DalleProviderBuilder};
use reqwest::Client;
use std::path::Path;
use storyteller_core::{ImageProviderKind, RunConfig};
use storyteller_error::{ProviderError, ProviderErrorKind, StorytellerResult};
use storyteller_interface::{ImageProvider, RetryCallback};
use tracing::{debug, info, instrument};

type CredentialCheck = fn(&RunConfig) -> bool;

/// Providers chosen by credential when no explicit override is configured,
/// highest priority first.
const CREDENTIAL_PRIORITY: [(ImageProviderKind, CredentialCheck); 2] = [
    (ImageProviderKind::Pexels, |config| {
        config.pexels_api_key().is_some()
    }),
    (ImageProviderKind::Gemini, |config| {
        config.gemini_api_key().is_some()
    }),
];

/// Used when neither an override nor a prioritized credential is present.
const DEFAULT_PROVIDER: ImageProviderKind = ImageProviderKind::Dalle;

/// Decide which provider a run uses.
///
/// Explicit `IMAGE_PROVIDER` wins; otherwise the first provider with a
/// credential in priority order; otherwise DALL-E.
///
/// # Examples
///
/// ```
/// use storyteller_core::{ImageProviderKind, RunConfig, StorytellerSettings};
/// use storyteller_models::select_image_provider;
///
/// let config = RunConfig::from_lookup(StorytellerSettings::default(), |key| match key {
///     "PEXELS_API_KEY" | "GEMINI_API_KEY" => Some("key".to_string()),
///     _ => None,
/// });
/// assert_eq!(select_image_provider(&config), ImageProviderKind::Pexels);
/// ```
pub fn select_image_provider(config: &RunConfig) -> ImageProviderKind {
    if let Some(kind) = config.image_provider() {
        return *kind;
    }
    CREDENTIAL_PRIORITY
        .iter()
        .find(|(_, has_credential)| has_credential(config))
        .map(|(kind, _)| *kind)
        .unwrap_or(DEFAULT_PROVIDER)
}

fn missing(variable: &str) -> ProviderError {
    ProviderError::new(ProviderErrorKind::MissingCredential(variable.to_string()))
}

/// Construct the provider for `kind` from the run configuration.
///
/// # Errors
///
/// Returns [`ProviderError`] with [`ProviderErrorKind::MissingCredential`]
/// when `kind` has no credential configured.
pub fn build_image_provider(
    kind: ImageProviderKind,
    client: Client,
    config: &RunConfig,
) -> StorytellerResult<Box<dyn ImageProvider>> {
    let images = config.settings().images();
    let provider: Box<dyn ImageProvider> = match kind {
        ImageProviderKind::Pexels => {
            let key = config
                .pexels_api_key()
                .clone()
                .ok_or_else(|| missing("PEXELS_API_KEY"))?;
            Box::new(PexelsProvider::new(PexelsApi::new(
                client,
                images.pexels_endpoint(),
                key,
            )))
        }
        ImageProviderKind::Gemini => {
            let key = config
                .gemini_api_key()
                .clone()
                .ok_or_else(|| missing("GEMINI_API_KEY"))?;
            Box::new(
                GeminiImageProviderBuilder::default()
                    .client(client)
                    .endpoint(images.gemini_endpoint().clone())
                    .api_key(key)
                    .model(config.gemini_image_model())
                    .build()?,
            )
        }
        ImageProviderKind::Dalle => {
            let key = config
                .openai_api_key()
                .clone()
                .ok_or_else(|| missing("OPENAI_API_KEY"))?;
            Box::new(
                DalleProviderBuilder::default()
                    .client(client)
                    .endpoint(images.dalle_endpoint().clone())
                    .api_key(key)
                    .model(images.dalle_model().clone())
                    .size(images.dalle_size())
                    .retry(BoundedRetry::new(
                        *images.retry_attempts(),
                        images.retry_backoff(),
                    ))
                    .build()?,
            )
        }
    };
    Ok(provider)
}

/// Resolves one image per call with a provider fixed at construction.
///
/// There is no fallback to another provider within a call.
pub struct ImageService {
    provider: Box<dyn ImageProvider>,
}

impl std::fmt::Debug for ImageService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageService")
            .field("provider", &self.provider.provider_name())
            .finish()
    }
}

impl ImageService {
    /// Wrap an already constructed provider.
    pub fn new(provider: Box<dyn ImageProvider>) -> Self {
        Self { provider }
    }

    /// Select and construct the provider for this run.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] when the selected provider lacks a credential.
    pub fn from_config(client: Client, config: &RunConfig) -> StorytellerResult<Self> {
        let kind = select_image_provider(config);
        info!(provider = %kind, "Selected image provider");
        Ok(Self::new(build_image_provider(kind, client, config)?))
    }

    /// Name of the provider in use.
    pub fn provider_name(&self) -> &'static str {
        self.provider.provider_name()
    }

    /// Resolve an image for `prompt` and write it to `destination`.
    ///
    /// # Errors
    ///
    /// Returns the provider's error, or [`ProviderError`] with
    /// [`ProviderErrorKind::Write`] if the file cannot be written.
    #[instrument(skip(self, prompt, on_retry), fields(provider = self.provider.provider_name(), path = %destination.display()))]
    pub async fn resolve_image(
        &self,
        prompt: &str,
        destination: &Path,
        on_retry: RetryCallback<'_>,
    ) -> StorytellerResult<()> {
        let bytes = self.provider.resolve(prompt, on_retry).await?;

        let write_error =
            |e: std::io::Error| ProviderError::new(ProviderErrorKind::Write(format!("{}: {}", destination.display(), e)));
        if let Some(parent) = destination.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(write_error)?;
        }
        tokio::fs::write(destination, &bytes)
            .await
            .map_err(write_error)?;

        debug!(bytes = bytes.len(), "Wrote image");
        Ok(())
    }
}
