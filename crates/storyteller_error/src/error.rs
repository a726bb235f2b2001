//! Top-level error wrapper types.

use crate::{
    CompletionError, ConfigError, HttpError, JsonError, NarrationError, ProviderError,
    StorageError,
};

/// Every error condition a pipeline run can surface.
///
/// # Examples
///
/// ```
/// use storyteller_error::{JsonError, StorytellerError};
///
/// let json_err = JsonError::new("timeline", "key must be a string");
/// let err: StorytellerError = json_err.into();
/// assert!(format!("{}", err).contains("Invalid timeline JSON"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum StorytellerErrorKind {
    /// Shared HTTP client could not be built
    #[from(HttpError)]
    Http(HttpError),
    /// Descriptor or timeline (de)serialization error
    #[from(JsonError)]
    Json(JsonError),
    /// Missing or invalid configuration
    #[from(ConfigError)]
    Config(ConfigError),
    /// Language model completion failed
    #[from(CompletionError)]
    Completion(CompletionError),
    /// Image provider failed
    #[from(ProviderError)]
    Provider(ProviderError),
    /// Narration backend failed
    #[from(NarrationError)]
    Narration(NarrationError),
    /// Storage collaborator failed
    #[from(StorageError)]
    Storage(StorageError),
}

/// Storyteller error with kind discrimination.
///
/// # Examples
///
/// ```
/// use storyteller_error::{StorytellerError, StorytellerErrorKind, StorytellerResult, ConfigError};
///
/// fn might_fail() -> StorytellerResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// let err = might_fail().unwrap_err();
/// assert!(matches!(err.kind(), StorytellerErrorKind::Config(_)));
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Storyteller Error: {}", _0)]
pub struct StorytellerError(Box<StorytellerErrorKind>);

impl StorytellerError {
    /// Create a new error from a kind.
    pub fn new(kind: StorytellerErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &StorytellerErrorKind {
        &self.0
    }

    /// Whether the failed operation may be attempted again.
    pub fn is_retryable(&self) -> bool {
        match self.kind() {
            StorytellerErrorKind::Provider(e) => e.kind.is_retryable(),
            _ => false,
        }
    }
}

// Generic From implementation for any type that converts to StorytellerErrorKind
impl<T> From<T> for StorytellerError
where
    T: Into<StorytellerErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for storyteller operations.
///
/// # Examples
///
/// ```
/// use storyteller_error::{StorytellerResult, StorageError, StorageErrorKind};
///
/// fn load(slug: &str) -> StorytellerResult<String> {
///     Err(StorageError::new(StorageErrorKind::DescriptorNotFound(slug.to_string())))?
/// }
/// ```
pub type StorytellerResult<T> = std::result::Result<T, StorytellerError>;
