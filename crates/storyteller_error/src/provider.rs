//! Image provider errors.

/// Image provider failure conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ProviderErrorKind {
    /// No credential configured for the selected provider
    #[display("{} is not configured", _0)]
    MissingCredential(String),
    /// The request never produced an HTTP response
    #[display("{} request failed: {}", provider, message)]
    Request {
        /// Provider name
        provider: String,
        /// Transport error message
        message: String,
    },
    /// Upstream answered with a non-success status
    #[display("{} error (HTTP {}): {}", provider, status_code, message)]
    Api {
        /// Provider name
        provider: String,
        /// HTTP status code
        status_code: u16,
        /// Response body
        message: String,
    },
    /// Stock photo search returned zero photos
    #[display("Stock photo search did not return any photos")]
    NoResults,
    /// The returned photo has none of the known URL variants
    #[display("Stock photo has no usable URL")]
    NoUsableUrl,
    /// Downloading the chosen photo failed
    #[display("Failed to download image: {}", _0)]
    Download(String),
    /// Generative stream ended without inline image bytes
    #[display("{} did not return an image", _0)]
    NoImage(String),
    /// Response body could not be interpreted
    #[display("Malformed {} response: {}", provider, message)]
    MalformedResponse {
        /// Provider name
        provider: String,
        /// Parse error
        message: String,
    },
    /// Base64 payload could not be decoded
    #[display("Base64 decode error: {}", _0)]
    Base64Decode(String),
    /// Writing the image to its destination failed
    #[display("Failed to write image to {}", _0)]
    Write(String),
}

impl ProviderErrorKind {
    /// Whether a later attempt against the same provider could succeed.
    ///
    /// Only non-success HTTP responses qualify; transport and decoding
    /// failures are surfaced at once.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Api { .. })
    }
}

/// Image provider error with source location tracking.
///
/// # Examples
///
/// ```
/// use storyteller_error::{ProviderError, ProviderErrorKind};
///
/// let err = ProviderError::new(ProviderErrorKind::NoResults);
/// assert!(format!("{}", err).contains("did not return any photos"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Provider Error: {} at line {} in {}", kind, line, file)]
pub struct ProviderError {
    /// The kind of error that occurred
    pub kind: ProviderErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ProviderError {
    /// Create a new ProviderError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ProviderErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Shorthand for a non-success HTTP response.
    #[track_caller]
    pub fn api(provider: impl Into<String>, status_code: u16, message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Api {
            provider: provider.into(),
            status_code,
            message: message.into(),
        })
    }

    /// Shorthand for a transport failure.
    #[track_caller]
    pub fn request(provider: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::new(ProviderErrorKind::Request {
            provider: provider.into(),
            message: message.to_string(),
        })
    }
}
