//! Shared HTTP client setup errors.

/// The HTTP client shared by every provider could not be built.
///
/// Provider calls report their own transport failures; this error only covers
/// constructing the client before the run starts.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display(
    "Could not build HTTP client ({}): {} at line {} in {}",
    user_agent,
    message,
    line,
    file
)]
pub struct HttpError {
    /// User agent the client was configured with
    pub user_agent: String,
    /// Builder error message
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl HttpError {
    /// Record a client builder failure at the current location.
    ///
    /// # Examples
    ///
    /// ```
    /// use storyteller_error::HttpError;
    ///
    /// let err = HttpError::new("storyteller/0.1.0", "no TLS backend available");
    /// assert!(err.to_string().starts_with("Could not build HTTP client (storyteller/0.1.0)"));
    /// ```
    #[track_caller]
    pub fn new(user_agent: impl Into<String>, message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            user_agent: user_agent.into(),
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}
