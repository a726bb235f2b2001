//! Non-fatal audio metadata probe failures.

/// Audio duration could not be read from the container.
///
/// Never propagated out of a narration backend: callers log it and fall back
/// to the word-count duration estimate.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Unable to read audio metadata for {}: {} (line {} in {})", path, message, line, file)]
pub struct MetadataProbeWarning {
    /// File that was probed
    pub path: String,
    /// Reason the probe failed
    pub message: String,
    /// Line number where the warning was created
    pub line: u32,
    /// File where the warning was created
    pub file: &'static str,
}

impl MetadataProbeWarning {
    /// Create a new warning at the current location.
    ///
    /// # Examples
    ///
    /// ```
    /// use storyteller_error::MetadataProbeWarning;
    ///
    /// let warning = MetadataProbeWarning::new("audio/abc.mp3", "no default track");
    /// assert!(warning.to_string().contains("no default track"));
    /// ```
    #[track_caller]
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            path: path.into(),
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}
