//! Story document serialization errors.

/// A descriptor or timeline could not be encoded or decoded.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Invalid {} JSON: {} at line {} in {}", document, message, line, file)]
pub struct JsonError {
    /// Which document failed, e.g. `descriptor.json` or `timeline`
    pub document: String,
    /// serde_json error message
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl JsonError {
    /// Record a serialization failure for `document` at the current location.
    ///
    /// # Examples
    ///
    /// ```
    /// use storyteller_error::JsonError;
    ///
    /// let err = JsonError::new("descriptor.json", "missing field `shortTitle`");
    /// assert_eq!(err.document, "descriptor.json");
    /// assert!(err.to_string().starts_with("Invalid descriptor.json JSON"));
    /// ```
    #[track_caller]
    pub fn new(document: impl Into<String>, message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            document: document.into(),
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}
