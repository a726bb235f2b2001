//! Narration backend errors.

/// Specific error conditions for speech synthesis.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum NarrationErrorKind {
    /// The request never produced an HTTP response
    #[display("{} request failed: {}", backend, message)]
    Request {
        /// Backend name
        backend: String,
        /// Transport error message
        message: String,
    },
    /// Upstream answered with a non-success status
    #[display("{} error (HTTP {}): {}", backend, status_code, message)]
    Api {
        /// Backend name
        backend: String,
        /// HTTP status code
        status_code: u16,
        /// Response body
        message: String,
    },
    /// Response carried no alignment, or an empty end-time sequence
    #[display("Response missing timestamps")]
    MissingAlignment,
    /// Alignment sequences disagree in length or ordering
    #[display("Invalid alignment: {}", _0)]
    InvalidAlignment(String),
    /// Response body could not be interpreted
    #[display("Malformed response: {}", _0)]
    MalformedResponse(String),
    /// Base64 audio payload could not be decoded
    #[display("Base64 decode error: {}", _0)]
    Base64Decode(String),
    /// Writing the audio to its destination failed
    #[display("Failed to write audio to {}", _0)]
    Write(String),
}

/// Error type for narration operations.
///
/// # Examples
///
/// ```
/// use storyteller_error::{NarrationError, NarrationErrorKind};
///
/// let err = NarrationError::new(NarrationErrorKind::MissingAlignment);
/// assert!(format!("{}", err).contains("missing timestamps"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Narration Error: {} at line {} in {}", kind, line, file)]
pub struct NarrationError {
    /// The specific error condition
    pub kind: NarrationErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl NarrationError {
    /// Create a new NarrationError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: NarrationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
