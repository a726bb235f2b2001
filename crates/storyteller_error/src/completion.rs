//! Language model completion errors.

/// Ways a schema-constrained completion can fail.
///
/// None of these are retried: the pipeline surfaces the first failure.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum CompletionErrorKind {
    /// The request never produced an HTTP response
    #[display("Completion request failed: {}", _0)]
    Request(String),
    /// Upstream answered with a non-success status
    #[display("Completion API returned HTTP {}: {}", status_code, message)]
    Api {
        /// HTTP status code
        status_code: u16,
        /// Response body
        message: String,
    },
    /// Response body had no `choices[0].message.content`
    #[display("No content in completion response")]
    MissingContent,
    /// Content was not parseable JSON
    #[display("Completion content is not valid JSON: {}", _0)]
    InvalidJson(String),
    /// Content parsed but did not match the requested schema
    #[display("Completion content failed schema validation: {}", _0)]
    SchemaViolation(String),
    /// The schema type could not be turned into a structured-output constraint
    #[display("Unable to build response schema: {}", _0)]
    Schema(String),
}

/// Completion error with source location tracking.
///
/// # Examples
///
/// ```
/// use storyteller_error::{CompletionError, CompletionErrorKind};
///
/// let err = CompletionError::new(CompletionErrorKind::MissingContent);
/// assert!(format!("{}", err).contains("No content"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Completion Error: {} at line {} in {}", kind, line, file)]
pub struct CompletionError {
    /// The kind of error that occurred
    pub kind: CompletionErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl CompletionError {
    /// Create a new CompletionError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: CompletionErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
