//! Storage error types.

/// Kinds of storage errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum StorageErrorKind {
    /// Failed to create a content directory
    #[display("Failed to create content directory: {}", _0)]
    DirectoryCreation(String),
    /// Failed to write a descriptor, timeline or artifact
    #[display("Failed to write file: {}", _0)]
    FileWrite(String),
    /// Failed to read a persisted file
    #[display("Failed to read file: {}", _0)]
    FileRead(String),
    /// No descriptor exists for the requested story
    #[display("descriptor.json not found for slug {}", _0)]
    DescriptorNotFound(String),
    /// Title produces an empty slug
    #[display("Title '{}' does not produce a usable slug", _0)]
    InvalidTitle(String),
    /// The slug pattern failed to compile
    #[display("Invalid slug pattern: {}", _0)]
    SlugPattern(String),
}

/// Storage error with location tracking.
///
/// # Examples
///
/// ```
/// use storyteller_error::{StorageError, StorageErrorKind};
///
/// let err = StorageError::new(StorageErrorKind::DescriptorNotFound("mars".to_string()));
/// assert!(format!("{}", err).contains("not found for slug mars"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Storage Error: {} at line {} in {}", kind, line, file)]
pub struct StorageError {
    /// The kind of error that occurred
    pub kind: StorageErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl StorageError {
    /// Create a new storage error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: StorageErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
