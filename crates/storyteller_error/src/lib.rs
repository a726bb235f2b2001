//! Error types for the storyteller pipeline.
//!
//! This crate provides the error taxonomy shared by every storyteller crate.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! | Error | Raised when |
//! |-------|-------------|
//! | [`ConfigError`] | a required credential or endpoint is missing, before any network call |
//! | [`CompletionError`] | the language model call fails or returns schema-invalid content |
//! | [`ProviderError`] | an image provider fails |
//! | [`NarrationError`] | a TTS call fails or returns an unusable alignment |
//! | [`MetadataProbeWarning`] | audio duration probing fails (never fatal) |
//! | [`StorageError`] | descriptor, timeline or artifact persistence fails |
//!
//! # Examples
//!
//! ```
//! use storyteller_error::{StorytellerResult, ConfigError};
//!
//! fn load_key() -> StorytellerResult<String> {
//!     Err(ConfigError::new("OPENAI_API_KEY is required"))?
//! }
//!
//! match load_key() {
//!     Ok(key) => println!("Got: {}", key),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod completion;
mod config;
mod error;
mod http;
mod json;
mod narration;
mod probe;
mod provider;
mod storage;

pub use completion::{CompletionError, CompletionErrorKind};
pub use config::ConfigError;
pub use error::{StorytellerError, StorytellerErrorKind, StorytellerResult};
pub use http::HttpError;
pub use json::JsonError;
pub use narration::{NarrationError, NarrationErrorKind};
pub use probe::MetadataProbeWarning;
pub use provider::{ProviderError, ProviderErrorKind};
pub use storage::{StorageError, StorageErrorKind};
