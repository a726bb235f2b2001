//! Core data types for the storyteller pipeline.
//!
//! This crate provides the records that flow between pipeline stages
//! (story text, segments, timing alignments, the persisted content descriptor)
//! and the run-scoped configuration every stage reads from.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod alignment;
mod config;
mod content;
mod language;
mod settings;
mod story;

pub use alignment::{TimingAlignment, estimate_duration_seconds};
pub use config::{ImageProviderKind, LocalTtsConfig, NarrationConfig, RunConfig};
pub use content::{ContentDescriptor, ContentItem, Timeline};
pub use language::Language;
pub use settings::{
    CompletionSettings, ImageSettings, NarrationSettings, StorageSettings, StorytellerSettings,
};
pub use story::{StoryScript, StorySegment, StorySegments, StructuredOutput};
