//! Capability traits for the storyteller pipeline.
//!
//! The pipeline depends only on these traits; concrete language model, image,
//! narration and storage implementations live in other crates and are chosen
//! at run time.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod structured;
mod traits;
mod types;

pub use structured::{complete_structured, strict_schema};
pub use traits::{
    CompletionClient, ContentStorage, ImageProvider, NarrationBackend, RetryCallback,
    TimelineBuilder,
};
pub use types::{Narration, NarrationTiming};
