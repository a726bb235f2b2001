//! Filesystem layout for generated stories.
//!
//! Each story lives in its own directory under a content root, named by a
//! slug derived from the title:
//!
//! ```text
//! public/content/
//! └── the-red-planet/
//!     ├── descriptor.json
//!     ├── timeline.json
//!     ├── images/
//!     │   └── <uid>.png
//!     └── audio/
//!         └── <uid>.mp3
//! ```
//!
//! # Example
//!
//! ```rust
//! use storyteller_core::ContentDescriptor;
//! use storyteller_interface::ContentStorage;
//! use storyteller_storage::ContentFs;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let storage = ContentFs::new("/tmp/content", "The Red Planet")?;
//! assert_eq!(storage.slug(), "the-red-planet");
//!
//! storage.save_descriptor(&ContentDescriptor::new("The Red Planet")).await?;
//! let loaded = storage.load_descriptor().await?;
//! assert_eq!(loaded.short_title(), "The Red Planet");
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod filesystem;
mod slug;

pub use filesystem::ContentFs;
pub use slug::slugify;
