//! Filesystem-backed content storage.

use crate::slugify;
use async_trait::async_trait;
use serde::Serialize;
use std::path::{Path, PathBuf};
use storyteller_core::{ContentDescriptor, Timeline};
use storyteller_error::{JsonError, StorageError, StorageErrorKind, StorytellerResult};
use storyteller_interface::ContentStorage;

const DESCRIPTOR_FILE: &str = "descriptor.json";
const TIMELINE_FILE: &str = "timeline.json";
const IMAGES_DIR: &str = "images";
const AUDIO_DIR: &str = "audio";

/// Storage for one story under `{root}/{slug}`.
///
/// Directories are created when the first file is written; nothing touches
/// the disk on construction.
///
/// # Features
///
/// - **Stable paths**: media files are named by item uid
/// - **Atomic writes**: JSON documents go to a temp file first, then are renamed
/// - **Readable output**: pretty-printed JSON with camelCase keys
#[derive(Debug, Clone)]
pub struct ContentFs {
    root: PathBuf,
    slug: String,
}

impl ContentFs {
    /// Storage for `title` under `root`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageErrorKind::InvalidTitle`] when the title has no
    /// ASCII letters or digits to build a slug from.
    #[tracing::instrument(skip(root), fields(root = %root.as_ref().display()))]
    pub fn new(root: impl AsRef<Path>, title: &str) -> StorytellerResult<Self> {
        let slug = slugify(title)?;
        if slug.is_empty() {
            return Err(StorageError::new(StorageErrorKind::InvalidTitle(title.to_string())).into());
        }
        Ok(Self {
            root: root.as_ref().to_path_buf(),
            slug,
        })
    }

    /// Directory holding every file of this story.
    pub fn story_dir(&self) -> PathBuf {
        self.root.join(&self.slug)
    }

    /// Location of the descriptor document.
    pub fn descriptor_path(&self) -> PathBuf {
        self.story_dir().join(DESCRIPTOR_FILE)
    }

    /// Location of the timeline document.
    pub fn timeline_path(&self) -> PathBuf {
        self.story_dir().join(TIMELINE_FILE)
    }

    /// Serialize `value` and replace `path` with it.
    async fn write_json<T: Serialize>(&self, path: &Path, value: &T) -> StorytellerResult<()> {
        let document = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let json = serde_json::to_vec_pretty(value)
            .map_err(|e| JsonError::new(document, e.to_string()))?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                    "{}: {}",
                    parent.display(),
                    e
                )))
            })?;
        }

        let temp_path = path.with_extension("json.tmp");
        tokio::fs::write(&temp_path, &json).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "{}: {}",
                temp_path.display(),
                e
            )))
        })?;

        tokio::fs::rename(&temp_path, path).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "rename {} to {}: {}",
                temp_path.display(),
                path.display(),
                e
            )))
        })?;

        tracing::debug!(path = %path.display(), size = json.len(), "Wrote JSON document");
        Ok(())
    }
}

#[async_trait]
impl ContentStorage for ContentFs {
    fn slug(&self) -> &str {
        &self.slug
    }

    #[tracing::instrument(skip(self, descriptor), fields(slug = %self.slug, items = descriptor.content().len()))]
    async fn save_descriptor(&self, descriptor: &ContentDescriptor) -> StorytellerResult<()> {
        self.write_json(&self.descriptor_path(), descriptor).await?;
        tracing::info!("Saved descriptor");
        Ok(())
    }

    #[tracing::instrument(skip(self, timeline), fields(slug = %self.slug))]
    async fn save_timeline(&self, timeline: &Timeline) -> StorytellerResult<()> {
        self.write_json(&self.timeline_path(), timeline).await?;
        tracing::info!("Saved timeline");
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(slug = %self.slug))]
    async fn load_descriptor(&self) -> StorytellerResult<ContentDescriptor> {
        let path = self.descriptor_path();

        let data = tokio::fs::read(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::new(StorageErrorKind::DescriptorNotFound(self.slug.clone()))
            } else {
                StorageError::new(StorageErrorKind::FileRead(format!(
                    "{}: {}",
                    path.display(),
                    e
                )))
            }
        })?;

        let descriptor: ContentDescriptor = serde_json::from_slice(&data)
            .map_err(|e| JsonError::new(path.display().to_string(), e.to_string()))?;
        tracing::debug!(items = descriptor.content().len(), "Loaded descriptor");
        Ok(descriptor)
    }

    fn image_path(&self, uid: &str) -> PathBuf {
        self.story_dir().join(IMAGES_DIR).join(format!("{}.png", uid))
    }

    fn audio_path(&self, uid: &str) -> PathBuf {
        self.story_dir().join(AUDIO_DIR).join(format!("{}.mp3", uid))
    }
}
