//! The persisted content descriptor and its items.

use crate::{StorySegment, TimingAlignment};
use serde::{Deserialize, Serialize};

/// One segment of a story together with its generated media keys.
///
/// `uid` is assigned once, when the item is created from a segment, and names
/// the segment's image and audio files for the rest of its life.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    /// Stable identifier, used as the artifact filename stem
    uid: String,
    /// Narrated text of the segment
    text: String,
    /// Prompt used for the segment's image
    image_description: String,
    /// Timing of the narrated audio; empty until narration completes
    audio_timestamps: TimingAlignment,
}

impl ContentItem {
    /// Create an item for `segment` with a fresh uid and an empty alignment.
    ///
    /// # Examples
    ///
    /// ```
    /// use storyteller_core::{ContentItem, StorySegment};
    ///
    /// let item = ContentItem::from_segment(StorySegment {
    ///     text: "It rained.".to_string(),
    ///     image_description: "A wet street".to_string(),
    /// });
    /// assert!(!item.uid().is_empty());
    /// assert!(item.audio_timestamps().is_empty());
    /// ```
    pub fn from_segment(segment: StorySegment) -> Self {
        Self {
            uid: uuid::Uuid::new_v4().to_string(),
            text: segment.text,
            image_description: segment.image_description,
            audio_timestamps: TimingAlignment::empty(),
        }
    }

    /// Replace the narration timing. Nothing else about the item changes.
    pub fn set_audio_timestamps(&mut self, alignment: TimingAlignment) {
        self.audio_timestamps = alignment;
    }
}

/// The full persisted unit of work for one story.
///
/// `content` is in narrative order; timeline construction depends on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
#[serde(rename_all = "camelCase")]
pub struct ContentDescriptor {
    /// Story title as given by the user
    short_title: String,
    /// Items in narrative order
    content: Vec<ContentItem>,
}

impl ContentDescriptor {
    /// An empty descriptor for `title`.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            short_title: title.into(),
            content: Vec::new(),
        }
    }

    /// Build a descriptor with one freshly identified item per segment.
    ///
    /// # Examples
    ///
    /// ```
    /// use storyteller_core::{ContentDescriptor, StorySegment};
    ///
    /// let segments = vec![
    ///     StorySegment { text: "One.".into(), image_description: "First".into() },
    ///     StorySegment { text: "Two.".into(), image_description: "Second".into() },
    /// ];
    /// let descriptor = ContentDescriptor::from_segments("Mars", segments);
    /// assert_eq!(descriptor.content().len(), 2);
    /// assert_eq!(descriptor.content()[1].text(), "Two.");
    /// ```
    pub fn from_segments(title: impl Into<String>, segments: Vec<StorySegment>) -> Self {
        let mut descriptor = Self::new(title);
        descriptor
            .content
            .extend(segments.into_iter().map(ContentItem::from_segment));
        descriptor
    }

    /// Mutable access to the items, for filling in media results.
    pub fn content_mut(&mut self) -> &mut [ContentItem] {
        &mut self.content
    }
}

/// Render-ready schedule derived from a completed descriptor.
///
/// The pipeline never looks inside; it hands the value from the timeline
/// builder to storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timeline(serde_json::Value);

impl Timeline {
    /// Wrap a builder's output.
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    /// Borrow the underlying JSON.
    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }
}
