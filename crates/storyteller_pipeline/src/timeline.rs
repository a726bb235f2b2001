//! A minimal timeline: segments back to back.

use serde::Serialize;
use storyteller_core::{ContentDescriptor, Timeline};
use storyteller_error::{JsonError, StorytellerResult};
use storyteller_interface::TimelineBuilder;

/// Places each segment immediately after the previous one.
///
/// A segment lasts until its last character ends; segments with an empty
/// alignment take no time. Artifacts are referenced relative to the story
/// directory by uid, and only for the kinds the run actually wrote: a run
/// with images disabled gets no `image` entries, synthetic narration no
/// `audio` entries.
///
/// # Examples
///
/// ```
/// use storyteller_core::{ContentDescriptor, StorySegment, TimingAlignment};
/// use storyteller_interface::TimelineBuilder;
/// use storyteller_pipeline::SequentialTimelineBuilder;
///
/// let mut descriptor = ContentDescriptor::from_segments(
///     "Mars",
///     vec![StorySegment { text: "Red.".into(), image_description: "A planet".into() }],
/// );
/// descriptor.content_mut()[0].set_audio_timestamps(TimingAlignment::from_text("Red.", 2.0));
///
/// let timeline = SequentialTimelineBuilder::default()
///     .with_images(false)
///     .build(&descriptor)
///     .unwrap();
/// assert_eq!(timeline.as_value()["durationSeconds"], 2.0);
/// assert!(timeline.as_value()["elements"][0].get("image").is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_getters::Getters)]
pub struct SequentialTimelineBuilder {
    /// Whether elements reference `images/<uid>.png`
    link_images: bool,
    /// Whether elements reference `audio/<uid>.mp3`
    link_audio: bool,
}

impl Default for SequentialTimelineBuilder {
    fn default() -> Self {
        Self {
            link_images: true,
            link_audio: true,
        }
    }
}

impl SequentialTimelineBuilder {
    /// Reference image files only when `linked`.
    pub fn with_images(mut self, linked: bool) -> Self {
        self.link_images = linked;
        self
    }

    /// Reference audio files only when `linked`.
    pub fn with_audio(mut self, linked: bool) -> Self {
        self.link_audio = linked;
        self
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SequentialTimeline<'a> {
    short_title: &'a str,
    duration_seconds: f64,
    elements: Vec<TimelineElement<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TimelineElement<'a> {
    uid: &'a str,
    start_seconds: f64,
    end_seconds: f64,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    audio: Option<String>,
}

impl TimelineBuilder for SequentialTimelineBuilder {
    fn build(&self, descriptor: &ContentDescriptor) -> StorytellerResult<Timeline> {
        let mut cursor = 0.0;
        let elements = descriptor
            .content()
            .iter()
            .map(|item| {
                let start = cursor;
                cursor += item.audio_timestamps().duration_seconds();
                TimelineElement {
                    uid: item.uid(),
                    start_seconds: start,
                    end_seconds: cursor,
                    text: item.text(),
                    image: self
                        .link_images
                        .then(|| format!("images/{}.png", item.uid())),
                    audio: self
                        .link_audio
                        .then(|| format!("audio/{}.mp3", item.uid())),
                }
            })
            .collect();

        let timeline = SequentialTimeline {
            short_title: descriptor.short_title(),
            duration_seconds: cursor,
            elements,
        };
        let value = serde_json::to_value(&timeline)
            .map_err(|e| JsonError::new("timeline", e.to_string()))?;
        Ok(Timeline::new(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storyteller_core::{StorySegment, TimingAlignment};

    fn segment(text: &str) -> StorySegment {
        StorySegment {
            text: text.to_string(),
            image_description: format!("Picture of {}", text),
        }
    }

    #[test]
    fn segments_are_placed_back_to_back() {
        let mut descriptor =
            ContentDescriptor::from_segments("Mars", vec![segment("One."), segment("Two.")]);
        descriptor.content_mut()[0].set_audio_timestamps(TimingAlignment::from_text("One.", 1.5));
        descriptor.content_mut()[1].set_audio_timestamps(TimingAlignment::from_text("Two.", 2.5));
        let second_uid = descriptor.content()[1].uid().clone();

        let timeline = SequentialTimelineBuilder::default().build(&descriptor).unwrap();
        let value = timeline.as_value();

        assert_eq!(value["shortTitle"], "Mars");
        assert_eq!(value["durationSeconds"], 4.0);
        assert_eq!(value["elements"][1]["startSeconds"], 1.5);
        assert_eq!(value["elements"][1]["endSeconds"], 4.0);
        assert_eq!(
            value["elements"][1]["audio"],
            format!("audio/{}.mp3", second_uid)
        );
    }

    #[test]
    fn unnarrated_segments_take_no_time() {
        let descriptor = ContentDescriptor::from_segments("Mars", vec![segment("One.")]);
        let timeline = SequentialTimelineBuilder::default().build(&descriptor).unwrap();
        assert_eq!(timeline.as_value()["durationSeconds"], 0.0);
    }

    #[test]
    fn unwritten_artifacts_are_not_referenced() {
        let descriptor = ContentDescriptor::from_segments("Mars", vec![segment("One.")]);
        let uid = descriptor.content()[0].uid().clone();

        let narrated_only = SequentialTimelineBuilder::default()
            .with_images(false)
            .build(&descriptor)
            .unwrap();
        let element = &narrated_only.as_value()["elements"][0];
        assert!(element.get("image").is_none());
        assert_eq!(element["audio"], format!("audio/{}.mp3", uid));

        let synthetic = SequentialTimelineBuilder::default()
            .with_audio(false)
            .build(&descriptor)
            .unwrap();
        let element = &synthetic.as_value()["elements"][0];
        assert_eq!(element["image"], format!("images/{}.png", uid));
        assert!(element.get("audio").is_none());
    }
}
