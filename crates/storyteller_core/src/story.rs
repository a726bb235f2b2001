//! Structured outputs requested from the language model.

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A type the completion client can ask the model for.
///
/// The JSON schema derived from the type constrains generation upstream;
/// deserialization plus [`StructuredOutput::validate`] checks the result
/// after the fact.
pub trait StructuredOutput: JsonSchema + DeserializeOwned + Send {
    /// Semantic checks serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns a human-readable reason when the value is unusable.
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

/// The full generated narrative, as one continuous paragraph.
///
/// # Examples
///
/// ```
/// use storyteller_core::{StoryScript, StructuredOutput};
///
/// let story: StoryScript = serde_json::from_str(r#"{"text":"Once upon a time."}"#).unwrap();
/// assert!(story.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct StoryScript {
    /// Narrative prose without headings or line breaks
    pub text: String,
}

impl StructuredOutput for StoryScript {
    fn validate(&self) -> Result<(), String> {
        if self.text.trim().is_empty() {
            return Err("story text is empty".to_string());
        }
        Ok(())
    }
}

/// One sentence-aligned chunk of the narrative with its visual description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct StorySegment {
    /// One or two sentences copied from the story, in order
    pub text: String,
    /// Detailed, generation-ready description of the image for this chunk
    pub image_description: String,
}

/// Ordered segmentation of a story.
///
/// Strict structured outputs need an object at the root, so the list is
/// wrapped in a `result` field.
///
/// # Examples
///
/// ```
/// use storyteller_core::{StorySegments, StructuredOutput};
///
/// let json = r#"{"result":[{"text":"It rained.","imageDescription":"A wet street at dusk"}]}"#;
/// let segments: StorySegments = serde_json::from_str(json).unwrap();
/// assert_eq!(segments.result.len(), 1);
/// assert!(segments.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct StorySegments {
    /// Segments in narrative order
    pub result: Vec<StorySegment>,
}

impl StructuredOutput for StorySegments {
    fn validate(&self) -> Result<(), String> {
        if self.result.is_empty() {
            return Err("segmentation returned no segments".to_string());
        }
        for (i, segment) in self.result.iter().enumerate() {
            if segment.text.trim().is_empty() {
                return Err(format!("segment {} has empty text", i));
            }
            if segment.image_description.trim().is_empty() {
                return Err(format!("segment {} has an empty image description", i));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_story_is_rejected() {
        let story = StoryScript {
            text: "   ".to_string(),
        };
        assert!(story.validate().is_err());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let parsed: Result<StoryScript, _> =
            serde_json::from_str(r#"{"text":"x","title":"Mars"}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn empty_segmentation_is_rejected() {
        let segments = StorySegments { result: vec![] };
        assert!(segments.validate().is_err());
    }

    #[test]
    fn segment_without_description_is_rejected() {
        let segments = StorySegments {
            result: vec![StorySegment {
                text: "It rained.".to_string(),
                image_description: String::new(),
            }],
        };
        assert!(segments.validate().unwrap_err().contains("segment 0"));
    }
}
