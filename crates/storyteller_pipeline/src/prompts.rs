//! Prompt templates for the two completion calls.

use storyteller_core::Language;

/// Prompt asking for the full story as one paragraph.
///
/// # Examples
///
/// ```
/// use storyteller_core::Language;
/// use storyteller_pipeline::story_prompt;
///
/// let prompt = story_prompt("Mars", "Facts", Language::English);
/// assert!(prompt.contains("[Mars]"));
/// assert!(prompt.contains("[Facts]"));
/// assert!(prompt.contains("written in English"));
/// ```
pub fn story_prompt(title: &str, topic: &str, language: Language) -> String {
    format!(
        "Write a short story with title [{title}] (its topic is [{topic}]).
You must follow best practices for great storytelling.
The script must be 8-10 sentences long.
Story events can be from anywhere in the world, but the final text must be written in {language}.
Return the result without any formatting and title, as one continuous text.
Skip new lines."
    )
}

/// Prompt asking for sentence-aligned segments with image descriptions.
pub fn segmentation_prompt(story_text: &str, language: Language) -> String {
    format!(
        r#"You are given story text.
Generate (in {language}) 5-8 very detailed image descriptions for this story.
Return their description as a json array with story sentences matched to images.
Story sentences must be in the same order as in the story and their content must be preserved.
Each image must match 1-2 sentences from the story.
Images must show story content in a way that is visually appealing and engaging, not just characters.
Give output in json format:

{{
  "result": [
    {{
      "text": "....",
      "imageDescription": "..."
    }}
  ]
}}

<story>
{story_text}
</story>"#
    )
}
