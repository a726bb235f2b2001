//! Character-level timing alignment.
//!
//! Every narration backend is normalized to this one representation. Cloud TTS
//! reports it natively; the other backends only know a total duration, which is
//! spread evenly over the characters of the segment.

use serde::{Deserialize, Serialize};

/// Seconds of speech assumed per word when no real duration is known.
const SECONDS_PER_WORD: f64 = 0.4;

/// Lower bound for the word-count estimate.
const MIN_ESTIMATED_SECONDS: f64 = 1.0;

/// Per-character timing map over a segment's audio.
///
/// The three sequences are parallel and always the same length. Start times are
/// non-decreasing and each start is at or before its end.
///
/// Serialized with the field names the downstream renderer reads
/// (`characters`, `characterStartTimesSeconds`, `characterEndTimesSeconds`).
///
/// # Examples
///
/// ```
/// use storyteller_core::TimingAlignment;
///
/// let alignment = TimingAlignment::from_text("Hi!", 3.0);
/// assert_eq!(alignment.characters, vec!["H", "i", "!"]);
/// assert_eq!(alignment.start_times_seconds, vec![0.0, 1.0, 2.0]);
/// assert_eq!(alignment.end_times_seconds, vec![1.0, 2.0, 3.0]);
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TimingAlignment {
    /// One entry per character of the narrated text
    pub characters: Vec<String>,
    /// When each character starts, in seconds from the beginning of the audio
    #[serde(rename = "characterStartTimesSeconds")]
    pub start_times_seconds: Vec<f64>,
    /// When each character ends, in seconds from the beginning of the audio
    #[serde(rename = "characterEndTimesSeconds")]
    pub end_times_seconds: Vec<f64>,
}

impl TimingAlignment {
    /// An alignment with no characters.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Spread `duration_seconds` evenly across the characters of `text`.
    ///
    /// A non-positive duration is replaced by [`estimate_duration_seconds`].
    /// Empty text yields an empty alignment whatever the duration.
    #[tracing::instrument(level = "debug", skip(text), fields(chars))]
    pub fn from_text(text: &str, duration_seconds: f64) -> Self {
        let characters: Vec<String> = text.chars().map(String::from).collect();
        tracing::Span::current().record("chars", characters.len());

        if characters.is_empty() {
            return Self::empty();
        }

        let duration = if duration_seconds > 0.0 {
            duration_seconds
        } else {
            estimate_duration_seconds(text)
        };
        let per_char = duration / characters.len() as f64;

        let start_times_seconds: Vec<f64> = (0..characters.len())
            .map(|i| i as f64 * per_char)
            .collect();
        let end_times_seconds = start_times_seconds
            .iter()
            .map(|start| start + per_char)
            .collect();

        Self {
            characters,
            start_times_seconds,
            end_times_seconds,
        }
    }

    /// Number of characters covered.
    pub fn len(&self) -> usize {
        self.characters.len()
    }

    /// True when no characters are covered.
    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    /// End time of the last character, or zero for an empty alignment.
    pub fn duration_seconds(&self) -> f64 {
        self.end_times_seconds.last().copied().unwrap_or(0.0)
    }

    /// Check the parallel-sequence invariants.
    ///
    /// # Errors
    ///
    /// Returns a description of the first violation found.
    pub fn validate(&self) -> Result<(), String> {
        let n = self.characters.len();
        if self.start_times_seconds.len() != n || self.end_times_seconds.len() != n {
            return Err(format!(
                "length mismatch: {} characters, {} start times, {} end times",
                n,
                self.start_times_seconds.len(),
                self.end_times_seconds.len()
            ));
        }

        for (i, (start, end)) in self
            .start_times_seconds
            .iter()
            .zip(&self.end_times_seconds)
            .enumerate()
        {
            if start > end {
                return Err(format!("character {} starts at {} after it ends at {}", i, start, end));
            }
            if i > 0 && *start < self.start_times_seconds[i - 1] {
                return Err(format!("start time decreases at character {}", i));
            }
        }

        Ok(())
    }
}

/// Rough speech duration for `text`: 0.4 seconds per word, at least one second.
///
/// # Examples
///
/// ```
/// use storyteller_core::estimate_duration_seconds;
///
/// assert_eq!(estimate_duration_seconds("one two three four five"), 2.0);
/// assert_eq!(estimate_duration_seconds(""), 1.0);
/// ```
pub fn estimate_duration_seconds(text: &str) -> f64 {
    let words = text.split_whitespace().count();
    (words as f64 * SECONDS_PER_WORD).max(MIN_ESTIMATED_SECONDS)
}
