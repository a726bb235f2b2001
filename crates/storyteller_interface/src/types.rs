//! Values exchanged across the capability traits.

use storyteller_core::TimingAlignment;

/// What a narration backend knows about the timing of its audio.
#[derive(Debug, Clone, PartialEq)]
pub enum NarrationTiming {
    /// The service returned its own character alignment; it is passed on
    /// as is.
    Aligned(TimingAlignment),
    /// The backend computed an alignment locally without any audio to
    /// measure.
    Estimated(TimingAlignment),
    /// Only the audio is known; timing is derived from its duration once the
    /// bytes are on disk.
    FromAudioDuration,
}

/// Output of [`NarrationBackend::synthesize`](crate::NarrationBackend::synthesize).
#[derive(Debug, Clone, PartialEq)]
pub struct Narration {
    /// Encoded audio, absent when the backend produces timing only
    pub audio: Option<Vec<u8>>,
    /// Timing information for the audio
    pub timing: NarrationTiming,
}

impl Narration {
    /// Audio with an alignment supplied by the backend.
    pub fn aligned(audio: Vec<u8>, alignment: TimingAlignment) -> Self {
        Self {
            audio: Some(audio),
            timing: NarrationTiming::Aligned(alignment),
        }
    }

    /// Audio whose timing must be measured from the written file.
    pub fn untimed(audio: Vec<u8>) -> Self {
        Self {
            audio: Some(audio),
            timing: NarrationTiming::FromAudioDuration,
        }
    }

    /// Estimated timing without any audio.
    pub fn timing_only(alignment: TimingAlignment) -> Self {
        Self {
            audio: None,
            timing: NarrationTiming::Estimated(alignment),
        }
    }
}
