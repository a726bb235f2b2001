use async_trait::async_trait;
use storyteller_core::TimingAlignment;
use storyteller_error::StorytellerResult;
use storyteller_interface::{Narration, NarrationBackend};

/// Offline narration: no audio, timing estimated from the word count.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntheticNarrator;

#[async_trait]
impl NarrationBackend for SyntheticNarrator {
    async fn synthesize(&self, text: &str) -> StorytellerResult<Narration> {
        Ok(Narration::timing_only(TimingAlignment::from_text(text, 0.0)))
    }

    fn backend_name(&self) -> &'static str {
        "synthetic"
    }

    fn writes_audio(&self) -> bool {
        false
    }
}
