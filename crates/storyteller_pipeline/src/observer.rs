//! Progress reporting hooks.

/// Pipeline state machine position.
///
/// Stages are strictly sequential; `GeneratingMedia` repeats once per
/// segment in narrative order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum Stage {
    /// Waiting for the narrative completion
    #[display("awaiting story")]
    AwaitingStory,
    /// Waiting for the segmentation completion
    #[display("awaiting segmentation")]
    AwaitingSegmentation,
    /// Resolving the image and narration of one segment
    #[display("generating media {}/{}", index + 1, total)]
    GeneratingMedia {
        /// Zero-based segment index
        index: usize,
        /// Number of segments
        total: usize,
    },
    /// Descriptor and timeline are on disk
    #[display("persisted")]
    Persisted,
}

/// Which artifact a media step produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum MediaStep {
    /// Segment image
    #[display("image")]
    Image,
    /// Segment narration
    #[display("voice")]
    Voice,
}

/// One numbered media step, `[step/total]`.
///
/// With images enabled each segment takes two steps (image, then voice);
/// otherwise one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepProgress<'a> {
    /// One-based step number
    pub step: usize,
    /// Number of steps in the run
    pub total: usize,
    /// Artifact being produced
    pub kind: MediaStep,
    /// Segment text
    pub text: &'a str,
    /// Provider or backend doing the work
    pub backend: &'static str,
}

/// Receives progress notifications from a running pipeline.
///
/// Every method defaults to doing nothing. Implementations must not block;
/// the pipeline never consults the observer for control flow.
pub trait PipelineObserver: Send + Sync {
    /// The pipeline entered `stage`.
    fn stage_changed(&self, _stage: Stage) {}

    /// A media step is starting.
    fn step_started(&self, _progress: &StepProgress<'_>) {}

    /// The image provider failed `attempt` and is about to try again.
    fn image_retry(&self, _progress: &StepProgress<'_>, _attempt: u32) {}
}

/// Observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentObserver;

impl PipelineObserver for SilentObserver {}
