//! Console progress output.

use storyteller::{MediaStep, PipelineObserver, Stage, StepProgress};

/// Prints pipeline progress to stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleObserver;

fn describe(progress: &StepProgress<'_>) -> String {
    let action = match progress.kind {
        MediaStep::Image => "Generating image for",
        MediaStep::Voice => "Generating voice for",
    };
    format!(
        "[{}/{}] {} {} ({})",
        progress.step, progress.total, action, progress.text, progress.backend
    )
}

impl PipelineObserver for ConsoleObserver {
    fn stage_changed(&self, stage: Stage) {
        match stage {
            Stage::AwaitingStory => println!("Generating story..."),
            Stage::AwaitingSegmentation => println!("Generating image descriptions..."),
            Stage::GeneratingMedia { .. } => {}
            Stage::Persisted => println!("Final result generated!"),
        }
    }

    fn step_started(&self, progress: &StepProgress<'_>) {
        println!("{}", describe(progress));
    }

    fn image_retry(&self, progress: &StepProgress<'_>, attempt: u32) {
        println!("{} (retry {})", describe(progress), attempt + 1);
    }
}
