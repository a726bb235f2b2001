//! Storyteller CLI binary.
//!
//! This binary provides command-line access to the story pipeline:
//! - Generate a full story bundle
//! - Preview the story text
//! - Regenerate narration for an existing story

use clap::Parser;
use storyteller::telemetry::{LogFormat, init_tracing};

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    use cli::{Cli, Commands};

    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    let format = if cli.json_logs {
        LogFormat::Json
    } else {
        LogFormat::Pretty
    };
    init_tracing(cli.verbose, format)?;

    // Execute the requested command
    let outcome = match cli.command {
        Commands::Generate {
            story,
            elevenlabs_api_key,
        } => cli::generate(&story.title, &story.topic, story.api_key, elevenlabs_api_key).await,

        Commands::Preview { story } => cli::preview(&story.title, &story.topic, story.api_key).await,

        Commands::RegenerateAudio {
            title,
            elevenlabs_api_key,
        } => cli::regenerate_audio(&title, elevenlabs_api_key).await,
    };

    if let Err(e) = outcome {
        tracing::error!(error = %e, "Command failed");
        return Err(e.into());
    }
    Ok(())
}
