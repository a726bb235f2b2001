//! Command handlers.

use super::ConsoleObserver;
use reqwest::Client;
use storyteller::{
    AudioRegenerator, ContentFs, ContentPipeline, HttpError, RunConfig, StoryWriter,
    StorytellerResult, StorytellerSettings,
};
use tracing::{info, instrument};

const USER_AGENT: &str = concat!("storyteller/", env!("CARGO_PKG_VERSION"));

fn http_client() -> StorytellerResult<Client> {
    Ok(Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| HttpError::new(USER_AGENT, e.to_string()))?)
}

fn run_config() -> StorytellerResult<RunConfig> {
    Ok(RunConfig::from_env(StorytellerSettings::load()?))
}

/// Run the full pipeline for a new story.
#[instrument(skip(api_key, elevenlabs_api_key))]
pub async fn generate(
    title: &str,
    topic: &str,
    api_key: Option<String>,
    elevenlabs_api_key: Option<String>,
) -> StorytellerResult<()> {
    let config = run_config()?
        .with_openai_api_key(api_key)
        .with_elevenlabs_api_key(elevenlabs_api_key);
    config.validate_for_generation()?;

    println!("Creating story: \"{}\"", title);
    println!("Topic: {}\n", topic);

    let pipeline = ContentPipeline::from_config(http_client()?, &config)?;
    let storage = ContentFs::new(config.settings().storage().content_root(), title)?;
    let result = pipeline
        .generate(title, topic, &storage, &ConsoleObserver)
        .await?;

    info!(slug = %result.slug(), segments = result.descriptor().content().len(), "Generation complete");
    println!("\nStory generation complete: {}", storage.story_dir().display());
    Ok(())
}

/// Print the story text only.
#[instrument(skip(api_key))]
pub async fn preview(title: &str, topic: &str, api_key: Option<String>) -> StorytellerResult<()> {
    let config = run_config()?.with_openai_api_key(api_key);
    let writer = StoryWriter::from_config(http_client()?, &config)?;
    let preview = writer.preview(title, topic).await?;
    println!("{}", preview.text());
    Ok(())
}

/// Narrate a stored story again.
#[instrument(skip(elevenlabs_api_key))]
pub async fn regenerate_audio(
    title: &str,
    elevenlabs_api_key: Option<String>,
) -> StorytellerResult<()> {
    let config = run_config()?.with_elevenlabs_api_key(elevenlabs_api_key);
    config.validate_for_narration()?;

    let regenerator = AudioRegenerator::from_config(http_client()?, &config)?;
    let storage = ContentFs::new(config.settings().storage().content_root(), title)?;
    let result = regenerator.regenerate(&storage, &ConsoleObserver).await?;

    println!(
        "Regenerated audio for {} segments of \"{}\" ({})",
        result.updated_count(),
        result.title(),
        result.slug()
    );
    Ok(())
}
