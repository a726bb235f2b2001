//! End-to-end pipeline runs against test doubles and a temporary directory.

mod test_utils;

use std::sync::Arc;
use storyteller_error::{CompletionErrorKind, StorytellerErrorKind};
use storyteller_interface::ContentStorage;
use storyteller_models::NarrationService;
use storyteller_pipeline::{ContentPipeline, SilentObserver};
use storyteller_storage::ContentFs;
use tempfile::TempDir;
use test_utils::*;

#[tokio::test]
async fn synthetic_run_persists_segments_in_order() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let storage = ContentFs::new(temp_dir.path(), "Mars")?;
    let client = Arc::new(ScriptedClient::new(story_replies(&MARS_SEGMENTS)));
    let pipeline = synthetic_pipeline(client.clone());

    let result = pipeline
        .generate("Mars", "Facts", &storage, &SilentObserver)
        .await?;

    assert_eq!(result.slug(), "mars");
    assert_eq!(result.topic(), "Facts");

    let persisted = storage.load_descriptor().await?;
    assert_eq!(persisted, *result.descriptor());
    assert_eq!(persisted.short_title(), "Mars");
    assert_eq!(persisted.content().len(), 2);
    for (item, (text, description)) in persisted.content().iter().zip(MARS_SEGMENTS) {
        assert!(!item.uid().is_empty());
        assert_eq!(item.text(), text);
        assert_eq!(item.image_description(), description);
        assert_eq!(item.audio_timestamps().len(), text.chars().count());
    }
    assert_ne!(persisted.content()[0].uid(), persisted.content()[1].uid());

    assert!(storage.timeline_path().exists());
    assert!(!storage.story_dir().join("images").exists());
    assert!(!storage.story_dir().join("audio").exists());
    Ok(())
}

#[tokio::test]
async fn segmentation_sees_the_generated_story() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let storage = ContentFs::new(temp_dir.path(), "Mars")?;
    let client = Arc::new(ScriptedClient::new(story_replies(&MARS_SEGMENTS)));

    synthetic_pipeline(client.clone())
        .generate("Mars", "Facts", &storage, &SilentObserver)
        .await?;

    let prompts = client.prompts();
    assert_eq!(prompts.len(), 2);
    assert!(prompts[0].contains("[Mars]"));
    assert!(prompts[1].contains("Mars is the fourth planet. It has two small moons."));
    Ok(())
}

#[tokio::test]
async fn stages_are_reported_in_order() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let storage = ContentFs::new(temp_dir.path(), "Mars")?;
    let client = Arc::new(ScriptedClient::new(story_replies(&MARS_SEGMENTS)));
    let observer = RecordingObserver::default();

    synthetic_pipeline(client)
        .generate("Mars", "Facts", &storage, &observer)
        .await?;

    assert_eq!(
        observer.stages(),
        vec![
            "awaiting story",
            "awaiting segmentation",
            "generating media 1/2",
            "generating media 2/2",
            "persisted",
        ]
    );
    Ok(())
}

#[tokio::test]
async fn images_take_their_own_steps_and_report_retries() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let storage = ContentFs::new(temp_dir.path(), "Mars")?;
    let client = Arc::new(ScriptedClient::new(story_replies(&MARS_SEGMENTS)));
    let observer = RecordingObserver::default();
    let pipeline = synthetic_pipeline(client).with_images(FlakyImages::failing(1));
    assert!(pipeline.images_enabled());

    let result = pipeline
        .generate("Mars", "Facts", &storage, &observer)
        .await?;

    let steps: Vec<String> = observer
        .events()
        .into_iter()
        .filter(|event| event.starts_with('['))
        .collect();
    assert_eq!(
        steps,
        vec![
            "[1/4] image via flaky",
            "[1/4] retry 1",
            "[2/4] voice via synthetic",
            "[3/4] image via flaky",
            "[4/4] voice via synthetic",
        ]
    );

    for item in result.descriptor().content() {
        assert_eq!(std::fs::read(storage.image_path(item.uid()))?, b"PNG");
    }
    Ok(())
}

#[tokio::test]
async fn timeline_references_only_written_artifacts() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;

    let bare = ContentFs::new(temp_dir.path(), "Mars")?;
    synthetic_pipeline(Arc::new(ScriptedClient::new(story_replies(&MARS_SEGMENTS))))
        .generate("Mars", "Facts", &bare, &SilentObserver)
        .await?;
    let timeline: serde_json::Value = serde_json::from_slice(&std::fs::read(bare.timeline_path())?)?;
    for element in timeline["elements"].as_array().into_iter().flatten() {
        assert!(element.get("image").is_none());
        assert!(element.get("audio").is_none());
    }

    let illustrated = ContentFs::new(temp_dir.path(), "Venus")?;
    synthetic_pipeline(Arc::new(ScriptedClient::new(story_replies(&MARS_SEGMENTS))))
        .with_images(FlakyImages::failing(0))
        .generate("Venus", "Facts", &illustrated, &SilentObserver)
        .await?;
    let timeline: serde_json::Value =
        serde_json::from_slice(&std::fs::read(illustrated.timeline_path())?)?;
    let elements = timeline["elements"].as_array().cloned().unwrap_or_default();
    assert_eq!(elements.len(), 2);
    for element in elements {
        let image = element["image"].as_str().unwrap_or_default();
        assert!(illustrated.story_dir().join(image).is_file());
        assert!(element.get("audio").is_none());
    }
    Ok(())
}

#[tokio::test]
async fn narration_failure_leaves_the_pre_media_descriptor() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let storage = ContentFs::new(temp_dir.path(), "Mars")?;
    let client = Arc::new(ScriptedClient::new(story_replies(&MARS_SEGMENTS)));
    let pipeline = ContentPipeline::new(writer(client), FailingNarrator::on_call(2));

    let err = pipeline
        .generate("Mars", "Facts", &storage, &SilentObserver)
        .await
        .unwrap_err();
    assert!(matches!(err.kind(), StorytellerErrorKind::Narration(_)));

    let persisted = storage.load_descriptor().await?;
    assert_eq!(persisted.content().len(), 2);
    assert!(persisted.content().iter().all(|item| item.audio_timestamps().is_empty()));
    assert!(!storage.timeline_path().exists());

    let first_audio = storage.audio_path(persisted.content()[0].uid());
    let second_audio = storage.audio_path(persisted.content()[1].uid());
    assert!(first_audio.exists());
    assert!(!second_audio.exists());
    Ok(())
}

#[tokio::test]
async fn image_failure_aborts_before_narration() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let storage = ContentFs::new(temp_dir.path(), "Mars")?;
    let client = Arc::new(ScriptedClient::new(story_replies(&MARS_SEGMENTS)));
    let observer = RecordingObserver::default();
    let pipeline = synthetic_pipeline(client)
        .with_images(storyteller_models::ImageService::new(Box::new(BrokenImages)));

    let err = pipeline
        .generate("Mars", "Facts", &storage, &observer)
        .await
        .unwrap_err();

    assert!(matches!(err.kind(), StorytellerErrorKind::Provider(_)));
    assert!(!observer.events().iter().any(|event| event.contains("voice")));
    assert!(!storage.timeline_path().exists());
    Ok(())
}

#[tokio::test]
async fn invalid_segmentation_persists_nothing() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let storage = ContentFs::new(temp_dir.path(), "Mars")?;
    let client = Arc::new(ScriptedClient::new(vec![
        serde_json::json!({ "text": "Mars is red." }),
        serde_json::json!({ "result": [] }),
    ]));

    let err = synthetic_pipeline(client)
        .generate("Mars", "Facts", &storage, &SilentObserver)
        .await
        .unwrap_err();

    match err.kind() {
        StorytellerErrorKind::Completion(e) => {
            assert!(matches!(e.kind, CompletionErrorKind::SchemaViolation(_)))
        }
        other => panic!("unexpected error {:?}", other),
    }
    assert!(!storage.story_dir().exists());
    Ok(())
}

#[tokio::test]
async fn blank_topic_is_rejected_before_any_call() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let storage = ContentFs::new(temp_dir.path(), "Mars")?;
    let client = Arc::new(ScriptedClient::new(Vec::new()));

    let err = synthetic_pipeline(client.clone())
        .generate("Mars", "  ", &storage, &SilentObserver)
        .await
        .unwrap_err();

    assert!(matches!(err.kind(), StorytellerErrorKind::Config(_)));
    assert!(client.prompts().is_empty());
    Ok(())
}

#[tokio::test]
async fn preview_returns_story_text_only() -> anyhow::Result<()> {
    let client = Arc::new(ScriptedClient::new(vec![serde_json::json!({
        "text": "Mars has the tallest volcano in the solar system."
    })]));

    let preview = writer(client.clone()).preview("Mars", "Facts").await?;

    assert_eq!(preview.title(), "Mars");
    assert_eq!(preview.topic(), "Facts");
    assert_eq!(
        preview.text(),
        "Mars has the tallest volcano in the solar system."
    );
    assert_eq!(client.prompts().len(), 1);
    Ok(())
}

#[test]
fn narration_service_is_reusable_by_pipelines() {
    let service = NarrationService::new(Box::new(storyteller_models::SyntheticNarrator));
    assert_eq!(service.backend_name(), "synthetic");
}

#[tokio::test]
async fn pipeline_preview_uses_one_completion() -> anyhow::Result<()> {
    let client = Arc::new(ScriptedClient::new(vec![serde_json::json!({
        "text": "Dust storms can cover all of Mars."
    })]));

    let preview = synthetic_pipeline(client.clone())
        .preview_story("Mars", "Weather")
        .await?;

    assert_eq!(preview.text(), "Dust storms can cover all of Mars.");
    assert_eq!(client.prompts().len(), 1);
    Ok(())
}

#[tokio::test]
async fn pipeline_can_renarrate_what_it_generated() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let storage = ContentFs::new(temp_dir.path(), "Mars")?;
    let client = Arc::new(ScriptedClient::new(story_replies(&MARS_SEGMENTS)));
    let pipeline = synthetic_pipeline(client);

    let generated = pipeline
        .generate("Mars", "Facts", &storage, &SilentObserver)
        .await?;
    let regenerated = pipeline.regenerate_audio(&storage, &SilentObserver).await?;

    assert_eq!(*regenerated.updated_count(), 2);
    assert_eq!(storage.load_descriptor().await?, *generated.descriptor());
    Ok(())
}
