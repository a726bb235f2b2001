//! Re-narrating through the facade re-exports, as the binary does.

use storyteller::{
    AudioRegenerator, ContentDescriptor, ContentFs, ContentStorage, NarrationService,
    SilentObserver, StorySegment, SyntheticNarrator,
};
use tempfile::TempDir;

#[tokio::test]
async fn synthetic_regeneration_fills_timings() {
    let temp_dir = TempDir::new().unwrap();
    let storage = ContentFs::new(temp_dir.path(), "Olympus Mons").unwrap();
    let descriptor = ContentDescriptor::from_segments(
        "Olympus Mons",
        vec![StorySegment {
            text: "The tallest volcano stands on Mars.".to_string(),
            image_description: "A vast shield volcano under a pink sky".to_string(),
        }],
    );
    storage.save_descriptor(&descriptor).await.unwrap();

    let regenerator = AudioRegenerator::new(NarrationService::new(Box::new(SyntheticNarrator)));
    let result = regenerator
        .regenerate(&storage, &SilentObserver)
        .await
        .unwrap();

    assert_eq!(result.slug(), "olympus-mons");
    let stored = storage.load_descriptor().await.unwrap();
    let timing = stored.content()[0].audio_timestamps();
    assert_eq!(timing.len(), "The tallest volcano stands on Mars.".chars().count());
    // Six words at 0.4 s each.
    assert!((timing.duration_seconds() - 2.4).abs() < 1e-9);
}
