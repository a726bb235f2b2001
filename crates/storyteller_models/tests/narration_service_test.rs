//! Tests for narration backend selection and alignment normalization.

mod test_utils;

use storyteller_core::{TimingAlignment, estimate_duration_seconds};
use storyteller_error::StorytellerErrorKind;
use storyteller_interface::Narration;
use storyteller_models::{
    NarrationBackendKind, NarrationService, SyntheticNarrator, select_narration_backend,
};
use tempfile::TempDir;
use test_utils::{CannedNarrator, config_with, pcm_wav};

#[tokio::test]
async fn synthetic_mode_writes_no_audio() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let destination = dir.path().join("audio").join("abc.mp3");
    let service = NarrationService::new(Box::new(SyntheticNarrator));

    let alignment = service.narrate("Red dust rises.", &destination).await?;

    assert!(!destination.exists());
    assert_eq!(alignment.len(), "Red dust rises.".chars().count());
    let expected = estimate_duration_seconds("Red dust rises.");
    assert!((alignment.duration_seconds() - expected).abs() < 1e-9);
    Ok(())
}

#[tokio::test]
async fn untimed_audio_uses_measured_duration() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let destination = dir.path().join("abc.wav");
    let service = NarrationService::new(Box::new(CannedNarrator::new(Narration::untimed(
        pcm_wav(8000, 3),
    ))));

    let alignment = service.narrate("Hello", &destination).await?;

    assert!(destination.exists());
    assert_eq!(alignment.characters, vec!["H", "e", "l", "l", "o"]);
    assert!((alignment.duration_seconds() - 3.0).abs() < 1e-6);
    assert!((alignment.end_times_seconds[0] - 0.6).abs() < 1e-6);
    Ok(())
}

#[tokio::test]
async fn unreadable_audio_falls_back_to_estimate() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let destination = dir.path().join("abc.mp3");
    let text = "one two three four five six";
    let service = NarrationService::new(Box::new(CannedNarrator::new(Narration::untimed(
        b"not really audio".to_vec(),
    ))));

    let alignment = service.narrate(text, &destination).await?;

    assert_eq!(std::fs::read(&destination)?, b"not really audio");
    assert_eq!(alignment, TimingAlignment::from_text(text, estimate_duration_seconds(text)));
    Ok(())
}

#[tokio::test]
async fn native_alignment_is_passed_through() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let native = TimingAlignment {
        characters: vec!["O".into(), "k".into()],
        start_times_seconds: vec![0.0, 0.2],
        end_times_seconds: vec![0.2, 0.45],
    };
    let service = NarrationService::new(Box::new(CannedNarrator::new(Narration::aligned(
        vec![0xFF, 0xFB],
        native.clone(),
    ))));

    let alignment = service.narrate("Ok", &dir.path().join("ok.mp3")).await?;

    assert_eq!(alignment, native);
    Ok(())
}

#[tokio::test]
async fn native_alignment_is_not_second_guessed() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let overlapping = TimingAlignment {
        characters: vec!["O".into(), "k".into()],
        start_times_seconds: vec![0.3, 0.2],
        end_times_seconds: vec![0.2, 0.45],
    };
    let service = NarrationService::new(Box::new(CannedNarrator::new(Narration::aligned(
        vec![0xFF],
        overlapping.clone(),
    ))));

    let alignment = service.narrate("Ok", &dir.path().join("ok.mp3")).await?;

    assert_eq!(alignment, overlapping);
    Ok(())
}

#[tokio::test]
async fn inconsistent_estimated_alignment_is_rejected() {
    let dir = TempDir::new().unwrap();
    let broken = TimingAlignment {
        characters: vec!["O".into(), "k".into()],
        start_times_seconds: vec![0.0],
        end_times_seconds: vec![0.2, 0.45],
    };
    let service = NarrationService::new(Box::new(CannedNarrator::new(Narration::timing_only(
        broken,
    ))));

    let err = service
        .narrate("Ok", &dir.path().join("ok.mp3"))
        .await
        .unwrap_err();

    assert!(matches!(err.kind(), StorytellerErrorKind::Narration(_)));
}

#[test]
fn backend_precedence_is_synthetic_then_local_then_cloud() {
    let everything = config_with(&[
        ("SYNTHETIC_TIMESTAMPS_ONLY", "1"),
        ("LOCAL_TTS_URL", "http://tts"),
        ("ELEVENLABS_API_KEY", "xi"),
    ]);
    assert_eq!(select_narration_backend(&everything), NarrationBackendKind::Synthetic);

    let local_and_cloud = config_with(&[("LOCAL_TTS_URL", "http://tts"), ("ELEVENLABS_API_KEY", "xi")]);
    assert_eq!(select_narration_backend(&local_and_cloud), NarrationBackendKind::Local);

    let cloud = config_with(&[("ELEVENLABS_API_KEY", "xi")]);
    assert_eq!(select_narration_backend(&cloud), NarrationBackendKind::ElevenLabs);
}

#[test]
fn cloud_backend_without_key_is_a_configuration_error() {
    let err = NarrationService::from_config(reqwest::Client::new(), &config_with(&[]))
        .err()
        .unwrap();
    assert!(matches!(err.kind(), StorytellerErrorKind::Config(_)));
}

#[test]
fn configured_service_reports_backend_name() -> anyhow::Result<()> {
    let local = NarrationService::from_config(
        reqwest::Client::new(),
        &config_with(&[("LOCAL_TTS_URL", "http://tts")]),
    )?;
    assert_eq!(local.backend_name(), "local");
    Ok(())
}
