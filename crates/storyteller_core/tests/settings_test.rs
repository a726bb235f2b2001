use std::io::Write;
use std::path::Path;
use storyteller_core::StorytellerSettings;
use tempfile::Builder;

#[test]
fn bundled_defaults_match_provider_constants() {
    let settings = StorytellerSettings::default();

    assert_eq!(settings.completion().model(), "gpt-4o-mini");
    assert_eq!(settings.images().dalle_model(), "dall-e-3");
    assert_eq!(settings.images().gemini_model(), "gemini-2.5-flash-image");
    assert_eq!(*settings.images().retry_attempts(), 3);
    assert_eq!(*settings.images().retry_backoff_ms(), 1000);
    assert_eq!(settings.narration().voice_id(), "21m00Tcm4TlvDq8ikWAM");
    assert_eq!(
        settings.storage().content_root(),
        Path::new("public/content")
    );
}

#[test]
fn user_file_overrides_only_what_it_names() {
    let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(
        file,
        r#"
[completion]
model = "gpt-4o"

[storage]
content_root = "/tmp/stories"
"#
    )
    .unwrap();

    let settings = StorytellerSettings::from_file(file.path()).unwrap();

    assert_eq!(settings.completion().model(), "gpt-4o");
    assert_eq!(
        settings.completion().endpoint(),
        "https://api.openai.com/v1/chat/completions"
    );
    assert_eq!(settings.storage().content_root(), Path::new("/tmp/stories"));
    assert_eq!(*settings.images().width(), 1792);
}

#[test]
fn zero_retry_attempts_are_rejected() {
    let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(file, "[images]\nretry_attempts = 0").unwrap();

    assert!(StorytellerSettings::from_file(file.path()).is_err());
}

#[test]
fn unknown_keys_are_rejected() {
    let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(file, "[images]\nbogus = 1").unwrap();

    assert!(StorytellerSettings::from_file(file.path()).is_err());
}

#[test]
fn missing_file_is_an_error() {
    assert!(StorytellerSettings::from_file("/nonexistent/storyteller.toml").is_err());
}
