//! Shared test doubles for pipeline tests.

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use storyteller_core::{Language, TimingAlignment};
use storyteller_error::{
    NarrationError, NarrationErrorKind, ProviderError, StorytellerResult,
};
use storyteller_interface::{
    CompletionClient, ImageProvider, Narration, NarrationBackend, RetryCallback,
};
use storyteller_models::{ImageService, NarrationService, SyntheticNarrator};
use storyteller_pipeline::{
    ContentPipeline, PipelineObserver, Stage, StepProgress, StoryWriter,
};

/// Completion client replaying queued replies in order.
#[derive(Default)]
pub struct ScriptedClient {
    replies: Mutex<VecDeque<Value>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedClient {
    pub fn new(replies: Vec<Value>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    async fn complete_json(&self, prompt: &str, _schema: &Value) -> StorytellerResult<Value> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected completion call");
        Ok(reply)
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}

/// Story reply followed by a segmentation reply with `segments`.
pub fn story_replies(segments: &[(&str, &str)]) -> Vec<Value> {
    let story: String = segments
        .iter()
        .map(|(text, _)| *text)
        .collect::<Vec<_>>()
        .join(" ");
    let result: Vec<Value> = segments
        .iter()
        .map(|(text, description)| json!({ "text": text, "imageDescription": description }))
        .collect();
    vec![json!({ "text": story }), json!({ "result": result })]
}

pub const MARS_SEGMENTS: [(&str, &str); 2] = [
    ("Mars is the fourth planet.", "A rusty red planet against black space"),
    ("It has two small moons.", "Phobos and Deimos orbiting Mars"),
];

/// Writer over `client` producing English text.
pub fn writer(client: Arc<ScriptedClient>) -> StoryWriter {
    StoryWriter::new(client, Language::English)
}

/// Pipeline with synthetic narration and images disabled.
pub fn synthetic_pipeline(client: Arc<ScriptedClient>) -> ContentPipeline {
    ContentPipeline::new(
        writer(client),
        NarrationService::new(Box::new(SyntheticNarrator)),
    )
}

/// Image provider returning fixed bytes, failing the first `failures` calls.
pub struct FlakyImages {
    failures: Mutex<u32>,
}

impl FlakyImages {
    pub fn failing(failures: u32) -> ImageService {
        ImageService::new(Box::new(Self {
            failures: Mutex::new(failures),
        }))
    }
}

#[async_trait]
impl ImageProvider for FlakyImages {
    async fn resolve(&self, _prompt: &str, on_retry: RetryCallback<'_>) -> StorytellerResult<Vec<u8>> {
        let mut attempt = 1;
        loop {
            let failing = {
                let mut failures = self.failures.lock().unwrap();
                if *failures > 0 {
                    *failures -= 1;
                    true
                } else {
                    false
                }
            };
            if !failing {
                return Ok(b"PNG".to_vec());
            }
            on_retry(attempt);
            attempt += 1;
        }
    }

    fn provider_name(&self) -> &'static str {
        "flaky"
    }
}

/// Image provider that always fails.
pub struct BrokenImages;

#[async_trait]
impl ImageProvider for BrokenImages {
    async fn resolve(&self, _prompt: &str, _on_retry: RetryCallback<'_>) -> StorytellerResult<Vec<u8>> {
        Err(ProviderError::api("broken", 500, "down").into())
    }

    fn provider_name(&self) -> &'static str {
        "broken"
    }
}

/// Narrator that writes audio and fails on its `fail_on`-th call (1-based).
pub struct FailingNarrator {
    calls: Mutex<usize>,
    fail_on: usize,
}

impl FailingNarrator {
    pub fn on_call(fail_on: usize) -> NarrationService {
        NarrationService::new(Box::new(Self {
            calls: Mutex::new(0),
            fail_on,
        }))
    }
}

#[async_trait]
impl NarrationBackend for FailingNarrator {
    async fn synthesize(&self, text: &str) -> StorytellerResult<Narration> {
        let call = {
            let mut calls = self.calls.lock().unwrap();
            *calls += 1;
            *calls
        };
        if call == self.fail_on {
            return Err(NarrationError::new(NarrationErrorKind::Request {
                backend: "failing".to_string(),
                message: "connection reset".to_string(),
            })
            .into());
        }
        Ok(Narration::aligned(
            b"ID3".to_vec(),
            TimingAlignment::from_text(text, 1.0),
        ))
    }

    fn backend_name(&self) -> &'static str {
        "failing"
    }
}

/// Observer recording every notification as a line of text.
#[derive(Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<String>>,
}

impl RecordingObserver {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    pub fn stages(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| event.strip_prefix("stage ").map(str::to_string))
            .collect()
    }

    fn record(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }
}

impl PipelineObserver for RecordingObserver {
    fn stage_changed(&self, stage: Stage) {
        self.record(format!("stage {}", stage));
    }

    fn step_started(&self, progress: &StepProgress<'_>) {
        self.record(format!(
            "[{}/{}] {} via {}",
            progress.step, progress.total, progress.kind, progress.backend
        ));
    }

    fn image_retry(&self, progress: &StepProgress<'_>, attempt: u32) {
        self.record(format!("[{}/{}] retry {}", progress.step, progress.total, attempt));
    }
}
