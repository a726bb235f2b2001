//! Test utilities for provider tests.
//!
//! This module provides mock implementations of the provider seams.

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use storyteller_core::{RunConfig, StorytellerSettings};
use storyteller_error::{ProviderError, StorytellerResult};
use storyteller_interface::{Narration, NarrationBackend};
use storyteller_models::{PhotoSources, StockPhoto, StockPhotoApi};

/// Stock photo API returning canned search results and counting calls.
#[derive(Debug, Default)]
pub struct MockStockPhotoApi {
    photos: Vec<StockPhoto>,
    searches: AtomicUsize,
    downloads: Mutex<Vec<String>>,
}

impl MockStockPhotoApi {
    pub fn with_photos(photos: Vec<StockPhoto>) -> Self {
        Self {
            photos,
            ..Default::default()
        }
    }

    pub fn search_count(&self) -> usize {
        self.searches.load(Ordering::SeqCst)
    }

    pub fn downloaded(&self) -> Vec<String> {
        self.downloads.lock().unwrap().clone()
    }
}

#[async_trait]
impl StockPhotoApi for MockStockPhotoApi {
    async fn search(&self, _query: &str) -> StorytellerResult<Vec<StockPhoto>> {
        self.searches.fetch_add(1, Ordering::SeqCst);
        Ok(self.photos.clone())
    }

    async fn download(&self, url: &str) -> StorytellerResult<Vec<u8>> {
        self.downloads.lock().unwrap().push(url.to_string());
        if url.is_empty() {
            return Err(ProviderError::request("pexels", "empty url").into());
        }
        Ok(url.as_bytes().to_vec())
    }
}

/// A photo offering only the given renditions.
pub fn photo(sources: PhotoSources) -> StockPhoto {
    StockPhoto { src: sources }
}

/// Narration backend returning a fixed narration.
pub struct CannedNarrator {
    narration: Narration,
    calls: AtomicUsize,
}

impl CannedNarrator {
    pub fn new(narration: Narration) -> Self {
        Self {
            narration,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NarrationBackend for CannedNarrator {
    async fn synthesize(&self, _text: &str) -> StorytellerResult<Narration> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.narration.clone())
    }

    fn backend_name(&self) -> &'static str {
        "canned"
    }
}

/// Run configuration from an explicit variable list, ignoring the process environment.
pub fn config_with(vars: &[(&str, &str)]) -> RunConfig {
    let vars: Vec<(String, String)> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    RunConfig::from_lookup(StorytellerSettings::default(), move |key| {
        vars.iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    })
}

/// A mono 16-bit PCM WAV file of silence.
pub fn pcm_wav(sample_rate: u32, seconds: u32) -> Vec<u8> {
    let data_len = sample_rate * 2 * seconds;
    let mut wav = Vec::new();
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&(36 + data_len).to_le_bytes());
    wav.extend_from_slice(b"WAVEfmt ");
    wav.extend_from_slice(&16u32.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes());
    wav.extend_from_slice(&sample_rate.to_le_bytes());
    wav.extend_from_slice(&(sample_rate * 2).to_le_bytes());
    wav.extend_from_slice(&2u16.to_le_bytes());
    wav.extend_from_slice(&16u16.to_le_bytes());
    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&data_len.to_le_bytes());
    wav.resize(wav.len() + data_len as usize, 0);
    wav
}
