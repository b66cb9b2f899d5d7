// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! External OCR and TTS providers
//!
//! The orchestrator only sees the `TextExtractor` and `SpeechSynthesizer`
//! traits; the Google Cloud clients are one implementation, constructed once
//! at startup and injected as `ProviderHandles`.

pub mod auth;
pub mod google;
pub mod google_tts;
pub mod google_vision;
pub mod provider;
pub mod types;

use anyhow::{Context, Result};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

pub use auth::{AccessTokenProvider, ServiceAccountTokenSource};
pub use google_tts::{GoogleTtsClient, DEFAULT_TTS_ENDPOINT};
pub use google_vision::{GoogleVisionClient, DEFAULT_VISION_ENDPOINT};
pub use provider::{SpeechSynthesizer, TextExtractor};
pub use types::{classify_message, FailureKind, ProviderError, SsmlGender, VoiceProfile};

use crate::config::Credentials;

/// Injected OCR + TTS provider pair
#[derive(Clone)]
pub struct ProviderHandles {
    pub ocr: Arc<dyn TextExtractor>,
    pub tts: Arc<dyn SpeechSynthesizer>,
}

impl ProviderHandles {
    /// Wrap an arbitrary provider pair
    pub fn new(ocr: Arc<dyn TextExtractor>, tts: Arc<dyn SpeechSynthesizer>) -> Self {
        Self { ocr, tts }
    }

    /// Build the Google Cloud Vision + Text-to-Speech clients.
    ///
    /// Both clients share one HTTP connection pool and one token cache. Only a
    /// connect timeout is set; remote calls otherwise run to completion.
    pub fn google(
        credentials: &Credentials,
        vision_endpoint: &str,
        tts_endpoint: &str,
    ) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .context("Failed to create HTTP client")?;

        let tokens: Arc<dyn AccessTokenProvider> = Arc::new(
            ServiceAccountTokenSource::new(&credentials.key, client.clone())
                .context("Failed to initialize service account credentials")?,
        );

        Ok(Self {
            ocr: Arc::new(GoogleVisionClient::new(
                client.clone(),
                vision_endpoint,
                Arc::clone(&tokens),
            )),
            tts: Arc::new(GoogleTtsClient::new(client, tts_endpoint, tokens)),
        })
    }
}
