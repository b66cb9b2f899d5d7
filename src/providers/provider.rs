// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! OCR and TTS provider trait definitions

use async_trait::async_trait;
use bytes::Bytes;
use std::path::Path;

#[cfg(test)]
use mockall::automock;

use super::types::{ProviderError, VoiceProfile};

/// Trait for OCR providers
///
/// Implementations read the staged image and return the best text
/// annotation, or `None` when the provider found no text at all.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Extract text from the image stored at `image`
    async fn extract_text(&self, image: &Path) -> Result<Option<String>, ProviderError>;

    /// Provider name for logging
    fn name(&self) -> &'static str;
}

/// Trait for TTS providers
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize `text` with the given voice, returning MP3 bytes
    async fn synthesize(&self, text: &str, voice: &VoiceProfile) -> Result<Bytes, ProviderError>;

    /// Provider name for logging
    fn name(&self) -> &'static str;
}
