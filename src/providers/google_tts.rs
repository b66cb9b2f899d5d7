// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Google Cloud Text-to-Speech provider

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::Bytes;
use reqwest::Client;
use std::sync::Arc;
use tracing::debug;

use super::auth::AccessTokenProvider;
use super::google::{error_from_response, transport_error};
use super::provider::SpeechSynthesizer;
use super::types::{ProviderError, SsmlGender, VoiceProfile};

/// Production Text-to-Speech API base URL
pub const DEFAULT_TTS_ENDPOINT: &str = "https://texttospeech.googleapis.com";

/// Encoding requested for every synthesis
pub const AUDIO_ENCODING: &str = "MP3";

const PROVIDER: &str = "google-tts";

// --- Text-to-Speech REST serde structs ---

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeRequest<'a> {
    input: SynthesisInput<'a>,
    voice: VoiceSelection<'a>,
    audio_config: AudioConfig,
}

#[derive(serde::Serialize)]
struct SynthesisInput<'a> {
    text: &'a str,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceSelection<'a> {
    language_code: &'a str,
    ssml_gender: SsmlGender,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct AudioConfig {
    audio_encoding: &'static str,
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeResponse {
    #[serde(default)]
    audio_content: String,
}

/// TTS client for the Google Cloud Text-to-Speech REST API
pub struct GoogleTtsClient {
    client: Client,
    endpoint: String,
    tokens: Arc<dyn AccessTokenProvider>,
}

impl GoogleTtsClient {
    /// Create a new Text-to-Speech client
    pub fn new(client: Client, endpoint: &str, tokens: Arc<dyn AccessTokenProvider>) -> Self {
        Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            tokens,
        }
    }

    /// Get the endpoint base URL
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl SpeechSynthesizer for GoogleTtsClient {
    async fn synthesize(&self, text: &str, voice: &VoiceProfile) -> Result<Bytes, ProviderError> {
        let token = self.tokens.access_token().await?;

        let request = SynthesizeRequest {
            input: SynthesisInput { text },
            voice: VoiceSelection {
                language_code: &voice.language_code,
                ssml_gender: voice.ssml_gender,
            },
            audio_config: AudioConfig {
                audio_encoding: AUDIO_ENCODING,
            },
        };

        let response = self
            .client
            .post(format!("{}/v1/text:synthesize", self.endpoint))
            .bearer_auth(token)
            .json(&request)
            .send()
            .await
            .map_err(|e| transport_error(PROVIDER, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(error_from_response(PROVIDER, status, &body));
        }

        let synthesized: SynthesizeResponse =
            response
                .json()
                .await
                .map_err(|e| ProviderError::InvalidResponse {
                    provider: PROVIDER,
                    message: e.to_string(),
                })?;

        let audio = STANDARD
            .decode(synthesized.audio_content.as_bytes())
            .map_err(|e| ProviderError::InvalidResponse {
                provider: PROVIDER,
                message: format!("audioContent is not valid base64: {}", e),
            })?;

        if audio.is_empty() {
            return Err(ProviderError::InvalidResponse {
                provider: PROVIDER,
                message: "empty audioContent".to_string(),
            });
        }

        debug!("Synthesized {} bytes of {} audio", audio.len(), AUDIO_ENCODING);
        Ok(Bytes::from(audio))
    }

    fn name(&self) -> &'static str {
        PROVIDER
    }
}
