// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Google Cloud Vision OCR provider
//!
//! Sends the staged image to `images:annotate` with `TEXT_DETECTION` and
//! returns the first text annotation, which holds the full detected text.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

use super::auth::AccessTokenProvider;
use super::google::{error_from_response, error_from_rpc_status, transport_error, RpcStatus};
use super::provider::TextExtractor;
use super::types::ProviderError;

/// Production Vision API base URL
pub const DEFAULT_VISION_ENDPOINT: &str = "https://vision.googleapis.com";

const PROVIDER: &str = "google-vision";

// --- Vision REST serde structs ---

#[derive(serde::Serialize)]
struct AnnotateRequest {
    requests: Vec<AnnotateImageRequest>,
}

#[derive(serde::Serialize)]
struct AnnotateImageRequest {
    image: ImageContent,
    features: Vec<Feature>,
}

#[derive(serde::Serialize)]
struct ImageContent {
    content: String,
}

#[derive(serde::Serialize)]
struct Feature {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(serde::Deserialize)]
struct AnnotateResponse {
    #[serde(default)]
    responses: Vec<AnnotateImageResponse>,
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnnotateImageResponse {
    #[serde(default)]
    text_annotations: Vec<EntityAnnotation>,
    #[serde(default)]
    error: Option<RpcStatus>,
}

#[derive(serde::Deserialize)]
struct EntityAnnotation {
    #[serde(default)]
    description: String,
}

/// OCR client for the Google Cloud Vision REST API
pub struct GoogleVisionClient {
    client: Client,
    endpoint: String,
    tokens: Arc<dyn AccessTokenProvider>,
}

impl GoogleVisionClient {
    /// Create a new Vision client
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

    fn build_request(image_bytes: &[u8]) -> AnnotateRequest {
        AnnotateRequest {
            requests: vec![AnnotateImageRequest {
                image: ImageContent {
                    content: STANDARD.encode(image_bytes),
                },
                features: vec![Feature {
                    kind: "TEXT_DETECTION",
                }],
            }],
        }
    }
}

#[async_trait]
impl TextExtractor for GoogleVisionClient {
    async fn extract_text(&self, image: &Path) -> Result<Option<String>, ProviderError> {
        let image_bytes = tokio::fs::read(image).await?;
        let token = self.tokens.access_token().await?;

        debug!("Sending {} bytes to Vision text detection", image_bytes.len());

        let response = self
            .client
            .post(format!("{}/v1/images:annotate", self.endpoint))
            .bearer_auth(token)
            .json(&Self::build_request(&image_bytes))
            .send()
            .await
            .map_err(|e| transport_error(PROVIDER, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(error_from_response(PROVIDER, status, &body));
        }

        let annotate: AnnotateResponse =
            response
                .json()
                .await
                .map_err(|e| ProviderError::InvalidResponse {
                    provider: PROVIDER,
                    message: e.to_string(),
                })?;

        let Some(first) = annotate.responses.into_iter().next() else {
            return Ok(None);
        };

        if let Some(error) = first.error.filter(|e| e.code != 0) {
            return Err(error_from_rpc_status(PROVIDER, error));
        }

        Ok(first
            .text_annotations
            .into_iter()
            .next()
            .map(|annotation| annotation.description))
    }

    fn name(&self) -> &'static str {
        PROVIDER
    }
}
