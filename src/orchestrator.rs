// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Upload orchestration: image -> OCR -> TTS -> MP3
//!
//! One call to [`UploadOrchestrator::handle_upload`] covers one upload. The
//! two remote calls run strictly in sequence; staged files are removed on
//! every path.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

use crate::providers::{FailureKind, ProviderError, ProviderHandles, VoiceProfile};
use crate::staging::{StagingArea, TransientFile};

/// OCR result that means "nothing readable"
pub const NO_TEXT_SENTINEL: &str = "No text found";

/// Declared MIME types accepted for OCR
pub const ALLOWED_MIME_TYPES: &[&str] = &[
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "image/bmp",
    "image/webp",
];

const PREVIEW_CHARS: usize = 100;

/// One uploaded file as received from the client
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// Client-declared filename
    pub filename: Option<String>,
    /// Client-declared MIME type
    pub content_type: Option<String>,
    /// Raw file bytes
    pub data: Bytes,
}

impl UploadRequest {
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Whether the declared MIME type is an accepted image type
    pub fn has_allowed_type(&self) -> bool {
        self.content_type
            .as_deref()
            .map(|mime| ALLOWED_MIME_TYPES.contains(&mime))
            .unwrap_or(false)
    }
}

/// Text that OCR actually found
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText(String);

impl ExtractedText {
    /// Accept an OCR result, rejecting absent, blank and sentinel values
    pub fn from_ocr(raw: Option<String>) -> Option<Self> {
        raw.filter(|text| !text.trim().is_empty() && text != NO_TEXT_SENTINEL)
            .map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }

    /// The first 100 characters, for logs
    pub fn preview(&self) -> String {
        self.0.chars().take(PREVIEW_CHARS).collect()
    }
}

/// MP3 returned by the TTS provider
#[derive(Debug, Clone)]
pub struct SynthesizedAudio {
    pub data: Bytes,
    pub generated_at: DateTime<Utc>,
}

/// Successful upload result; the file is deleted when dropped
#[derive(Debug)]
pub struct AudioArtifact {
    pub request_id: Uuid,
    pub file: TransientFile,
    pub size: usize,
}

/// Upload failure taxonomy
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("No file uploaded.")]
    NoFile,

    #[error("unsupported file type: {}", .mime.as_deref().unwrap_or("none"))]
    UnsupportedType { mime: Option<String> },

    #[error("OCR and TTS providers are not configured")]
    ServiceUnavailable,

    #[error("no text found in the image")]
    NoTextFound,

    #[error("file exceeds the {limit} byte upload limit")]
    PayloadTooLarge { limit: usize },

    #[error("authentication failed: {0}")]
    Authentication(ProviderError),

    #[error("quota exceeded: {0}")]
    QuotaExceeded(ProviderError),

    #[error("{0}")]
    Internal(String),
}

impl UploadError {
    /// Classify a provider failure
    pub fn from_provider(err: ProviderError) -> Self {
        match err.kind() {
            FailureKind::Authentication => UploadError::Authentication(err),
            FailureKind::Quota => UploadError::QuotaExceeded(err),
            FailureKind::Other => UploadError::Internal(err.to_string()),
        }
    }

    /// Raw error text reported to the client for diagnostics
    pub fn detail(&self) -> String {
        match self {
            UploadError::Authentication(err) | UploadError::QuotaExceeded(err) => err.to_string(),
            other => other.to_string(),
        }
    }
}

impl From<ProviderError> for UploadError {
    fn from(err: ProviderError) -> Self {
        Self::from_provider(err)
    }
}

/// Runs the upload pipeline against injected providers
#[derive(Clone)]
pub struct UploadOrchestrator {
    providers: Option<ProviderHandles>,
    staging: Arc<StagingArea>,
    voice: VoiceProfile,
    max_upload_bytes: usize,
}

impl UploadOrchestrator {
    /// `providers` is `None` when no credentials were found at startup
    pub fn new(
        providers: Option<ProviderHandles>,
        staging: Arc<StagingArea>,
        voice: VoiceProfile,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            providers,
            staging,
            voice,
            max_upload_bytes,
        }
    }

    pub fn providers_available(&self) -> bool {
        self.providers.is_some()
    }

    pub fn staging(&self) -> &Arc<StagingArea> {
        &self.staging
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }

    /// Process one upload.
    ///
    /// Checks run in order: missing file, provider availability, MIME type,
    /// size. Nothing touches the filesystem until all four pass.
    pub async fn handle_upload(
        &self,
        request: Option<UploadRequest>,
    ) -> Result<AudioArtifact, UploadError> {
        let request = request.ok_or(UploadError::NoFile)?;
        let providers = self
            .providers
            .as_ref()
            .ok_or(UploadError::ServiceUnavailable)?;

        if !request.has_allowed_type() {
            return Err(UploadError::UnsupportedType {
                mime: request.content_type,
            });
        }
        if request.size() > self.max_upload_bytes {
            return Err(UploadError::PayloadTooLarge {
                limit: self.max_upload_bytes,
            });
        }

        let request_id = Uuid::new_v4();
        let span = info_span!("upload", request_id = %request_id);
        self.process(request_id, providers, request)
            .instrument(span)
            .await
    }

    async fn process(
        &self,
        request_id: Uuid,
        providers: &ProviderHandles,
        request: UploadRequest,
    ) -> Result<AudioArtifact, UploadError> {
        info!(
            filename = request.filename.as_deref().unwrap_or(""),
            mime = request.content_type.as_deref().unwrap_or(""),
            size = request.size(),
            "Upload received"
        );

        let input = self
            .staging
            .stage_input(&request_id, request.filename.as_deref(), &request.data)
            .await
            .map_err(|e| UploadError::Internal(format!("failed to stage upload: {}", e)))?;
        info!("Staged input at {}", input.path().display());

        let result = self.run_providers(request_id, providers, &input).await;
        input.remove().await;

        if let Err(ref e) = result {
            match e {
                UploadError::NoTextFound => info!("No text found in upload"),
                other => error!("Upload failed: {}", other.detail()),
            }
        }
        result
    }

    async fn run_providers(
        &self,
        request_id: Uuid,
        providers: &ProviderHandles,
        input: &TransientFile,
    ) -> Result<AudioArtifact, UploadError> {
        info!("Starting OCR with {}", providers.ocr.name());
        let raw = providers.ocr.extract_text(input.path()).await?;
        let text = ExtractedText::from_ocr(raw).ok_or(UploadError::NoTextFound)?;
        info!(
            chars = text.char_count(),
            "Extracted text: {}...",
            text.preview()
        );

        info!("Starting text-to-speech with {}", providers.tts.name());
        let audio = SynthesizedAudio {
            data: providers.tts.synthesize(text.as_str(), &self.voice).await?,
            generated_at: Utc::now(),
        };

        let file = self
            .staging
            .stage_output(&request_id, audio.generated_at, &audio.data)
            .await
            .map_err(|e| UploadError::Internal(format!("failed to stage audio: {}", e)))?;
        info!(
            bytes = audio.data.len(),
            "Audio file created: {}",
            file.path().display()
        );

        Ok(AudioArtifact {
            request_id,
            file,
            size: audio.data.len(),
        })
    }
}
