// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Upload endpoint handler

use axum::{extract::State, response::Response};
use axum_extra::extract::multipart::MultipartRejection;
use axum_extra::extract::Multipart;
use tracing::{debug, warn};

use super::request::read_upload;
use super::response::audio_response;
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;

/// POST /upload - Convert the text in an image to spoken MP3
///
/// # Request
/// - multipart form with one `file` field holding a JPEG, PNG, GIF, BMP or WebP image
///
/// # Response
/// - 200 with `Content-Type: audio/mpeg` and the MP3 as body
///
/// # Errors
/// - 400 Bad Request: no file, unsupported type, or no readable text
/// - 413 Payload Too Large: file over the configured limit
/// - 503 Service Unavailable: Google Cloud credentials not configured
/// - 500 Internal Server Error: provider or filesystem failure
pub async fn upload_handler(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, ApiError> {
    let multipart = multipart.map_err(|rejection| {
        warn!("Rejected upload body: {}", rejection.body_text());
        ApiError::MalformedUpload(rejection.body_text())
    })?;

    let max_bytes = state.orchestrator.max_upload_bytes();
    let upload = read_upload(multipart, max_bytes).await?;
    debug!(
        "Parsed upload form: {}",
        upload
            .as_ref()
            .map(|u| format!("{} bytes", u.size()))
            .unwrap_or_else(|| "no file".to_string())
    );

    let artifact = state.orchestrator.handle_upload(upload).await?;
    audio_response(artifact).await
}
