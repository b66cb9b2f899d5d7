// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Streaming MP3 response for POST /upload

use axum::{
    body::Body,
    http::{header, StatusCode},
    response::Response,
};

use crate::api::errors::ApiError;
use crate::orchestrator::AudioArtifact;

pub const AUDIO_CONTENT_TYPE: &str = "audio/mpeg";

/// Header echoing the per-upload id used in logs
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Stream the artifact back to the client.
///
/// The artifact's file guard moves into the body stream, so the MP3 on disk
/// is deleted once hyper finishes writing the body or drops it.
pub async fn audio_response(artifact: AudioArtifact) -> Result<Response, ApiError> {
    let AudioArtifact {
        request_id,
        file,
        size,
    } = artifact;

    let stream = file
        .into_stream()
        .await
        .map_err(|e| ApiError::InternalError(format!("failed to open synthesized audio: {}", e)))?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, AUDIO_CONTENT_TYPE)
        .header(header::CONTENT_LENGTH, size)
        .header(REQUEST_ID_HEADER, request_id.to_string())
        .body(Body::from_stream(stream))
        .map_err(|e| ApiError::InternalError(format!("failed to build audio response: {}", e)))
}
