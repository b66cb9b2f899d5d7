// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Multipart parsing for POST /upload

use axum::http::StatusCode;
use axum_extra::extract::multipart::{Field, MultipartError};
use axum_extra::extract::Multipart;
use bytes::BytesMut;
use tracing::debug;

use crate::api::errors::ApiError;
use crate::orchestrator::UploadRequest;

/// Multipart field carrying the image
pub const FILE_FIELD: &str = "file";

/// Read the `file` field from an upload form.
///
/// Returns `Ok(None)` when the form has no usable `file` field. Only parts
/// with a non-empty filename are files: a plain text field named `file`, or
/// the empty part a browser sends when no file is selected, is skipped like
/// any other field.
pub async fn read_upload(
    mut multipart: Multipart,
    max_bytes: usize,
) -> Result<Option<UploadRequest>, ApiError> {
    let mut upload: Option<UploadRequest> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, max_bytes))?
    {
        let filename = match (field.name(), field.file_name()) {
            (Some(FILE_FIELD), Some(name)) if !name.is_empty() => name.to_string(),
            (name, _) => {
                debug!("Skipping multipart field {:?}", name);
                continue;
            }
        };
        if upload.is_some() {
            return Err(ApiError::MalformedUpload(
                "Only one file may be uploaded per request".to_string(),
            ));
        }

        let content_type = field.content_type().map(str::to_string);
        let data = read_limited(field, max_bytes).await?;

        upload = Some(UploadRequest {
            filename: Some(filename),
            content_type,
            data: data.freeze(),
        });
    }

    Ok(upload)
}

/// Buffer one field, aborting as soon as it exceeds `max_bytes`
async fn read_limited(mut field: Field, max_bytes: usize) -> Result<BytesMut, ApiError> {
    let mut data = BytesMut::new();
    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| multipart_error(e, max_bytes))?
    {
        if data.len() + chunk.len() > max_bytes {
            return Err(ApiError::PayloadTooLarge { limit: max_bytes });
        }
        data.extend_from_slice(&chunk);
    }
    Ok(data)
}

fn multipart_error(err: MultipartError, max_bytes: usize) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge { limit: max_bytes }
    } else {
        ApiError::MalformedUpload(err.body_text())
    }
}
