// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

use crate::orchestrator::UploadError;

/// Setup steps returned when no Google Cloud credentials are configured
pub const CREDENTIALS_SETUP_MESSAGE: &str = "Please configure Google Cloud credentials in credentials.json file. You need to:\n1. Create a Google Cloud project\n2. Enable Vision and Text-to-Speech APIs\n3. Create a service account\n4. Download the credentials JSON file\n5. Replace the empty credentials.json with your downloaded file";

/// JSON error body: `{"error": ..., "message": ...}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone)]
pub enum ApiError {
    NoFile,
    MalformedUpload(String),
    ServiceUnavailable,
    UnsupportedType,
    NoTextFound,
    PayloadTooLarge { limit: usize },
    Authentication(String),
    QuotaExceeded(String),
    InternalError(String),
}

impl ApiError {
    pub fn to_response(&self) -> ErrorResponse {
        let (error, message) = match self {
            ApiError::NoFile => ("No file uploaded.", None),
            ApiError::MalformedUpload(detail) => ("No file uploaded.", Some(detail.clone())),
            ApiError::ServiceUnavailable => (
                "Google Cloud services not available",
                Some(CREDENTIALS_SETUP_MESSAGE.to_string()),
            ),
            ApiError::UnsupportedType => (
                "Invalid file type",
                Some(
                    "Please upload an image file (JPEG, PNG, GIF, BMP, WebP). PDF files are not supported for OCR."
                        .to_string(),
                ),
            ),
            ApiError::NoTextFound => (
                "No text found in the image",
                Some("Please ensure the image contains clear, readable text.".to_string()),
            ),
            ApiError::PayloadTooLarge { limit } => (
                "File size limit exceeded",
                Some(format!("Maximum upload size is {} bytes", limit)),
            ),
            ApiError::Authentication(detail) => (
                "Google Cloud authentication error. Please check credentials.",
                Some(detail.clone()),
            ),
            ApiError::QuotaExceeded(detail) => (
                "Google Cloud API quota exceeded. Please try again later.",
                Some(detail.clone()),
            ),
            ApiError::InternalError(detail) => ("Internal server error", Some(detail.clone())),
        };

        ErrorResponse {
            error: error.to_string(),
            message,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NoFile
            | ApiError::MalformedUpload(_)
            | ApiError::UnsupportedType
            | ApiError::NoTextFound => StatusCode::BAD_REQUEST,
            ApiError::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Authentication(_)
            | ApiError::QuotaExceeded(_)
            | ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::NoFile => write!(f, "No file uploaded"),
            ApiError::MalformedUpload(msg) => write!(f, "Malformed upload: {}", msg),
            ApiError::ServiceUnavailable => write!(f, "Google Cloud services not available"),
            ApiError::UnsupportedType => write!(f, "Invalid file type"),
            ApiError::NoTextFound => write!(f, "No text found in the image"),
            ApiError::PayloadTooLarge { limit } => {
                write!(f, "File size limit of {} bytes exceeded", limit)
            }
            ApiError::Authentication(msg) => write!(f, "Authentication error: {}", msg),
            ApiError::QuotaExceeded(msg) => write!(f, "Quota exceeded: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<UploadError> for ApiError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::NoFile => ApiError::NoFile,
            UploadError::UnsupportedType { .. } => ApiError::UnsupportedType,
            UploadError::ServiceUnavailable => ApiError::ServiceUnavailable,
            UploadError::NoTextFound => ApiError::NoTextFound,
            UploadError::PayloadTooLarge { limit } => ApiError::PayloadTooLarge { limit },
            UploadError::Authentication(e) => ApiError::Authentication(e.to_string()),
            UploadError::QuotaExceeded(e) => ApiError::QuotaExceeded(e.to_string()),
            UploadError::Internal(msg) => ApiError::InternalError(msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            warn!("Upload request failed with {}: {}", status, self);
        }
        (status, Json(self.to_response())).into_response()
    }
}
