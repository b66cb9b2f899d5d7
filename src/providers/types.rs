// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Provider types and error definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised by the OCR and TTS providers
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Provider rejected the credentials
    #[error("{provider} authentication failed ({status}): {message}")]
    Unauthenticated {
        /// Provider name
        provider: &'static str,
        /// HTTP status (0 when the failure came from an RPC status)
        status: u16,
        /// Upstream message
        message: String,
    },

    /// Provider quota or rate limit exhausted
    #[error("{provider} quota exceeded: {message}")]
    QuotaExceeded {
        /// Provider name
        provider: &'static str,
        /// Upstream message
        message: String,
    },

    /// Any other structured error returned by the provider
    #[error("{provider} API error: {status} {} - {message}", .code.as_deref().unwrap_or("UNKNOWN_STATUS"))]
    Api {
        /// Provider name
        provider: &'static str,
        /// HTTP status code
        status: u16,
        /// Canonical status string (e.g. INVALID_ARGUMENT)
        code: Option<String>,
        /// Upstream message
        message: String,
    },

    /// The request never produced an HTTP response
    #[error("{provider} request failed: {message}")]
    Transport {
        /// Provider name
        provider: &'static str,
        /// Transport error text
        message: String,
    },

    /// The response could not be interpreted
    #[error("{provider} returned an invalid response: {message}")]
    InvalidResponse {
        /// Provider name
        provider: &'static str,
        /// Parse error text
        message: String,
    },

    /// Reading the staged image failed
    #[error("failed to read staged image: {0}")]
    Io(#[from] std::io::Error),

    /// Credentials could not be turned into an access token
    #[error("credential error: {0}")]
    Credentials(String),
}

/// Coarse classification of a provider failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Authentication,
    Quota,
    Other,
}

impl ProviderError {
    /// Classify this error.
    ///
    /// Structured variants are classified by their status; errors without a
    /// status code fall back to matching the error text.
    pub fn kind(&self) -> FailureKind {
        match self {
            ProviderError::Unauthenticated { .. } | ProviderError::Credentials(_) => {
                FailureKind::Authentication
            }
            ProviderError::QuotaExceeded { .. } => FailureKind::Quota,
            ProviderError::Api { .. } => FailureKind::Other,
            ProviderError::Transport { .. }
            | ProviderError::InvalidResponse { .. }
            | ProviderError::Io(_) => classify_message(&self.to_string()),
        }
    }
}

/// Substring classification for errors that carry no status code
pub fn classify_message(message: &str) -> FailureKind {
    if message.contains("UNKNOWN") || message.contains("metadata") {
        FailureKind::Authentication
    } else if message.contains("quota") || message.contains("QUOTA_EXCEEDED") {
        FailureKind::Quota
    } else {
        FailureKind::Other
    }
}

/// SSML voice gender accepted by the TTS provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SsmlGender {
    #[default]
    Neutral,
    Male,
    Female,
}

impl fmt::Display for SsmlGender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SsmlGender::Neutral => write!(f, "NEUTRAL"),
            SsmlGender::Male => write!(f, "MALE"),
            SsmlGender::Female => write!(f, "FEMALE"),
        }
    }
}

impl FromStr for SsmlGender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "NEUTRAL" => Ok(SsmlGender::Neutral),
            "MALE" => Ok(SsmlGender::Male),
            "FEMALE" => Ok(SsmlGender::Female),
            other => Err(format!(
                "unsupported SSML gender '{}', supported: NEUTRAL, MALE, FEMALE",
                other
            )),
        }
    }
}

/// The single voice configuration used for every synthesis request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceProfile {
    /// BCP-47 language code
    pub language_code: String,
    /// Voice gender
    pub ssml_gender: SsmlGender,
}

impl Default for VoiceProfile {
    fn default() -> Self {
        Self {
            language_code: "en-US".to_string(),
            ssml_gender: SsmlGender::Neutral,
        }
    }
}
