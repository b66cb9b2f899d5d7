// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Google Cloud error envelopes shared by the Vision and TTS clients

use reqwest::StatusCode;
use serde::Deserialize;

use super::types::ProviderError;

/// `{"error": {"code": 403, "message": "...", "status": "PERMISSION_DENIED"}}`
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
}

/// Per-request status embedded in a successful batch response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RpcStatus {
    #[serde(default)]
    pub code: i32,
    #[serde(default)]
    pub message: String,
}

// google.rpc.Code values
const RPC_PERMISSION_DENIED: i32 = 7;
const RPC_RESOURCE_EXHAUSTED: i32 = 8;
const RPC_UNAUTHENTICATED: i32 = 16;

/// Map a non-success HTTP response from a Google API to a `ProviderError`
pub fn error_from_response(provider: &'static str, status: StatusCode, body: &str) -> ProviderError {
    let (message, code) = match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => (envelope.error.message, envelope.error.status),
        Err(_) => (body.to_string(), None),
    };

    let code_is = |expected: &str| code.as_deref() == Some(expected);

    if status == StatusCode::UNAUTHORIZED
        || status == StatusCode::FORBIDDEN
        || code_is("UNAUTHENTICATED")
        || code_is("PERMISSION_DENIED")
    {
        return ProviderError::Unauthenticated {
            provider,
            status: status.as_u16(),
            message,
        };
    }

    if status == StatusCode::TOO_MANY_REQUESTS || code_is("RESOURCE_EXHAUSTED") {
        return ProviderError::QuotaExceeded { provider, message };
    }

    ProviderError::Api {
        provider,
        status: status.as_u16(),
        code,
        message,
    }
}

/// Map an embedded `google.rpc.Status` to a `ProviderError`
pub fn error_from_rpc_status(provider: &'static str, status: RpcStatus) -> ProviderError {
    match status.code {
        RPC_UNAUTHENTICATED | RPC_PERMISSION_DENIED => ProviderError::Unauthenticated {
            provider,
            status: 0,
            message: status.message,
        },
        RPC_RESOURCE_EXHAUSTED => ProviderError::QuotaExceeded {
            provider,
            message: status.message,
        },
        code => ProviderError::Api {
            provider,
            status: 200,
            code: Some(format!("RPC_{}", code)),
            message: status.message,
        },
    }
}

/// Map a reqwest send failure
pub fn transport_error(provider: &'static str, err: reqwest::Error) -> ProviderError {
    ProviderError::Transport {
        provider,
        message: err.to_string(),
    }
}
