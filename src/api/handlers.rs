// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{extract::State, Json};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::http_server::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootResponse {
    pub message: String,
    pub status: String,
    pub timestamp: String,
    pub environment: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    /// Seconds since the server started
    pub uptime: f64,
    pub timestamp: String,
    pub google_cloud_credentials: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub status: String,
    pub google_cloud_credentials: bool,
    pub message: String,
    pub environment: String,
}

/// RFC 3339 UTC with millisecond precision
pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// GET / - liveness probe for deployment platforms
pub async fn root_handler(State(state): State<AppState>) -> Json<RootResponse> {
    Json(RootResponse {
        message: "Image to Voice API is running".to_string(),
        status: "healthy".to_string(),
        timestamp: timestamp_now(),
        environment: state.config.environment.clone(),
    })
}

/// GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        uptime: state.started_at.elapsed().as_secs_f64(),
        timestamp: timestamp_now(),
        google_cloud_credentials: state.orchestrator.providers_available(),
    })
}

/// GET /status - reports whether uploads can be served
pub async fn status_handler(State(state): State<AppState>) -> Json<StatusResponse> {
    let available = state.orchestrator.providers_available();
    let message = if available {
        "All services available"
    } else {
        "Google Cloud credentials not configured. Please add valid credentials."
    };

    Json(StatusResponse {
        status: "Server running".to_string(),
        google_cloud_credentials: available,
        message: message.to_string(),
        environment: state.config.environment.clone(),
    })
}
