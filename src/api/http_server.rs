// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use axum::{
    extract::{DefaultBodyLimit, Request, State},
    http::{header, HeaderValue, Method},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use super::errors::ApiError;
use super::handlers::{health_handler, root_handler, status_handler};
use super::upload::upload_handler;
use crate::config::ServerConfig;
use crate::orchestrator::UploadOrchestrator;

/// Allowance for multipart boundaries and part headers on top of the file limit
pub const MULTIPART_OVERHEAD: usize = 64 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: UploadOrchestrator,
    pub config: Arc<ServerConfig>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(config: ServerConfig, orchestrator: UploadOrchestrator) -> Self {
        Self {
            orchestrator,
            config: Arc::new(config),
            started_at: Instant::now(),
        }
    }
}

/// Build the application router
pub fn create_app(state: AppState) -> Router {
    let body_limit = state.orchestrator.max_upload_bytes() + MULTIPART_OVERHEAD;

    let upload = post(upload_handler)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            enforce_upload_limit,
        ));

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/status", get(status_handler))
        .route("/upload", upload)
        .layer(cors_layer(&state.config.allowed_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Reject uploads whose declared length already exceeds the limit
async fn enforce_upload_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let limit = state.orchestrator.max_upload_bytes();
    let declared = request
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<usize>().ok());

    if let Some(length) = declared {
        if length > limit + MULTIPART_OVERHEAD {
            warn!(
                "Rejecting upload: Content-Length {} exceeds limit {}",
                length, limit
            );
            return ApiError::PayloadTooLarge { limit }.into_response();
        }
    }

    next.run(request).await
}

/// CORS policy for the configured origins.
///
/// A `*` entry allows any origin without credentials; otherwise the listed
/// origins are allowed with credentials.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new().allow_methods([Method::GET, Method::POST, Method::OPTIONS]);

    if origins.iter().any(|o| o == "*") {
        return base.allow_origin(Any).allow_headers(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    base.allow_origin(AllowOrigin::list(allowed))
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

/// Serve `app` on `listener` until `shutdown` resolves
pub async fn start_server<F>(listener: TcpListener, app: Router, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener
        .local_addr()
        .context("Failed to read listener address")?;
    info!("HTTP server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("HTTP server error")?;

    info!("HTTP server stopped");
    Ok(())
}
