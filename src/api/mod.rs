// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod errors;
pub mod handlers;
pub mod http_server;
pub mod upload;

pub use errors::{ApiError, ErrorResponse, CREDENTIALS_SETUP_MESSAGE};
pub use handlers::{HealthResponse, RootResponse, StatusResponse};
pub use http_server::{create_app, start_server, AppState, MULTIPART_OVERHEAD};
pub use upload::{upload_handler, AUDIO_CONTENT_TYPE};
