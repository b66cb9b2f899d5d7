// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Upload API endpoint module
//!
//! Provides POST /upload for turning an image into spoken audio.

pub mod handler;
pub mod request;
pub mod response;

pub use handler::upload_handler;
pub use request::{read_upload, FILE_FIELD};
pub use response::{audio_response, AUDIO_CONTENT_TYPE, REQUEST_ID_HEADER};
