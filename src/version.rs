// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Version information for the image-to-voice node

/// Full version string with feature description
pub const VERSION: &str = "v0.1.0-image-to-voice-2026-10-18";

/// Semantic version number
pub const VERSION_NUMBER: &str = env!("CARGO_PKG_VERSION");

/// Build date
pub const BUILD_DATE: &str = "2026-10-18";

/// Supported features in this version
pub const FEATURES: &[&str] = &[
    "multipart-upload",
    "google-vision-ocr",
    "google-text-to-speech",
    "service-account-auth",
    "transient-staging",
    "stale-file-sweeper",
];

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("Image Voice Node {} ({})", VERSION_NUMBER, BUILD_DATE)
}
