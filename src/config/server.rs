// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Server configuration

use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use crate::providers::{VoiceProfile, DEFAULT_TTS_ENDPOINT, DEFAULT_VISION_ENDPOINT};

/// Default maximum upload size (10 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Origins allowed outside production
const DEVELOPMENT_ORIGINS: &[&str] = &[
    "http://localhost:3000",
    "http://localhost:5173",
    "http://localhost:5174",
];

/// Configuration for the HTTP server and upload pipeline
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address
    pub host: IpAddr,
    /// Listening port
    pub port: u16,
    /// Deployment environment name (`NODE_ENV`)
    pub environment: String,
    /// Maximum accepted upload size in bytes
    pub max_upload_bytes: usize,
    /// CORS allow-list
    pub allowed_origins: Vec<String>,
    /// Parent directory of the `temp/` and `output/` staging directories
    pub staging_root: PathBuf,
    /// Voice used for every synthesis request
    pub voice: VoiceProfile,
    /// How often the stale-file sweeper runs
    pub sweep_interval: Duration,
    /// Staged files older than this are swept
    pub staging_max_age: Duration,
    /// Google Cloud Vision base URL
    pub vision_endpoint: String,
    /// Google Cloud Text-to-Speech base URL
    pub tts_endpoint: String,
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let environment = env::var("NODE_ENV").unwrap_or_else(|_| "development".to_string());
        let allowed_origins = env::var("ALLOWED_ORIGINS")
            .ok()
            .map(|v| parse_origins(&v))
            .unwrap_or_else(|| {
                default_origins(&environment, env::var("FRONTEND_URL").ok().as_deref())
            });

        Self {
            host: env::var("HOST")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED)),
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5000),
            environment,
            max_upload_bytes: env::var("MAX_UPLOAD_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
            allowed_origins,
            staging_root: env::var("STAGING_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".")),
            voice: VoiceProfile {
                language_code: env::var("TTS_LANGUAGE_CODE")
                    .unwrap_or_else(|_| "en-US".to_string()),
                ssml_gender: env::var("TTS_SSML_GENDER")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or_default(),
            },
            sweep_interval: Duration::from_secs(
                env::var("STAGING_SWEEP_INTERVAL_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(60),
            ),
            staging_max_age: Duration::from_secs(
                env::var("STAGING_MAX_AGE_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(300),
            ),
            vision_endpoint: env::var("VISION_API_URL")
                .unwrap_or_else(|_| DEFAULT_VISION_ENDPOINT.to_string()),
            tts_endpoint: env::var("TTS_API_URL")
                .unwrap_or_else(|_| DEFAULT_TTS_ENDPOINT.to_string()),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_upload_bytes == 0 {
            return Err("Maximum upload size must be greater than 0".to_string());
        }
        if self.sweep_interval.is_zero() {
            return Err("Sweep interval must be greater than 0".to_string());
        }
        if self.voice.language_code.trim().is_empty() {
            return Err("Voice language code must not be empty".to_string());
        }
        Ok(())
    }

    /// Whether the server runs with production settings
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Socket address to bind
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 5000,
            environment: "development".to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            allowed_origins: default_origins("development", None),
            staging_root: PathBuf::from("."),
            voice: VoiceProfile::default(),
            sweep_interval: Duration::from_secs(60),
            staging_max_age: Duration::from_secs(300),
            vision_endpoint: DEFAULT_VISION_ENDPOINT.to_string(),
            tts_endpoint: DEFAULT_TTS_ENDPOINT.to_string(),
        }
    }
}

/// Default CORS origins for an environment
///
/// Production allows only the configured frontend URL; every other
/// environment allows the local dev-server ports.
pub fn default_origins(environment: &str, frontend_url: Option<&str>) -> Vec<String> {
    if environment == "production" {
        frontend_url
            .filter(|url| !url.trim().is_empty())
            .map(|url| vec![url.trim().to_string()])
            .unwrap_or_default()
    } else {
        DEVELOPMENT_ORIGINS.iter().map(|s| s.to_string()).collect()
    }
}

/// Parse a comma-separated origin list
pub fn parse_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}
