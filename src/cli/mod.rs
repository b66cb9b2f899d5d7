// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use clap::Parser;
use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::config::{parse_origins, ServerConfig};
use crate::providers::SsmlGender;

/// Image to Voice API server
///
/// Every flag falls back to its environment variable, then to the value
/// derived from the environment by `ServerConfig::from_env`.
#[derive(Parser, Debug, Default)]
#[command(name = "image-voice-node")]
#[command(version = crate::version::VERSION_NUMBER)]
#[command(about = "Turns the text in uploaded images into spoken MP3 audio", long_about = None)]
pub struct Cli {
    /// Listening port
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Bind address
    #[arg(long, env = "HOST")]
    pub host: Option<IpAddr>,

    /// Deployment environment (production selects FRONTEND_URL for CORS)
    #[arg(long, env = "NODE_ENV")]
    pub environment: Option<String>,

    /// Maximum upload size in bytes
    #[arg(long, env = "MAX_UPLOAD_BYTES")]
    pub max_upload_bytes: Option<usize>,

    /// Comma-separated CORS origins, or `*`
    #[arg(long, env = "ALLOWED_ORIGINS")]
    pub allowed_origins: Option<String>,

    /// Parent directory of temp/ and output/
    #[arg(long, env = "STAGING_DIR")]
    pub staging_dir: Option<PathBuf>,

    /// TTS language code
    #[arg(long, env = "TTS_LANGUAGE_CODE")]
    pub voice_language: Option<String>,

    /// TTS voice gender (NEUTRAL, MALE, FEMALE)
    #[arg(long, env = "TTS_SSML_GENDER")]
    pub voice_gender: Option<SsmlGender>,

    /// Seconds between stale-file sweeps
    #[arg(long, env = "STAGING_SWEEP_INTERVAL_SECS")]
    pub sweep_interval_secs: Option<u64>,

    /// Staged files older than this many seconds are swept
    #[arg(long, env = "STAGING_MAX_AGE_SECS")]
    pub staging_max_age_secs: Option<u64>,

    /// Tracing filter directive
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    pub json_logs: bool,
}

impl Cli {
    /// Merge command-line overrides into the environment-derived config
    pub fn into_config(self) -> ServerConfig {
        let base = ServerConfig::from_env();
        self.apply(base)
    }

    fn apply(self, mut config: ServerConfig) -> ServerConfig {
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(environment) = self.environment {
            if self.allowed_origins.is_none() && environment != config.environment {
                config.allowed_origins = crate::config::default_origins(
                    &environment,
                    std::env::var("FRONTEND_URL").ok().as_deref(),
                );
            }
            config.environment = environment;
        }
        if let Some(max) = self.max_upload_bytes {
            config.max_upload_bytes = max;
        }
        if let Some(origins) = self.allowed_origins {
            config.allowed_origins = parse_origins(&origins);
        }
        if let Some(dir) = self.staging_dir {
            config.staging_root = dir;
        }
        if let Some(language) = self.voice_language {
            config.voice.language_code = language;
        }
        if let Some(gender) = self.voice_gender {
            config.voice.ssml_gender = gender;
        }
        if let Some(secs) = self.sweep_interval_secs {
            config.sweep_interval = Duration::from_secs(secs);
        }
        if let Some(secs) = self.staging_max_age_secs {
            config.staging_max_age = Duration::from_secs(secs);
        }
        config
    }
}
