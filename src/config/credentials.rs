// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Google Cloud service-account credential discovery
//!
//! Credentials come from a JSON key file or, when no key file exists, from the
//! discrete `GOOGLE_CLOUD_*` environment variables.

use serde::Deserialize;
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

/// Service-account key material
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    #[serde(default)]
    pub client_email: String,
    #[serde(default)]
    pub private_key: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

impl ServiceAccountKey {
    fn is_complete(&self) -> bool {
        !self.private_key.trim().is_empty() && !self.client_email.trim().is_empty()
    }
}

impl fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("private_key", &"<redacted>")
            .field("private_key_id", &self.private_key_id)
            .field("project_id", &self.project_id)
            .field("token_uri", &self.token_uri)
            .finish()
    }
}

/// Where the credentials were found
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    KeyFile(PathBuf),
    Environment,
}

/// Resolved credentials ready for the provider clients
#[derive(Debug, Clone)]
pub struct Credentials {
    pub key: ServiceAccountKey,
    pub source: CredentialSource,
}

/// Discrete credential environment variables
#[derive(Debug, Clone, Default)]
pub struct EnvCredentials {
    pub private_key: Option<String>,
    pub client_email: Option<String>,
    pub project_id: Option<String>,
}

impl EnvCredentials {
    /// Load from `GOOGLE_CLOUD_PRIVATE_KEY`, `GOOGLE_CLOUD_CLIENT_EMAIL` and
    /// `GOOGLE_CLOUD_PROJECT_ID`
    pub fn from_env() -> Self {
        Self {
            private_key: non_empty_var("GOOGLE_CLOUD_PRIVATE_KEY"),
            client_email: non_empty_var("GOOGLE_CLOUD_CLIENT_EMAIL"),
            project_id: non_empty_var("GOOGLE_CLOUD_PROJECT_ID"),
        }
    }

    fn into_key(self) -> Option<ServiceAccountKey> {
        let private_key = self.private_key?;
        let client_email = self.client_email?;
        Some(ServiceAccountKey {
            client_email,
            // Keys pasted into env files carry literal "\n" sequences
            private_key: private_key.replace("\\n", "\n"),
            private_key_id: None,
            project_id: self.project_id,
            token_uri: default_token_uri(),
        })
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Path of the JSON key file: `GOOGLE_APPLICATION_CREDENTIALS`, falling back
/// to `credentials.json` in the working directory
pub fn default_key_file_path() -> PathBuf {
    non_empty_var("GOOGLE_APPLICATION_CREDENTIALS")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("credentials.json"))
}

/// Resolve credentials from a key file or the environment.
///
/// A key file that exists takes precedence; if it is empty, malformed or
/// missing `private_key`/`client_email` the credentials are treated as
/// absent. Only when no key file exists are the environment variables used.
pub fn load_credentials(key_file: &Path, env_credentials: EnvCredentials) -> Option<Credentials> {
    if key_file.exists() {
        return match read_key_file(key_file) {
            Ok(Some(key)) => Some(Credentials {
                key,
                source: CredentialSource::KeyFile(key_file.to_path_buf()),
            }),
            Ok(None) => {
                warn!(
                    "Credentials file {} is empty or missing private_key/client_email",
                    key_file.display()
                );
                None
            }
            Err(e) => {
                warn!("Invalid credentials file format: {}", e);
                None
            }
        };
    }

    let key = env_credentials.into_key()?;
    if !key.is_complete() {
        return None;
    }
    info!("Using Google Cloud credentials from environment variables");
    Some(Credentials {
        key,
        source: CredentialSource::Environment,
    })
}

fn read_key_file(path: &Path) -> anyhow::Result<Option<ServiceAccountKey>> {
    let content = std::fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(None);
    }
    let key: ServiceAccountKey = serde_json::from_str(&content)?;
    Ok(key.is_complete().then_some(key))
}
