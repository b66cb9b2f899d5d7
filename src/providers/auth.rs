// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! OAuth2 access tokens for Google Cloud service accounts
//!
//! Signs an RS256 JWT assertion with the service-account key and exchanges it
//! at the key's token endpoint. Tokens are cached until shortly before expiry.

use async_trait::async_trait;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::types::ProviderError;
use crate::config::ServiceAccountKey;

/// OAuth scope covering both Vision and Text-to-Speech
pub const CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
/// Refresh tokens this long before they expire
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);
/// Upper bound on a cached token's lifetime, whatever the endpoint reports
const MAX_TOKEN_LIFETIME_SECS: u64 = 3600;

const PROVIDER: &str = "google-oauth";

/// Source of bearer tokens for provider requests
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    /// Return a valid bearer token
    async fn access_token(&self) -> Result<String, ProviderError>;
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

struct CachedToken {
    token: String,
    expires_at: Instant,
}

impl CachedToken {
    fn new(token: String, expires_in: u64) -> Self {
        let lifetime = Duration::from_secs(expires_in.min(MAX_TOKEN_LIFETIME_SECS));
        Self {
            token,
            expires_at: Instant::now() + lifetime,
        }
    }

    fn is_fresh(&self) -> bool {
        Instant::now() + EXPIRY_MARGIN < self.expires_at
    }
}

/// Token source backed by a service-account key
pub struct ServiceAccountTokenSource {
    client: Client,
    client_email: String,
    private_key_id: Option<String>,
    token_uri: String,
    scope: String,
    encoding_key: EncodingKey,
    cached: RwLock<Option<CachedToken>>,
}

impl ServiceAccountTokenSource {
    /// Create a token source for the cloud-platform scope
    pub fn new(key: &ServiceAccountKey, client: Client) -> Result<Self, ProviderError> {
        let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
            .map_err(|e| ProviderError::Credentials(format!("invalid private key: {}", e)))?;

        info!(
            "Service account token source configured: client_email={}",
            key.client_email
        );

        Ok(Self {
            client,
            client_email: key.client_email.clone(),
            private_key_id: key.private_key_id.clone(),
            token_uri: key.token_uri.clone(),
            scope: CLOUD_PLATFORM_SCOPE.to_string(),
            encoding_key,
            cached: RwLock::new(None),
        })
    }

    fn signed_assertion(&self) -> Result<String, ProviderError> {
        let iat = chrono::Utc::now().timestamp();
        let claims = AssertionClaims {
            iss: &self.client_email,
            scope: &self.scope,
            aud: &self.token_uri,
            iat,
            exp: iat + ASSERTION_LIFETIME_SECS,
        };

        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.private_key_id.clone();

        jsonwebtoken::encode(&header, &claims, &self.encoding_key)
            .map_err(|e| ProviderError::Credentials(format!("failed to sign assertion: {}", e)))
    }

    async fn fetch_token(&self) -> Result<CachedToken, ProviderError> {
        let assertion = self.signed_assertion()?;

        let response = self
            .client
            .post(&self.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(|e| ProviderError::Transport {
                provider: PROVIDER,
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<TokenErrorResponse>(&body)
                .map(|e| match e.error_description {
                    Some(description) => format!("{}: {}", e.error, description),
                    None => e.error,
                })
                .unwrap_or(body);

            return Err(if status.is_client_error() {
                ProviderError::Unauthenticated {
                    provider: PROVIDER,
                    status: status.as_u16(),
                    message,
                }
            } else {
                ProviderError::Api {
                    provider: PROVIDER,
                    status: status.as_u16(),
                    code: None,
                    message,
                }
            });
        }

        let token: TokenResponse =
            response
                .json()
                .await
                .map_err(|e| ProviderError::InvalidResponse {
                    provider: PROVIDER,
                    message: e.to_string(),
                })?;

        debug!("Fetched access token, expires in {}s", token.expires_in);

        Ok(CachedToken::new(token.access_token, token.expires_in))
    }
}

#[async_trait]
impl AccessTokenProvider for ServiceAccountTokenSource {
    async fn access_token(&self) -> Result<String, ProviderError> {
        if let Some(cached) = self.cached.read().await.as_ref() {
            if cached.is_fresh() {
                return Ok(cached.token.clone());
            }
        }

        let mut guard = self.cached.write().await;
        // Another request may have refreshed while we waited for the lock
        if let Some(cached) = guard.as_ref() {
            if cached.is_fresh() {
                return Ok(cached.token.clone());
            }
        }

        let fresh = self.fetch_token().await?;
        let token = fresh.token.clone();
        *guard = Some(fresh);
        Ok(token)
    }
}
