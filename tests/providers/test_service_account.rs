// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Service-account token exchange against a mock token endpoint

use image_voice_node::providers::{
    AccessTokenProvider, FailureKind, ProviderError, ServiceAccountTokenSource,
};
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::fixture_key;

#[tokio::test]
async fn test_token_exchange_and_cache() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains(
            "grant_type=urn%3Aietf%3Aparams%3Aoauth%3Agrant-type%3Ajwt-bearer",
        ))
        .and(body_string_contains("assertion="))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "ya29.test-token",
            "expires_in": 3599,
            "token_type": "Bearer"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let key = fixture_key(&format!("{}/token", server.uri()));
    let source = ServiceAccountTokenSource::new(&key, reqwest::Client::new()).unwrap();

    assert_eq!(source.access_token().await.unwrap(), "ya29.test-token");
    // Served from cache; the mock verifies a single exchange on drop
    assert_eq!(source.access_token().await.unwrap(), "ya29.test-token");
}

#[tokio::test]
async fn test_short_lived_token_is_refreshed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "ya29.short",
            "expires_in": 30
        })))
        .expect(2)
        .mount(&server)
        .await;

    let key = fixture_key(&format!("{}/token", server.uri()));
    let source = ServiceAccountTokenSource::new(&key, reqwest::Client::new()).unwrap();

    source.access_token().await.unwrap();
    source.access_token().await.unwrap();
}

#[tokio::test]
async fn test_rejected_grant_is_authentication() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Invalid JWT Signature."
        })))
        .mount(&server)
        .await;

    let key = fixture_key(&format!("{}/token", server.uri()));
    let source = ServiceAccountTokenSource::new(&key, reqwest::Client::new()).unwrap();

    let err = source.access_token().await.unwrap_err();
    match &err {
        ProviderError::Unauthenticated { status, message, .. } => {
            assert_eq!(*status, 400);
            assert_eq!(message, "invalid_grant: Invalid JWT Signature.");
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(err.kind(), FailureKind::Authentication);
}

#[tokio::test]
async fn test_token_endpoint_outage_is_not_authentication() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(503).set_body_string("backend unavailable"))
        .mount(&server)
        .await;

    let key = fixture_key(&format!("{}/token", server.uri()));
    let source = ServiceAccountTokenSource::new(&key, reqwest::Client::new()).unwrap();

    let err = source.access_token().await.unwrap_err();
    assert!(matches!(err, ProviderError::Api { status: 503, .. }));
    assert_eq!(err.kind(), FailureKind::Other);
}

#[tokio::test]
async fn test_oversized_expiry_is_clamped() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "ya29.forever",
            "expires_in": u64::MAX
        })))
        .expect(1)
        .mount(&server)
        .await;

    let key = fixture_key(&format!("{}/token", server.uri()));
    let source = ServiceAccountTokenSource::new(&key, reqwest::Client::new()).unwrap();

    assert_eq!(source.access_token().await.unwrap(), "ya29.forever");
    assert_eq!(source.access_token().await.unwrap(), "ya29.forever");
}
