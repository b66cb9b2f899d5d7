// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Google Cloud Vision client against a mock server

use image_voice_node::providers::{
    FailureKind, GoogleVisionClient, ProviderError, TextExtractor,
};
use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::StaticToken;
use crate::common::tiny_png;

fn staged_image(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("image.png");
    std::fs::write(&path, tiny_png()).unwrap();
    path
}

fn client(server: &MockServer) -> GoogleVisionClient {
    GoogleVisionClient::new(reqwest::Client::new(), &server.uri(), Arc::new(StaticToken))
}

#[tokio::test]
async fn test_text_detection_returns_first_annotation() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/images:annotate"))
        .and(header("authorization", "Bearer test-token"))
        .and(body_partial_json(json!({
            "requests": [{"features": [{"type": "TEXT_DETECTION"}]}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "responses": [{
                "textAnnotations": [
                    {"locale": "en", "description": "HELLO\nWORLD"},
                    {"description": "HELLO"},
                    {"description": "WORLD"}
                ]
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let text = client(&server)
        .extract_text(&staged_image(&dir))
        .await
        .unwrap();

    assert_eq!(text.as_deref(), Some("HELLO\nWORLD"));
}

#[tokio::test]
async fn test_image_is_sent_base64_encoded() {
    let server = MockServer::start().await;
    let encoded = base64::Engine::encode(&base64::engine::general_purpose::STANDARD, tiny_png());
    Mock::given(method("POST"))
        .and(path("/v1/images:annotate"))
        .and(body_partial_json(json!({
            "requests": [{"image": {"content": encoded}}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"responses": [{}]})))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    client(&server)
        .extract_text(&staged_image(&dir))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_image_without_text_returns_none() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/images:annotate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"responses": [{}]})))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let text = client(&server)
        .extract_text(&staged_image(&dir))
        .await
        .unwrap();

    assert!(text.is_none());
}

#[tokio::test]
async fn test_permission_denied_is_authentication() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/images:annotate"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": {
                "code": 403,
                "message": "Cloud Vision API has not been used in project 123 before or it is disabled.",
                "status": "PERMISSION_DENIED"
            }
        })))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let err = client(&server)
        .extract_text(&staged_image(&dir))
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::Unauthenticated { status: 403, .. }));
    assert_eq!(err.kind(), FailureKind::Authentication);
}

#[tokio::test]
async fn test_rate_limit_is_quota() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/images:annotate"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": {"code": 429, "message": "Quota exceeded", "status": "RESOURCE_EXHAUSTED"}
        })))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let err = client(&server)
        .extract_text(&staged_image(&dir))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), FailureKind::Quota);
}

#[tokio::test]
async fn test_per_image_error_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/images:annotate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "responses": [{"error": {"code": 3, "message": "Bad image data."}}]
        })))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let err = client(&server)
        .extract_text(&staged_image(&dir))
        .await
        .unwrap_err();

    match err {
        ProviderError::Api { code, message, .. } => {
            assert_eq!(code.as_deref(), Some("RPC_3"));
            assert_eq!(message, "Bad image data.");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_missing_staged_file_is_io_error() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    let err = client(&server)
        .extract_text(&dir.path().join("missing.png"))
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::Io(_)));
    assert_eq!(err.kind(), FailureKind::Other);
}
