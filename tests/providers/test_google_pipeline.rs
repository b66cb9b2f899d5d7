// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Full upload through the real Google clients, with every Google endpoint mocked

use axum::http::{header, StatusCode};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image_voice_node::{
    api::{create_app, AppState},
    config::{CredentialSource, Credentials, ServerConfig},
    orchestrator::UploadOrchestrator,
    providers::ProviderHandles,
    staging::StagingArea,
};
use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;
use tower::util::ServiceExt;
use wiremock::matchers::{header as header_matcher, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::fixture_key;
use crate::common::{body_bytes, body_json, png_upload, MP3_FRAME};

async fn mock_google(server: &MockServer, annotation: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "ya29.pipeline",
            "expires_in": 3600
        })))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/images:annotate"))
        .and(header_matcher("authorization", "Bearer ya29.pipeline"))
        .respond_with(ResponseTemplate::new(200).set_body_json(annotation))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/text:synthesize"))
        .and(header_matcher("authorization", "Bearer ya29.pipeline"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"audioContent": STANDARD.encode(MP3_FRAME)})),
        )
        .mount(server)
        .await;
}

async fn app_against(server: &MockServer, root: &TempDir) -> axum::Router {
    let credentials = Credentials {
        key: fixture_key(&format!("{}/token", server.uri())),
        source: CredentialSource::Environment,
    };
    let providers = ProviderHandles::google(&credentials, &server.uri(), &server.uri()).unwrap();

    let staging = Arc::new(StagingArea::new(root.path()));
    staging.prepare().await.unwrap();

    let config = ServerConfig {
        staging_root: root.path().to_path_buf(),
        ..Default::default()
    };
    let orchestrator = UploadOrchestrator::new(
        Some(providers),
        staging,
        config.voice.clone(),
        config.max_upload_bytes,
    );
    create_app(AppState::new(config, orchestrator))
}

#[tokio::test]
async fn test_upload_through_google_clients() {
    let server = MockServer::start().await;
    mock_google(
        &server,
        json!({"responses": [{"textAnnotations": [{"description": "HELLO"}]}]}),
    )
    .await;

    let root = TempDir::new().unwrap();
    let app = app_against(&server, &root).await;

    let response = app.oneshot(png_upload("hello.png")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "audio/mpeg");
    assert_eq!(&body_bytes(response).await[..], MP3_FRAME);
    assert_eq!(std::fs::read_dir(root.path().join("temp")).unwrap().count(), 0);
    assert_eq!(std::fs::read_dir(root.path().join("output")).unwrap().count(), 0);
}

#[tokio::test]
async fn test_blank_image_through_google_clients() {
    let server = MockServer::start().await;
    mock_google(&server, json!({"responses": [{}]})).await;

    let root = TempDir::new().unwrap();
    let app = app_against(&server, &root).await;

    let response = app.oneshot(png_upload("solid.png")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "No text found in the image");
    assert_eq!(std::fs::read_dir(root.path().join("temp")).unwrap().count(), 0);
}
