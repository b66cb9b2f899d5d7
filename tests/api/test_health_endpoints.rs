// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! GET /, /health and /status payloads, plus CORS

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use image_voice_node::config::ServerConfig;

use crate::common::{
    body_json, get, test_app, test_app_with_config, test_app_without_providers, FakeOcr, FakeTts,
};

#[tokio::test]
async fn test_root_payload() {
    let app = test_app(FakeOcr::text("HELLO"), FakeTts::mp3()).await;

    let response = app.send(get("/")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["message"], "Image to Voice API is running");
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["environment"], "development");
    let timestamp = body["timestamp"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
}

#[tokio::test]
async fn test_health_reports_credentials() {
    let app = test_app(FakeOcr::text("HELLO"), FakeTts::mp3()).await;

    let body = body_json(app.send(get("/health")).await).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["googleCloudCredentials"], true);
    assert!(body["uptime"].as_f64().unwrap() >= 0.0);
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_health_without_credentials() {
    let app = test_app_without_providers().await;

    let response = app.send(get("/health")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["googleCloudCredentials"], false);
}

#[tokio::test]
async fn test_status_with_credentials() {
    let app = test_app(FakeOcr::text("HELLO"), FakeTts::mp3()).await;

    let body = body_json(app.send(get("/status")).await).await;
    assert_eq!(body["status"], "Server running");
    assert_eq!(body["googleCloudCredentials"], true);
    assert_eq!(body["message"], "All services available");
    assert_eq!(body["environment"], "development");
}

#[tokio::test]
async fn test_status_without_credentials() {
    let app = test_app_without_providers().await;

    let body = body_json(app.send(get("/status")).await).await;
    assert_eq!(body["googleCloudCredentials"], false);
    assert_eq!(
        body["message"],
        "Google Cloud credentials not configured. Please add valid credentials."
    );
}

#[tokio::test]
async fn test_environment_is_reported() {
    let config = ServerConfig {
        environment: "production".to_string(),
        allowed_origins: vec!["https://app.example.com".to_string()],
        ..Default::default()
    };
    let app = test_app_with_config(FakeOcr::text("HELLO"), FakeTts::mp3(), config).await;

    let body = body_json(app.send(get("/")).await).await;
    assert_eq!(body["environment"], "production");
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let app = test_app(FakeOcr::text("HELLO"), FakeTts::mp3()).await;
    let response = app.send(get("/v1/ocr")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

fn preflight(origin: &str) -> Request<Body> {
    Request::builder()
        .method(Method::OPTIONS)
        .uri("/upload")
        .header(header::ORIGIN, origin)
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_cors_allows_dev_origin_with_credentials() {
    let app = test_app(FakeOcr::text("HELLO"), FakeTts::mp3()).await;

    let response = app.send(preflight("http://localhost:5173")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(
        headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://localhost:5173"
    );
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
}

#[tokio::test]
async fn test_cors_rejects_unknown_origin() {
    let app = test_app(FakeOcr::text("HELLO"), FakeTts::mp3()).await;

    let response = app.send(preflight("https://evil.example.com")).await;

    assert!(response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}

#[tokio::test]
async fn test_cors_wildcard() {
    let config = ServerConfig {
        allowed_origins: vec!["*".to_string()],
        ..Default::default()
    };
    let app = test_app_with_config(FakeOcr::text("HELLO"), FakeTts::mp3(), config).await;

    let response = app.send(preflight("https://anywhere.example.com")).await;

    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
}
