// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::Request;
use fitplan_api::config::Config;
use fitplan_api::db::Database;
use fitplan_api::routes::create_router;
use fitplan_api::services::WebhookVerifier;
use fitplan_api::AppState;
use std::sync::Arc;

/// Create a test app backed by the in-memory store.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    create_test_app_with(Config::test_default(), Database::in_memory())
}

/// Create a test app that calls the generator at `generator_url`.
#[allow(dead_code)]
pub fn create_test_app_with_generator(generator_url: &str) -> (axum::Router, Arc<AppState>) {
    let config = Config {
        generator_url: generator_url.to_string(),
        ..Config::test_default()
    };
    create_test_app_with(config, Database::in_memory())
}

#[allow(dead_code)]
pub fn create_test_app_with(config: Config, db: Database) -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(config, db).expect("Failed to build app state"));
    (create_router(state.clone()), state)
}

/// Build a webhook request signed with the test secret.
#[allow(dead_code)]
pub fn signed_webhook_request(body: &str) -> Request<Body> {
    let secret = Config::test_default().clerk_webhook_secret.unwrap();
    let verifier = WebhookVerifier::new(&secret).unwrap();
    let timestamp = chrono::Utc::now().timestamp();
    let signature = verifier
        .sign("msg_test", timestamp, body.as_bytes())
        .unwrap();

    Request::builder()
        .method("POST")
        .uri("/clerk-webhook")
        .header("content-type", "application/json")
        .header("svix-id", "msg_test")
        .header("svix-timestamp", timestamp.to_string())
        .header("svix-signature", signature)
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Read a response body as JSON.
#[allow(dead_code)]
pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}
