// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use crate::services::webhook_verifier::WebhookError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
///
/// None of these are retried: every failure is terminal for the request
/// that hit it and is reported in that request's response.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Server misconfiguration: {0}")]
    Configuration(String),

    #[error("Missing webhook headers")]
    MissingHeaders,

    #[error("Invalid webhook signature: {0}")]
    SignatureInvalid(String),

    #[error("User sync failed: {0}")]
    SyncFailure(String),

    #[error("Plan generator returned HTTP {status}: {body}")]
    UpstreamError { status: u16, body: String },

    #[error("Plan generator returned malformed JSON: {body}")]
    UpstreamMalformed { body: String },

    #[error("Plan generator request failed: {0}")]
    Transport(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<WebhookError> for AppError {
    fn from(err: WebhookError) -> Self {
        match err {
            WebhookError::MissingHeaders => AppError::MissingHeaders,
            WebhookError::InvalidSecret => AppError::Configuration(err.to_string()),
            WebhookError::InvalidPayload(_) => AppError::BadRequest(err.to_string()),
            other => AppError::SignatureInvalid(other.to_string()),
        }
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
    code: &'static str,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Configuration(msg) => {
                tracing::error!(error = %msg, "Configuration error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "configuration_error",
                    self.to_string(),
                )
            }
            AppError::MissingHeaders => {
                tracing::warn!("Rejected webhook: missing svix headers");
                (StatusCode::BAD_REQUEST, "missing_headers", self.to_string())
            }
            AppError::SignatureInvalid(reason) => {
                tracing::warn!(reason = %reason, "Rejected webhook: signature verification failed");
                (StatusCode::BAD_REQUEST, "invalid_signature", self.to_string())
            }
            AppError::SyncFailure(msg) => {
                tracing::error!(error = %msg, "User sync failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "sync_failure",
                    "Error processing webhook".to_string(),
                )
            }
            AppError::UpstreamError { status, body } => {
                tracing::error!(status, body = %body, "Plan generator returned an error status");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "upstream_error",
                    self.to_string(),
                )
            }
            AppError::UpstreamMalformed { body } => {
                tracing::error!(body = %body, "Plan generator returned malformed JSON");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "upstream_malformed",
                    self.to_string(),
                )
            }
            AppError::Transport(msg) => {
                tracing::error!(error = %msg, "Plan generator unreachable");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "transport_failure",
                    msg.clone(),
                )
            }
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request", self.to_string()),
            AppError::Database(msg) => {
                tracing::error!(error = %msg, "Database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "database_error",
                    "Database error".to_string(),
                )
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "Internal server error".to_string(),
                )
            }
        };

        let body = ErrorResponse {
            success: false,
            error: message,
            code,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
