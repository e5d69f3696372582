// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Webhook route for identity provider (Clerk) user events.

use crate::error::{AppError, Result};
use crate::models::IdentityEvent;
use crate::services::{DispatchOutcome, WebhookHeaders};
use crate::AppState;
use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
    Router,
};
use std::sync::Arc;

/// Webhook routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/clerk-webhook", post(handle_event))
}

/// Handle an incoming identity provider event (POST).
///
/// The raw body is needed for signature verification, so it is taken as
/// bytes and only parsed after the signature checks out.
async fn handle_event(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, &'static str)> {
    let verifier = state.webhook_verifier.as_ref().ok_or_else(|| {
        AppError::Configuration("CLERK_WEBHOOK_SECRET is not configured".to_string())
    })?;

    let svix = WebhookHeaders::from_header_map(&headers);
    let event: IdentityEvent = verifier.verify(&body, &svix)?;

    tracing::info!(
        event_type = %event.event_type,
        svix_id = svix.id.unwrap_or_default(),
        "Webhook event verified"
    );

    match state.user_sync.dispatch(&event).await? {
        DispatchOutcome::Created(user) | DispatchOutcome::Updated(user) => {
            tracing::debug!(external_id = %user.external_id, "Webhook applied");
        }
        DispatchOutcome::Ignored => {}
    }

    Ok((StatusCode::OK, "Webhook processed successfully"))
}
