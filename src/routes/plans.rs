// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Plan routes: voice assistant generation hook and plan listing.

use crate::error::{AppError, Result};
use crate::models::Plan;
use crate::services::{PlanOutcome, PlanRequest};
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Plan routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/vapi/generate-program", post(generate_program))
        .route("/api/users/{user_id}/plans", get(list_plans))
}

/// Generate a plan through the external generator and store it.
///
/// 200 with the generator result plus `planId`; 500 with the generator's
/// own payload when it reports failure.
async fn generate_program(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<Response> {
    let Json(payload) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let request = PlanRequest::from_json(payload)?;

    let outcome = state.plan_service.generate_program(request).await?;
    let status = match outcome {
        PlanOutcome::Created { .. } => StatusCode::OK,
        PlanOutcome::Rejected(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    Ok((status, Json(outcome.into_body())).into_response())
}

/// Plans for one user.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct PlansResponse {
    pub plans: Vec<Plan>,
}

async fn list_plans(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<PlansResponse>> {
    let plans = state.plan_service.list_plans(&user_id).await?;
    Ok(Json(PlansResponse { plans }))
}
