// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Plan generation: forward a request to the generator, persist the result.

use crate::db::Database;
use crate::error::AppError;
use crate::models::{GeneratorOutcome, Plan, DEFAULT_PLAN_NAME};
use crate::services::generator::GeneratorClient;
use serde_json::Value;

/// A validated plan request. The raw payload is what gets forwarded.
#[derive(Debug, Clone)]
pub struct PlanRequest {
    pub user_id: String,
    pub name: Option<String>,
    payload: Value,
}

impl PlanRequest {
    /// Validate an inbound JSON body.
    ///
    /// Requires an object with a non-empty string `user_id`. Everything else
    /// is generator input and is left untouched.
    pub fn from_json(payload: Value) -> Result<Self, AppError> {
        let obj = payload
            .as_object()
            .ok_or_else(|| AppError::BadRequest("Request body must be a JSON object".into()))?;

        let user_id = obj
            .get("user_id")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| AppError::BadRequest("user_id is required".into()))?
            .to_string();

        let name = obj
            .get("name")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string);

        Ok(Self {
            user_id,
            name,
            payload,
        })
    }

    pub fn payload(&self) -> &Value {
        &self.payload
    }

    pub fn plan_name(&self) -> &str {
        self.name.as_deref().unwrap_or(DEFAULT_PLAN_NAME)
    }
}

/// Result of a generation attempt that reached the generator and got JSON back.
#[derive(Debug, Clone, PartialEq)]
pub enum PlanOutcome {
    /// Plan persisted; `result` is the generator response as received.
    Created { result: Value, plan_id: String },
    /// Generator reported failure; its response is passed back verbatim.
    Rejected(Value),
}

impl PlanOutcome {
    /// Response body: the generator result, plus `planId` when one was stored.
    pub fn into_body(self) -> Value {
        match self {
            PlanOutcome::Created { mut result, plan_id } => {
                if let Some(obj) = result.as_object_mut() {
                    obj.insert("planId".to_string(), Value::String(plan_id));
                }
                result
            }
            PlanOutcome::Rejected(result) => result,
        }
    }
}

/// Generates plans through the external generator and stores them.
#[derive(Clone)]
pub struct PlanService {
    db: Database,
    generator: GeneratorClient,
}

impl PlanService {
    pub fn new(db: Database, generator: GeneratorClient) -> Self {
        Self { db, generator }
    }

    /// One generation attempt: call the generator once, store on success.
    pub async fn generate_program(&self, request: PlanRequest) -> Result<PlanOutcome, AppError> {
        tracing::info!(user_id = %request.user_id, "Generating fitness plan");

        let result = self.generator.generate(request.payload()).await?;

        let generated = match GeneratorOutcome::classify(&result) {
            GeneratorOutcome::Generated(generated) => generated,
            GeneratorOutcome::Failed => {
                tracing::warn!(
                    user_id = %request.user_id,
                    result = %result,
                    "Plan generator reported failure"
                );
                return Ok(PlanOutcome::Rejected(result));
            }
        };

        let plan = Plan {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: request.user_id.clone(),
            name: request.plan_name().to_string(),
            diet_plan: generated.diet_plan,
            workout_plan: generated.workout_plan,
            is_active: true,
            created_at: chrono::Utc::now().to_rfc3339(),
        };

        let plan_id = self.db.insert_plan(&plan).await?;

        tracing::info!(user_id = %plan.user_id, plan_id = %plan_id, "Plan stored");

        Ok(PlanOutcome::Created { result, plan_id })
    }

    /// A user's plans, newest first.
    pub async fn list_plans(&self, user_id: &str) -> Result<Vec<Plan>, AppError> {
        self.db.list_plans_for_user(user_id).await
    }
}
