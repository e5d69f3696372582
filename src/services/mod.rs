// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod generator;
pub mod plans;
pub mod user_sync;
pub mod webhook_verifier;

pub use generator::GeneratorClient;
pub use plans::{PlanOutcome, PlanRequest, PlanService};
pub use user_sync::{DispatchOutcome, UserSyncService};
pub use webhook_verifier::{WebhookError, WebhookHeaders, WebhookVerifier};
