// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! FitPlan API: user sync and plan generation for the fitness app.
//!
//! This crate provides the backend that keeps user records in step with the
//! identity provider and turns voice-assistant plan requests into stored
//! diet and workout plans.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use db::Database;
use error::AppError;
use services::{GeneratorClient, PlanService, UserSyncService, WebhookVerifier};

/// Shared application state.
///
/// Every client is built here once and handed to handlers through
/// `Arc<AppState>`; dropping the state releases them.
pub struct AppState {
    pub config: Config,
    pub db: Database,
    /// None when no webhook secret is configured.
    pub webhook_verifier: Option<WebhookVerifier>,
    pub user_sync: UserSyncService,
    pub plan_service: PlanService,
}

impl AppState {
    /// Wire up services from configuration and an opened store.
    pub fn new(config: Config, db: Database) -> Result<Self, AppError> {
        let webhook_verifier = match config.clerk_webhook_secret.as_deref() {
            Some(secret) => Some(WebhookVerifier::new(secret).map_err(|e| {
                AppError::Configuration(format!("CLERK_WEBHOOK_SECRET: {}", e))
            })?),
            None => {
                tracing::warn!("CLERK_WEBHOOK_SECRET not set; webhook deliveries will be rejected");
                None
            }
        };

        let generator = GeneratorClient::new(&config.generator_url, config.generator_timeout)?;
        tracing::info!(endpoint = %generator.endpoint(), "Plan generator client ready");

        Ok(Self {
            user_sync: UserSyncService::new(db.clone()),
            plan_service: PlanService::new(db.clone(), generator),
            webhook_verifier,
            config,
            db,
        })
    }
}
