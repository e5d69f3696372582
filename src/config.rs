// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! The webhook secret is optional at startup: without it the service still
//! serves plan requests, and every webhook delivery is rejected.

use std::env;
use std::time::Duration;

/// Default base URL of the plan generator service (the packaged backend on port 8000).
pub const DEFAULT_GENERATOR_URL: &str = "http://localhost:8000";

/// Which store backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// Google Cloud Firestore (or its emulator).
    Firestore,
    /// Process-local in-memory store, for local runs.
    Memory,
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// GCP project ID
    pub gcp_project_id: String,
    /// Server port
    pub port: u16,
    /// Store backend selection
    pub store_backend: StoreBackend,
    /// Base URL of the plan generator service
    pub generator_url: String,
    /// Optional timeout for generator calls (None = client default)
    pub generator_timeout: Option<Duration>,

    // --- Secrets ---
    /// Identity provider webhook signing secret (`whsec_...`)
    pub clerk_webhook_secret: Option<String>,
}

impl Config {
    /// Config for tests: in-memory store, known webhook secret.
    pub fn test_default() -> Self {
        Self {
            frontend_url: "http://localhost:5173".to_string(),
            gcp_project_id: "test-project".to_string(),
            port: 8080,
            store_backend: StoreBackend::Memory,
            generator_url: DEFAULT_GENERATOR_URL.to_string(),
            generator_timeout: None,
            // base64("test_webhook_secret_key_material")
            clerk_webhook_secret: Some(
                "whsec_dGVzdF93ZWJob29rX3NlY3JldF9rZXlfbWF0ZXJpYWw=".to_string(),
            ),
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let store_backend = match env::var("STORE_BACKEND") {
            Ok(v) => parse_store_backend(&v)?,
            Err(_) => StoreBackend::Firestore,
        };

        let generator_timeout = match env::var("GENERATOR_TIMEOUT_SECS") {
            Ok(v) => Some(Duration::from_secs(v.trim().parse().map_err(|_| {
                ConfigError::Invalid("GENERATOR_TIMEOUT_SECS", v.clone())
            })?)),
            Err(_) => None,
        };

        Ok(Self {
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            store_backend,
            generator_url: env::var("GENERATOR_URL")
                .map(|v| v.trim().trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_GENERATOR_URL.to_string()),
            generator_timeout,
            clerk_webhook_secret: env::var("CLERK_WEBHOOK_SECRET")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
        })
    }
}

fn parse_store_backend(value: &str) -> Result<StoreBackend, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "firestore" => Ok(StoreBackend::Firestore),
        "memory" => Ok(StoreBackend::Memory),
        _ => Err(ConfigError::Invalid("STORE_BACKEND", value.to_string())),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}
