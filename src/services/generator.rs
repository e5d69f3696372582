// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP client for the external fitness plan generator.
//!
//! The generator is opaque: JSON in, JSON out. One attempt per call, no
//! retries. The response body is read as text before parsing so it can be
//! logged and surfaced even when it is not JSON.

use crate::error::AppError;
use serde_json::Value;
use std::time::Duration;

/// Generator endpoint path, relative to the configured base URL.
pub const GENERATE_PATH: &str = "/api/fitness_generator";

/// Plan generator client.
#[derive(Clone)]
pub struct GeneratorClient {
    http: reqwest::Client,
    endpoint: String,
}

impl GeneratorClient {
    /// Create a client for the generator at `base_url`.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, AppError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(|e| {
            AppError::Internal(anyhow::anyhow!("Failed to build HTTP client: {}", e))
        })?;

        Ok(Self {
            http,
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), GENERATE_PATH),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// POST `payload` verbatim and return the parsed JSON response.
    pub async fn generate(&self, payload: &Value) -> Result<Value, AppError> {
        tracing::debug!(url = %self.endpoint, payload = %payload, "Calling plan generator");

        let response = self
            .http
            .post(&self.endpoint)
            .json(payload)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(url = %self.endpoint, error = %e, "Plan generator request failed");
                AppError::Transport(e.to_string())
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::Transport(format!("Failed to read generator response: {}", e)))?;

        tracing::debug!(
            url = %self.endpoint,
            status = status.as_u16(),
            body_len = body.len(),
            "Plan generator responded"
        );

        if !status.is_success() {
            tracing::warn!(
                url = %self.endpoint,
                status = status.as_u16(),
                body = %body,
                "Plan generator returned an error status"
            );
            return Err(AppError::UpstreamError {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::warn!(url = %self.endpoint, error = %e, body = %body, "Plan generator returned malformed JSON");
            AppError::UpstreamMalformed { body }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_base_url() {
        let client = GeneratorClient::new("http://localhost:8000/", None).unwrap();
        assert_eq!(
            client.endpoint(),
            "http://localhost:8000/api/fitness_generator"
        );

        let client =
            GeneratorClient::new("http://generator", Some(Duration::from_secs(30))).unwrap();
        assert_eq!(client.endpoint(), "http://generator/api/fitness_generator");
    }
}
