// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Identity provider webhook signature verification (Svix scheme).
//!
//! The provider signs `"{svix-id}.{svix-timestamp}.{body}"` with HMAC-SHA256
//! using the base64 key behind the `whsec_` prefix, and sends one or more
//! `v1,<base64 signature>` entries in `svix-signature`.
//!
//! Verification is independent of the web framework: callers hand in the raw
//! body and the three header values.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use hmac::{Hmac, Mac};
use serde::de::DeserializeOwned;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

pub const HEADER_ID: &str = "svix-id";
pub const HEADER_TIMESTAMP: &str = "svix-timestamp";
pub const HEADER_SIGNATURE: &str = "svix-signature";

const SECRET_PREFIX: &str = "whsec_";
const SIGNATURE_VERSION: &str = "v1";
/// Allowed clock skew between the provider and us, in seconds.
const TIMESTAMP_TOLERANCE_SECS: i64 = 5 * 60;

/// Webhook verification failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WebhookError {
    #[error("missing svix headers")]
    MissingHeaders,

    #[error("webhook secret is not valid base64")]
    InvalidSecret,

    #[error("invalid timestamp header: {0}")]
    InvalidTimestamp(String),

    #[error("timestamp outside tolerance ({0}s skew)")]
    StaleTimestamp(i64),

    #[error("no matching signature")]
    SignatureMismatch,

    #[error("payload is not a valid event: {0}")]
    InvalidPayload(String),
}

/// The three signature headers, as received.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebhookHeaders<'a> {
    pub id: Option<&'a str>,
    pub timestamp: Option<&'a str>,
    pub signature: Option<&'a str>,
}

impl<'a> WebhookHeaders<'a> {
    /// Extract the svix headers from an HTTP header map.
    ///
    /// Headers that are not valid visible ASCII count as missing.
    pub fn from_header_map(headers: &'a axum::http::HeaderMap) -> Self {
        Self {
            id: header_str(headers, HEADER_ID),
            timestamp: header_str(headers, HEADER_TIMESTAMP),
            signature: header_str(headers, HEADER_SIGNATURE),
        }
    }
}

fn header_str<'a>(headers: &'a axum::http::HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Verifier bound to one signing secret.
#[derive(Clone)]
pub struct WebhookVerifier {
    key: Vec<u8>,
}

impl std::fmt::Debug for WebhookVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookVerifier").finish_non_exhaustive()
    }
}

impl WebhookVerifier {
    /// Build a verifier from a `whsec_<base64>` secret.
    pub fn new(secret: &str) -> Result<Self, WebhookError> {
        let encoded = secret.strip_prefix(SECRET_PREFIX).unwrap_or(secret);
        let key = BASE64
            .decode(encoded)
            .map_err(|_| WebhookError::InvalidSecret)?;
        Ok(Self { key })
    }

    /// Verify a delivery against the current time and parse its body.
    pub fn verify<T: DeserializeOwned>(
        &self,
        body: &[u8],
        headers: &WebhookHeaders<'_>,
    ) -> Result<T, WebhookError> {
        self.verify_at(body, headers, chrono::Utc::now().timestamp())
    }

    /// Verify a delivery as of `now` (Unix seconds) and parse its body.
    pub fn verify_at<T: DeserializeOwned>(
        &self,
        body: &[u8],
        headers: &WebhookHeaders<'_>,
        now: i64,
    ) -> Result<T, WebhookError> {
        let (Some(msg_id), Some(timestamp), Some(signatures)) =
            (headers.id, headers.timestamp, headers.signature)
        else {
            return Err(WebhookError::MissingHeaders);
        };

        let ts: i64 = timestamp
            .trim()
            .parse()
            .map_err(|_| WebhookError::InvalidTimestamp(timestamp.to_string()))?;
        // Header is unauthenticated at this point; any i64 must be handled.
        if now.abs_diff(ts) > TIMESTAMP_TOLERANCE_SECS.unsigned_abs() {
            return Err(WebhookError::StaleTimestamp(now.saturating_sub(ts)));
        }

        let matched = signatures
            .split_whitespace()
            .filter_map(|entry| entry.split_once(','))
            .filter(|(version, _)| *version == SIGNATURE_VERSION)
            .filter_map(|(_, sig)| BASE64.decode(sig).ok())
            .any(|sig| {
                self.mac(msg_id, ts, body)
                    .map(|mac| mac.verify_slice(&sig).is_ok())
                    .unwrap_or(false)
            });

        if !matched {
            return Err(WebhookError::SignatureMismatch);
        }

        serde_json::from_slice(body).map_err(|e| WebhookError::InvalidPayload(e.to_string()))
    }

    /// Produce a `svix-signature` value for a payload.
    pub fn sign(&self, msg_id: &str, timestamp: i64, body: &[u8]) -> Result<String, WebhookError> {
        let mac = self.mac(msg_id, timestamp, body)?;
        Ok(format!(
            "{},{}",
            SIGNATURE_VERSION,
            BASE64.encode(mac.finalize().into_bytes())
        ))
    }

    fn mac(&self, msg_id: &str, timestamp: i64, body: &[u8]) -> Result<HmacSha256, WebhookError> {
        let mut mac =
            HmacSha256::new_from_slice(&self.key).map_err(|_| WebhookError::InvalidSecret)?;
        mac.update(msg_id.as_bytes());
        mac.update(b".");
        mac.update(timestamp.to_string().as_bytes());
        mac.update(b".");
        mac.update(body);
        Ok(mac)
    }
}

/// Verify a delivery with a one-off secret.
pub fn verify<T: DeserializeOwned>(
    body: &[u8],
    headers: &WebhookHeaders<'_>,
    secret: &str,
) -> Result<T, WebhookError> {
    WebhookVerifier::new(secret)?.verify(body, headers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    // base64("unit-test-secret")
    const SECRET: &str = "whsec_dW5pdC10ZXN0LXNlY3JldA==";
    const NOW: i64 = 1_700_000_000;
    const BODY: &[u8] = br#"{"type":"user.created","data":{"id":"user_1"}}"#;

    fn signed(verifier: &WebhookVerifier, ts: i64) -> String {
        verifier.sign("msg_1", ts, BODY).unwrap()
    }

    #[test]
    fn test_verify_valid_signature() {
        let verifier = WebhookVerifier::new(SECRET).unwrap();
        let sig = signed(&verifier, NOW);
        let ts = NOW.to_string();
        let headers = WebhookHeaders {
            id: Some("msg_1"),
            timestamp: Some(&ts),
            signature: Some(&sig),
        };

        let event: Value = verifier.verify_at(BODY, &headers, NOW).unwrap();
        assert_eq!(event["type"], "user.created");
    }

    #[test]
    fn test_verify_accepts_any_matching_entry() {
        let verifier = WebhookVerifier::new(SECRET).unwrap();
        let sig = format!("v1,bm90LWl0 v2,whatever {}", signed(&verifier, NOW));
        let ts = NOW.to_string();
        let headers = WebhookHeaders {
            id: Some("msg_1"),
            timestamp: Some(&ts),
            signature: Some(&sig),
        };

        assert!(verifier.verify_at::<Value>(BODY, &headers, NOW).is_ok());
    }

    #[test]
    fn test_verify_missing_each_header() {
        let verifier = WebhookVerifier::new(SECRET).unwrap();
        let sig = signed(&verifier, NOW);
        let ts = NOW.to_string();
        let full = WebhookHeaders {
            id: Some("msg_1"),
            timestamp: Some(&ts),
            signature: Some(&sig),
        };

        for headers in [
            WebhookHeaders { id: None, ..full },
            WebhookHeaders { timestamp: None, ..full },
            WebhookHeaders { signature: None, ..full },
        ] {
            assert_eq!(
                verifier.verify_at::<Value>(BODY, &headers, NOW).unwrap_err(),
                WebhookError::MissingHeaders
            );
        }
    }

    #[test]
    fn test_verify_tampered_body() {
        let verifier = WebhookVerifier::new(SECRET).unwrap();
        let sig = signed(&verifier, NOW);
        let ts = NOW.to_string();
        let headers = WebhookHeaders {
            id: Some("msg_1"),
            timestamp: Some(&ts),
            signature: Some(&sig),
        };

        let tampered = br#"{"type":"user.created","data":{"id":"user_2"}}"#;
        assert_eq!(
            verifier.verify_at::<Value>(tampered, &headers, NOW).unwrap_err(),
            WebhookError::SignatureMismatch
        );
    }

    #[test]
    fn test_verify_wrong_secret() {
        let signer = WebhookVerifier::new("whsec_b3RoZXItc2VjcmV0").unwrap();
        let verifier = WebhookVerifier::new(SECRET).unwrap();
        let sig = signed(&signer, NOW);
        let ts = NOW.to_string();
        let headers = WebhookHeaders {
            id: Some("msg_1"),
            timestamp: Some(&ts),
            signature: Some(&sig),
        };

        assert_eq!(
            verifier.verify_at::<Value>(BODY, &headers, NOW).unwrap_err(),
            WebhookError::SignatureMismatch
        );
    }

    #[test]
    fn test_verify_stale_and_future_timestamps() {
        let verifier = WebhookVerifier::new(SECRET).unwrap();

        for ts in [NOW - 301, NOW + 301] {
            let sig = signed(&verifier, ts);
            let ts_str = ts.to_string();
            let headers = WebhookHeaders {
                id: Some("msg_1"),
                timestamp: Some(&ts_str),
                signature: Some(&sig),
            };
            assert!(matches!(
                verifier.verify_at::<Value>(BODY, &headers, NOW),
                Err(WebhookError::StaleTimestamp(_))
            ));
        }
    }

    #[test]
    fn test_verify_extreme_timestamps_are_stale() {
        let verifier = WebhookVerifier::new(SECRET).unwrap();

        for ts in [
            "-9223372036854775000".to_string(),
            i64::MIN.to_string(),
            i64::MAX.to_string(),
        ] {
            let headers = WebhookHeaders {
                id: Some("msg_1"),
                timestamp: Some(&ts),
                signature: Some("v1,AAAA"),
            };
            assert!(matches!(
                verifier.verify_at::<Value>(BODY, &headers, NOW),
                Err(WebhookError::StaleTimestamp(_))
            ));
        }

        let ts = i64::MIN.to_string();
        let headers = WebhookHeaders {
            id: Some("msg_1"),
            timestamp: Some(&ts),
            signature: Some("v1,AAAA"),
        };
        assert!(matches!(
            verifier.verify_at::<Value>(BODY, &headers, i64::MAX),
            Err(WebhookError::StaleTimestamp(i64::MAX))
        ));
    }

    #[test]
    fn test_verify_non_numeric_timestamp() {
        let verifier = WebhookVerifier::new(SECRET).unwrap();
        let headers = WebhookHeaders {
            id: Some("msg_1"),
            timestamp: Some("yesterday"),
            signature: Some("v1,AAAA"),
        };
        assert!(matches!(
            verifier.verify_at::<Value>(BODY, &headers, NOW),
            Err(WebhookError::InvalidTimestamp(_))
        ));
    }

    #[test]
    fn test_free_verify_uses_current_time() {
        let now = chrono::Utc::now().timestamp();
        let sig = signed(&WebhookVerifier::new(SECRET).unwrap(), now);
        let ts = now.to_string();
        let headers = WebhookHeaders {
            id: Some("msg_1"),
            timestamp: Some(&ts),
            signature: Some(&sig),
        };

        let event: Value = verify(BODY, &headers, SECRET).unwrap();
        assert_eq!(event["data"]["id"], "user_1");
    }

    #[test]
    fn test_secret_without_prefix_and_invalid_secret() {
        assert!(WebhookVerifier::new("dW5pdC10ZXN0LXNlY3JldA==").is_ok());
        assert_eq!(
            WebhookVerifier::new("whsec_***not base64***").unwrap_err(),
            WebhookError::InvalidSecret
        );
    }
}
