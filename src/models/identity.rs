// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Identity provider (Clerk) webhook event payloads.

use serde::Deserialize;

/// A verified identity provider event.
///
/// `data` is kept raw: its shape depends on the event type, and only the
/// user lifecycle events are ever parsed further.
#[derive(Debug, Clone, Deserialize)]
pub struct IdentityEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

/// Dispatch branch for an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    UserCreated,
    UserUpdated,
    Other,
}

impl IdentityEvent {
    pub fn kind(&self) -> EventKind {
        match self.event_type.as_str() {
            "user.created" => EventKind::UserCreated,
            "user.updated" => EventKind::UserUpdated,
            _ => EventKind::Other,
        }
    }

    /// Parse `data` as a user object.
    pub fn user_data(&self) -> Result<IdentityUser, serde_json::Error> {
        IdentityUser::deserialize(&self.data)
    }
}

/// User object carried by `user.created` / `user.updated`.
#[derive(Debug, Clone, Deserialize)]
pub struct IdentityUser {
    pub id: String,
    #[serde(default)]
    pub email_addresses: Vec<EmailAddress>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmailAddress {
    #[serde(default)]
    pub id: Option<String>,
    pub email_address: String,
}

impl IdentityUser {
    /// `trim(first + " " + last)`, with missing parts as empty strings.
    pub fn display_name(&self) -> String {
        format!(
            "{} {}",
            self.first_name.as_deref().unwrap_or(""),
            self.last_name.as_deref().unwrap_or("")
        )
        .trim()
        .to_string()
    }

    /// The first listed email address, or empty when there is none.
    pub fn email(&self) -> String {
        self.email_addresses
            .first()
            .map(|e| e.email_address.clone())
            .unwrap_or_default()
    }
}
