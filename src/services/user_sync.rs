// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User sync: identity provider events → user records.
//!
//! Both create and update are upserts keyed by the identity provider's user
//! ID, so redelivered and out-of-order events converge on one record.

use crate::db::Database;
use crate::error::AppError;
use crate::models::{EventKind, IdentityEvent, IdentityUser, User};

/// Profile fields carried by a user lifecycle event.
#[derive(Debug, Clone, PartialEq)]
pub struct UserProfile {
    pub external_id: String,
    pub email: String,
    pub name: String,
    pub image: Option<String>,
}

impl From<&IdentityUser> for UserProfile {
    fn from(user: &IdentityUser) -> Self {
        Self {
            external_id: user.id.clone(),
            email: user.email(),
            name: user.display_name(),
            image: user.image_url.clone().filter(|url| !url.is_empty()),
        }
    }
}

/// What the dispatcher did with an event.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    Created(User),
    Updated(User),
    Ignored,
}

/// Applies user lifecycle events to the store.
#[derive(Clone)]
pub struct UserSyncService {
    db: Database,
}

impl UserSyncService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Route a verified event to the matching sync operation.
    pub async fn dispatch(&self, event: &IdentityEvent) -> Result<DispatchOutcome, AppError> {
        let kind = event.kind();
        if kind == EventKind::Other {
            tracing::debug!(event_type = %event.event_type, "Ignoring unhandled event type");
            return Ok(DispatchOutcome::Ignored);
        }

        let user = event.user_data().map_err(|e| {
            AppError::BadRequest(format!("Invalid {} payload: {}", event.event_type, e))
        })?;
        let profile = UserProfile::from(&user);

        match kind {
            EventKind::UserCreated => self.create(profile).await.map(DispatchOutcome::Created),
            EventKind::UserUpdated => self.update(profile).await.map(DispatchOutcome::Updated),
            EventKind::Other => Ok(DispatchOutcome::Ignored),
        }
    }

    /// Insert the user, or refresh it if this is a redelivery.
    pub async fn create(&self, profile: UserProfile) -> Result<User, AppError> {
        let user = self.write(profile).await?;
        tracing::info!(external_id = %user.external_id, "User synced (created)");
        Ok(user)
    }

    /// Overwrite the profile fields. Unknown users are created.
    pub async fn update(&self, profile: UserProfile) -> Result<User, AppError> {
        let user = self.write(profile).await?;
        tracing::info!(external_id = %user.external_id, "User synced (updated)");
        Ok(user)
    }

    async fn write(&self, profile: UserProfile) -> Result<User, AppError> {
        let now = chrono::Utc::now().to_rfc3339();

        let existing = self
            .db
            .get_user(&profile.external_id)
            .await
            .map_err(sync_failure)?;

        let created_at = match existing {
            Some(user) => user.created_at,
            None => {
                tracing::debug!(external_id = %profile.external_id, "No existing user, inserting");
                now.clone()
            }
        };

        let user = User {
            external_id: profile.external_id,
            email: profile.email,
            name: profile.name,
            image: profile.image,
            created_at,
            updated_at: now,
        };

        self.db.upsert_user(&user).await.map_err(sync_failure)?;
        Ok(user)
    }
}

fn sync_failure(err: AppError) -> AppError {
    AppError::SyncFailure(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn created_event(id: &str, first: Option<&str>, last: Option<&str>) -> IdentityEvent {
        serde_json::from_value(json!({
            "type": "user.created",
            "data": {
                "id": id,
                "email_addresses": [{"id": "idn_1", "email_address": "ada@example.com"}],
                "first_name": first,
                "last_name": last,
                "image_url": "https://img.example.com/ada.png"
            }
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_dispatch_created_derives_name() {
        let sync = UserSyncService::new(Database::in_memory());

        let outcome = sync
            .dispatch(&created_event("user_1", Some("Ada"), None))
            .await
            .unwrap();

        let user = match outcome {
            DispatchOutcome::Created(user) => user,
            other => panic!("expected Created, got {other:?}"),
        };
        assert_eq!(user.name, "Ada");
        assert_eq!(user.email, "ada@example.com");
        assert_eq!(user.image.as_deref(), Some("https://img.example.com/ada.png"));
    }

    #[tokio::test]
    async fn test_redelivered_create_keeps_created_at() {
        let db = Database::in_memory();
        let sync = UserSyncService::new(db.clone());
        let event = created_event("user_1", Some("Ada"), Some("Lovelace"));

        let DispatchOutcome::Created(first) = sync.dispatch(&event).await.unwrap() else {
            panic!("expected Created");
        };
        let DispatchOutcome::Created(second) = sync.dispatch(&event).await.unwrap() else {
            panic!("expected Created");
        };

        assert_eq!(first.created_at, second.created_at);
        assert_eq!(db.get_user("user_1").await.unwrap(), Some(second));
    }

    #[tokio::test]
    async fn test_update_unknown_user_upserts() {
        let db = Database::in_memory();
        let sync = UserSyncService::new(db.clone());
        let event: IdentityEvent = serde_json::from_value(json!({
            "type": "user.updated",
            "data": {"id": "user_9", "first_name": "Grace", "last_name": "Hopper"}
        }))
        .unwrap();

        let outcome = sync.dispatch(&event).await.unwrap();
        assert!(matches!(outcome, DispatchOutcome::Updated(_)));

        let stored = db.get_user("user_9").await.unwrap().unwrap();
        assert_eq!(stored.name, "Grace Hopper");
        assert_eq!(stored.email, "");
        assert_eq!(stored.image, None);
    }

    #[tokio::test]
    async fn test_update_overwrites_profile_fields() {
        let db = Database::in_memory();
        let sync = UserSyncService::new(db.clone());
        sync.dispatch(&created_event("user_1", Some("Ada"), None))
            .await
            .unwrap();

        let update: IdentityEvent = serde_json::from_value(json!({
            "type": "user.updated",
            "data": {
                "id": "user_1",
                "email_addresses": [{"email_address": "countess@example.com"}],
                "first_name": "Ada",
                "last_name": "King",
                "image_url": ""
            }
        }))
        .unwrap();
        sync.dispatch(&update).await.unwrap();

        let stored = db.get_user("user_1").await.unwrap().unwrap();
        assert_eq!(stored.name, "Ada King");
        assert_eq!(stored.email, "countess@example.com");
        assert_eq!(stored.image, None);
    }

    #[tokio::test]
    async fn test_other_events_are_ignored_without_store_access() {
        // Offline store: any access would fail.
        let sync = UserSyncService::new(Database::new_mock());
        let event: IdentityEvent =
            serde_json::from_value(json!({"type": "session.created", "data": {"id": "sess_1"}}))
                .unwrap();

        assert_eq!(sync.dispatch(&event).await.unwrap(), DispatchOutcome::Ignored);
    }

    #[tokio::test]
    async fn test_store_failure_is_sync_failure() {
        let sync = UserSyncService::new(Database::new_mock());
        let err = sync
            .dispatch(&created_event("user_1", Some("Ada"), None))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::SyncFailure(_)));
    }
}
