// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Database layer.
//!
//! [`Database`] is the store handle carried in application state. It fronts
//! Firestore in production, an in-memory store for local runs and tests, and
//! an offline mode in which every call fails.

pub mod firestore;
pub mod memory;

pub use self::firestore::FirestoreStore;
pub use memory::MemoryStore;

use crate::error::AppError;
use crate::models::{Plan, User};
use std::sync::Arc;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    pub const PLANS: &str = "plans";
}

/// Store handle (cheap to clone).
#[derive(Clone)]
pub struct Database {
    backend: Backend,
}

#[derive(Clone)]
enum Backend {
    Firestore(FirestoreStore),
    Memory(Arc<MemoryStore>),
    Offline,
}

impl Database {
    /// Connect to Firestore.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn firestore(project_id: &str) -> Result<Self, AppError> {
        Ok(Self {
            backend: Backend::Firestore(FirestoreStore::new(project_id).await?),
        })
    }

    /// Create an empty in-memory store.
    pub fn in_memory() -> Self {
        Self {
            backend: Backend::Memory(Arc::new(MemoryStore::default())),
        }
    }

    /// Create a mock database for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self {
            backend: Backend::Offline,
        }
    }

    fn offline() -> AppError {
        AppError::Database("Database not connected (offline mode)".to_string())
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Get a user by identity provider ID.
    pub async fn get_user(&self, external_id: &str) -> Result<Option<User>, AppError> {
        match &self.backend {
            Backend::Firestore(store) => store.get_user(external_id).await,
            Backend::Memory(store) => Ok(store.get_user(external_id)),
            Backend::Offline => Err(Self::offline()),
        }
    }

    /// Create or overwrite a user, keyed by `external_id`.
    pub async fn upsert_user(&self, user: &User) -> Result<(), AppError> {
        match &self.backend {
            Backend::Firestore(store) => store.upsert_user(user).await,
            Backend::Memory(store) => {
                store.upsert_user(user);
                Ok(())
            }
            Backend::Offline => Err(Self::offline()),
        }
    }

    // ─── Plan Operations ─────────────────────────────────────────

    /// Store a new plan. Returns its ID.
    pub async fn insert_plan(&self, plan: &Plan) -> Result<String, AppError> {
        match &self.backend {
            Backend::Firestore(store) => store.insert_plan(plan).await?,
            Backend::Memory(store) => store.insert_plan(plan)?,
            Backend::Offline => return Err(Self::offline()),
        }
        Ok(plan.id.clone())
    }

    /// All plans for a user, newest first.
    pub async fn list_plans_for_user(&self, user_id: &str) -> Result<Vec<Plan>, AppError> {
        match &self.backend {
            Backend::Firestore(store) => store.list_plans_for_user(user_id).await,
            Backend::Memory(store) => Ok(store.list_plans_for_user(user_id)),
            Backend::Offline => Err(Self::offline()),
        }
    }

    /// Get a plan by ID.
    pub async fn get_plan(&self, plan_id: &str) -> Result<Option<Plan>, AppError> {
        match &self.backend {
            Backend::Firestore(store) => store.get_plan(plan_id).await,
            Backend::Memory(store) => Ok(store.get_plan(plan_id)),
            Backend::Offline => Err(Self::offline()),
        }
    }
}
