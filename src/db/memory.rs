//! In-memory store for local runs and tests.

use crate::error::AppError;
use crate::models::{Plan, User};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

/// Process-local store. Per-key writes are atomic (one shard lock per entry).
#[derive(Default)]
pub struct MemoryStore {
    users: DashMap<String, User>,
    plans: DashMap<String, Plan>,
}

impl MemoryStore {
    pub fn get_user(&self, external_id: &str) -> Option<User> {
        self.users.get(external_id).map(|u| u.value().clone())
    }

    pub fn upsert_user(&self, user: &User) {
        self.users.insert(user.external_id.clone(), user.clone());
    }

    #[cfg(test)]
    fn user_count(&self) -> usize {
        self.users.len()
    }

    pub fn insert_plan(&self, plan: &Plan) -> Result<(), AppError> {
        match self.plans.entry(plan.id.clone()) {
            Entry::Occupied(_) => Err(AppError::Database(format!(
                "Plan {} already exists",
                plan.id
            ))),
            Entry::Vacant(slot) => {
                slot.insert(plan.clone());
                Ok(())
            }
        }
    }

    pub fn get_plan(&self, plan_id: &str) -> Option<Plan> {
        self.plans.get(plan_id).map(|p| p.value().clone())
    }

    pub fn list_plans_for_user(&self, user_id: &str) -> Vec<Plan> {
        let mut plans: Vec<Plan> = self
            .plans
            .iter()
            .filter(|p| p.user_id == user_id)
            .map(|p| p.value().clone())
            .collect();
        // RFC 3339 UTC timestamps sort lexicographically.
        plans.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        plans
    }
}
