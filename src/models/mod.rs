// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod identity;
pub mod plan;
pub mod user;

pub use identity::{EventKind, IdentityEvent, IdentityUser};
pub use plan::{GeneratedPlan, GeneratorOutcome, Plan, DEFAULT_PLAN_NAME};
pub use user::User;
