//! Fitness plan model and the generator's response contract.

use serde::{Deserialize, Serialize};
use serde_json::Value;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Name given to plans when the request does not carry one.
pub const DEFAULT_PLAN_NAME: &str = "Fitness Plan";

/// A generated plan, stored in Firestore (document ID = `id`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Plan {
    pub id: String,
    /// Identity provider user ID of the owner
    pub user_id: String,
    pub name: String,
    #[cfg_attr(feature = "binding-generation", ts(type = "unknown"))]
    pub diet_plan: Value,
    #[cfg_attr(feature = "binding-generation", ts(type = "unknown"))]
    pub workout_plan: Value,
    /// Always true on creation
    pub is_active: bool,
    pub created_at: String,
}

/// The diet and workout parts of a successful generation.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedPlan {
    pub diet_plan: Value,
    pub workout_plan: Value,
}

/// Classified generator response.
///
/// The generator wraps its pipeline result in an envelope, and both the
/// envelope and the pipeline result carry a `success` flag. Only when both
/// are `true` is the result a usable plan.
#[derive(Debug, Clone, PartialEq)]
pub enum GeneratorOutcome {
    Generated(GeneratedPlan),
    Failed,
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    data: Option<EnvelopeData>,
}

#[derive(Deserialize)]
struct EnvelopeData {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    diet_plan: Value,
    #[serde(default)]
    workout_plan: Value,
}

impl GeneratorOutcome {
    /// Classify a parsed generator response.
    ///
    /// Anything that does not match the envelope shape is a failure.
    pub fn classify(result: &Value) -> Self {
        match Envelope::deserialize(result) {
            Ok(Envelope {
                success: true,
                data:
                    Some(EnvelopeData {
                        success: true,
                        diet_plan,
                        workout_plan,
                    }),
            }) => GeneratorOutcome::Generated(GeneratedPlan {
                diet_plan,
                workout_plan,
            }),
            _ => GeneratorOutcome::Failed,
        }
    }
}
