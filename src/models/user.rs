//! User model for storage and API.

use serde::{Deserialize, Serialize};

/// User profile stored in Firestore, synced from the identity provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Identity provider user ID (also used as document ID)
    pub external_id: String,
    /// Email address (empty if the provider sent none)
    pub email: String,
    /// Display name: "first last", trimmed
    pub name: String,
    /// Profile picture URL
    pub image: Option<String>,
    /// When the user was first synced
    pub created_at: String,
    /// Last time the profile fields were written
    pub updated_at: String,
}
