//! User resource model.
//!
//! # Invariants
//! - `username` is the external key: unique and immutable after insert.
//! - `created_at <= updated_at`; both are epoch milliseconds.

use super::patch::Patch;
use serde::{Deserialize, Serialize};

pub type UserId = i64;

/// Canonical persisted user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: UserId,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl UserRecord {
    /// Overlays `Set` fields; `Absent` fields keep their stored value.
    pub fn apply_changes(&mut self, changes: &UserChanges) {
        if let Patch::Set(email) = &changes.email {
            self.email = email.clone();
        }
        if let Patch::Set(first_name) = &changes.first_name {
            self.first_name = first_name.clone();
        }
        if let Patch::Set(last_name) = &changes.last_name {
            self.last_name = last_name.clone();
        }
    }
}

/// Caller-facing user shape; timestamps are not exposed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: UserId,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateUserRequest {
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: String,
}

impl CreateUserRequest {
    pub fn new(email: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            username: username.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateUserRequest {
    /// Must match the target id when present.
    #[serde(skip_serializing_if = "Patch::is_absent")]
    pub id: Patch<UserId>,
    #[serde(skip_serializing_if = "Patch::is_absent")]
    pub email: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_absent")]
    pub first_name: Patch<Option<String>>,
    #[serde(skip_serializing_if = "Patch::is_absent")]
    pub last_name: Patch<Option<String>>,
    #[serde(skip_serializing_if = "Patch::is_absent")]
    pub username: Patch<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    pub email: Patch<String>,
    pub first_name: Patch<Option<String>>,
    pub last_name: Patch<Option<String>>,
}
