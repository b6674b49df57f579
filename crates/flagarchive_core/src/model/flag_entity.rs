//! Flag entity resource model.
//!
//! # Responsibility
//! - Define the stored `entities` row (`FlagEntityRecord`).
//! - Define the caller-facing DTO and create/update request shapes.
//!
//! # Invariants
//! - `id` is assigned by storage and never changes.
//! - `unique_id` is unique across stored entities and immutable.
//! - `created_at <= updated_at`; both are epoch milliseconds.

use super::patch::Patch;
use serde::{Deserialize, Serialize};

/// Storage-assigned flag entity identifier.
pub type FlagEntityId = i64;

/// Canonical persisted flag entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagEntityRecord {
    pub id: FlagEntityId,
    pub name: String,
    /// Stored in the `type` column.
    pub category: Option<String>,
    /// External key chosen by the caller.
    pub unique_id: String,
    /// Opaque reference; no referential integrity is enforced.
    pub alt_parent_id: Option<String>,
    pub description: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl FlagEntityRecord {
    /// Overlays `Set` fields; `Absent` fields keep their stored value.
    ///
    /// Identity, external key and timestamps are never touched here.
    pub fn apply_changes(&mut self, changes: &FlagEntityChanges) {
        if let Patch::Set(name) = &changes.name {
            self.name = name.clone();
        }
        if let Patch::Set(category) = &changes.category {
            self.category = category.clone();
        }
        if let Patch::Set(alt_parent_id) = &changes.alt_parent_id {
            self.alt_parent_id = alt_parent_id.clone();
        }
        if let Patch::Set(description) = &changes.description {
            self.description = description.clone();
        }
    }
}

/// Caller-facing flag entity shape.
///
/// Timestamps are storage metadata and are not part of this shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlagEntityDto {
    pub id: FlagEntityId,
    pub name: String,
    /// Serialized as `type` to match the archive's external schema.
    #[serde(rename = "type")]
    pub category: Option<String>,
    pub unique_id: String,
    pub alt_parent_id: Option<String>,
    pub description: Option<String>,
}

/// Input for creating a flag entity.
///
/// Missing required keys decode to empty strings so the validator reports
/// them as field violations instead of failing at decode time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateFlagEntityRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub category: Option<String>,
    pub unique_id: String,
    pub alt_parent_id: Option<String>,
    pub description: Option<String>,
}

impl CreateFlagEntityRequest {
    pub fn new(name: impl Into<String>, unique_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            unique_id: unique_id.into(),
            ..Self::default()
        }
    }
}

/// Partial update for a flag entity. Only `Set` fields are written.
///
/// `id` and `unique_id` are accepted on the wire so a full DTO can be sent
/// back as an update. Echoing the stored values is allowed; any other value
/// is an `immutable` field violation rather than a silent drop.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateFlagEntityRequest {
    #[serde(skip_serializing_if = "Patch::is_absent")]
    pub id: Patch<FlagEntityId>,
    #[serde(skip_serializing_if = "Patch::is_absent")]
    pub name: Patch<String>,
    #[serde(rename = "type", skip_serializing_if = "Patch::is_absent")]
    pub category: Patch<Option<String>>,
    #[serde(skip_serializing_if = "Patch::is_absent")]
    pub unique_id: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_absent")]
    pub alt_parent_id: Patch<Option<String>>,
    #[serde(skip_serializing_if = "Patch::is_absent")]
    pub description: Patch<Option<String>>,
}

/// Insert payload derived from a validated create request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFlagEntity {
    pub name: String,
    pub category: Option<String>,
    pub unique_id: String,
    pub alt_parent_id: Option<String>,
    pub description: Option<String>,
}

/// Column changes derived from a validated update request.
///
/// There is deliberately no `unique_id` field: the external key cannot be
/// written after insert.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagEntityChanges {
    pub name: Patch<String>,
    pub category: Patch<Option<String>>,
    pub alt_parent_id: Patch<Option<String>>,
    pub description: Patch<Option<String>>,
}

impl FlagEntityChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_absent()
            && self.category.is_absent()
            && self.alt_parent_id.is_absent()
            && self.description.is_absent()
    }
}
