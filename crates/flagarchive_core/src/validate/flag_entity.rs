//! Flag entity request validation.

use super::{ValidationErrors, Violations, EXTERNAL_KEY_RE};
use crate::model::flag_entity::{
    CreateFlagEntityRequest, FlagEntityId, FlagEntityRecord, UpdateFlagEntityRequest,
};
use crate::model::patch::Patch;

pub const NAME_MAX_CHARS: usize = 255;
pub const CATEGORY_MAX_CHARS: usize = 64;
pub const UNIQUE_ID_MAX_CHARS: usize = 64;
pub const ALT_PARENT_ID_MAX_CHARS: usize = 64;
pub const DESCRIPTION_MAX_CHARS: usize = 4000;

const UNIQUE_ID_HINT: &str = "letters, digits or `._:-`, starting with a letter or digit";

pub fn validate_create(request: &CreateFlagEntityRequest) -> Result<(), ValidationErrors> {
    let mut violations = Violations::default();

    violations.required_text("name", &request.name, NAME_MAX_CHARS);
    violations.optional_text("type", request.category.as_deref(), CATEGORY_MAX_CHARS);
    violations.required_text("uniqueId", &request.unique_id, UNIQUE_ID_MAX_CHARS);
    violations.matches(
        "uniqueId",
        &request.unique_id,
        &EXTERNAL_KEY_RE,
        UNIQUE_ID_HINT,
    );
    violations.optional_text(
        "altParentId",
        request.alt_parent_id.as_deref(),
        ALT_PARENT_ID_MAX_CHARS,
    );
    violations.optional_text(
        "description",
        request.description.as_deref(),
        DESCRIPTION_MAX_CHARS,
    );

    violations.finish()
}

/// Field checks for an update targeting `id`. Runs before any lookup.
pub fn validate_update(
    request: &UpdateFlagEntityRequest,
    id: FlagEntityId,
) -> Result<(), ValidationErrors> {
    let mut violations = Violations::default();

    violations.unchanged("id", &request.id, &id);
    if let Patch::Set(name) = &request.name {
        violations.required_text("name", name, NAME_MAX_CHARS);
    }
    if let Patch::Set(category) = &request.category {
        violations.optional_text("type", category.as_deref(), CATEGORY_MAX_CHARS);
    }
    if let Patch::Set(alt_parent_id) = &request.alt_parent_id {
        violations.optional_text(
            "altParentId",
            alt_parent_id.as_deref(),
            ALT_PARENT_ID_MAX_CHARS,
        );
    }
    if let Patch::Set(description) = &request.description {
        violations.optional_text(
            "description",
            description.as_deref(),
            DESCRIPTION_MAX_CHARS,
        );
    }

    violations.finish()
}

/// Rejects a `uniqueId` that differs from the stored one.
pub fn validate_key_unchanged(
    request: &UpdateFlagEntityRequest,
    current: &FlagEntityRecord,
) -> Result<(), ValidationErrors> {
    let mut violations = Violations::default();
    violations.unchanged("uniqueId", &request.unique_id, &current.unique_id);
    violations.finish()
}
