//! Flag entity mapping.

use crate::model::flag_entity::{
    CreateFlagEntityRequest, FlagEntityChanges, FlagEntityDto, FlagEntityRecord, NewFlagEntity,
    UpdateFlagEntityRequest,
};
use crate::model::patch::Patch;

/// Record -> external shape. Drops storage timestamps.
pub fn to_dto(record: &FlagEntityRecord) -> FlagEntityDto {
    FlagEntityDto {
        id: record.id,
        name: record.name.clone(),
        category: record.category.clone(),
        unique_id: record.unique_id.clone(),
        alt_parent_id: record.alt_parent_id.clone(),
        description: record.description.clone(),
    }
}

pub fn new_entity(request: &CreateFlagEntityRequest) -> NewFlagEntity {
    NewFlagEntity {
        name: request.name.clone(),
        category: request.category.clone(),
        unique_id: request.unique_id.clone(),
        alt_parent_id: request.alt_parent_id.clone(),
        description: request.description.clone(),
    }
}

/// Update request -> column changes. Identity fields never reach storage.
pub fn changes(request: &UpdateFlagEntityRequest) -> FlagEntityChanges {
    FlagEntityChanges {
        name: request.name.clone(),
        category: request.category.clone(),
        alt_parent_id: request.alt_parent_id.clone(),
        description: request.description.clone(),
    }
}

/// DTO -> update request carrying every field as `Set`, identity included.
pub fn update_request_from_dto(dto: &FlagEntityDto) -> UpdateFlagEntityRequest {
    UpdateFlagEntityRequest {
        id: Patch::Set(dto.id),
        name: Patch::Set(dto.name.clone()),
        category: Patch::Set(dto.category.clone()),
        unique_id: Patch::Set(dto.unique_id.clone()),
        alt_parent_id: Patch::Set(dto.alt_parent_id.clone()),
        description: Patch::Set(dto.description.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::{changes, to_dto, update_request_from_dto};
    use crate::model::flag_entity::{FlagEntityRecord, UpdateFlagEntityRequest};
    use crate::model::patch::Patch;

    fn japan() -> FlagEntityRecord {
        FlagEntityRecord {
            id: 1,
            name: "Japan".to_string(),
            category: Some("country".to_string()),
            unique_id: "JP".to_string(),
            alt_parent_id: None,
            description: Some("Nisshōki".to_string()),
            created_at: 1_000,
            updated_at: 2_000,
        }
    }

    #[test]
    fn dto_keeps_business_fields() {
        let dto = to_dto(&japan());
        assert_eq!(dto.id, 1);
        assert_eq!(dto.name, "Japan");
        assert_eq!(dto.category.as_deref(), Some("country"));
        assert_eq!(dto.unique_id, "JP");
        assert_eq!(dto.description.as_deref(), Some("Nisshōki"));
    }

    #[test]
    fn changes_drop_identity_fields() {
        let request = UpdateFlagEntityRequest {
            id: Patch::Set(5),
            unique_id: Patch::Set("XX".to_string()),
            ..UpdateFlagEntityRequest::default()
        };
        assert!(changes(&request).is_empty());
    }

    #[test]
    fn applying_dto_roundtrip_changes_is_identity() {
        let original = japan();
        let request = update_request_from_dto(&to_dto(&original));
        assert_eq!(request.unique_id, Patch::Set("JP".to_string()));

        let mut patched = original.clone();
        patched.apply_changes(&changes(&request));
        assert_eq!(patched, original);
    }

    #[test]
    fn apply_changes_touches_only_set_fields() {
        let mut record = japan();
        let request = UpdateFlagEntityRequest {
            name: Patch::Set("Japan Updated".to_string()),
            description: Patch::Set(None),
            ..UpdateFlagEntityRequest::default()
        };
        record.apply_changes(&changes(&request));

        assert_eq!(record.name, "Japan Updated");
        assert_eq!(record.description, None);
        assert_eq!(record.category.as_deref(), Some("country"));
        assert_eq!(record.unique_id, "JP");
    }
}
