//! User mapping.

use crate::model::patch::Patch;
use crate::model::user::{
    CreateUserRequest, NewUser, UpdateUserRequest, UserChanges, UserDto, UserRecord,
};

pub fn to_dto(record: &UserRecord) -> UserDto {
    UserDto {
        id: record.id,
        email: record.email.clone(),
        first_name: record.first_name.clone(),
        last_name: record.last_name.clone(),
        username: record.username.clone(),
    }
}

pub fn new_user(request: &CreateUserRequest) -> NewUser {
    NewUser {
        email: request.email.clone(),
        first_name: request.first_name.clone(),
        last_name: request.last_name.clone(),
        username: request.username.clone(),
    }
}

pub fn changes(request: &UpdateUserRequest) -> UserChanges {
    UserChanges {
        email: request.email.clone(),
        first_name: request.first_name.clone(),
        last_name: request.last_name.clone(),
    }
}

pub fn update_request_from_dto(dto: &UserDto) -> UpdateUserRequest {
    UpdateUserRequest {
        id: Patch::Set(dto.id),
        email: Patch::Set(dto.email.clone()),
        first_name: Patch::Set(dto.first_name.clone()),
        last_name: Patch::Set(dto.last_name.clone()),
        username: Patch::Set(dto.username.clone()),
    }
}
