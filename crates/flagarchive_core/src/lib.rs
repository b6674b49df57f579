//! Core resource logic for the flag archive.
//! This crate owns the business invariants; transports only call into it.

pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod mapper;
pub mod model;
pub mod repo;
pub mod service;
pub mod validate;

pub use config::{AppConfig, ConfigError};
pub use error::{ErrorKind, ServiceError, ServiceResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::flag_entity::{
    CreateFlagEntityRequest, FlagEntityChanges, FlagEntityDto, FlagEntityId, FlagEntityRecord,
    NewFlagEntity, UpdateFlagEntityRequest,
};
pub use model::page::Page;
pub use model::patch::Patch;
pub use model::user::{
    CreateUserRequest, NewUser, UpdateUserRequest, UserChanges, UserDto, UserId, UserRecord,
};
pub use repo::flag_entity_repo::{FlagEntityRepository, SqliteFlagEntityRepository};
pub use repo::user_repo::{SqliteUserRepository, UserRepository};
pub use repo::{PageQuery, RepoError, RepoResult};
pub use service::flag_entity_service::FlagEntityService;
pub use service::user_service::UserService;
pub use service::{PageLimits, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use validate::{FieldViolation, ValidationErrors, ViolationCode};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
