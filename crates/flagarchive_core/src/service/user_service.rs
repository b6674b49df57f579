//! User use-case service.
//!
//! Same flow as the flag entity service, keyed by `username`.

use super::{classify, log_outcome, PageLimits};
use crate::error::{ServiceError, ServiceResult};
use crate::mapper::user as mapper;
use crate::model::page::Page;
use crate::model::user::{CreateUserRequest, UpdateUserRequest, UserDto, UserId, UserRecord};
use crate::repo::user_repo::UserRepository;
use crate::validate::user::{validate_create, validate_key_unchanged, validate_update};
use std::time::Instant;

const RESOURCE: &str = "user";

pub struct UserService<R: UserRepository> {
    repo: R,
    limits: PageLimits,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repo: R) -> Self {
        Self::with_page_limits(repo, PageLimits::default())
    }

    pub fn with_page_limits(repo: R, limits: PageLimits) -> Self {
        Self { repo, limits }
    }

    pub fn create(&self, request: &CreateUserRequest) -> ServiceResult<UserDto> {
        let started_at = Instant::now();
        log_outcome("user_create", started_at, self.create_inner(request))
    }

    pub fn get(&self, id: UserId) -> ServiceResult<UserDto> {
        let started_at = Instant::now();
        let result = self
            .find(id, "user_get")
            .map(|record| mapper::to_dto(&record));
        log_outcome("user_get", started_at, result)
    }

    pub fn list(&self, page: u32, size: Option<u32>) -> ServiceResult<Page<UserDto>> {
        let started_at = Instant::now();
        log_outcome("user_list", started_at, self.list_inner(page, size))
    }

    pub fn update(&self, id: UserId, request: &UpdateUserRequest) -> ServiceResult<UserDto> {
        let started_at = Instant::now();
        log_outcome("user_update", started_at, self.update_inner(id, request))
    }

    pub fn delete(&self, id: UserId) -> ServiceResult<()> {
        let started_at = Instant::now();
        let result = self.find(id, "user_delete").and_then(|_| {
            self.repo
                .delete(id)
                .map_err(|err| classify(RESOURCE, "user_delete", err))
        });
        log_outcome("user_delete", started_at, result)
    }

    fn create_inner(&self, request: &CreateUserRequest) -> ServiceResult<UserDto> {
        validate_create(request)?;

        let taken = self
            .repo
            .get_by_username(&request.username)
            .map_err(|err| classify(RESOURCE, "user_create", err))?
            .is_some();
        if taken {
            return Err(ServiceError::Conflict {
                resource: RESOURCE,
                key: request.username.clone(),
            });
        }

        let record = self
            .repo
            .insert(&mapper::new_user(request))
            .map_err(|err| classify(RESOURCE, "user_create", err))?;
        Ok(mapper::to_dto(&record))
    }

    fn list_inner(&self, page: u32, size: Option<u32>) -> ServiceResult<Page<UserDto>> {
        let query = self.limits.window(page, size);
        let records = self
            .repo
            .list_page(&query)
            .map_err(|err| classify(RESOURCE, "user_list", err))?;
        let total = self
            .repo
            .count()
            .map_err(|err| classify(RESOURCE, "user_list", err))?;

        Ok(Page {
            items: records.iter().map(mapper::to_dto).collect(),
            page,
            size: query.limit,
            total,
        })
    }

    fn update_inner(&self, id: UserId, request: &UpdateUserRequest) -> ServiceResult<UserDto> {
        validate_update(request, id)?;
        let current = self.find(id, "user_update")?;
        validate_key_unchanged(request, &current)?;

        let record = self
            .repo
            .update(id, &mapper::changes(request))
            .map_err(|err| classify(RESOURCE, "user_update", err))?;
        Ok(mapper::to_dto(&record))
    }

    fn find(&self, id: UserId, event: &str) -> ServiceResult<UserRecord> {
        self.repo
            .get_by_id(id)
            .map_err(|err| classify(RESOURCE, event, err))?
            .ok_or(ServiceError::NotFound {
                resource: RESOURCE,
                id,
            })
    }
}
