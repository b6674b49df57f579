//! Flag entity use-case service.
//!
//! # Responsibility
//! - Provide create/get/list/update/delete for flag entities.
//! - Return DTOs and classified `ServiceError`s only.
//!
//! # Invariants
//! - Field validation runs before any storage access. The `unique_id` echo
//!   check needs the stored record and runs right after the lookup.
//! - The `unique_id` pre-check is a fast path; the unique index is the
//!   actual guard, and its violation also maps to `Conflict`.

use super::{classify, log_outcome, PageLimits};
use crate::error::{ServiceError, ServiceResult};
use crate::mapper::flag_entity as mapper;
use crate::model::flag_entity::{
    CreateFlagEntityRequest, FlagEntityDto, FlagEntityId, FlagEntityRecord,
    UpdateFlagEntityRequest,
};
use crate::model::page::Page;
use crate::repo::flag_entity_repo::FlagEntityRepository;
use crate::validate::flag_entity::{validate_create, validate_key_unchanged, validate_update};
use std::time::Instant;

const RESOURCE: &str = "entity";

/// Flag entity service facade over a storage gateway.
pub struct FlagEntityService<R: FlagEntityRepository> {
    repo: R,
    limits: PageLimits,
}

impl<R: FlagEntityRepository> FlagEntityService<R> {
    /// Creates a service with default page limits.
    pub fn new(repo: R) -> Self {
        Self::with_page_limits(repo, PageLimits::default())
    }

    pub fn with_page_limits(repo: R, limits: PageLimits) -> Self {
        Self { repo, limits }
    }

    /// Creates one entity and returns its stored shape.
    ///
    /// # Errors
    /// - `BadInput` when the request fails validation.
    /// - `Conflict` when `unique_id` is already taken.
    pub fn create(&self, request: &CreateFlagEntityRequest) -> ServiceResult<FlagEntityDto> {
        let started_at = Instant::now();
        log_outcome("entity_create", started_at, self.create_inner(request))
    }

    /// Gets one entity by id.
    pub fn get(&self, id: FlagEntityId) -> ServiceResult<FlagEntityDto> {
        let started_at = Instant::now();
        let result = self
            .find(id, "entity_get")
            .map(|record| mapper::to_dto(&record));
        log_outcome("entity_get", started_at, result)
    }

    /// Lists one zero-based page ordered by id.
    ///
    /// `size` of `None` or `0` uses the default; larger sizes are clamped.
    pub fn list(&self, page: u32, size: Option<u32>) -> ServiceResult<Page<FlagEntityDto>> {
        let started_at = Instant::now();
        log_outcome("entity_list", started_at, self.list_inner(page, size))
    }

    /// Applies a partial update; absent fields keep their stored values.
    pub fn update(
        &self,
        id: FlagEntityId,
        request: &UpdateFlagEntityRequest,
    ) -> ServiceResult<FlagEntityDto> {
        let started_at = Instant::now();
        log_outcome("entity_update", started_at, self.update_inner(id, request))
    }

    /// Deletes one entity. A second delete of the same id is `NotFound`.
    pub fn delete(&self, id: FlagEntityId) -> ServiceResult<()> {
        let started_at = Instant::now();
        log_outcome("entity_delete", started_at, self.delete_inner(id))
    }

    fn create_inner(&self, request: &CreateFlagEntityRequest) -> ServiceResult<FlagEntityDto> {
        validate_create(request)?;

        let existing = self
            .repo
            .get_by_unique_id(&request.unique_id)
            .map_err(|err| classify(RESOURCE, "entity_create", err))?;
        if existing.is_some() {
            return Err(ServiceError::Conflict {
                resource: RESOURCE,
                key: request.unique_id.clone(),
            });
        }

        let record = self
            .repo
            .insert(&mapper::new_entity(request))
            .map_err(|err| classify(RESOURCE, "entity_create", err))?;
        Ok(mapper::to_dto(&record))
    }

    fn list_inner(&self, page: u32, size: Option<u32>) -> ServiceResult<Page<FlagEntityDto>> {
        let query = self.limits.window(page, size);
        let records = self
            .repo
            .list_page(&query)
            .map_err(|err| classify(RESOURCE, "entity_list", err))?;
        let total = self
            .repo
            .count()
            .map_err(|err| classify(RESOURCE, "entity_list", err))?;

        Ok(Page {
            items: records.iter().map(mapper::to_dto).collect(),
            page,
            size: query.limit,
            total,
        })
    }

    fn update_inner(
        &self,
        id: FlagEntityId,
        request: &UpdateFlagEntityRequest,
    ) -> ServiceResult<FlagEntityDto> {
        validate_update(request, id)?;
        let current = self.find(id, "entity_update")?;
        validate_key_unchanged(request, &current)?;

        let record = self
            .repo
            .update(id, &mapper::changes(request))
            .map_err(|err| classify(RESOURCE, "entity_update", err))?;
        Ok(mapper::to_dto(&record))
    }

    fn delete_inner(&self, id: FlagEntityId) -> ServiceResult<()> {
        self.find(id, "entity_delete")?;
        self.repo
            .delete(id)
            .map_err(|err| classify(RESOURCE, "entity_delete", err))
    }

    fn find(&self, id: FlagEntityId, event: &str) -> ServiceResult<FlagEntityRecord> {
        self.repo
            .get_by_id(id)
            .map_err(|err| classify(RESOURCE, event, err))?
            .ok_or(ServiceError::NotFound {
                resource: RESOURCE,
                id,
            })
    }
}
