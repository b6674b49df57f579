//! Use-case API consumed by transports (CLI today).
//!
//! # Responsibility
//! - Open one connection per call and run the matching core service.
//! - Map `ErrorKind` to status codes; the core never sees them.
//!
//! # Invariants
//! - Functions never panic and always return an `ApiResponse`.
//! - `internal` responses carry a generic message only.
//! - Validation failures are forwarded verbatim as `violations`.

use flagarchive_core::db::open_db;
use flagarchive_core::{
    AppConfig, CreateFlagEntityRequest, CreateUserRequest, ErrorKind, FlagEntityId,
    FlagEntityService, PageLimits, ServiceError, ServiceResult, SqliteFlagEntityRepository,
    SqliteUserRepository, UpdateFlagEntityRequest, UpdateUserRequest, UserId, UserService,
};
use log::error;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use std::path::PathBuf;

pub const STATUS_OK: u16 = 200;
pub const STATUS_CREATED: u16 = 201;
pub const STATUS_NO_CONTENT: u16 = 204;

/// Per-process dispatch settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiContext {
    pub db_path: PathBuf,
    pub page_limits: PageLimits,
}

impl ApiContext {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            page_limits: PageLimits::default(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            db_path: config.db_path.clone(),
            page_limits: config.page_limits,
        }
    }
}

/// Transport-neutral response envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    fn from_error(err: &ServiceError) -> Self {
        let mut body = json!({
            "error": err.kind().as_str(),
            "message": err.to_string(),
        });
        if let Some(errors) = err.violations() {
            body["violations"] = json!(errors.violations);
        }
        Self {
            status: status_for(err.kind()),
            body,
        }
    }
}

/// Status code for each error kind.
pub fn status_for(kind: ErrorKind) -> u16 {
    match kind {
        ErrorKind::BadInput => 400,
        ErrorKind::NotFound => 404,
        ErrorKind::Conflict => 409,
        ErrorKind::Internal => 500,
    }
}

/// Decodes a JSON request body; malformed JSON is a `bad_input` response.
pub fn decode_body<T: DeserializeOwned>(raw: &str) -> Result<T, ApiResponse> {
    serde_json::from_str(raw).map_err(|err| ApiResponse {
        status: status_for(ErrorKind::BadInput),
        body: json!({
            "error": ErrorKind::BadInput.as_str(),
            "message": format!("malformed JSON body: {err}"),
        }),
    })
}

pub fn entity_create(ctx: &ApiContext, request: &CreateFlagEntityRequest) -> ApiResponse {
    respond(
        STATUS_CREATED,
        with_entity_service(ctx, |service| service.create(request)),
    )
}

pub fn entity_get(ctx: &ApiContext, id: FlagEntityId) -> ApiResponse {
    respond(STATUS_OK, with_entity_service(ctx, |service| service.get(id)))
}

pub fn entity_list(ctx: &ApiContext, page: u32, size: Option<u32>) -> ApiResponse {
    respond(
        STATUS_OK,
        with_entity_service(ctx, |service| service.list(page, size)),
    )
}

pub fn entity_update(
    ctx: &ApiContext,
    id: FlagEntityId,
    request: &UpdateFlagEntityRequest,
) -> ApiResponse {
    respond(
        STATUS_OK,
        with_entity_service(ctx, |service| service.update(id, request)),
    )
}

pub fn entity_delete(ctx: &ApiContext, id: FlagEntityId) -> ApiResponse {
    respond(
        STATUS_NO_CONTENT,
        with_entity_service(ctx, |service| service.delete(id)),
    )
}

pub fn user_create(ctx: &ApiContext, request: &CreateUserRequest) -> ApiResponse {
    respond(
        STATUS_CREATED,
        with_user_service(ctx, |service| service.create(request)),
    )
}

pub fn user_get(ctx: &ApiContext, id: UserId) -> ApiResponse {
    respond(STATUS_OK, with_user_service(ctx, |service| service.get(id)))
}

pub fn user_list(ctx: &ApiContext, page: u32, size: Option<u32>) -> ApiResponse {
    respond(
        STATUS_OK,
        with_user_service(ctx, |service| service.list(page, size)),
    )
}

pub fn user_update(ctx: &ApiContext, id: UserId, request: &UpdateUserRequest) -> ApiResponse {
    respond(
        STATUS_OK,
        with_user_service(ctx, |service| service.update(id, request)),
    )
}

pub fn user_delete(ctx: &ApiContext, id: UserId) -> ApiResponse {
    respond(
        STATUS_NO_CONTENT,
        with_user_service(ctx, |service| service.delete(id)),
    )
}

fn respond<T: Serialize>(success_status: u16, result: ServiceResult<T>) -> ApiResponse {
    let value = match result {
        Ok(value) => value,
        Err(err) => return ApiResponse::from_error(&err),
    };
    if success_status == STATUS_NO_CONTENT {
        return ApiResponse {
            status: success_status,
            body: Value::Null,
        };
    }
    match serde_json::to_value(value) {
        Ok(body) => ApiResponse {
            status: success_status,
            body,
        },
        Err(err) => {
            error!("event=api_encode module=api status=error error={err}");
            ApiResponse::from_error(&ServiceError::Internal)
        }
    }
}

fn with_entity_service<T>(
    ctx: &ApiContext,
    f: impl FnOnce(&FlagEntityService<SqliteFlagEntityRepository<'_>>) -> ServiceResult<T>,
) -> ServiceResult<T> {
    let conn = open_db(&ctx.db_path).map_err(|err| storage_unavailable(&err))?;
    let repo =
        SqliteFlagEntityRepository::try_new(&conn).map_err(|err| storage_unavailable(&err))?;
    f(&FlagEntityService::with_page_limits(repo, ctx.page_limits))
}

fn with_user_service<T>(
    ctx: &ApiContext,
    f: impl FnOnce(&UserService<SqliteUserRepository<'_>>) -> ServiceResult<T>,
) -> ServiceResult<T> {
    let conn = open_db(&ctx.db_path).map_err(|err| storage_unavailable(&err))?;
    let repo =
        SqliteUserRepository::try_new(&conn).map_err(|err| storage_unavailable(&err))?;
    f(&UserService::with_page_limits(repo, ctx.page_limits))
}

fn storage_unavailable(err: &dyn std::error::Error) -> ServiceError {
    error!(
        "event=api_storage module=api status=error error_code=storage_unavailable error={err}"
    );
    ServiceError::Internal
}

#[cfg(test)]
mod tests {
    use super::{
        decode_body, entity_create, entity_delete, entity_get, entity_list, entity_update,
        status_for, user_create, user_get, ApiContext,
    };
    use flagarchive_core::{
        CreateFlagEntityRequest, CreateUserRequest, ErrorKind, UpdateFlagEntityRequest,
    };
    use serde_json::json;

    fn context() -> (tempfile::TempDir, ApiContext) {
        let dir = tempfile::tempdir().unwrap();
        let ctx = ApiContext::new(dir.path().join("api.db"));
        (dir, ctx)
    }

    #[test]
    fn status_codes_cover_every_kind() {
        assert_eq!(status_for(ErrorKind::BadInput), 400);
        assert_eq!(status_for(ErrorKind::NotFound), 404);
        assert_eq!(status_for(ErrorKind::Conflict), 409);
        assert_eq!(status_for(ErrorKind::Internal), 500);
    }

    #[test]
    fn entity_lifecycle_maps_to_status_codes() {
        let (_dir, ctx) = context();

        let created = entity_create(&ctx, &CreateFlagEntityRequest::new("Japan", "JP"));
        assert_eq!(created.status, 201);
        assert_eq!(created.body["id"], 1);
        assert_eq!(created.body["uniqueId"], "JP");

        let duplicate = entity_create(&ctx, &CreateFlagEntityRequest::new("Japan2", "JP"));
        assert_eq!(duplicate.status, 409);
        assert_eq!(duplicate.body["error"], "conflict");

        let update: UpdateFlagEntityRequest =
            decode_body(r#"{"name":"Japan Updated"}"#).unwrap();
        let updated = entity_update(&ctx, 1, &update);
        assert_eq!(updated.status, 200);
        assert_eq!(updated.body["name"], "Japan Updated");
        assert_eq!(updated.body["uniqueId"], "JP");

        let deleted = entity_delete(&ctx, 1);
        assert_eq!(deleted.status, 204);
        assert!(deleted.body.is_null());

        let missing = entity_get(&ctx, 1);
        assert_eq!(missing.status, 404);
        assert_eq!(missing.body["error"], "not_found");
    }

    #[test]
    fn bad_input_forwards_violations() {
        let (_dir, ctx) = context();

        let response = entity_create(&ctx, &CreateFlagEntityRequest::default());
        assert_eq!(response.status, 400);
        let fields = response.body["violations"]
            .as_array()
            .unwrap()
            .iter()
            .map(|violation| violation["field"].as_str().unwrap().to_string())
            .collect::<Vec<_>>();
        assert_eq!(fields, vec!["name", "uniqueId"]);
    }

    #[test]
    fn fetched_body_can_be_sent_back_as_update() {
        let (_dir, ctx) = context();
        entity_create(&ctx, &CreateFlagEntityRequest::new("Japan", "JP"));

        let fetched = entity_get(&ctx, 1);
        let echoed: UpdateFlagEntityRequest = decode_body(&fetched.body.to_string()).unwrap();
        let updated = entity_update(&ctx, 1, &echoed);
        assert_eq!(updated.status, 200);
        assert_eq!(updated.body, fetched.body);

        let retarget: UpdateFlagEntityRequest =
            decode_body(r#"{"id":99,"uniqueId":"JPN"}"#).unwrap();
        let rejected = entity_update(&ctx, 1, &retarget);
        assert_eq!(rejected.status, 400);
        assert_eq!(rejected.body["violations"][0]["field"], "id");
        assert_eq!(rejected.body["violations"][0]["code"], "immutable");
    }

    #[test]
    fn malformed_json_is_bad_input() {
        let response = decode_body::<CreateFlagEntityRequest>("{not json").unwrap_err();
        assert_eq!(response.status, 400);
        assert_eq!(response.body["error"], "bad_input");
    }

    #[test]
    fn list_reports_clamped_size() {
        let (_dir, ctx) = context();
        entity_create(&ctx, &CreateFlagEntityRequest::new("Japan", "JP"));

        let response = entity_list(&ctx, 0, Some(10_000));
        assert_eq!(response.status, 200);
        assert_eq!(response.body["size"], 100);
        assert_eq!(response.body["total"], 1);
        assert_eq!(response.body["items"][0]["name"], "Japan");
    }

    #[test]
    fn unreadable_database_is_internal_without_detail() {
        let dir = tempfile::tempdir().unwrap();
        // A directory path cannot be opened as a database file.
        let ctx = ApiContext::new(dir.path());

        let response = entity_get(&ctx, 1);
        assert_eq!(response.status, 500);
        assert_eq!(
            response.body,
            json!({ "error": "internal", "message": "internal error" })
        );
    }

    #[test]
    fn user_endpoints_share_the_mapping() {
        let (_dir, ctx) = context();

        let created = user_create(&ctx, &CreateUserRequest::new("ana@example.org", "ana"));
        assert_eq!(created.status, 201);
        assert_eq!(created.body["username"], "ana");

        let bad = user_create(&ctx, &CreateUserRequest::new("nope", "bob"));
        assert_eq!(bad.status, 400);

        assert_eq!(user_get(&ctx, 99).status, 404);
    }
}
