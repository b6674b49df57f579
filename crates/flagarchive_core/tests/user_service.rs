use flagarchive_core::db::open_db_in_memory;
use flagarchive_core::mapper::user::update_request_from_dto;
use flagarchive_core::{
    CreateUserRequest, ErrorKind, Patch, ServiceError, SqliteUserRepository, UpdateUserRequest,
    UserService, ViolationCode,
};
use rusqlite::Connection;

fn setup() -> Connection {
    open_db_in_memory().unwrap()
}

fn ana() -> CreateUserRequest {
    CreateUserRequest {
        email: "ana@example.org".to_string(),
        first_name: Some("Ana".to_string()),
        last_name: Some("Lima".to_string()),
        username: "ana".to_string(),
    }
}

#[test]
fn create_get_update_delete_lifecycle() {
    let conn = setup();
    let service = UserService::new(SqliteUserRepository::try_new(&conn).unwrap());

    let created = service.create(&ana()).unwrap();
    assert_eq!(created.username, "ana");
    assert_eq!(service.get(created.id).unwrap(), created);

    let request = UpdateUserRequest {
        email: Patch::Set("ana.lima@example.org".to_string()),
        last_name: Patch::Set(None),
        ..UpdateUserRequest::default()
    };
    let updated = service.update(created.id, &request).unwrap();
    assert_eq!(updated.email, "ana.lima@example.org");
    assert_eq!(updated.first_name.as_deref(), Some("Ana"));
    assert_eq!(updated.last_name, None);
    assert_eq!(updated.username, "ana");

    service.delete(created.id).unwrap();
    assert_eq!(
        service.get(created.id).unwrap_err(),
        ServiceError::NotFound {
            resource: "user",
            id: created.id
        }
    );
    assert_eq!(
        service.delete(created.id).unwrap_err().kind(),
        ErrorKind::NotFound
    );
}

#[test]
fn duplicate_username_is_conflict() {
    let conn = setup();
    let service = UserService::new(SqliteUserRepository::try_new(&conn).unwrap());

    service.create(&ana()).unwrap();
    let mut other = CreateUserRequest::new("someone@example.org", "ana");
    other.first_name = Some("Other".to_string());
    let err = service.create(&other).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(service.list(0, None).unwrap().total, 1);
}

#[test]
fn username_cannot_change_and_email_is_checked() {
    let conn = setup();
    let service = UserService::new(SqliteUserRepository::try_new(&conn).unwrap());
    let created = service.create(&ana()).unwrap();

    let bad_email = UpdateUserRequest {
        email: Patch::Set("not-an-email".to_string()),
        ..UpdateUserRequest::default()
    };
    let err = service.update(created.id, &bad_email).unwrap_err();
    assert!(err.violations().unwrap().has("email", ViolationCode::InvalidFormat));

    let rename = UpdateUserRequest {
        username: Patch::Set("ana2".to_string()),
        ..UpdateUserRequest::default()
    };
    let err = service.update(created.id, &rename).unwrap_err();
    assert!(err.violations().unwrap().has("username", ViolationCode::Immutable));
    assert_eq!(service.get(created.id).unwrap().username, "ana");
}

#[test]
fn echoed_user_body_updates_and_foreign_id_is_rejected() {
    let conn = setup();
    let service = UserService::new(SqliteUserRepository::try_new(&conn).unwrap());
    let created = service.create(&ana()).unwrap();

    let echoed: UpdateUserRequest =
        serde_json::from_value(serde_json::to_value(&created).unwrap()).unwrap();
    assert_eq!(service.update(created.id, &echoed).unwrap(), created);

    let retarget: UpdateUserRequest =
        serde_json::from_str(r#"{"id":42,"firstName":"Eve"}"#).unwrap();
    let err = service.update(created.id, &retarget).unwrap_err();
    assert!(err.violations().unwrap().has("id", ViolationCode::Immutable));
}

#[test]
fn dto_roundtrip_update_keeps_user_fields() {
    let conn = setup();
    let service = UserService::new(SqliteUserRepository::try_new(&conn).unwrap());
    let created = service.create(&ana()).unwrap();

    let updated = service
        .update(created.id, &update_request_from_dto(&created))
        .unwrap();
    assert_eq!(updated, created);
}

#[test]
fn list_is_clamped_and_ordered() {
    let conn = setup();
    let service = UserService::new(SqliteUserRepository::try_new(&conn).unwrap());
    for index in 0..3 {
        service
            .create(&CreateUserRequest::new(
                format!("user{index}@example.org"),
                format!("user{index}"),
            ))
            .unwrap();
    }

    let page = service.list(0, Some(10_000)).unwrap();
    assert_eq!(page.size, flagarchive_core::MAX_PAGE_SIZE);
    let names = page
        .items
        .iter()
        .map(|user| user.username.as_str())
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["user0", "user1", "user2"]);
}
