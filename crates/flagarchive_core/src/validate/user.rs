//! User request validation.

use super::{ValidationErrors, Violations, EXTERNAL_KEY_RE};
use crate::model::patch::Patch;
use crate::model::user::{CreateUserRequest, UpdateUserRequest, UserId, UserRecord};
use once_cell::sync::Lazy;
use regex::Regex;

pub const EMAIL_MAX_CHARS: usize = 254;
pub const USERNAME_MAX_CHARS: usize = 64;
pub const PERSON_NAME_MAX_CHARS: usize = 100;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s.]+(\.[^@\s.]+)+$").expect("valid email regex")
});

pub fn validate_create(request: &CreateUserRequest) -> Result<(), ValidationErrors> {
    let mut violations = Violations::default();

    check_email(&mut violations, &request.email);
    violations.optional_text(
        "firstName",
        request.first_name.as_deref(),
        PERSON_NAME_MAX_CHARS,
    );
    violations.optional_text(
        "lastName",
        request.last_name.as_deref(),
        PERSON_NAME_MAX_CHARS,
    );
    violations.required_text("username", &request.username, USERNAME_MAX_CHARS);
    violations.matches(
        "username",
        &request.username,
        &EXTERNAL_KEY_RE,
        "letters, digits or `._:-`",
    );

    violations.finish()
}

pub fn validate_update(request: &UpdateUserRequest, id: UserId) -> Result<(), ValidationErrors> {
    let mut violations = Violations::default();

    violations.unchanged("id", &request.id, &id);
    if let Patch::Set(email) = &request.email {
        check_email(&mut violations, email);
    }
    if let Patch::Set(first_name) = &request.first_name {
        violations.optional_text("firstName", first_name.as_deref(), PERSON_NAME_MAX_CHARS);
    }
    if let Patch::Set(last_name) = &request.last_name {
        violations.optional_text("lastName", last_name.as_deref(), PERSON_NAME_MAX_CHARS);
    }

    violations.finish()
}

pub fn validate_key_unchanged(
    request: &UpdateUserRequest,
    current: &UserRecord,
) -> Result<(), ValidationErrors> {
    let mut violations = Violations::default();
    violations.unchanged("username", &request.username, &current.username);
    violations.finish()
}

fn check_email(violations: &mut Violations, email: &str) {
    violations.required_text("email", email, EMAIL_MAX_CHARS);
    violations.matches("email", email, &EMAIL_RE, "a valid email address");
}
