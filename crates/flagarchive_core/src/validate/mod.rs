//! Input validation for resource requests.
//!
//! # Responsibility
//! - Check caller input before any storage interaction.
//! - Report every field-level violation at once.
//!
//! # Invariants
//! - Validators are pure: no I/O, no clock, no randomness.
//! - A returned `ValidationErrors` is never empty.

pub mod flag_entity;
pub mod user;

use crate::model::patch::Patch;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// External keys: ASCII alphanumerics plus `._:-`, not starting with punctuation.
pub(crate) static EXTERNAL_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._:-]*$").expect("valid external key regex"));

/// Kind of field-level violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationCode {
    /// Required value is missing or blank.
    Required,
    /// Value exceeds its maximum length in characters.
    TooLong,
    /// Value does not match the expected format.
    InvalidFormat,
    /// Field cannot be changed after creation.
    Immutable,
}

/// One rejected field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: &'static str,
    pub code: ViolationCode,
    pub message: String,
}

/// Non-empty list of violations for one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    pub violations: Vec<FieldViolation>,
}

impl ValidationErrors {
    pub fn has(&self, field: &str, code: ViolationCode) -> bool {
        self.violations
            .iter()
            .any(|violation| violation.field == field && violation.code == code)
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let parts = self
            .violations
            .iter()
            .map(|violation| format!("{}: {}", violation.field, violation.message))
            .collect::<Vec<_>>();
        write!(f, "invalid input: {}", parts.join("; "))
    }
}

impl Error for ValidationErrors {}

/// Collects violations while a request is checked field by field.
#[derive(Debug, Default)]
pub(crate) struct Violations {
    items: Vec<FieldViolation>,
}

impl Violations {
    fn push(&mut self, field: &'static str, code: ViolationCode, message: String) {
        self.items.push(FieldViolation {
            field,
            code,
            message,
        });
    }

    /// Required text: must be non-blank, then bounded.
    pub(crate) fn required_text(&mut self, field: &'static str, value: &str, max_chars: usize) {
        if value.trim().is_empty() {
            self.push(field, ViolationCode::Required, "must not be blank".to_string());
            return;
        }
        self.max_chars(field, value, max_chars);
    }

    pub(crate) fn optional_text(
        &mut self,
        field: &'static str,
        value: Option<&str>,
        max_chars: usize,
    ) {
        if let Some(value) = value {
            self.max_chars(field, value, max_chars);
        }
    }

    pub(crate) fn max_chars(&mut self, field: &'static str, value: &str, max_chars: usize) {
        let len = value.chars().count();
        if len > max_chars {
            self.push(
                field,
                ViolationCode::TooLong,
                format!("must be at most {max_chars} characters, got {len}"),
            );
        }
    }

    /// Format check; skipped for blank values already reported as required.
    pub(crate) fn matches(&mut self, field: &'static str, value: &str, re: &Regex, hint: &str) {
        if value.trim().is_empty() || re.is_match(value) {
            return;
        }
        self.push(field, ViolationCode::InvalidFormat, format!("must be {hint}"));
    }

    pub(crate) fn immutable(&mut self, field: &'static str) {
        self.push(
            field,
            ViolationCode::Immutable,
            "cannot be changed after creation".to_string(),
        );
    }

    /// Identity fields may be echoed back unchanged but never rewritten.
    pub(crate) fn unchanged<T: PartialEq>(
        &mut self,
        field: &'static str,
        patch: &Patch<T>,
        current: &T,
    ) {
        if patch.differs_from(current) {
            self.immutable(field);
        }
    }

    pub(crate) fn finish(self) -> Result<(), ValidationErrors> {
        if self.items.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors {
                violations: self.items,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ViolationCode, Violations, EXTERNAL_KEY_RE};

    #[test]
    fn external_key_pattern_accepts_common_codes() {
        for key in ["JP", "us-ca", "iso:3166.2", "X_1"] {
            assert!(EXTERNAL_KEY_RE.is_match(key), "{key} should match");
        }
        for key in ["-JP", "has space", "", "ü"] {
            assert!(!EXTERNAL_KEY_RE.is_match(key), "{key} should not match");
        }
    }

    #[test]
    fn blank_required_value_skips_length_and_format_checks() {
        let mut violations = Violations::default();
        violations.required_text("name", "   ", 3);
        violations.matches("name", "   ", &EXTERNAL_KEY_RE, "a key");
        let errors = violations.finish().unwrap_err();
        assert_eq!(errors.violations.len(), 1);
        assert!(errors.has("name", ViolationCode::Required));
    }

    #[test]
    fn length_is_counted_in_chars_not_bytes() {
        let mut violations = Violations::default();
        violations.max_chars("name", "日本", 2);
        assert!(violations.finish().is_ok());
    }

    #[test]
    fn display_lists_every_field() {
        let mut violations = Violations::default();
        violations.required_text("name", "", 10);
        violations.immutable("uniqueId");
        let message = violations.finish().unwrap_err().to_string();
        assert!(message.contains("name: must not be blank"));
        assert!(message.contains("uniqueId: cannot be changed"));
    }
}
