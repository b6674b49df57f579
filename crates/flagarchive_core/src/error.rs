//! Closed error taxonomy returned by resource services.
//!
//! # Invariants
//! - Every failed service call returns exactly one `ServiceError`.
//! - `Internal` never carries storage detail; the cause is logged instead.
//! - Validators and mappers never produce `Internal`.

use crate::validate::ValidationErrors;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Transport-agnostic error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Malformed or missing input; caller can fix and retry.
    BadInput,
    /// External key already taken; caller can pick another key.
    Conflict,
    /// Target identifier does not exist.
    NotFound,
    /// Storage or transport failure; not recoverable by the caller.
    Internal,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BadInput => "bad_input",
            Self::Conflict => "conflict",
            Self::NotFound => "not_found",
            Self::Internal => "internal",
        }
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Classified failure of one resource operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    BadInput(ValidationErrors),
    Conflict { resource: &'static str, key: String },
    NotFound { resource: &'static str, id: i64 },
    Internal,
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::BadInput(_) => ErrorKind::BadInput,
            Self::Conflict { .. } => ErrorKind::Conflict,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Internal => ErrorKind::Internal,
        }
    }

    /// Field violations for `BadInput`, `None` for every other kind.
    pub fn violations(&self) -> Option<&ValidationErrors> {
        match self {
            Self::BadInput(errors) => Some(errors),
            _ => None,
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BadInput(errors) => write!(f, "{errors}"),
            Self::Conflict { resource, key } => {
                write!(f, "{resource} with key `{key}` already exists")
            }
            Self::NotFound { resource, id } => write!(f, "{resource} not found: {id}"),
            Self::Internal => write!(f, "internal error"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::BadInput(errors) => Some(errors),
            _ => None,
        }
    }
}

impl From<ValidationErrors> for ServiceError {
    fn from(value: ValidationErrors) -> Self {
        Self::BadInput(value)
    }
}
