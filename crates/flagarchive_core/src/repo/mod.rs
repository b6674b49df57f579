//! Storage gateway contracts and SQLite implementations.
//!
//! # Responsibility
//! - Define per-resource data access traits used by services.
//! - Keep SQL details and SQLite error codes inside this module.
//!
//! # Invariants
//! - Lookups return `Ok(None)` for absent rows, never a default record.
//! - External-key uniqueness is enforced by a unique index, and a violation
//!   surfaces as `RepoError::Conflict`.
//! - Every mutation is one statement or one transaction.
//! - Read paths reject invalid persisted state instead of masking it.

pub mod flag_entity_repo;
pub mod user_repo;

use crate::db::migrations::latest_version;
use crate::db::DbError;
use rusqlite::{Connection, ErrorCode};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// SQL expression for the current time in epoch milliseconds.
pub(crate) const NOW_MS_SQL: &str =
    "CAST(ROUND((julianday('now') - 2440587.5) * 86400000.0) AS INTEGER)";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error shared by all resource gateways.
#[derive(Debug)]
pub enum RepoError {
    /// Driver or connection failure.
    Db(DbError),
    /// No row with this identifier.
    NotFound(i64),
    /// Unique external key already taken.
    Conflict { key: String },
    /// Stored row violates a record invariant.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "record not found: {id}"),
            Self::Conflict { key } => write!(f, "external key already exists: `{key}`"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Offset/limit window over an `id ASC` ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageQuery {
    pub offset: u64,
    pub limit: u32,
}

/// Rejects connections that were not opened through `db::open_db*`.
pub(crate) fn ensure_schema_ready(conn: &Connection) -> RepoResult<()> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    let expected = latest_version();
    if version != expected {
        return Err(RepoError::InvalidData(format!(
            "schema version {version} does not match expected {expected}"
        )));
    }
    Ok(())
}

/// Maps an insert failure to `Conflict` when the unique index rejected it.
pub(crate) fn classify_insert_error(err: rusqlite::Error, key: &str) -> RepoError {
    if is_unique_violation(&err) {
        return RepoError::Conflict {
            key: key.to_string(),
        };
    }
    err.into()
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(inner, _) => {
            inner.code == ErrorCode::ConstraintViolation
                && inner.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
        }
        _ => false,
    }
}

/// Shared read-side checks for timestamped records.
pub(crate) fn check_timestamps(
    table: &str,
    id: i64,
    created_at: i64,
    updated_at: i64,
) -> RepoResult<()> {
    if updated_at < created_at {
        return Err(RepoError::InvalidData(format!(
            "{table}.updated_at < created_at for id {id}"
        )));
    }
    Ok(())
}

pub(crate) fn to_sql_offset(offset: u64) -> i64 {
    i64::try_from(offset).unwrap_or(i64::MAX)
}
