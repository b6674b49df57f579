//! Connection bootstrap for the `entities` and `users` store.
//!
//! Every connection is opened through [`open_db`] or [`open_db_in_memory`],
//! which run pending migrations before handing it out. Repositories then
//! refuse any connection whose `user_version` is not the latest one.
//!
//! Failures here are storage faults, not caller mistakes: the service and
//! dispatch layers surface them as `Internal` (HTTP-style 500) with the
//! cause kept in the log only.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    /// Open, pragma or migration statement failed.
    Sqlite(rusqlite::Error),
    /// The file was written by a newer flagarchive build. It is left
    /// untouched rather than downgraded.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl DbError {
    /// True when the file itself is readable but belongs to a newer build.
    pub fn is_schema_mismatch(&self) -> bool {
        matches!(self, Self::UnsupportedSchemaVersion { .. })
    }
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "archive schema v{db_version} is newer than this build supports (v{latest_supported})"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
