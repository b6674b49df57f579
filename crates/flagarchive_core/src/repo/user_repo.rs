//! User storage gateway and SQLite implementation.
//!
//! # Invariants
//! - `username` is unique; duplicates surface as `Conflict`.
//! - Listing is ordered by `id ASC`.

use super::{
    check_timestamps, classify_insert_error, ensure_schema_ready, to_sql_offset, PageQuery,
    RepoError, RepoResult, NOW_MS_SQL,
};
use crate::model::user::{NewUser, UserChanges, UserId, UserRecord};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};

const USER_COLUMNS: &str = "id, email, first_name, last_name, username, created_at, updated_at";

/// Storage gateway for users.
pub trait UserRepository {
    fn get_by_id(&self, id: UserId) -> RepoResult<Option<UserRecord>>;
    fn get_by_username(&self, username: &str) -> RepoResult<Option<UserRecord>>;
    fn list_page(&self, query: &PageQuery) -> RepoResult<Vec<UserRecord>>;
    fn count(&self) -> RepoResult<u64>;
    fn insert(&self, user: &NewUser) -> RepoResult<UserRecord>;
    fn update(&self, id: UserId, changes: &UserChanges) -> RepoResult<UserRecord>;
    fn delete(&self, id: UserId) -> RepoResult<()>;
}

/// SQLite-backed user repository.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn)?;
        Ok(Self { conn })
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn get_by_id(&self, id: UserId) -> RepoResult<Option<UserRecord>> {
        select_by_id(self.conn, id)
    }

    fn get_by_username(&self, username: &str) -> RepoResult<Option<UserRecord>> {
        let record = self
            .conn
            .query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?1;"),
                [username],
                map_user_row,
            )
            .optional()?;
        record.map(check_user).transpose()
    }

    fn list_page(&self, query: &PageQuery) -> RepoResult<Vec<UserRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY id ASC LIMIT ?1 OFFSET ?2;"
        ))?;
        let rows = stmt.query_map(
            params![i64::from(query.limit), to_sql_offset(query.offset)],
            map_user_row,
        )?;

        let mut records = Vec::new();
        for row in rows {
            records.push(check_user(row?)?);
        }
        Ok(records)
    }

    fn count(&self) -> RepoResult<u64> {
        let total: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM users;", [], |row| row.get(0))?;
        u64::try_from(total)
            .map_err(|_| RepoError::InvalidData(format!("negative user count {total}")))
    }

    fn insert(&self, user: &NewUser) -> RepoResult<UserRecord> {
        let record = self
            .conn
            .query_row(
                &format!(
                    "INSERT INTO users (
                        email,
                        first_name,
                        last_name,
                        username,
                        created_at,
                        updated_at
                    ) VALUES (?1, ?2, ?3, ?4, {NOW_MS_SQL}, {NOW_MS_SQL})
                    RETURNING {USER_COLUMNS};"
                ),
                params![
                    user.email.as_str(),
                    user.first_name.as_deref(),
                    user.last_name.as_deref(),
                    user.username.as_str(),
                ],
                map_user_row,
            )
            .map_err(|err| classify_insert_error(err, &user.username))?;

        check_user(record)
    }

    fn update(&self, id: UserId, changes: &UserChanges) -> RepoResult<UserRecord> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;

        let mut record = select_by_id(&tx, id)?.ok_or(RepoError::NotFound(id))?;
        record.apply_changes(changes);

        let updated = tx.query_row(
            &format!(
                "UPDATE users
                 SET
                    email = ?1,
                    first_name = ?2,
                    last_name = ?3,
                    updated_at = MAX(updated_at + 1, {NOW_MS_SQL})
                 WHERE id = ?4
                 RETURNING {USER_COLUMNS};"
            ),
            params![
                record.email.as_str(),
                record.first_name.as_deref(),
                record.last_name.as_deref(),
                id,
            ],
            map_user_row,
        )?;
        let updated = check_user(updated)?;
        tx.commit()?;

        Ok(updated)
    }

    fn delete(&self, id: UserId) -> RepoResult<()> {
        let changed = self.conn.execute("DELETE FROM users WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }
}

fn select_by_id(conn: &Connection, id: UserId) -> RepoResult<Option<UserRecord>> {
    let record = conn
        .query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1;"),
            [id],
            map_user_row,
        )
        .optional()?;
    record.map(check_user).transpose()
}

fn map_user_row(row: &Row<'_>) -> rusqlite::Result<UserRecord> {
    Ok(UserRecord {
        id: row.get("id")?,
        email: row.get("email")?,
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        username: row.get("username")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn check_user(record: UserRecord) -> RepoResult<UserRecord> {
    if record.username.is_empty() || record.email.is_empty() {
        return Err(RepoError::InvalidData(format!(
            "empty users.username or users.email for id {}",
            record.id
        )));
    }
    check_timestamps("users", record.id, record.created_at, record.updated_at)?;
    Ok(record)
}
