//! Flag entity storage gateway and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD and paging over the `entities` table.
//! - Translate unique-index violations on `unique_id` into `Conflict`.
//!
//! # Invariants
//! - `created_at` is written once on insert.
//! - Each update strictly advances `updated_at`.
//! - Listing is ordered by `id ASC`.

use super::{
    check_timestamps, classify_insert_error, ensure_schema_ready, to_sql_offset, PageQuery,
    RepoError, RepoResult, NOW_MS_SQL,
};
use crate::model::flag_entity::{
    FlagEntityChanges, FlagEntityId, FlagEntityRecord, NewFlagEntity,
};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};

const ENTITY_COLUMNS: &str =
    "id, name, type, unique_id, alt_parent_id, description, created_at, updated_at";

/// Storage gateway for flag entities.
pub trait FlagEntityRepository {
    fn get_by_id(&self, id: FlagEntityId) -> RepoResult<Option<FlagEntityRecord>>;
    fn get_by_unique_id(&self, unique_id: &str) -> RepoResult<Option<FlagEntityRecord>>;
    /// Returns one window of entities ordered by `id ASC`.
    fn list_page(&self, query: &PageQuery) -> RepoResult<Vec<FlagEntityRecord>>;
    fn count(&self) -> RepoResult<u64>;
    /// Inserts and returns the stored row. Duplicate `unique_id` -> `Conflict`.
    fn insert(&self, entity: &NewFlagEntity) -> RepoResult<FlagEntityRecord>;
    /// Applies `Set` fields and returns the stored row. Missing id -> `NotFound`.
    fn update(
        &self,
        id: FlagEntityId,
        changes: &FlagEntityChanges,
    ) -> RepoResult<FlagEntityRecord>;
    /// Hard-deletes one row. Missing id -> `NotFound`.
    fn delete(&self, id: FlagEntityId) -> RepoResult<()>;
}

/// SQLite-backed flag entity repository.
pub struct SqliteFlagEntityRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteFlagEntityRepository<'conn> {
    /// Wraps a connection returned by `db::open_db` or `db::open_db_in_memory`.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn)?;
        Ok(Self { conn })
    }
}

impl FlagEntityRepository for SqliteFlagEntityRepository<'_> {
    fn get_by_id(&self, id: FlagEntityId) -> RepoResult<Option<FlagEntityRecord>> {
        select_by_id(self.conn, id)
    }

    fn get_by_unique_id(&self, unique_id: &str) -> RepoResult<Option<FlagEntityRecord>> {
        let record = self
            .conn
            .query_row(
                &format!("SELECT {ENTITY_COLUMNS} FROM entities WHERE unique_id = ?1;"),
                [unique_id],
                map_entity_row,
            )
            .optional()?;
        record.map(check_entity).transpose()
    }

    fn list_page(&self, query: &PageQuery) -> RepoResult<Vec<FlagEntityRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {ENTITY_COLUMNS}
             FROM entities
             ORDER BY id ASC
             LIMIT ?1 OFFSET ?2;"
        ))?;
        let rows = stmt.query_map(
            params![i64::from(query.limit), to_sql_offset(query.offset)],
            map_entity_row,
        )?;

        let mut records = Vec::new();
        for row in rows {
            records.push(check_entity(row?)?);
        }
        Ok(records)
    }

    fn count(&self) -> RepoResult<u64> {
        let total: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM entities;", [], |row| row.get(0))?;
        u64::try_from(total)
            .map_err(|_| RepoError::InvalidData(format!("negative entity count {total}")))
    }

    fn insert(&self, entity: &NewFlagEntity) -> RepoResult<FlagEntityRecord> {
        let record = self
            .conn
            .query_row(
                &format!(
                    "INSERT INTO entities (
                        name,
                        type,
                        unique_id,
                        alt_parent_id,
                        description,
                        created_at,
                        updated_at
                    ) VALUES (?1, ?2, ?3, ?4, ?5, {NOW_MS_SQL}, {NOW_MS_SQL})
                    RETURNING {ENTITY_COLUMNS};"
                ),
                params![
                    entity.name.as_str(),
                    entity.category.as_deref(),
                    entity.unique_id.as_str(),
                    entity.alt_parent_id.as_deref(),
                    entity.description.as_deref(),
                ],
                map_entity_row,
            )
            .map_err(|err| classify_insert_error(err, &entity.unique_id))?;

        check_entity(record)
    }

    fn update(
        &self,
        id: FlagEntityId,
        changes: &FlagEntityChanges,
    ) -> RepoResult<FlagEntityRecord> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;

        let mut record = select_by_id(&tx, id)?.ok_or(RepoError::NotFound(id))?;
        record.apply_changes(changes);

        let updated = tx.query_row(
            &format!(
                "UPDATE entities
                 SET
                    name = ?1,
                    type = ?2,
                    alt_parent_id = ?3,
                    description = ?4,
                    updated_at = MAX(updated_at + 1, {NOW_MS_SQL})
                 WHERE id = ?5
                 RETURNING {ENTITY_COLUMNS};"
            ),
            params![
                record.name.as_str(),
                record.category.as_deref(),
                record.alt_parent_id.as_deref(),
                record.description.as_deref(),
                id,
            ],
            map_entity_row,
        )?;
        let updated = check_entity(updated)?;
        tx.commit()?;

        Ok(updated)
    }

    fn delete(&self, id: FlagEntityId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM entities WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }
}

fn select_by_id(conn: &Connection, id: FlagEntityId) -> RepoResult<Option<FlagEntityRecord>> {
    let record = conn
        .query_row(
            &format!("SELECT {ENTITY_COLUMNS} FROM entities WHERE id = ?1;"),
            [id],
            map_entity_row,
        )
        .optional()?;
    record.map(check_entity).transpose()
}

fn map_entity_row(row: &Row<'_>) -> rusqlite::Result<FlagEntityRecord> {
    Ok(FlagEntityRecord {
        id: row.get("id")?,
        name: row.get("name")?,
        category: row.get("type")?,
        unique_id: row.get("unique_id")?,
        alt_parent_id: row.get("alt_parent_id")?,
        description: row.get("description")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn check_entity(record: FlagEntityRecord) -> RepoResult<FlagEntityRecord> {
    if record.name.is_empty() {
        return Err(RepoError::InvalidData(format!(
            "empty entities.name for id {}",
            record.id
        )));
    }
    if record.unique_id.is_empty() {
        return Err(RepoError::InvalidData(format!(
            "empty entities.unique_id for id {}",
            record.id
        )));
    }
    check_timestamps(
        "entities",
        record.id,
        record.created_at,
        record.updated_at,
    )?;
    Ok(record)
}
