//! Record repository shared by the entries and favorites tables
//!
//! Both tables carry the same sync envelope, so identity lookups, partial
//! edits, soft/permanent deletes, and the sync query surface are written
//! once over [`Table`]. Table-specific listings live in
//! `entry_repository` and `favorite_repository`.

use std::marker::PhantomData;

use rusqlite::types::Value;
use rusqlite::{params_from_iter, OptionalExtension, Row};

use super::connection::Database;
use super::patch::RecordPatch;
use super::schema::{Column, DELETED, LIVE};
use crate::error::{Error, Result};
use crate::models::{generate_hash, SyncAck, SyncBit};

/// A record table: its name, columns, and row mapping.
pub trait Table {
    /// Stored record
    type Record;
    /// Record to insert
    type New;

    const NAME: &'static str;

    /// Columns read by every query, in select order
    const COLUMNS: &'static [Column];

    /// Whether the table stores `column`
    fn has_column(column: Column) -> bool;

    /// Map a selected row to a record
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self::Record>;

    /// Every column of a new record
    fn insert_patch(new: &Self::New) -> RecordPatch;
}

/// Which of a record's two identities a call addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKey<'k> {
    /// Local numeric id
    Id(i64),
    /// Durable content hash
    Hash(&'k str),
}

impl RecordKey<'_> {
    const fn column(self) -> Column {
        match self {
            Self::Id(_) => Column::Id,
            Self::Hash(_) => Column::MyHash,
        }
    }

    fn value(self) -> Value {
        match self {
            Self::Id(id) => Value::Integer(id),
            Self::Hash(hash) => Value::Text(hash.to_string()),
        }
    }
}

/// Operations shared by entries and favorites
pub trait RecordRepository {
    type Record;
    type New;

    /// Insert a record, assigning an id and (if absent) a hash; returns the id
    fn insert(&self, record: &Self::New) -> Result<i64>;

    /// Read a row by id, whether or not it is soft-deleted
    fn get(&self, id: i64) -> Result<Option<Self::Record>>;

    /// Read a row by hash, whether or not it is soft-deleted
    fn get_by_hash(&self, hash: &str) -> Result<Option<Self::Record>>;

    /// Apply a partial update; `Ok(false)` when no row matched
    fn edit_by_id(&self, id: i64, patch: &RecordPatch) -> Result<bool>;

    fn edit_by_hash(&self, hash: &str, patch: &RecordPatch) -> Result<bool>;

    /// Set the soft delete flag
    fn soft_delete_by_id(&self, id: i64) -> Result<bool>;

    fn soft_delete_by_hash(&self, hash: &str) -> Result<bool>;

    /// Remove the row; meant for after the server confirmed the delete
    fn permanent_delete_by_id(&self, id: i64) -> Result<bool>;

    fn permanent_delete_by_hash(&self, hash: &str) -> Result<bool>;

    fn exists_by_id(&self, id: i64) -> Result<bool>;

    fn exists_by_hash(&self, hash: &str) -> Result<bool>;

    fn id_for_hash(&self, hash: &str) -> Result<Option<i64>>;

    fn hash_for_id(&self, id: i64) -> Result<Option<String>>;

    /// A local photo replaced the uploaded one: re-upload it and resync
    fn mark_file_not_uploaded(&self, id: i64) -> Result<bool>;

    /// Record a successful round trip with the server
    fn confirm_sync(&self, hash: &str, ack: &SyncAck) -> Result<bool>;

    /// Live rows whose photo has not been uploaded
    fn list_file_not_uploaded(&self) -> Result<Vec<Self::Record>>;

    /// Live rows with a server photo to pull down
    fn list_file_to_download(&self) -> Result<Vec<Self::Record>>;

    /// Live rows the server has never confirmed
    fn list_never_synced(&self) -> Result<Vec<Self::Record>>;

    /// Live rows synced before and changed locally since
    fn list_modified_since_sync(&self) -> Result<Vec<Self::Record>>;

    /// Soft-deleted rows waiting for the server delete and purge
    fn list_deleted(&self) -> Result<Vec<Self::Record>>;
}

/// `SQLite` record store for one table
pub struct RecordStore<'a, T> {
    db: &'a Database,
    table: PhantomData<T>,
}

impl<'a, T: Table> RecordStore<'a, T> {
    /// Create a new repository over the given database handle
    pub const fn new(db: &'a Database) -> Self {
        Self {
            db,
            table: PhantomData,
        }
    }

    pub(crate) const fn database(&self) -> &'a Database {
        self.db
    }

    /// Column list for SELECT; timestamps may be stored as legacy text
    fn select_list() -> String {
        T::COLUMNS
            .iter()
            .map(|column| match column {
                Column::DateTime => "CAST(date_time AS INTEGER) AS date_time".to_string(),
                other => other.name().to_string(),
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Select rows matching `filter`, in `order`
    pub(crate) fn select(
        &self,
        filter: &str,
        order: &str,
        params: &[Value],
    ) -> Result<Vec<T::Record>> {
        let conn = self.db.connection()?;
        let sql = format!(
            "SELECT {} FROM {} WHERE {filter} ORDER BY {order}",
            Self::select_list(),
            T::NAME
        );
        let mut stmt = conn.prepare(&sql)?;
        let records = stmt
            .query_map(params_from_iter(params), T::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(records)
    }

    fn select_one(&self, key: RecordKey<'_>) -> Result<Option<T::Record>> {
        let conn = self.db.connection()?;
        let sql = format!(
            "SELECT {} FROM {} WHERE {} = ?",
            Self::select_list(),
            T::NAME,
            key.column().name()
        );
        Ok(conn.query_row(&sql, [key.value()], T::from_row).optional()?)
    }

    /// Update the row addressed by `key`
    pub(crate) fn update(&self, key: RecordKey<'_>, patch: &RecordPatch) -> Result<bool> {
        if let Some((column, _)) = patch.iter().find(|(column, _)| !T::has_column(*column)) {
            return Err(Error::InvalidInput(format!(
                "{} has no column {}",
                T::NAME,
                column.name()
            )));
        }
        if patch.is_empty() {
            return Ok(false);
        }

        let conn = self.db.connection()?;
        let patch = patch.clone().with_sync_reset();
        let assignments = patch
            .iter()
            .map(|(column, _)| format!("{} = ?", column.name()))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "UPDATE {} SET {assignments} WHERE {} = ?",
            T::NAME,
            key.column().name()
        );

        let key_value = key.value();
        let params = patch
            .iter()
            .map(|(_, value)| value)
            .chain(std::iter::once(&key_value));
        let changed = conn.execute(&sql, params_from_iter(params))?;

        tracing::debug!(table = T::NAME, ?key, changed, "Updated record");
        Ok(changed > 0)
    }

    fn delete(&self, key: RecordKey<'_>) -> Result<bool> {
        let conn = self.db.connection()?;
        let sql = format!("DELETE FROM {} WHERE {} = ?", T::NAME, key.column().name());
        let changed = conn.execute(&sql, [key.value()])?;

        tracing::debug!(table = T::NAME, ?key, changed, "Permanently deleted record");
        Ok(changed > 0)
    }

    fn exists(&self, key: RecordKey<'_>) -> Result<bool> {
        let conn = self.db.connection()?;
        let sql = format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE {} = ?)",
            T::NAME,
            key.column().name()
        );
        Ok(conn.query_row(&sql, [key.value()], |row| row.get(0))?)
    }
}

impl<T: Table> RecordRepository for RecordStore<'_, T> {
    type Record = T::Record;
    type New = T::New;

    fn insert(&self, record: &T::New) -> Result<i64> {
        let conn = self.db.connection()?;

        let mut patch = T::insert_patch(record);
        let has_hash = matches!(patch.get(Column::MyHash), Some(Value::Text(hash)) if !hash.is_empty());
        if !has_hash {
            patch = patch.set(Column::MyHash, Value::Text(generate_hash()));
        }

        let columns = patch
            .iter()
            .map(|(column, _)| column.name())
            .collect::<Vec<_>>()
            .join(", ");
        let placeholders = vec!["?"; patch.len()].join(", ");
        let sql = format!("INSERT INTO {} ({columns}) VALUES ({placeholders})", T::NAME);
        conn.execute(&sql, params_from_iter(patch.iter().map(|(_, value)| value)))?;

        let id = conn.last_insert_rowid();
        tracing::debug!(table = T::NAME, id, "Inserted record");
        Ok(id)
    }

    fn get(&self, id: i64) -> Result<Option<T::Record>> {
        self.select_one(RecordKey::Id(id))
    }

    fn get_by_hash(&self, hash: &str) -> Result<Option<T::Record>> {
        self.select_one(RecordKey::Hash(hash))
    }

    fn edit_by_id(&self, id: i64, patch: &RecordPatch) -> Result<bool> {
        self.update(RecordKey::Id(id), patch)
    }

    fn edit_by_hash(&self, hash: &str, patch: &RecordPatch) -> Result<bool> {
        self.update(RecordKey::Hash(hash), patch)
    }

    fn soft_delete_by_id(&self, id: i64) -> Result<bool> {
        self.update(RecordKey::Id(id), &RecordPatch::new().deleted(true))
    }

    fn soft_delete_by_hash(&self, hash: &str) -> Result<bool> {
        self.update(RecordKey::Hash(hash), &RecordPatch::new().deleted(true))
    }

    fn permanent_delete_by_id(&self, id: i64) -> Result<bool> {
        self.delete(RecordKey::Id(id))
    }

    fn permanent_delete_by_hash(&self, hash: &str) -> Result<bool> {
        self.delete(RecordKey::Hash(hash))
    }

    fn exists_by_id(&self, id: i64) -> Result<bool> {
        self.exists(RecordKey::Id(id))
    }

    fn exists_by_hash(&self, hash: &str) -> Result<bool> {
        self.exists(RecordKey::Hash(hash))
    }

    fn id_for_hash(&self, hash: &str) -> Result<Option<i64>> {
        let conn = self.db.connection()?;
        let sql = format!("SELECT _id FROM {} WHERE my_hash = ?", T::NAME);
        Ok(conn.query_row(&sql, [hash], |row| row.get(0)).optional()?)
    }

    fn hash_for_id(&self, id: i64) -> Result<Option<String>> {
        let conn = self.db.connection()?;
        let sql = format!("SELECT my_hash FROM {} WHERE _id = ?", T::NAME);
        let hash: Option<Option<String>> =
            conn.query_row(&sql, [id], |row| row.get(0)).optional()?;
        Ok(hash.flatten().filter(|hash| !hash.is_empty()))
    }

    fn mark_file_not_uploaded(&self, id: i64) -> Result<bool> {
        let patch = RecordPatch::new()
            .file_uploaded(false)
            .sync_bit(SyncBit::NotSynced);
        self.update(RecordKey::Id(id), &patch)
    }

    fn confirm_sync(&self, hash: &str, ack: &SyncAck) -> Result<bool> {
        let patch = RecordPatch::new()
            .id_from_server(Some(ack.id_from_server))
            .updated_at(Some(&ack.updated_at))
            .sync_bit(SyncBit::Synced);
        self.update(RecordKey::Hash(hash), &patch)
    }

    fn list_file_not_uploaded(&self) -> Result<Vec<T::Record>> {
        self.select(
            &format!(
                "(file_uploaded IS NULL OR file_uploaded = '' OR NOT file_uploaded) AND {LIVE}"
            ),
            "_id",
            &[],
        )
    }

    fn list_file_to_download(&self) -> Result<Vec<T::Record>> {
        self.select(&format!("file_to_download AND {LIVE}"), "_id", &[])
    }

    fn list_never_synced(&self) -> Result<Vec<T::Record>> {
        self.select(
            &format!("(updated_at IS NULL OR updated_at = '') AND {LIVE}"),
            "_id",
            &[],
        )
    }

    fn list_modified_since_sync(&self) -> Result<Vec<T::Record>> {
        self.select(
            &format!(
                "updated_at IS NOT NULL AND updated_at != '' AND COALESCE(sync_bit, 0) = ? AND {LIVE}"
            ),
            "_id",
            &[Value::Integer(SyncBit::NotSynced.as_i64())],
        )
    }

    fn list_deleted(&self) -> Result<Vec<T::Record>> {
        self.select(DELETED, "_id", &[])
    }
}
