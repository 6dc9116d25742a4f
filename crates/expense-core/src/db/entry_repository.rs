//! Entries table

use rusqlite::types::Value;
use rusqlite::{params, OptionalExtension, Row};

use super::patch::RecordPatch;
use super::repository::{RecordStore, Table};
use super::schema::{Column, ENTRY_TABLE, LIVE};
use super::sql_types::{read_amount, read_envelope, read_integer, read_text};
use crate::error::Result;
use crate::models::{Entry, NewEntry, SyncBit};

/// Marker for the entries table
pub struct Entries;

/// `SQLite` repository for expense entries
pub type SqliteEntryRepository<'a> = RecordStore<'a, Entries>;

/// Listing order by entry time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Newest first
    #[default]
    Descending,
    /// Oldest first
    Ascending,
}

impl SortOrder {
    const fn sql(self) -> &'static str {
        match self {
            Self::Descending => "CAST(date_time AS INTEGER) DESC, _id DESC",
            Self::Ascending => "CAST(date_time AS INTEGER) ASC, _id ASC",
        }
    }
}

const ENTRY_COLUMNS: &[Column] = &[
    Column::Id,
    Column::Tag,
    Column::Amount,
    Column::DateTime,
    Column::Location,
    Column::Favorite,
    Column::Type,
    Column::IdFromServer,
    Column::UpdatedAt,
    Column::MyHash,
    Column::Deleted,
    Column::SyncBit,
    Column::FileUploaded,
    Column::FileToDownload,
    Column::FileUpdatedAt,
];

impl Table for Entries {
    type Record = Entry;
    type New = NewEntry;

    const NAME: &'static str = ENTRY_TABLE;
    const COLUMNS: &'static [Column] = ENTRY_COLUMNS;

    fn has_column(_column: Column) -> bool {
        true
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Entry> {
        Ok(Entry {
            id: row.get(Column::Id.name())?,
            record_type: row.get(Column::Type.name())?,
            time_in_millis: read_integer(row, Column::DateTime)?.unwrap_or_default(),
            amount: read_amount(row, Column::Amount)?,
            tag: read_text(row, Column::Tag)?,
            location: read_text(row, Column::Location)?,
            favorite: read_text(row, Column::Favorite)?,
            sync: read_envelope(row)?,
        })
    }

    fn insert_patch(new: &NewEntry) -> RecordPatch {
        RecordPatch::from(new)
    }
}

impl SqliteEntryRepository<'_> {
    /// All live entries ordered by entry time
    pub fn list(&self, order: SortOrder) -> Result<Vec<Entry>> {
        self.select(LIVE, order.sql(), &[])
    }

    /// Live entries among `ids`, ordered by entry time
    pub fn list_by_ids(&self, ids: &[i64], order: SortOrder) -> Result<Vec<Entry>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; ids.len()].join(", ");
        let params = ids.iter().map(|id| Value::Integer(*id)).collect::<Vec<_>>();
        self.select(
            &format!("_id IN ({placeholders}) AND {LIVE}"),
            order.sql(),
            &params,
        )
    }

    /// Hash of the favorite a live entry was created from
    pub fn favorite_link(&self, entry_id: i64) -> Result<Option<String>> {
        let conn = self.database().connection()?;
        let favorite: Option<Option<String>> = conn
            .query_row(
                &format!("SELECT favorite FROM {ENTRY_TABLE} WHERE _id = ? AND {LIVE}"),
                [entry_id],
                |row| read_text(row, Column::Favorite),
            )
            .optional()?;
        Ok(favorite.flatten())
    }

    /// Unlink every entry created from the favorite `favorite_hash`.
    ///
    /// Entry data is kept; each unlinked entry is marked not synced so the
    /// server learns about the change. Returns the number of entries changed.
    pub fn clear_favorite_link(&self, favorite_hash: &str) -> Result<usize> {
        if favorite_hash.is_empty() {
            return Ok(0);
        }

        let conn = self.database().connection()?;
        let changed = conn.execute(
            &format!("UPDATE {ENTRY_TABLE} SET favorite = NULL, sync_bit = ? WHERE favorite = ?"),
            params![SyncBit::NotSynced, favorite_hash],
        )?;

        tracing::debug!(favorite_hash, changed, "Cleared favorite link on entries");
        Ok(changed)
    }
}
