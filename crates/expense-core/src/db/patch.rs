//! Partial record updates

use std::collections::BTreeMap;

use rusqlite::types::Value;

use super::schema::Column;
use super::sql_types::{amount_value, flag_value, text_value};
use crate::models::{Amount, NewEntry, NewFavorite, RecordType, SyncBit, SyncEnvelope};

/// The set of columns an update changes, and their new values.
///
/// Only columns that were set are written; a column set to `None` is
/// written as NULL. The record hash has no public setter: it is assigned
/// once at insert and never changes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordPatch {
    changes: BTreeMap<Column, Value>,
}

impl RecordPatch {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn tag(self, tag: Option<&str>) -> Self {
        self.set(Column::Tag, text_value(tag))
    }

    #[must_use]
    pub fn amount(self, amount: Option<Amount>) -> Self {
        self.set(Column::Amount, amount_value(amount))
    }

    #[must_use]
    pub fn location(self, location: Option<&str>) -> Self {
        self.set(Column::Location, text_value(location))
    }

    #[must_use]
    pub fn record_type(self, record_type: RecordType) -> Self {
        self.set(Column::Type, Value::Text(record_type.to_string()))
    }

    /// Entries only
    #[must_use]
    pub fn time_in_millis(self, time_in_millis: i64) -> Self {
        self.set(Column::DateTime, Value::Integer(time_in_millis))
    }

    /// Entries only: link to (or unlink from) a favorite by hash
    #[must_use]
    pub fn favorite(self, favorite_hash: Option<&str>) -> Self {
        self.set(Column::Favorite, text_value(favorite_hash))
    }

    #[must_use]
    pub fn id_from_server(self, id: Option<i64>) -> Self {
        self.set(Column::IdFromServer, id.map_or(Value::Null, Value::Integer))
    }

    #[must_use]
    pub fn updated_at(self, updated_at: Option<&str>) -> Self {
        self.set(Column::UpdatedAt, text_value(updated_at))
    }

    #[must_use]
    pub fn sync_bit(self, sync_bit: SyncBit) -> Self {
        self.set(Column::SyncBit, Value::Integer(sync_bit.as_i64()))
    }

    #[must_use]
    pub fn deleted(self, deleted: bool) -> Self {
        self.set(Column::Deleted, flag_value(deleted))
    }

    #[must_use]
    pub fn file_uploaded(self, uploaded: bool) -> Self {
        self.set(Column::FileUploaded, flag_value(uploaded))
    }

    #[must_use]
    pub fn file_to_download(self, to_download: bool) -> Self {
        self.set(Column::FileToDownload, flag_value(to_download))
    }

    #[must_use]
    pub fn file_updated_at(self, file_updated_at: Option<&str>) -> Self {
        self.set(Column::FileUpdatedAt, text_value(file_updated_at))
    }

    pub(crate) fn set(mut self, column: Column, value: Value) -> Self {
        self.changes.insert(column, value);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn contains(&self, column: Column) -> bool {
        self.changes.contains_key(&column)
    }

    pub fn get(&self, column: Column) -> Option<&Value> {
        self.changes.get(&column)
    }

    /// Changed columns with their values, in column order
    pub fn iter(&self) -> impl Iterator<Item = (Column, &Value)> {
        self.changes.iter().map(|(column, value)| (*column, value))
    }

    /// Whether any change (not just sync bookkeeping) needs a resync
    pub fn resets_sync(&self) -> bool {
        self.changes.keys().any(|column| column.resets_sync())
    }

    /// Apply the sync-bit rule: a content change or soft delete that does
    /// not carry its own sync bit marks the record as not synced.
    #[must_use]
    pub fn with_sync_reset(self) -> Self {
        if self.resets_sync() && !self.contains(Column::SyncBit) {
            self.sync_bit(SyncBit::NotSynced)
        } else {
            self
        }
    }

    /// Every envelope column, used when inserting a full record.
    fn envelope(self, sync: &SyncEnvelope) -> Self {
        self.id_from_server(sync.id_from_server)
            .set(Column::MyHash, text_value(sync.my_hash.as_deref()))
            .updated_at(sync.updated_at.as_deref())
            .sync_bit(sync.sync_bit)
            .deleted(sync.deleted)
            .file_uploaded(sync.file_uploaded)
            .file_to_download(sync.file_to_download)
            .file_updated_at(sync.file_updated_at.as_deref())
    }
}

impl From<&NewEntry> for RecordPatch {
    fn from(entry: &NewEntry) -> Self {
        Self::new()
            .record_type(entry.record_type)
            .time_in_millis(entry.time_in_millis)
            .amount(entry.amount)
            .tag(entry.tag.as_deref())
            .location(entry.location.as_deref())
            .favorite(entry.favorite.as_deref())
            .envelope(&entry.sync)
    }
}

impl From<&NewFavorite> for RecordPatch {
    fn from(favorite: &NewFavorite) -> Self {
        Self::new()
            .record_type(favorite.record_type)
            .amount(favorite.amount)
            .tag(favorite.tag.as_deref())
            .location(favorite.location.as_deref())
            .envelope(&favorite.sync)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_absent_and_null_are_distinct() {
        let patch = RecordPatch::new().tag(None);
        assert!(patch.contains(Column::Tag));
        assert_eq!(patch.get(Column::Tag), Some(&Value::Null));
        assert!(!patch.contains(Column::Amount));
    }

    #[test]
    fn test_domain_change_resets_sync_bit() {
        let patch = RecordPatch::new().tag(Some("tea")).with_sync_reset();
        assert_eq!(
            patch.get(Column::SyncBit),
            Some(&Value::Integer(SyncBit::NotSynced.as_i64()))
        );
    }

    #[test]
    fn test_soft_delete_resets_sync_bit() {
        let patch = RecordPatch::new().deleted(true).with_sync_reset();
        assert_eq!(
            patch.get(Column::SyncBit),
            Some(&Value::Integer(SyncBit::NotSynced.as_i64()))
        );
    }

    #[test]
    fn test_explicit_sync_bit_wins() {
        let patch = RecordPatch::new()
            .tag(Some("tea"))
            .sync_bit(SyncBit::Synced)
            .with_sync_reset();
        assert_eq!(
            patch.get(Column::SyncBit),
            Some(&Value::Integer(SyncBit::Synced.as_i64()))
        );
    }

    #[test]
    fn test_bookkeeping_change_keeps_sync_bit() {
        let patch = RecordPatch::new()
            .id_from_server(Some(42))
            .updated_at(Some("2012-03-01"))
            .with_sync_reset();
        assert!(!patch.contains(Column::SyncBit));
        assert_eq!(patch.len(), 2);
    }

    #[test]
    fn test_new_entry_patch_covers_every_column() {
        let entry = NewEntry::new(RecordType::new('E').unwrap(), 1000);
        let patch = RecordPatch::from(&entry);
        // all columns except the primary key
        assert_eq!(patch.len(), 14);
        assert!(!patch.contains(Column::Id));
        assert_eq!(patch.get(Column::MyHash), Some(&Value::Null));
    }
}
