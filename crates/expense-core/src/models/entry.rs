//! Expense entry model

use serde::{Deserialize, Serialize};

use super::amount::Amount;
use super::favorite::Favorite;
use super::record::{RecordType, SyncEnvelope};

/// A stored expense entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Local primary key
    pub id: i64,
    pub record_type: RecordType,
    /// When the expense happened (Unix ms)
    pub time_in_millis: i64,
    pub amount: Option<Amount>,
    /// Free-text label (the description)
    pub tag: Option<String>,
    pub location: Option<String>,
    /// Hash of the favorite this entry was created from
    pub favorite: Option<String>,
    #[serde(flatten)]
    pub sync: SyncEnvelope,
}

/// An entry that has not been written yet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEntry {
    pub record_type: RecordType,
    pub time_in_millis: i64,
    pub amount: Option<Amount>,
    pub tag: Option<String>,
    pub location: Option<String>,
    pub favorite: Option<String>,
    #[serde(flatten)]
    pub sync: SyncEnvelope,
}

impl NewEntry {
    #[must_use]
    pub fn new(record_type: RecordType, time_in_millis: i64) -> Self {
        Self {
            record_type,
            time_in_millis,
            amount: None,
            tag: None,
            location: None,
            favorite: None,
            sync: SyncEnvelope::default(),
        }
    }

    /// Pre-fill an entry from a favorite template and link it by hash.
    #[must_use]
    pub fn from_favorite(favorite: &Favorite, time_in_millis: i64) -> Self {
        Self {
            record_type: favorite.record_type,
            time_in_millis,
            amount: favorite.amount,
            tag: favorite.tag.clone(),
            location: favorite.location.clone(),
            favorite: favorite.sync.my_hash.clone(),
            sync: SyncEnvelope::default(),
        }
    }

    #[must_use]
    pub const fn with_amount(mut self, amount: Amount) -> Self {
        self.amount = Some(amount);
        self
    }

    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    #[must_use]
    pub fn with_favorite(mut self, favorite_hash: impl Into<String>) -> Self {
        self.favorite = Some(favorite_hash.into());
        self
    }

    /// Replace the whole envelope, e.g. for a record pulled from the server
    #[must_use]
    pub fn with_sync(mut self, sync: SyncEnvelope) -> Self {
        self.sync = sync;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SyncBit;
    use pretty_assertions::assert_eq;

    fn expense_type() -> RecordType {
        RecordType::new('E').unwrap()
    }

    #[test]
    fn test_new_entry_defaults() {
        let entry = NewEntry::new(expense_type(), 1000);
        assert_eq!(entry.time_in_millis, 1000);
        assert!(entry.amount.is_none());
        assert!(entry.sync.my_hash.is_none());
        assert_eq!(entry.sync.sync_bit, SyncBit::NotSynced);
        assert!(!entry.sync.deleted);
    }

    #[test]
    fn test_from_favorite_copies_template() {
        let favorite = Favorite {
            id: 4,
            record_type: expense_type(),
            amount: Some("3.50".parse().unwrap()),
            tag: Some("coffee".to_string()),
            location: Some("Cafe".to_string()),
            sync: SyncEnvelope {
                my_hash: Some("fav-hash".to_string()),
                sync_bit: SyncBit::Synced,
                updated_at: Some("2012-01-01".to_string()),
                ..SyncEnvelope::default()
            },
        };

        let entry = NewEntry::from_favorite(&favorite, 5000);

        assert_eq!(
            entry,
            NewEntry::new(expense_type(), 5000)
                .with_amount("3.50".parse().unwrap())
                .with_tag("coffee")
                .with_location("Cafe")
                .with_favorite("fav-hash")
        );
    }

    #[test]
    fn test_entry_json_flattens_envelope() {
        let entry = Entry {
            id: 1,
            record_type: expense_type(),
            time_in_millis: 1000,
            amount: Some("10".parse().unwrap()),
            tag: Some("coffee".to_string()),
            location: None,
            favorite: None,
            sync: SyncEnvelope::default(),
        };

        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["amount"], "10");
        assert_eq!(value["record_type"], "E");
        assert_eq!(value["sync_bit"], "not_synced");
        assert_eq!(value["deleted"], false);
    }
}
