//! Sync envelope shared by entries and favorites

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

/// Generate a fresh record hash: a UUID v7 rendered as 32 lowercase hex chars.
///
/// The hash is the durable identity used to reconcile local and remote
/// copies, so it is assigned once at insert and never regenerated.
#[must_use]
pub fn generate_hash() -> String {
    Uuid::now_v7().simple().to_string()
}

/// Last-known sync outcome of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncBit {
    /// Local state matches the server
    Synced,
    /// Local state has changes the server has not seen
    #[default]
    NotSynced,
}

impl SyncBit {
    /// Stored column value
    pub const fn as_i64(self) -> i64 {
        match self {
            Self::Synced => 1,
            Self::NotSynced => 0,
        }
    }

    /// Decode a stored column value; anything but `1` is not synced.
    pub const fn from_i64(value: i64) -> Self {
        if value == 1 {
            Self::Synced
        } else {
            Self::NotSynced
        }
    }

    pub const fn is_synced(self) -> bool {
        matches!(self, Self::Synced)
    }
}

/// Single-character record subtype discriminator (e.g. `E`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "char", into = "char")]
pub struct RecordType(char);

impl RecordType {
    /// Create a record type from its code character.
    pub fn new(code: char) -> Result<Self> {
        if code.is_whitespace() || code.is_control() {
            return Err(Error::InvalidInput(format!(
                "record type must be a visible character, got {code:?}"
            )));
        }
        Ok(Self(code))
    }

    pub const fn code(self) -> char {
        self.0
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(code), None) => Self::new(code),
            _ => Err(Error::InvalidInput(format!(
                "record type must be exactly one character, got '{s}'"
            ))),
        }
    }
}

impl TryFrom<char> for RecordType {
    type Error = Error;

    fn try_from(value: char) -> Result<Self> {
        Self::new(value)
    }
}

impl From<RecordType> for char {
    fn from(value: RecordType) -> Self {
        value.0
    }
}

/// Sync and soft-delete bookkeeping carried by every stored record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncEnvelope {
    /// Remote identity once the server has accepted the record
    pub id_from_server: Option<i64>,
    /// Durable local identity; `None` only on rows migrated from pre-sync files
    pub my_hash: Option<String>,
    /// Server-confirmed update time; empty means never synced
    pub updated_at: Option<String>,
    pub sync_bit: SyncBit,
    /// Soft delete flag
    pub deleted: bool,
    /// Attached photo has reached the server
    pub file_uploaded: bool,
    /// Server-side photo must be pulled down
    pub file_to_download: bool,
    /// Time of the last photo sync
    pub file_updated_at: Option<String>,
}

impl SyncEnvelope {
    /// Whether the server has ever confirmed this record
    pub fn has_synced(&self) -> bool {
        self.updated_at.as_deref().is_some_and(|value| !value.is_empty())
    }

    pub const fn is_live(&self) -> bool {
        !self.deleted
    }

    /// Synced before, changed locally since, and still live
    pub fn is_modified_since_sync(&self) -> bool {
        self.has_synced() && !self.sync_bit.is_synced() && self.is_live()
    }
}

/// What the sync engine learns from a successful round trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncAck {
    pub id_from_server: i64,
    pub updated_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_hash_shape() {
        let hash = generate_hash();
        assert_eq!(hash.len(), 32);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit() && !c.is_uppercase()));
        assert_ne!(hash, generate_hash());
    }

    #[test]
    fn test_sync_bit_round_trip_values() {
        assert_eq!(SyncBit::from_i64(SyncBit::Synced.as_i64()), SyncBit::Synced);
        assert_eq!(SyncBit::from_i64(0), SyncBit::NotSynced);
        assert_eq!(SyncBit::from_i64(7), SyncBit::NotSynced);
        assert_eq!(SyncBit::default(), SyncBit::NotSynced);
    }

    #[test]
    fn test_record_type_parse() {
        assert_eq!("E".parse::<RecordType>().unwrap().code(), 'E');
        assert!("".parse::<RecordType>().is_err());
        assert!("EE".parse::<RecordType>().is_err());
        assert!(" ".parse::<RecordType>().is_err());
    }

    #[test]
    fn test_envelope_sync_predicates() {
        let mut envelope = SyncEnvelope::default();
        assert!(!envelope.has_synced());
        assert!(!envelope.is_modified_since_sync());

        envelope.updated_at = Some(String::new());
        assert!(!envelope.has_synced());

        envelope.updated_at = Some("2012-03-01T10:00:00Z".to_string());
        assert!(envelope.is_modified_since_sync());

        envelope.sync_bit = SyncBit::Synced;
        assert!(!envelope.is_modified_since_sync());

        envelope.sync_bit = SyncBit::NotSynced;
        envelope.deleted = true;
        assert!(!envelope.is_modified_since_sync());
    }
}
