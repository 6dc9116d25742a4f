//! Favorite (reusable entry template) model

use serde::{Deserialize, Serialize};

use super::amount::Amount;
use super::record::{RecordType, SyncEnvelope};

/// A stored favorite
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Favorite {
    /// Local primary key
    pub id: i64,
    pub record_type: RecordType,
    pub amount: Option<Amount>,
    /// Free-text label (the description)
    pub tag: Option<String>,
    pub location: Option<String>,
    #[serde(flatten)]
    pub sync: SyncEnvelope,
}

/// A favorite that has not been written yet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewFavorite {
    pub record_type: RecordType,
    pub amount: Option<Amount>,
    pub tag: Option<String>,
    pub location: Option<String>,
    #[serde(flatten)]
    pub sync: SyncEnvelope,
}

impl NewFavorite {
    #[must_use]
    pub fn new(record_type: RecordType) -> Self {
        Self {
            record_type,
            amount: None,
            tag: None,
            location: None,
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

    /// Replace the whole envelope, e.g. for a record pulled from the server
    #[must_use]
    pub fn with_sync(mut self, sync: SyncEnvelope) -> Self {
        self.sync = sync;
        self
    }
}
