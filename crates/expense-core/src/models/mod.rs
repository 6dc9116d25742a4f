//! Data models for Expense Tracker

mod amount;
mod entry;
mod favorite;
mod record;

pub use amount::Amount;
pub use entry::{Entry, NewEntry};
pub use favorite::{Favorite, NewFavorite};
pub use record::{generate_hash, RecordType, SyncAck, SyncBit, SyncEnvelope};
