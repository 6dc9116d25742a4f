//! Database layer

mod connection;
mod entry_repository;
mod favorite_repository;
mod migrations;
mod patch;
mod repository;
mod schema;
mod sql_types;

pub use connection::Database;
pub use entry_repository::{Entries, SortOrder, SqliteEntryRepository};
pub use favorite_repository::{Favorites, SqliteFavoriteRepository};
pub use migrations::{MigrationPolicy, CURRENT_VERSION};
pub use patch::RecordPatch;
pub use repository::{RecordKey, RecordRepository, RecordStore, Table};
pub use schema::{Column, ENTRY_TABLE, FAVORITE_TABLE};
