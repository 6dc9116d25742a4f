use expense_core::capture::{self, LocalPhotoStore};
use expense_core::config::StoreConfig;
use expense_core::db::SqliteEntryRepository;

use crate::commands::common::open_database;
use crate::error::CliError;

pub fn run_delete(id: i64, config: &StoreConfig) -> Result<(), CliError> {
    let db = open_database(config)?;
    let repo = SqliteEntryRepository::new(&db);
    let photos = LocalPhotoStore::new(&config.photo_dir);

    if !capture::delete(&repo, &photos, id)? {
        return Err(CliError::EntryNotFound(id));
    }

    println!("{id}");
    Ok(())
}
