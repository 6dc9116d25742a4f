use expense_core::capture::LocalPhotoStore;
use expense_core::config::StoreConfig;
use expense_core::db::{Database, RecordRepository, SqliteEntryRepository};

use crate::commands::common::{entry_to_list_item, format_entry_detail};
use crate::error::CliError;

pub fn run_show(id: i64, as_json: bool, config: &StoreConfig) -> Result<(), CliError> {
    let entry = Database::with_open(config, |db| SqliteEntryRepository::new(db).get(id))?
        .ok_or(CliError::EntryNotFound(id))?;

    if as_json {
        println!(
            "{}",
            serde_json::to_string_pretty(&entry_to_list_item(&entry))?
        );
    } else {
        let has_photo = LocalPhotoStore::new(&config.photo_dir).has_photo(id);
        for line in format_entry_detail(&entry, has_photo) {
            println!("{line}");
        }
    }

    Ok(())
}
