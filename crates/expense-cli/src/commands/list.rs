use expense_core::config::StoreConfig;
use expense_core::db::{Database, SortOrder, SqliteEntryRepository};

use crate::commands::common::{entry_to_list_item, format_entry_lines, EntryListItem};
use crate::error::CliError;

pub fn run_list(ascending: bool, as_json: bool, config: &StoreConfig) -> Result<(), CliError> {
    let order = if ascending {
        SortOrder::Ascending
    } else {
        SortOrder::Descending
    };
    let entries = Database::with_open(config, |db| SqliteEntryRepository::new(db).list(order))?;

    if as_json {
        let json_items = entries
            .iter()
            .map(entry_to_list_item)
            .collect::<Vec<EntryListItem>>();
        println!("{}", serde_json::to_string_pretty(&json_items)?);
    } else {
        for line in format_entry_lines(&entries) {
            println!("{line}");
        }
    }

    Ok(())
}
