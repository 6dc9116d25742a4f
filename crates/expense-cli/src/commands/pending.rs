use expense_core::config::StoreConfig;
use expense_core::db::{RecordRepository, SqliteEntryRepository, SqliteFavoriteRepository};

use crate::cli::{PendingCategory, TableChoice};
use crate::commands::common::{
    entry_to_list_item, format_entry_lines, format_favorite_lines, open_database, EntryListItem,
};
use crate::error::CliError;

/// Records of one table in a sync category
pub fn pending_records<R: RecordRepository>(
    repo: &R,
    category: PendingCategory,
) -> expense_core::Result<Vec<R::Record>> {
    match category {
        PendingCategory::NeverSynced => repo.list_never_synced(),
        PendingCategory::Modified => repo.list_modified_since_sync(),
        PendingCategory::Deleted => repo.list_deleted(),
        PendingCategory::FileUpload => repo.list_file_not_uploaded(),
        PendingCategory::FileDownload => repo.list_file_to_download(),
    }
}

pub fn run_pending(
    category: PendingCategory,
    table: TableChoice,
    as_json: bool,
    config: &StoreConfig,
) -> Result<(), CliError> {
    let db = open_database(config)?;

    match table {
        TableChoice::Entries => {
            let entries = pending_records(&SqliteEntryRepository::new(&db), category)?;
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
        }
        TableChoice::Favorites => {
            let favorites = pending_records(&SqliteFavoriteRepository::new(&db), category)?;
            if as_json {
                println!("{}", serde_json::to_string_pretty(&favorites)?);
            } else {
                for line in format_favorite_lines(&favorites) {
                    println!("{line}");
                }
            }
        }
    }

    Ok(())
}
