use expense_core::config::StoreConfig;
use expense_core::db::{RecordRepository, SqliteEntryRepository, SqliteFavoriteRepository};

use crate::cli::TableChoice;
use crate::commands::common::open_database;
use crate::error::CliError;

pub fn run_purge(hash: &str, table: TableChoice, config: &StoreConfig) -> Result<(), CliError> {
    let db = open_database(config)?;

    let removed = match table {
        TableChoice::Entries => SqliteEntryRepository::new(&db).permanent_delete_by_hash(hash)?,
        TableChoice::Favorites => {
            SqliteFavoriteRepository::new(&db).permanent_delete_by_hash(hash)?
        }
    };
    if !removed {
        return Err(CliError::HashNotFound(hash.to_string()));
    }

    tracing::info!(hash, ?table, "Purged record");
    println!("{hash}");
    Ok(())
}
