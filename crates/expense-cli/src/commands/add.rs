use expense_core::config::StoreConfig;
use expense_core::db::{RecordRepository, SqliteEntryRepository, SqliteFavoriteRepository};
use expense_core::util::normalize_text;
use expense_core::{NewEntry, RecordType};

use crate::cli::AddArgs;
use crate::commands::common::{current_millis, join_words, open_database, parse_amount};
use crate::error::CliError;

const DEFAULT_TYPE: char = 'E';

pub fn run_add(args: &AddArgs, config: &StoreConfig) -> Result<(), CliError> {
    let db = open_database(config)?;
    let time_in_millis = args.at.unwrap_or_else(current_millis);

    let mut entry = match args.favorite.as_deref() {
        Some(hash) => {
            let favorite = SqliteFavoriteRepository::new(&db)
                .get_by_hash(hash)?
                .filter(|favorite| favorite.sync.is_live())
                .ok_or_else(|| CliError::FavoriteNotFound(hash.to_string()))?;
            NewEntry::from_favorite(&favorite, time_in_millis)
        }
        None => NewEntry::new(RecordType::new(DEFAULT_TYPE)?, time_in_millis),
    };

    if let Some(record_type) = args.record_type {
        entry.record_type = record_type;
    }
    if let Some(amount) = parse_amount(args.amount.as_deref())? {
        entry = entry.with_amount(amount);
    }
    if let Some(tag) = join_words(&args.tag) {
        entry = entry.with_tag(tag);
    }
    if let Some(location) = args.location.as_deref().and_then(normalize_text) {
        entry = entry.with_location(location);
    }

    let id = SqliteEntryRepository::new(&db).insert(&entry)?;
    println!("{id}");
    Ok(())
}
