use expense_core::config::StoreConfig;
use expense_core::db::{RecordRepository, SqliteFavoriteRepository};
use expense_core::util::normalize_text;
use expense_core::NewFavorite;

use crate::cli::FavoriteCommands;
use crate::commands::common::{format_favorite_lines, join_words, open_database, parse_amount};
use crate::error::CliError;

pub fn run_favorites(command: FavoriteCommands, config: &StoreConfig) -> Result<(), CliError> {
    let db = open_database(config)?;
    let repo = SqliteFavoriteRepository::new(&db);

    match command {
        FavoriteCommands::List { json } => {
            let favorites = repo.list()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&favorites)?);
            } else {
                for line in format_favorite_lines(&favorites) {
                    println!("{line}");
                }
            }
        }
        FavoriteCommands::Add {
            amount,
            tag,
            record_type,
            location,
        } => {
            let mut favorite = NewFavorite::new(record_type);
            if let Some(amount) = parse_amount(amount.as_deref())? {
                favorite = favorite.with_amount(amount);
            }
            if let Some(tag) = join_words(&tag) {
                favorite = favorite.with_tag(tag);
            }
            if let Some(location) = location.as_deref().and_then(normalize_text) {
                favorite = favorite.with_location(location);
            }

            let id = repo.insert(&favorite)?;
            let hash = repo.hash_for_id(id)?.unwrap_or_default();
            println!("{hash}");
        }
        FavoriteCommands::Delete { hash } => {
            if !repo.delete_with_entry_links(&hash)? {
                return Err(CliError::FavoriteNotFound(hash));
            }
            println!("{hash}");
        }
    }

    Ok(())
}
