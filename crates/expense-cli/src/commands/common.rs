use std::path::{Path, PathBuf};

use chrono::Utc;
use expense_core::capture::format_display_date;
use expense_core::config::StoreConfig;
use expense_core::db::Database;
use expense_core::util::normalize_text;
use expense_core::models::SyncEnvelope;
use expense_core::{Amount, Entry, Favorite};
use serde::Serialize;

use crate::error::CliError;

/// An entry plus its date bar label
#[derive(Debug, Serialize)]
pub struct EntryListItem {
    pub date: String,
    #[serde(flatten)]
    pub entry: Entry,
}

pub fn entry_to_list_item(entry: &Entry) -> EntryListItem {
    EntryListItem {
        date: format_display_date(entry.time_in_millis).unwrap_or_default(),
        entry: entry.clone(),
    }
}

/// Load the store config, letting `--db-path` win over file and environment
pub fn resolve_config(
    config_path: Option<&Path>,
    db_path: Option<PathBuf>,
) -> Result<StoreConfig, CliError> {
    let mut config = StoreConfig::load(config_path)?;
    if let Some(db_path) = db_path {
        config.database_path = db_path;
    }
    Ok(config)
}

pub fn open_database(config: &StoreConfig) -> Result<Database, CliError> {
    Ok(Database::open_config(config)?)
}

pub fn current_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Join positional words into one description
pub fn join_words(words: &[String]) -> Option<String> {
    normalize_text(&words.join(" "))
}

pub fn parse_amount(text: Option<&str>) -> Result<Option<Amount>, CliError> {
    match text {
        Some(text) => Ok(Amount::parse_input(text)?),
        None => Ok(None),
    }
}

fn amount_label(amount: Option<Amount>) -> String {
    amount.map_or_else(|| "?".to_string(), |amount| amount.to_string())
}

const fn sync_marker(synced: bool) -> char {
    if synced {
        ' '
    } else {
        '*'
    }
}

/// Where a record stands with respect to the server.
pub fn sync_state(sync: &SyncEnvelope) -> &'static str {
    if sync.deleted {
        "deleted"
    } else if !sync.has_synced() {
        "new"
    } else if sync.is_modified_since_sync() {
        "modified"
    } else {
        "synced"
    }
}

pub fn format_entry_line(entry: &Entry) -> String {
    let date = format_display_date(entry.time_in_millis).unwrap_or_default();
    let amount = amount_label(entry.amount);
    let tag = entry.tag.as_deref().unwrap_or("");
    let marker = sync_marker(entry.sync.sync_bit.is_synced());

    format!(
        "{marker}{:>5}  {date:<18}  {}  {amount:>10}  {tag}",
        entry.id, entry.record_type
    )
    .trim_end()
    .to_string()
}

pub fn format_entry_lines(entries: &[Entry]) -> Vec<String> {
    entries.iter().map(format_entry_line).collect()
}

pub fn format_entry_detail(entry: &Entry, has_photo: bool) -> Vec<String> {
    let optional = |value: Option<&str>| value.unwrap_or("-").to_string();

    vec![
        format!("id:          {}", entry.id),
        format!("hash:        {}", optional(entry.sync.my_hash.as_deref())),
        format!("type:        {}", entry.record_type),
        format!(
            "date:        {} ({})",
            format_display_date(entry.time_in_millis).unwrap_or_default(),
            entry.time_in_millis
        ),
        format!("amount:      {}", amount_label(entry.amount)),
        format!("tag:         {}", optional(entry.tag.as_deref())),
        format!("location:    {}", optional(entry.location.as_deref())),
        format!("favorite:    {}", optional(entry.favorite.as_deref())),
        format!("photo:       {}", if has_photo { "yes" } else { "no" }),
        format!(
            "server id:   {}",
            entry
                .sync
                .id_from_server
                .map_or_else(|| "-".to_string(), |id| id.to_string())
        ),
        format!("updated at:  {}", optional(entry.sync.updated_at.as_deref())),
        format!("sync state:  {}", sync_state(&entry.sync)),
        format!("deleted:     {}", entry.sync.deleted),
    ]
}

pub fn format_favorite_line(favorite: &Favorite) -> String {
    let hash = favorite.sync.my_hash.as_deref().unwrap_or("-");
    let amount = amount_label(favorite.amount);
    let tag = favorite.tag.as_deref().unwrap_or("");
    let marker = sync_marker(favorite.sync.sync_bit.is_synced());

    format!("{marker}{hash:<32}  {}  {amount:>10}  {tag}", favorite.record_type)
        .trim_end()
        .to_string()
}

pub fn format_favorite_lines(favorites: &[Favorite]) -> Vec<String> {
    favorites.iter().map(format_favorite_line).collect()
}
