use expense_core::config::StoreConfig;
use expense_core::db::{RecordPatch, RecordRepository, SqliteEntryRepository};
use expense_core::util::normalize_text;
use expense_core::Amount;

use crate::commands::common::open_database;
use crate::error::CliError;

/// Build the patch for `edit`; blank values clear their field
pub fn edit_patch(
    amount: Option<&str>,
    tag: Option<&str>,
    location: Option<&str>,
) -> Result<RecordPatch, CliError> {
    let mut patch = RecordPatch::new();
    if let Some(text) = amount {
        patch = patch.amount(Amount::parse_input(text)?);
    }
    if let Some(text) = tag {
        patch = patch.tag(normalize_text(text).as_deref());
    }
    if let Some(text) = location {
        patch = patch.location(normalize_text(text).as_deref());
    }
    Ok(patch)
}

pub fn run_edit(
    id: i64,
    amount: Option<&str>,
    tag: Option<&str>,
    location: Option<&str>,
    config: &StoreConfig,
) -> Result<(), CliError> {
    let patch = edit_patch(amount, tag, location)?;
    if patch.is_empty() {
        return Err(CliError::NothingToEdit);
    }

    let db = open_database(config)?;
    if !SqliteEntryRepository::new(&db).edit_by_id(id, &patch)? {
        return Err(CliError::EntryNotFound(id));
    }

    println!("{id}");
    Ok(())
}
