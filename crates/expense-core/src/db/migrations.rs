//! Database migrations
//!
//! The schema version lives in `PRAGMA user_version`, the slot older
//! Android builds of the app wrote, so their files upgrade in place.

use std::fmt;
use std::str::FromStr;

use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use super::schema::{
    CREATE_ENTRY_TABLE, CREATE_ENTRY_TIME_INDEX, CREATE_ENVELOPE_INDEXES, CREATE_FAVORITE_TABLE,
    ENTRY_TABLE, ENVELOPE_COLUMNS, FAVORITE_TABLE, LEGACY_ENTRY_TABLE,
};
use crate::error::{Error, Result};

/// Current schema version
pub const CURRENT_VERSION: i32 = 3;

/// Which upgrade steps run when an older file is opened.
///
/// Upgrade steps are keyed by the version they upgrade *from*. Legacy
/// builds ran only the step whose key equals the stored version, so a
/// version 1 file got the table rename and nothing else. Whether skipping
/// the later steps was intended is still open, so that behaviour stays the
/// default and chaining is opt-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MigrationPolicy {
    /// Run only the step keyed by the stored version
    #[default]
    SingleStep,
    /// Run every step from the stored version upward, in order
    Chained,
}

impl MigrationPolicy {
    const fn applies(self, step: i32, from: i32) -> bool {
        match self {
            Self::SingleStep => step == from,
            Self::Chained => step >= from,
        }
    }
}

impl fmt::Display for MigrationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SingleStep => f.write_str("single-step"),
            Self::Chained => f.write_str("chained"),
        }
    }
}

impl FromStr for MigrationPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single-step" | "single" => Ok(Self::SingleStep),
            "chained" | "chain" => Ok(Self::Chained),
            other => Err(Error::Config(format!(
                "unknown migration policy '{other}' (expected single-step or chained)"
            ))),
        }
    }
}

type Step = fn(&Connection) -> Result<()>;

/// Upgrade steps keyed by the version they upgrade from
const STEPS: [(i32, Step); 3] = [
    (1, rename_legacy_entry_table),
    (2, add_favorite_location),
    (3, add_sync_envelope),
];

/// Create or upgrade the schema
pub fn run(conn: &Connection, policy: MigrationPolicy) -> Result<()> {
    let version = get_version(conn)?;

    match version {
        0 => create(conn),
        CURRENT_VERSION => Ok(()),
        v if v > CURRENT_VERSION || v < 0 => Err(Error::UnsupportedSchemaVersion(v)),
        v => upgrade(conn, v, policy),
    }
}

/// Get the stored schema version
pub fn get_version(conn: &Connection) -> Result<i32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}

/// Create the current schema on an empty file
fn create(conn: &Connection) -> Result<()> {
    let tx = conn.unchecked_transaction()?;

    tx.execute(CREATE_ENTRY_TABLE, [])?;
    tx.execute(CREATE_FAVORITE_TABLE, [])?;
    create_indexes(&tx, ENTRY_TABLE)?;
    create_indexes(&tx, FAVORITE_TABLE)?;
    tx.pragma_update(None, "user_version", CURRENT_VERSION)?;

    tx.commit()?;
    tracing::info!("Created database schema at version {CURRENT_VERSION}");
    Ok(())
}

fn upgrade(conn: &Connection, from: i32, policy: MigrationPolicy) -> Result<()> {
    let tx = conn.unchecked_transaction()?;

    for (step, apply) in STEPS {
        if policy.applies(step, from) {
            apply(&tx)?;
            tracing::info!("Applied upgrade step from version {step}");
        }
    }
    tx.pragma_update(None, "user_version", CURRENT_VERSION)?;

    tx.commit()?;
    tracing::info!("Migrated database from version {from} to {CURRENT_VERSION} ({policy})");
    Ok(())
}

/// Step from version 1: the entries table got its current name
fn rename_legacy_entry_table(conn: &Connection) -> Result<()> {
    if table_exists(conn, LEGACY_ENTRY_TABLE)? && !table_exists(conn, ENTRY_TABLE)? {
        conn.execute(
            &format!("ALTER TABLE {LEGACY_ENTRY_TABLE} RENAME TO {ENTRY_TABLE}"),
            [],
        )?;
    }
    Ok(())
}

/// Step from version 2: favorites gained a location
fn add_favorite_location(conn: &Connection) -> Result<()> {
    if table_exists(conn, FAVORITE_TABLE)? {
        add_column_if_missing(conn, FAVORITE_TABLE, "location", "TEXT")?;
    }
    Ok(())
}

/// Step from version 3: sync envelope columns on both tables
fn add_sync_envelope(conn: &Connection) -> Result<()> {
    for table in [ENTRY_TABLE, FAVORITE_TABLE] {
        if !table_exists(conn, table)? {
            tracing::warn!("Skipping sync columns for missing table {table}");
            continue;
        }
        for (column, definition) in ENVELOPE_COLUMNS {
            add_column_if_missing(conn, table, column, definition)?;
        }
        create_indexes(conn, table)?;
    }
    Ok(())
}

fn create_indexes(conn: &Connection, table: &str) -> Result<()> {
    for (indexed_table, statement) in CREATE_ENVELOPE_INDEXES {
        if *indexed_table == table {
            conn.execute(statement, [])?;
        }
    }
    if table == ENTRY_TABLE {
        conn.execute(CREATE_ENTRY_TIME_INDEX, [])?;
    }
    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> Result<bool> {
    Ok(conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1 COLLATE NOCASE)",
        [table],
        |row| row.get(0),
    )?)
}

fn column_exists(conn: &Connection, table: &str, column: &str) -> Result<bool> {
    Ok(conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM pragma_table_info(?1) WHERE name = ?2 COLLATE NOCASE)",
        [table, column],
        |row| row.get(0),
    )?)
}

fn add_column_if_missing(
    conn: &Connection,
    table: &str,
    column: &str,
    definition: &str,
) -> Result<()> {
    if !column_exists(conn, table, column)? {
        conn.execute(
            &format!("ALTER TABLE {table} ADD COLUMN {column} {definition}"),
            [],
        )?;
    }
    Ok(())
}
