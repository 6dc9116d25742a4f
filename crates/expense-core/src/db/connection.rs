//! Database connection management

use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::Connection;

use super::migrations::{self, MigrationPolicy};
use crate::config::StoreConfig;
use crate::error::{Error, Result};

/// How long a write waits on another connection's lock before failing
const BUSY_TIMEOUT: Duration = Duration::from_millis(250);

/// Handle to the local expense database.
///
/// One connection per handle. The connection is released by [`close`],
/// or on drop; every operation on a closed handle fails with
/// [`Error::NotOpen`].
///
/// [`close`]: Database::close
pub struct Database {
    conn: Option<Connection>,
    path: Option<PathBuf>,
}

impl Database {
    /// Open a database at the given path, creating it if it doesn't exist
    ///
    /// Runs migrations with the default [`MigrationPolicy`].
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_policy(path, MigrationPolicy::default())
    }

    /// Open a database at the given path with an explicit upgrade policy
    pub fn open_with_policy(path: impl AsRef<Path>, policy: MigrationPolicy) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        let database = Self::from_connection(conn, Some(path.to_path_buf()), policy)?;
        tracing::info!("Database opened at {}", path.display());
        Ok(database)
    }

    /// Open the database described by a store configuration
    pub fn open_config(config: &StoreConfig) -> Result<Self> {
        if let Some(parent) = config.database_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Self::open_with_policy(&config.database_path, config.migration_policy)
    }

    /// Open an in-memory database (useful for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn, None, MigrationPolicy::default())
    }

    /// Open, run `f`, and close again on every exit path.
    pub fn with_open<T>(
        config: &StoreConfig,
        f: impl FnOnce(&Self) -> Result<T>,
    ) -> Result<T> {
        let mut database = Self::open_config(config)?;
        let result = f(&database);
        match database.close() {
            Ok(()) => result,
            Err(error) if result.is_ok() => Err(error),
            Err(error) => {
                tracing::warn!("Failed to close database after error: {error}");
                result
            }
        }
    }

    fn from_connection(
        conn: Connection,
        path: Option<PathBuf>,
        policy: MigrationPolicy,
    ) -> Result<Self> {
        configure(&conn)?;
        migrations::run(&conn, policy)?;
        Ok(Self {
            conn: Some(conn),
            path,
        })
    }

    /// Release the connection. Closing twice is a no-op.
    pub fn close(&mut self) -> Result<()> {
        if let Some(conn) = self.conn.take() {
            conn.close().map_err(|(_, error)| Error::from(error))?;
            tracing::debug!("Database closed");
        }
        Ok(())
    }

    pub const fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    /// File backing this handle (`None` when in memory)
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Get a reference to the underlying connection
    pub fn connection(&self) -> Result<&Connection> {
        self.conn.as_ref().ok_or(Error::NotOpen)
    }

    /// Stored schema version
    pub fn schema_version(&self) -> Result<i32> {
        migrations::get_version(self.connection()?)
    }
}

/// Configure `SQLite` pragmas
fn configure(conn: &Connection) -> Result<()> {
    // In-memory databases report "memory" and keep their journal mode
    match conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| {
        row.get::<_, String>(0)
    }) {
        Ok(mode) => tracing::debug!("Journal mode: {mode}"),
        Err(error) => tracing::debug!("Failed to enable WAL journal mode: {error}"),
    }
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    Ok(())
}
