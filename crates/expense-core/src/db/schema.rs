//! Table and column definitions

/// Entries table
pub const ENTRY_TABLE: &str = "EntryTable";
/// Favorites table
pub const FAVORITE_TABLE: &str = "FavoriteTable";
/// Entries table name used by version 1 files
pub const LEGACY_ENTRY_TABLE: &str = "ExpenseTrackerTable";

/// Predicate selecting live (not soft-deleted) rows.
///
/// `deleted` may hold NULL or the legacy `'FALSE'` text default, both of
/// which count as live.
pub const LIVE: &str = "(NOT deleted OR deleted IS NULL)";

/// Predicate selecting soft-deleted rows
pub const DELETED: &str = "deleted";

/// A stored column of either record table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Column {
    Id,
    Tag,
    Amount,
    DateTime,
    Location,
    Favorite,
    Type,
    IdFromServer,
    UpdatedAt,
    MyHash,
    Deleted,
    SyncBit,
    FileUploaded,
    FileToDownload,
    FileUpdatedAt,
}

impl Column {
    /// Column name in SQL
    pub const fn name(self) -> &'static str {
        match self {
            Self::Id => "_id",
            Self::Tag => "tag",
            Self::Amount => "amount",
            Self::DateTime => "date_time",
            Self::Location => "location",
            Self::Favorite => "favorite",
            Self::Type => "type",
            Self::IdFromServer => "id_from_server",
            Self::UpdatedAt => "updated_at",
            Self::MyHash => "my_hash",
            Self::Deleted => "deleted",
            Self::SyncBit => "sync_bit",
            Self::FileUploaded => "file_uploaded",
            Self::FileToDownload => "file_to_download",
            // The legacy schema stores the file sync time under this name
            Self::FileUpdatedAt => "file_uploaded_at",
        }
    }

    /// Record content and the soft delete flag, as opposed to sync
    /// bookkeeping.
    ///
    /// Changing one of these marks the record as not synced.
    pub const fn resets_sync(self) -> bool {
        matches!(
            self,
            Self::Tag
                | Self::Amount
                | Self::DateTime
                | Self::Location
                | Self::Favorite
                | Self::Type
                | Self::Deleted
        )
    }

    /// Only the entries table has these columns
    pub const fn is_entry_only(self) -> bool {
        matches!(self, Self::DateTime | Self::Favorite)
    }
}

/// Columns both tables share, in select order
pub const SHARED_COLUMNS: &[Column] = &[
    Column::Id,
    Column::Tag,
    Column::Amount,
    Column::Location,
    Column::Type,
    Column::IdFromServer,
    Column::UpdatedAt,
    Column::MyHash,
    Column::Deleted,
    Column::SyncBit,
    Column::FileUploaded,
    Column::FileToDownload,
    Column::FileUpdatedAt,
];

/// Sync envelope columns added by the version 3 upgrade step
pub const ENVELOPE_COLUMNS: &[(&str, &str)] = &[
    ("id_from_server", "INTEGER"),
    ("updated_at", "TEXT"),
    ("my_hash", "TEXT"),
    ("deleted", "BOOLEAN DEFAULT 0"),
    ("sync_bit", "INTEGER"),
    ("file_uploaded", "BOOLEAN DEFAULT 0"),
    ("file_to_download", "BOOLEAN DEFAULT 0"),
    ("file_uploaded_at", "TEXT"),
];

pub const CREATE_ENTRY_TABLE: &str = "CREATE TABLE IF NOT EXISTS EntryTable (
    _id INTEGER PRIMARY KEY AUTOINCREMENT,
    tag TEXT,
    amount TEXT,
    date_time INTEGER NOT NULL,
    location TEXT,
    favorite TEXT,
    type VARCHAR(1) NOT NULL,
    id_from_server INTEGER,
    updated_at TEXT,
    my_hash TEXT,
    deleted BOOLEAN DEFAULT 0,
    sync_bit INTEGER,
    file_uploaded BOOLEAN DEFAULT 0,
    file_to_download BOOLEAN DEFAULT 0,
    file_uploaded_at TEXT
)";

pub const CREATE_FAVORITE_TABLE: &str = "CREATE TABLE IF NOT EXISTS FavoriteTable (
    _id INTEGER PRIMARY KEY AUTOINCREMENT,
    tag TEXT,
    amount TEXT,
    type VARCHAR(1) NOT NULL,
    location TEXT,
    id_from_server INTEGER,
    updated_at TEXT,
    my_hash TEXT,
    deleted BOOLEAN DEFAULT 0,
    sync_bit INTEGER,
    file_uploaded BOOLEAN DEFAULT 0,
    file_to_download BOOLEAN DEFAULT 0,
    file_uploaded_at TEXT
)";

/// Server id and hash are independent unique identities next to `_id`.
pub const CREATE_ENVELOPE_INDEXES: &[(&str, &str)] = &[
    (
        ENTRY_TABLE,
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_entry_id_from_server ON EntryTable(id_from_server)",
    ),
    (
        ENTRY_TABLE,
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_entry_my_hash ON EntryTable(my_hash)",
    ),
    (
        FAVORITE_TABLE,
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_favorite_id_from_server ON FavoriteTable(id_from_server)",
    ),
    (
        FAVORITE_TABLE,
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_favorite_my_hash ON FavoriteTable(my_hash)",
    ),
];

pub const CREATE_ENTRY_TIME_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_entry_date_time ON EntryTable(date_time)";
