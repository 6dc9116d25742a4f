use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use expense_core::RecordType;

#[derive(Parser)]
#[command(name = "expense")]
#[command(about = "Record expenses and inspect their sync state")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Optional path to local database file
    #[arg(long, global = true, value_name = "PATH")]
    pub db_path: Option<PathBuf>,

    /// Optional path to the config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Record a new entry
    #[command(alias = "new")]
    Add(AddArgs),
    /// List entries, newest first
    List {
        /// Oldest first
        #[arg(long)]
        asc: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one entry
    Show {
        id: i64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Change fields of an entry; an empty value clears the field
    Edit {
        id: i64,
        #[arg(long)]
        amount: Option<String>,
        #[arg(long)]
        tag: Option<String>,
        #[arg(long)]
        location: Option<String>,
    },
    /// Delete an entry and its photos
    #[command(alias = "rm")]
    Delete { id: i64 },
    /// Manage favorites
    #[command(alias = "fav")]
    Favorites {
        #[command(subcommand)]
        command: FavoriteCommands,
    },
    /// List records waiting on the sync engine
    Pending {
        #[arg(value_enum)]
        category: PendingCategory,
        #[arg(long, value_enum, default_value_t = TableChoice::Entries)]
        table: TableChoice,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Permanently remove a record the server confirmed as deleted
    Purge {
        /// Record hash
        hash: String,
        #[arg(long, value_enum, default_value_t = TableChoice::Entries)]
        table: TableChoice,
    },
}

#[derive(Args)]
pub struct AddArgs {
    /// Amount, e.g. 12.50
    pub amount: Option<String>,
    /// Description
    pub tag: Vec<String>,
    /// Single-character record type (defaults to E, or the favorite's type)
    #[arg(long = "type", value_name = "CODE")]
    pub record_type: Option<RecordType>,
    /// Entry time in Unix milliseconds (defaults to now)
    #[arg(long, value_name = "MILLIS")]
    pub at: Option<i64>,
    #[arg(long)]
    pub location: Option<String>,
    /// Prefill from the favorite with this hash
    #[arg(long, value_name = "HASH")]
    pub favorite: Option<String>,
}

#[derive(Subcommand)]
pub enum FavoriteCommands {
    /// List favorites
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Save a new favorite
    Add {
        /// Amount, e.g. 12.50
        amount: Option<String>,
        /// Description
        tag: Vec<String>,
        /// Single-character record type
        #[arg(long = "type", value_name = "CODE", default_value = "E")]
        record_type: RecordType,
        #[arg(long)]
        location: Option<String>,
    },
    /// Delete a favorite and unlink the entries made from it
    Delete {
        /// Favorite hash
        hash: String,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum PendingCategory {
    /// Never confirmed by the server
    NeverSynced,
    /// Synced once, changed locally since
    Modified,
    /// Soft-deleted, waiting for the server delete
    Deleted,
    /// Photo not uploaded yet
    FileUpload,
    /// Server photo to download
    FileDownload,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum TableChoice {
    Entries,
    Favorites,
}
