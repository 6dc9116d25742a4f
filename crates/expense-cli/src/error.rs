use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] expense_core::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Entry not found: {0}")]
    EntryNotFound(i64),
    #[error("Favorite not found for hash: {0}")]
    FavoriteNotFound(String),
    #[error("No record found for hash: {0}")]
    HashNotFound(String),
    #[error("Nothing to change; pass --amount, --tag, or --location")]
    NothingToEdit,
}

impl CliError {
    /// Whether the failure came from the store being unreachable.
    pub const fn is_storage_unavailable(&self) -> bool {
        match self {
            Self::Core(error) => error.is_storage_unavailable(),
            _ => false,
        }
    }

    pub const fn hint(&self) -> Option<&'static str> {
        if self.is_storage_unavailable() {
            Some("check that --db-path points to a writable database not locked by another process")
        } else {
            None
        }
    }
}
