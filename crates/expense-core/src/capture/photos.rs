//! Local photo files attached to entries

use std::io::ErrorKind;
use std::path::PathBuf;

use crate::error::Result;

/// Removes the photo files belonging to an entry.
pub trait PhotoStore {
    /// Remove every file for entry `id`. Missing files are not an error.
    fn remove(&self, id: i64) -> Result<()>;
}

/// Photos stored as `<root>/<id>.jpg` with a `<root>/<id>_small.jpg`
/// thumbnail.
#[derive(Debug, Clone)]
pub struct LocalPhotoStore {
    root: PathBuf,
}

impl LocalPhotoStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn photo_path(&self, id: i64) -> PathBuf {
        self.root.join(format!("{id}.jpg"))
    }

    pub fn thumbnail_path(&self, id: i64) -> PathBuf {
        self.root.join(format!("{id}_small.jpg"))
    }

    /// Whether the full-size photo for `id` is on disk
    pub fn has_photo(&self, id: i64) -> bool {
        self.photo_path(id).is_file()
    }
}

impl PhotoStore for LocalPhotoStore {
    fn remove(&self, id: i64) -> Result<()> {
        for path in [self.photo_path(id), self.thumbnail_path(id)] {
            match std::fs::remove_file(&path) {
                Ok(()) => tracing::debug!("Removed {}", path.display()),
                Err(error) if error.kind() == ErrorKind::NotFound => {}
                Err(error) => return Err(error.into()),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_remove_deletes_both_files() {
        let dir = TempDir::new().unwrap();
        let store = LocalPhotoStore::new(dir.path());
        std::fs::write(store.photo_path(7), b"full").unwrap();
        std::fs::write(store.thumbnail_path(7), b"thumb").unwrap();
        std::fs::write(store.photo_path(8), b"other").unwrap();

        assert!(store.has_photo(7));
        store.remove(7).unwrap();

        assert!(!store.photo_path(7).exists());
        assert!(!store.thumbnail_path(7).exists());
        assert!(store.has_photo(8));
    }

    #[test]
    fn test_remove_missing_files_is_ok() {
        let dir = TempDir::new().unwrap();
        let store = LocalPhotoStore::new(dir.path().join("absent"));
        store.remove(1).unwrap();
    }
}
