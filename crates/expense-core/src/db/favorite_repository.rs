//! Favorites table

use rusqlite::{params, Row};

use super::patch::RecordPatch;
use super::repository::{RecordStore, Table};
use super::schema::{Column, ENTRY_TABLE, FAVORITE_TABLE, LIVE, SHARED_COLUMNS};
use super::sql_types::{read_amount, read_envelope, read_text};
use crate::error::Result;
use crate::models::{Favorite, NewFavorite, SyncBit};

/// Marker for the favorites table
pub struct Favorites;

/// `SQLite` repository for favorites
pub type SqliteFavoriteRepository<'a> = RecordStore<'a, Favorites>;

impl Table for Favorites {
    type Record = Favorite;
    type New = NewFavorite;

    const NAME: &'static str = FAVORITE_TABLE;
    const COLUMNS: &'static [Column] = SHARED_COLUMNS;

    fn has_column(column: Column) -> bool {
        !column.is_entry_only()
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Favorite> {
        Ok(Favorite {
            id: row.get(Column::Id.name())?,
            record_type: row.get(Column::Type.name())?,
            amount: read_amount(row, Column::Amount)?,
            tag: read_text(row, Column::Tag)?,
            location: read_text(row, Column::Location)?,
            sync: read_envelope(row)?,
        })
    }

    fn insert_patch(new: &NewFavorite) -> RecordPatch {
        RecordPatch::from(new)
    }
}

impl SqliteFavoriteRepository<'_> {
    /// All live favorites in insertion order
    pub fn list(&self) -> Result<Vec<Favorite>> {
        self.select(LIVE, "_id", &[])
    }

    /// Soft-delete a favorite and unlink the entries created from it, in one
    /// transaction. Returns whether the favorite existed.
    pub fn delete_with_entry_links(&self, hash: &str) -> Result<bool> {
        let conn = self.database().connection()?;
        let tx = conn.unchecked_transaction()?;

        let deleted = tx.execute(
            &format!("UPDATE {FAVORITE_TABLE} SET deleted = 1, sync_bit = ? WHERE my_hash = ?"),
            params![SyncBit::NotSynced, hash],
        )?;
        let unlinked = if hash.is_empty() {
            0
        } else {
            tx.execute(
                &format!("UPDATE {ENTRY_TABLE} SET favorite = NULL, sync_bit = ? WHERE favorite = ?"),
                params![SyncBit::NotSynced, hash],
            )?
        };

        tx.commit()?;
        tracing::info!(hash, unlinked, "Deleted favorite");
        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::entry_repository::{SortOrder, SqliteEntryRepository};
    use crate::db::repository::RecordRepository;
    use crate::db::Database;
    use crate::models::{Amount, NewEntry, RecordType, SyncEnvelope};
    use crate::Error;
    use pretty_assertions::assert_eq;

    fn income() -> RecordType {
        RecordType::new('I').unwrap()
    }

    #[test]
    fn test_insert_get_and_list() {
        let db = Database::open_in_memory().unwrap();
        let repo = SqliteFavoriteRepository::new(&db);

        let salary: Amount = "2500".parse().unwrap();
        let id = repo
            .insert(
                &NewFavorite::new(income())
                    .with_amount(salary)
                    .with_tag("salary")
                    .with_location("Office"),
            )
            .unwrap();
        let other = repo.insert(&NewFavorite::new(income())).unwrap();

        let favorite = repo.get(id).unwrap().unwrap();
        assert_eq!(favorite.tag.as_deref(), Some("salary"));
        assert_eq!(favorite.location.as_deref(), Some("Office"));
        assert_eq!(favorite.amount, Some(salary));
        assert_eq!(favorite.record_type, income());

        let hash = favorite.sync.my_hash.clone().unwrap();
        assert_eq!(repo.get_by_hash(&hash).unwrap(), Some(favorite));

        repo.soft_delete_by_id(other).unwrap();
        let listed = repo.list().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, id);
    }

    #[test]
    fn test_entry_only_column_is_rejected() {
        let db = Database::open_in_memory().unwrap();
        let repo = SqliteFavoriteRepository::new(&db);

        let id = repo.insert(&NewFavorite::new(income())).unwrap();
        let error = repo
            .edit_by_id(id, &RecordPatch::new().time_in_millis(5))
            .unwrap_err();
        assert!(matches!(error, Error::InvalidInput(_)));

        let error = repo
            .edit_by_id(id, &RecordPatch::new().favorite(Some("x")))
            .unwrap_err();
        assert!(matches!(error, Error::InvalidInput(_)));
    }

    #[test]
    fn test_edit_resets_sync_bit() {
        let db = Database::open_in_memory().unwrap();
        let repo = SqliteFavoriteRepository::new(&db);

        let id = repo
            .insert(&NewFavorite::new(income()).with_sync(SyncEnvelope {
                sync_bit: SyncBit::Synced,
                updated_at: Some("2012-01-01".to_string()),
                ..SyncEnvelope::default()
            }))
            .unwrap();
        repo.edit_by_id(id, &RecordPatch::new().tag(Some("bonus")))
            .unwrap();

        let favorite = repo.get(id).unwrap().unwrap();
        assert_eq!(favorite.sync.sync_bit, SyncBit::NotSynced);
        assert_eq!(repo.list_modified_since_sync().unwrap().len(), 1);
    }

    #[test]
    fn test_delete_with_entry_links() {
        let db = Database::open_in_memory().unwrap();
        let favorites = SqliteFavoriteRepository::new(&db);
        let entries = SqliteEntryRepository::new(&db);

        let fav_id = favorites
            .insert(&NewFavorite::new(income()).with_tag("salary"))
            .unwrap();
        let favorite = favorites.get(fav_id).unwrap().unwrap();
        let hash = favorite.sync.my_hash.clone().unwrap();

        let entry_id = entries
            .insert(&NewEntry::from_favorite(&favorite, 1000))
            .unwrap();
        assert_eq!(entries.favorite_link(entry_id).unwrap().as_deref(), Some(hash.as_str()));

        assert!(favorites.delete_with_entry_links(&hash).unwrap());

        assert!(favorites.list().unwrap().is_empty());
        assert!(favorites.get(fav_id).unwrap().unwrap().sync.deleted);
        let entry = entries.get(entry_id).unwrap().unwrap();
        assert_eq!(entry.favorite, None);
        assert_eq!(entry.tag.as_deref(), Some("salary"));
        assert_eq!(entries.list(SortOrder::Descending).unwrap().len(), 1);

        assert!(!favorites.delete_with_entry_links("missing").unwrap());
    }

    #[test]
    fn test_soft_deleted_favorite_leaves_sync_queries() {
        let db = Database::open_in_memory().unwrap();
        let repo = SqliteFavoriteRepository::new(&db);

        fn pending(repo: &SqliteFavoriteRepository<'_>) -> [usize; 4] {
            [
                repo.list_never_synced().unwrap().len(),
                repo.list_file_not_uploaded().unwrap().len(),
                repo.list_file_to_download().unwrap().len(),
                repo.list_modified_since_sync().unwrap().len(),
            ]
        }

        let fresh = repo
            .insert(&NewFavorite::new(income()).with_sync(SyncEnvelope {
                file_to_download: true,
                ..SyncEnvelope::default()
            }))
            .unwrap();
        let synced = repo
            .insert(&NewFavorite::new(income()).with_sync(SyncEnvelope {
                my_hash: Some("synced".to_string()),
                updated_at: Some("2012-01-01".to_string()),
                sync_bit: SyncBit::Synced,
                ..SyncEnvelope::default()
            }))
            .unwrap();
        repo.edit_by_id(synced, &RecordPatch::new().tag(Some("changed")))
            .unwrap();
        assert_eq!(pending(&repo), [1, 2, 1, 1]);

        assert!(repo.soft_delete_by_id(fresh).unwrap());
        assert!(repo.soft_delete_by_hash("synced").unwrap());

        assert_eq!(pending(&repo), [0, 0, 0, 0]);
        assert_eq!(repo.list_deleted().unwrap().len(), 2);
        assert_eq!(
            repo.get(synced).unwrap().unwrap().sync.sync_bit,
            SyncBit::NotSynced
        );
    }

    #[test]
    fn test_tables_are_independent() {
        let db = Database::open_in_memory().unwrap();
        let favorites = SqliteFavoriteRepository::new(&db);
        let entries = SqliteEntryRepository::new(&db);

        let shared = SyncEnvelope {
            my_hash: Some("same".to_string()),
            ..SyncEnvelope::default()
        };
        favorites
            .insert(&NewFavorite::new(income()).with_sync(shared.clone()))
            .unwrap();
        entries
            .insert(&NewEntry::new(income(), 1).with_sync(shared))
            .unwrap();

        assert!(favorites.exists_by_hash("same").unwrap());
        assert!(entries.exists_by_hash("same").unwrap());
    }
}
