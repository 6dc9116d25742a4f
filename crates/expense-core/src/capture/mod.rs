//! Binding between the capture screen and a stored entry.
//!
//! Camera, voice, and text capture all create an entry first and then let
//! the user fill in amount, description, and date. Leaving the screen
//! writes whatever the form holds back to that entry.

mod date;
mod photos;

pub use date::{format_display_date, DateParser, DisplayDateParser, DISPLAY_DATE_FORMAT};
pub use photos::{LocalPhotoStore, PhotoStore};

use crate::db::{RecordPatch, RecordRepository, SqliteEntryRepository};
use crate::error::Result;
use crate::models::Amount;
use crate::util::normalize_text;

/// What the capture screen holds for one entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureForm {
    /// Entry being edited
    pub id: i64,
    pub amount_text: String,
    pub tag_text: String,
    /// Current date bar label
    pub date_display: String,
    /// Date bar label when the screen opened
    pub rendered_date: String,
    /// Stored entry time; supplies the time of day when the date changes
    pub reference_millis: i64,
}

impl CaptureForm {
    /// Edit the fields of the form into a patch.
    ///
    /// The timestamp is only touched when the date label changed. An amount
    /// or date label that fails to parse is logged and the stored value
    /// kept; the remaining fields are still written.
    pub fn to_patch(&self, parser: &impl DateParser) -> RecordPatch {
        let tag = normalize_text(&self.tag_text);
        let mut patch = RecordPatch::new().tag(tag.as_deref());

        match Amount::parse_input(&self.amount_text) {
            Ok(amount) => patch = patch.amount(amount),
            Err(error) => tracing::warn!(id = self.id, "Keeping entry amount: {error}"),
        }

        if self.date_display != self.rendered_date {
            match parser.parse(&self.date_display, self.reference_millis) {
                Ok(time_in_millis) => patch = patch.time_in_millis(time_in_millis),
                Err(error) => tracing::warn!(
                    id = self.id,
                    "Keeping entry time, date '{}' not understood: {error}",
                    self.date_display
                ),
            }
        }

        patch
    }
}

/// Write the form back to its entry
pub fn save(
    repo: &SqliteEntryRepository<'_>,
    form: &CaptureForm,
    parser: &impl DateParser,
) -> Result<bool> {
    repo.edit_by_id(form.id, &form.to_patch(parser))
}

/// Leaving the screen without saving keeps the edits too
pub fn cancel(
    repo: &SqliteEntryRepository<'_>,
    form: &CaptureForm,
    parser: &impl DateParser,
) -> Result<bool> {
    save(repo, form, parser)
}

/// Remove the entry's photos, then soft-delete it.
///
/// Photo removal failures are logged; the entry is deleted regardless.
pub fn delete(
    repo: &SqliteEntryRepository<'_>,
    photos: &impl PhotoStore,
    id: i64,
) -> Result<bool> {
    if let Err(error) = photos.remove(id) {
        tracing::warn!(id, "Failed to remove entry photos: {error}");
    }
    repo.soft_delete_by_id(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{Database, SortOrder};
    use crate::error::Error;
    use crate::models::{NewEntry, RecordType, SyncBit, SyncEnvelope};
    use pretty_assertions::assert_eq;
    use std::cell::Cell;
    use tempfile::TempDir;

    const CREATED_AT: i64 = 1_330_597_815_250;

    fn camera_entry(repo: &SqliteEntryRepository<'_>) -> i64 {
        repo.insert(
            &NewEntry::new(RecordType::new('C').unwrap(), CREATED_AT).with_sync(SyncEnvelope {
                sync_bit: SyncBit::Synced,
                updated_at: Some("2012-03-01T10:31:00Z".to_string()),
                ..SyncEnvelope::default()
            }),
        )
        .unwrap()
    }

    fn form(id: i64) -> CaptureForm {
        CaptureForm {
            id,
            amount_text: "12.345".to_string(),
            tag_text: "  lunch ".to_string(),
            date_display: "March 01, 2012".to_string(),
            rendered_date: "March 01, 2012".to_string(),
            reference_millis: CREATED_AT,
        }
    }

    /// Parser that must not be consulted
    struct NoParse;

    impl DateParser for NoParse {
        fn parse(&self, display: &str, _reference_millis: i64) -> Result<i64> {
            panic!("unexpected parse of {display}");
        }
    }

    #[test]
    fn test_save_skips_unchanged_date() {
        let db = Database::open_in_memory().unwrap();
        let repo = SqliteEntryRepository::new(&db);
        let id = camera_entry(&repo);

        assert!(save(&repo, &form(id), &NoParse).unwrap());

        let entry = repo.get(id).unwrap().unwrap();
        assert_eq!(entry.amount.map(|a| a.to_string()).as_deref(), Some("12.35"));
        assert_eq!(entry.tag.as_deref(), Some("lunch"));
        assert_eq!(entry.time_in_millis, CREATED_AT);
        assert_eq!(entry.sync.sync_bit, SyncBit::NotSynced);
    }

    #[test]
    fn test_save_reparses_changed_date() {
        let db = Database::open_in_memory().unwrap();
        let repo = SqliteEntryRepository::new(&db);
        let id = camera_entry(&repo);

        let mut form = form(id);
        form.date_display = "March 02, 2012".to_string();
        save(&repo, &form, &DisplayDateParser).unwrap();

        let entry = repo.get(id).unwrap().unwrap();
        assert_eq!(entry.time_in_millis, CREATED_AT + 24 * 60 * 60 * 1000);
    }

    #[test]
    fn test_unparseable_date_keeps_time() {
        let db = Database::open_in_memory().unwrap();
        let repo = SqliteEntryRepository::new(&db);
        let id = camera_entry(&repo);

        let mut form = form(id);
        form.date_display = "someday".to_string();
        assert!(save(&repo, &form, &DisplayDateParser).unwrap());

        let entry = repo.get(id).unwrap().unwrap();
        assert_eq!(entry.time_in_millis, CREATED_AT);
        assert_eq!(entry.tag.as_deref(), Some("lunch"));
    }

    #[test]
    fn test_placeholders_clear_fields() {
        let db = Database::open_in_memory().unwrap();
        let repo = SqliteEntryRepository::new(&db);
        let id = camera_entry(&repo);
        save(&repo, &form(id), &NoParse).unwrap();

        let mut form = form(id);
        form.amount_text = "?".to_string();
        form.tag_text = "   ".to_string();
        cancel(&repo, &form, &NoParse).unwrap();

        let entry = repo.get(id).unwrap().unwrap();
        assert_eq!(entry.amount, None);
        assert_eq!(entry.tag, None);
    }

    #[test]
    fn test_bad_amount_keeps_amount_and_commits_the_rest() {
        let db = Database::open_in_memory().unwrap();
        let repo = SqliteEntryRepository::new(&db);
        let id = camera_entry(&repo);
        repo.edit_by_id(
            id,
            &RecordPatch::new()
                .tag(Some("old"))
                .amount(Some("4.20".parse().unwrap())),
        )
        .unwrap();

        let mut form = form(id);
        form.amount_text = "12,50".to_string();
        form.tag_text = "new tag".to_string();
        form.date_display = "March 02, 2012".to_string();
        assert!(cancel(&repo, &form, &DisplayDateParser).unwrap());

        let entry = repo.get(id).unwrap().unwrap();
        assert_eq!(entry.tag.as_deref(), Some("new tag"));
        assert_eq!(entry.amount.map(|a| a.to_string()).as_deref(), Some("4.20"));
        assert_eq!(entry.time_in_millis, CREATED_AT + 24 * 60 * 60 * 1000);
    }

    #[test]
    fn test_save_on_closed_database_fails() {
        let mut db = Database::open_in_memory().unwrap();
        let id = camera_entry(&SqliteEntryRepository::new(&db));
        db.close().unwrap();

        let repo = SqliteEntryRepository::new(&db);
        let error = save(&repo, &form(id), &NoParse).unwrap_err();
        assert!(error.is_storage_unavailable());
    }

    /// Records whether the entry was still live when its photos went away
    struct Witness<'a> {
        repo: &'a SqliteEntryRepository<'a>,
        live_at_removal: Cell<Option<bool>>,
    }

    impl PhotoStore for Witness<'_> {
        fn remove(&self, id: i64) -> Result<()> {
            let entry = self.repo.get(id)?;
            self.live_at_removal
                .set(entry.map(|entry| entry.sync.is_live()));
            Ok(())
        }
    }

    struct Broken;

    impl PhotoStore for Broken {
        fn remove(&self, _id: i64) -> Result<()> {
            Err(Error::Io(std::io::Error::other("disk gone")))
        }
    }

    #[test]
    fn test_delete_removes_photos_first() {
        let db = Database::open_in_memory().unwrap();
        let repo = SqliteEntryRepository::new(&db);
        let id = camera_entry(&repo);

        let witness = Witness {
            repo: &repo,
            live_at_removal: Cell::new(None),
        };
        assert!(delete(&repo, &witness, id).unwrap());

        assert_eq!(witness.live_at_removal.get(), Some(true));
        assert!(repo.get(id).unwrap().unwrap().sync.deleted);
    }

    #[test]
    fn test_delete_with_local_photos() {
        let dir = TempDir::new().unwrap();
        let db = Database::open_in_memory().unwrap();
        let repo = SqliteEntryRepository::new(&db);
        let id = camera_entry(&repo);

        let photos = LocalPhotoStore::new(dir.path());
        std::fs::write(photos.photo_path(id), b"jpeg").unwrap();
        std::fs::write(photos.thumbnail_path(id), b"jpeg").unwrap();

        delete(&repo, &photos, id).unwrap();

        assert!(!photos.has_photo(id));
        assert!(!photos.thumbnail_path(id).exists());
        assert!(repo.list(SortOrder::Descending).unwrap().is_empty());
    }

    #[test]
    fn test_delete_survives_photo_failure() {
        let db = Database::open_in_memory().unwrap();
        let repo = SqliteEntryRepository::new(&db);
        let id = camera_entry(&repo);

        assert!(delete(&repo, &Broken, id).unwrap());
        assert_eq!(repo.list_deleted().unwrap().len(), 1);
    }
}
