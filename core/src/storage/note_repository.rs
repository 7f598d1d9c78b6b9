use crate::models::{Note, DEFAULT_TITLE};
use crate::storage::{files, Store, VersionRepository};
use crate::validation;
use crate::{Error, Result};
use log::{debug, info, warn};
use std::fs;
use std::io;
use std::path::Path;

pub struct NoteRepository;

impl NoteRepository {
    /// Read a note document as stored, without decrypting its content
    pub fn read_document(path: &Path) -> Result<Note> {
        let data = fs::read(path).map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => Error::NotFound(format!("Note not found: {}", path.display())),
            _ => Error::Io(err),
        })?;
        let mut note: Note = serde_json::from_slice(&data)?;
        note.path = path.to_path_buf();
        Ok(note)
    }

    /// Load a note, decrypting its content with the store's key if needed
    pub fn load(store: &Store, path: &Path) -> Result<Note> {
        let path = store.resolve(path)?;
        let mut note = Self::read_document(&path)?;
        if note.encrypted {
            note.content = store.key()?.decrypt(&note.content)?;
        }
        Ok(note)
    }

    /// Check every field that must hold before a note may be written
    pub fn validate(note: &Note) -> Result<()> {
        validation::validate_title(&note.title)?;
        validation::validate_content(&note.content)?;
        validation::validate_tags(&note.tags)?;
        Ok(())
    }

    /// Persist a note: backup, version snapshot, then an atomic replace.
    ///
    /// Backup and snapshot failures are logged and do not stop the save. On
    /// success `note.updated_at` has advanced and `note.path` is canonical.
    pub fn save(store: &Store, note: &mut Note) -> Result<()> {
        Self::validate(note)?;
        let path = store.resolve(&note.path)?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| Error::PathSafety(format!("not a note file: {}", path.display())))?;
        validation::validate_filename(file_name)?;

        let mut document = note.clone();
        document.path = path.clone();
        document.touch();
        if note.encrypted {
            document.content = store.key()?.encrypt(&note.content)?;
        }
        let data = serde_json::to_vec_pretty(&document)?;

        match files::backup_file(&path) {
            Ok(Some(backup)) => debug!("Backed up {} to {}", path.display(), backup.display()),
            Ok(None) => {}
            Err(err) => warn!("Failed to create backup of {}: {}", path.display(), err),
        }

        if path.exists() {
            match Self::read_document(&path) {
                Ok(previous) => {
                    if let Err(err) = VersionRepository::save_version(store, &previous) {
                        warn!("Failed to save version of {}: {}", path.display(), err);
                    }
                }
                Err(err) => warn!("Could not read previous revision of {}: {}", path.display(), err),
            }
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        files::write_atomic(&path, &data)?;

        note.path = path;
        note.updated_at = document.updated_at;
        info!("Saved note '{}' ({})", note.title, note.path.display());
        Ok(())
    }

    /// Create and persist an empty, untitled note inside `dir`
    pub fn create(store: &Store, dir: &Path) -> Result<Note> {
        let mut note = store.new_note(DEFAULT_TITLE.to_string(), dir)?;
        Self::save(store, &mut note)?;
        Ok(note)
    }

    /// Copy a note next to the original under a new path
    pub fn duplicate(store: &Store, note: &Note) -> Result<Note> {
        let dir = note.path.parent().unwrap_or_else(|| store.root());
        let mut copy = Note::new(format!("{} (Copy)", note.title), store.fresh_note_path(dir)?);
        copy.content = note.content.clone();
        copy.tags = note.tags.clone();
        copy.encrypted = note.encrypted;
        Self::save(store, &mut copy)?;
        Ok(copy)
    }

    /// Delete a note file. Callers refresh their listing afterwards.
    pub fn delete(store: &Store, path: &Path) -> Result<()> {
        let path = store.resolve(path)?;
        if path.is_dir() {
            return Err(Error::Validation("folders cannot be deleted from here".to_string()));
        }
        fs::remove_file(&path).map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => Error::NotFound(format!("Note not found: {}", path.display())),
            _ => Error::Io(err),
        })?;
        info!("Deleted note {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::EncryptionKey;
    use tempfile::{tempdir, TempDir};

    fn setup_store() -> (TempDir, Store) {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();
        (dir, store)
    }

    fn backups_of(note: &Note) -> usize {
        let name = note.file_name().unwrap().to_string();
        fs::read_dir(note.path.parent().unwrap())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| {
                e.file_name()
                    .to_string_lossy()
                    .starts_with(&format!("{}.backup.", name))
            })
            .count()
    }

    #[test]
    fn test_create_note() {
        let (_dir, store) = setup_store();
        let note = NoteRepository::create(&store, store.root()).unwrap();

        assert_eq!(note.title, DEFAULT_TITLE);
        assert!(note.path.exists());
        let loaded = NoteRepository::load(&store, &note.path).unwrap();
        assert_eq!(loaded, note);
    }

    #[test]
    fn test_round_trip() {
        let (_dir, store) = setup_store();
        let mut note = Note::new("Groceries".to_string(), store.fresh_note_path(store.root()).unwrap());
        note.content = "milk\neggs\n".to_string();
        note.tags = vec!["home".to_string(), "weekly shop".to_string()];
        let before = note.updated_at;

        NoteRepository::save(&store, &mut note).unwrap();
        assert!(note.updated_at >= before);

        let loaded = NoteRepository::load(&store, &note.path).unwrap();
        assert_eq!(loaded.title, note.title);
        assert_eq!(loaded.content, note.content);
        assert_eq!(loaded.tags, note.tags);
        assert_eq!(loaded.created_at, note.created_at);
        assert_eq!(loaded.updated_at, note.updated_at);
        assert_eq!(loaded.encrypted, note.encrypted);
    }

    #[test]
    fn test_encrypted_round_trip() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path())
            .unwrap()
            .with_key(EncryptionKey::from_passphrase("alice", "pw"));
        let mut note = Note::new("Diary".to_string(), store.fresh_note_path(store.root()).unwrap());
        note.content = "dear diary, ünïcode".to_string();
        note.encrypted = true;

        NoteRepository::save(&store, &mut note).unwrap();

        let raw = NoteRepository::read_document(&note.path).unwrap();
        assert_ne!(raw.content, note.content);
        assert!(raw.encrypted);

        let loaded = NoteRepository::load(&store, &note.path).unwrap();
        assert_eq!(loaded.content, "dear diary, ünïcode");
        assert!(loaded.encrypted);
    }

    #[test]
    fn test_keyed_session_creates_encrypted_notes() {
        let (_dir, store) = setup_store();
        assert!(!NoteRepository::create(&store, store.root()).unwrap().encrypted);

        let keyed = store.with_key(EncryptionKey::from_bytes([9; 32]));
        let note = NoteRepository::create(&keyed, keyed.root()).unwrap();
        assert!(note.encrypted);
        assert!(NoteRepository::read_document(&note.path).unwrap().encrypted);
    }

    #[test]
    fn test_encrypted_without_key() {
        let (_dir, store) = setup_store();
        let mut note = Note::new("Secret".to_string(), store.fresh_note_path(store.root()).unwrap());
        note.encrypted = true;

        assert!(matches!(
            NoteRepository::save(&store, &mut note),
            Err(Error::EncryptionUnavailable)
        ));
        assert!(!note.path.exists());

        let keyed = store.clone().with_key(EncryptionKey::from_bytes([5; 32]));
        NoteRepository::save(&keyed, &mut note).unwrap();
        assert!(matches!(
            NoteRepository::load(&store, &note.path),
            Err(Error::EncryptionUnavailable)
        ));
    }

    #[test]
    fn test_invalid_note_is_never_written() {
        let (_dir, store) = setup_store();
        let mut note = Note::new("bad/title".to_string(), store.fresh_note_path(store.root()).unwrap());

        assert!(matches!(NoteRepository::save(&store, &mut note), Err(Error::Validation(_))));
        assert!(!note.path.exists());

        note.title = "ok".to_string();
        note.tags = vec!["no!".to_string()];
        assert!(NoteRepository::save(&store, &mut note).is_err());
        assert!(!note.path.exists());
    }

    #[test]
    fn test_save_outside_workspace_refused() {
        let (dir, store) = setup_store();
        let mut note = Note::new("Escape".to_string(), dir.path().join("..").join("escape.json"));
        assert!(matches!(NoteRepository::save(&store, &mut note), Err(Error::PathSafety(_))));
    }

    #[test]
    fn test_overwrite_takes_backup_and_version() {
        let (_dir, store) = setup_store();
        let mut note = NoteRepository::create(&store, store.root()).unwrap();
        assert_eq!(backups_of(&note), 0);

        note.content = "second".to_string();
        NoteRepository::save(&store, &mut note).unwrap();

        assert_eq!(backups_of(&note), 1);
        let versions = VersionRepository::list(&store, &note.path).unwrap();
        assert_eq!(versions.len(), 1);
        assert_eq!(versions[0].content, "");
    }

    #[test]
    fn test_corrupt_file_is_decode_error() {
        let (_dir, store) = setup_store();
        let path = store.root().join("broken.json");
        fs::write(&path, b"{ not json").unwrap();
        assert!(matches!(NoteRepository::load(&store, &path), Err(Error::Decode(_))));
    }

    #[test]
    fn test_load_missing_is_not_found() {
        let (_dir, store) = setup_store();
        let path = store.root().join("missing.json");
        assert!(matches!(NoteRepository::load(&store, &path), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_delete_note() {
        let (_dir, store) = setup_store();
        let note = NoteRepository::create(&store, store.root()).unwrap();

        NoteRepository::delete(&store, &note.path).unwrap();
        assert!(!note.path.exists());
        assert!(matches!(
            NoteRepository::delete(&store, &note.path),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_duplicate_note() {
        let (_dir, store) = setup_store();
        let mut note = NoteRepository::create(&store, store.root()).unwrap();
        note.title = "Plan".to_string();
        note.content = "body".to_string();
        note.tags = vec!["work".to_string()];
        NoteRepository::save(&store, &mut note).unwrap();

        let copy = NoteRepository::duplicate(&store, &note).unwrap();
        assert_eq!(copy.title, "Plan (Copy)");
        assert_eq!(copy.content, "body");
        assert_eq!(copy.tags, note.tags);
        assert_ne!(copy.path, note.path);
        assert!(copy.path.exists());
    }

    #[test]
    fn test_last_writer_wins() {
        let (_dir, store) = setup_store();
        let note = NoteRepository::create(&store, store.root()).unwrap();

        // Two sessions open the same note and save in turn; nothing merges.
        let mut first = NoteRepository::load(&store, &note.path).unwrap();
        let mut second = NoteRepository::load(&store, &note.path).unwrap();
        first.content = "from first".to_string();
        second.content = "from second".to_string();
        NoteRepository::save(&store, &mut first).unwrap();
        NoteRepository::save(&store, &mut second).unwrap();

        let current = NoteRepository::load(&store, &note.path).unwrap();
        assert_eq!(current.content, "from second");
        let versions = VersionRepository::list(&store, &note.path).unwrap();
        assert_eq!(versions[0].content, "from first");
    }
}
