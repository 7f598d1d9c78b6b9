use crate::models::{Note, Version};
use crate::storage::{files, NoteRepository, Store};
use crate::validation;
use crate::{Error, Result};
use chrono::{Duration, DurationRound, Utc};
use log::{info, warn};
use std::fs;
use std::io;
use std::path::Path;

pub struct VersionRepository;

impl VersionRepository {
    /// Record `note` as stored on disk. Ids grow strictly per note even when
    /// two snapshots land in the same microsecond.
    pub fn save_version(store: &Store, note: &Note) -> Result<Version> {
        let file_name = note
            .file_name()
            .ok_or_else(|| Error::PathSafety(format!("not a note file: {}", note.path.display())))?;
        validation::validate_filename(file_name)?;

        let now = Utc::now();
        let mut created_at = now.duration_trunc(Duration::microseconds(1)).unwrap_or(now);
        if let Some(latest) = Self::list_for_name(store, file_name)?.first() {
            if created_at <= latest.created_at {
                created_at = latest.created_at + Duration::microseconds(1);
            }
        }

        let version = Version::snapshot(note, created_at);
        let dir = store.versions_dir();
        fs::create_dir_all(&dir)?;
        let path = dir.join(format!("{}_{}.json", file_name, version.id));
        files::write_atomic(&path, &serde_json::to_vec_pretty(&version)?)?;
        Ok(version)
    }

    /// Versions of the note at `note_path`, newest first
    pub fn list(store: &Store, note_path: &Path) -> Result<Vec<Version>> {
        let file_name = note_path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| Error::PathSafety(format!("not a note file: {}", note_path.display())))?;
        Self::list_for_name(store, file_name)
    }

    fn list_for_name(store: &Store, file_name: &str) -> Result<Vec<Version>> {
        let entries = match fs::read_dir(store.versions_dir()) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let prefix = format!("{}_", file_name);
        let mut versions = Vec::new();
        for entry in entries {
            let entry = entry?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            let is_ours = name
                .strip_prefix(&prefix)
                .and_then(|rest| rest.strip_suffix(".json"))
                .is_some_and(|id| !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit()));
            if !is_ours {
                continue;
            }

            let decoded = fs::read(entry.path())
                .map_err(Error::from)
                .and_then(|data| serde_json::from_slice::<Version>(&data).map_err(Error::from));
            match decoded {
                Ok(version) => versions.push(version),
                Err(err) => warn!("Skipping unreadable version {}: {}", name, err),
            }
        }

        versions.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(versions)
    }

    /// Put a version's title and content back into `note` and save it.
    ///
    /// The save snapshots the current state first, so a restore can itself be
    /// undone. `note` is only updated once the save succeeded.
    pub fn restore(store: &Store, note: &mut Note, version_id: &str) -> Result<()> {
        let version = Self::list(store, &note.path)?
            .into_iter()
            .find(|v| v.id == version_id)
            .ok_or_else(|| Error::NotFound(format!("Version not found: {}", version_id)))?;

        let content = if version.encrypted {
            store.key()?.decrypt(&version.content)?
        } else {
            version.content
        };

        let mut restored = note.clone();
        restored.title = version.title;
        restored.content = content;
        restored.touch();
        NoteRepository::save(store, &mut restored)?;

        info!("Restored {} to version {}", restored.path.display(), version_id);
        *note = restored;
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

    fn save_content(store: &Store, note: &mut Note, content: &str) {
        note.content = content.to_string();
        NoteRepository::save(store, note).unwrap();
    }

    #[test]
    fn test_no_versions_yet() {
        let (_dir, store) = setup_store();
        let note = NoteRepository::create(&store, store.root()).unwrap();
        assert!(VersionRepository::list(&store, &note.path).unwrap().is_empty());
    }

    #[test]
    fn test_versions_newest_first() {
        let (_dir, store) = setup_store();
        let mut note = NoteRepository::create(&store, store.root()).unwrap();
        save_content(&store, &mut note, "one");
        save_content(&store, &mut note, "two");
        save_content(&store, &mut note, "three");

        let versions = VersionRepository::list(&store, &note.path).unwrap();
        let contents: Vec<&str> = versions.iter().map(|v| v.content.as_str()).collect();
        assert_eq!(contents, vec!["two", "one", ""]);
        assert!(versions.windows(2).all(|w| w[0].created_at > w[1].created_at));
        assert!(versions.windows(2).all(|w| w[0].id > w[1].id));
    }

    #[test]
    fn test_same_instant_ids_stay_unique() {
        let (_dir, store) = setup_store();
        let note = NoteRepository::create(&store, store.root()).unwrap();

        let a = VersionRepository::save_version(&store, &note).unwrap();
        let b = VersionRepository::save_version(&store, &note).unwrap();
        let c = VersionRepository::save_version(&store, &note).unwrap();

        assert!(a.id < b.id && b.id < c.id);
        assert_eq!(VersionRepository::list(&store, &note.path).unwrap().len(), 3);
    }

    #[test]
    fn test_versions_are_per_note() {
        let (_dir, store) = setup_store();
        let mut first = NoteRepository::create(&store, store.root()).unwrap();
        let second = NoteRepository::create(&store, store.root()).unwrap();
        save_content(&store, &mut first, "changed");

        assert_eq!(VersionRepository::list(&store, &first.path).unwrap().len(), 1);
        assert!(VersionRepository::list(&store, &second.path).unwrap().is_empty());
    }

    #[test]
    fn test_undecodable_version_skipped() {
        let (_dir, store) = setup_store();
        let mut note = NoteRepository::create(&store, store.root()).unwrap();
        save_content(&store, &mut note, "x");

        let junk = store
            .versions_dir()
            .join(format!("{}_{:020}.json", note.file_name().unwrap(), 1));
        fs::write(junk, b"garbage").unwrap();

        assert_eq!(VersionRepository::list(&store, &note.path).unwrap().len(), 1);
    }

    #[test]
    fn test_restore_round_trip() {
        let (_dir, store) = setup_store();
        let mut note = NoteRepository::create(&store, store.root()).unwrap();
        save_content(&store, &mut note, "x");
        save_content(&store, &mut note, "y");

        // versions: "x", "" (newest first)
        let versions = VersionRepository::list(&store, &note.path).unwrap();
        let x = versions.iter().find(|v| v.content == "x").unwrap();

        VersionRepository::restore(&store, &mut note, &x.id).unwrap();
        assert_eq!(note.content, "x");
        assert_eq!(NoteRepository::load(&store, &note.path).unwrap().content, "x");

        let after = VersionRepository::list(&store, &note.path).unwrap();
        assert_eq!(after.len(), versions.len() + 1);
        assert_eq!(after[0].content, "y");
    }

    #[test]
    fn test_restore_unknown_version() {
        let (_dir, store) = setup_store();
        let mut note = NoteRepository::create(&store, store.root()).unwrap();
        let before = note.clone();

        let result = VersionRepository::restore(&store, &mut note, "00000000000000000001");
        assert!(matches!(result, Err(Error::NotFound(_))));
        assert_eq!(note, before);
    }

    #[test]
    fn test_encrypted_versions_keep_ciphertext() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path())
            .unwrap()
            .with_key(EncryptionKey::from_passphrase("alice", "pw"));
        let mut note = NoteRepository::create(&store, store.root()).unwrap();
        note.encrypted = true;
        save_content(&store, &mut note, "secret one");
        save_content(&store, &mut note, "secret two");

        let versions = VersionRepository::list(&store, &note.path).unwrap();
        let sealed = &versions[0];
        assert!(sealed.encrypted);
        assert_ne!(sealed.content, "secret one");

        VersionRepository::restore(&store, &mut note, &sealed.id).unwrap();
        assert_eq!(note.content, "secret one");

        let locked = Store::open(dir.path()).unwrap();
        let sealed_id = VersionRepository::list(&locked, &note.path).unwrap()[0].id.clone();
        assert!(matches!(
            VersionRepository::restore(&locked, &mut note, &sealed_id),
            Err(Error::EncryptionUnavailable)
        ));
    }
}
