//! Listing, ordering, filtering and full-text search over a workspace.

use crate::models::{system_time_to_datetime, NoteItem};
use crate::storage::{is_hidden_name, is_note_file, NoteRepository, Store};
use crate::Result;
use chrono::{DateTime, Utc};
use log::{debug, warn};
use std::cmp::Ordering;
use std::fs;
use std::path::Path;
use walkdir::{DirEntry, WalkDir};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    #[default]
    Modified,
    CreatedNewest,
    CreatedOldest,
    TitleAsc,
    TitleDesc,
}

impl SortMode {
    pub fn next(self) -> Self {
        match self {
            SortMode::Modified => SortMode::CreatedNewest,
            SortMode::CreatedNewest => SortMode::CreatedOldest,
            SortMode::CreatedOldest => SortMode::TitleAsc,
            SortMode::TitleAsc => SortMode::TitleDesc,
            SortMode::TitleDesc => SortMode::Modified,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortMode::Modified => "Modified",
            SortMode::CreatedNewest => "Created (newest)",
            SortMode::CreatedOldest => "Created (oldest)",
            SortMode::TitleAsc => "Title (A-Z)",
            SortMode::TitleDesc => "Title (Z-A)",
        }
    }
}

/// List the folders and notes directly inside `dir`.
///
/// Hidden entries are never listed and files that do not decode as notes are
/// skipped, as are entries that cannot be read. Only an unreadable `dir`
/// fails the listing. Entries come back in file-name order; callers apply
/// [`sort`].
pub fn enumerate(dir: &Path) -> Result<Vec<NoteItem>> {
    let mut entries: Vec<_> = fs::read_dir(dir)?
        .filter_map(|entry| {
            entry
                .map_err(|err| debug!("Skipping entry in {}: {}", dir.display(), err))
                .ok()
        })
        .collect();
    entries.sort_by_key(|e| e.file_name());

    let mut items = Vec::new();
    for entry in entries {
        let name = entry.file_name().to_string_lossy().into_owned();
        if is_hidden_name(&name) {
            continue;
        }
        let path = entry.path();
        let file_type = match entry.file_type() {
            Ok(file_type) => file_type,
            Err(err) => {
                debug!("Skipping {}: {}", path.display(), err);
                continue;
            }
        };
        if file_type.is_dir() {
            items.push(NoteItem::folder(name, path));
        } else if is_note_file(&path) {
            match NoteRepository::read_document(&path) {
                Ok(note) => items.push(NoteItem::from(&note)),
                Err(err) => debug!("Skipping {}: {}", path.display(), err),
            }
        }
    }
    Ok(items)
}

/// Order `items` in place. Stable for equal keys.
pub fn sort(items: &mut Vec<NoteItem>, mode: SortMode) {
    match mode {
        SortMode::TitleAsc => items.sort_by_cached_key(|i| i.title.to_lowercase()),
        SortMode::TitleDesc => {
            items.sort_by(|a, b| b.title.to_lowercase().cmp(&a.title.to_lowercase()))
        }
        SortMode::Modified | SortMode::CreatedNewest | SortMode::CreatedOldest => {
            let mut keyed: Vec<(Option<DateTime<Utc>>, NoteItem)> =
                items.drain(..).map(|item| (date_key(&item, mode), item)).collect();
            keyed.sort_by(|(a, _), (b, _)| match (a, b) {
                (Some(a), Some(b)) if mode == SortMode::CreatedOldest => a.cmp(b),
                (Some(a), Some(b)) => b.cmp(a),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            });
            items.extend(keyed.into_iter().map(|(_, item)| item));
        }
    }
}

fn date_key(item: &NoteItem, mode: SortMode) -> Option<DateTime<Utc>> {
    if item.is_folder {
        return fs::metadata(&item.path)
            .and_then(|m| m.modified())
            .map(system_time_to_datetime)
            .ok();
    }
    let note = NoteRepository::read_document(&item.path).ok()?;
    match mode {
        SortMode::Modified => Some(note.updated_at),
        _ => Some(note.created_at),
    }
}

/// Notes carrying `tag` (case-insensitive). An empty tag filters nothing.
pub fn filter_by_tag(items: &[NoteItem], tag: &str) -> Vec<NoteItem> {
    let tag = tag.trim();
    if tag.is_empty() {
        return items.to_vec();
    }
    items
        .iter()
        .filter(|i| !i.is_folder && i.has_tag(tag))
        .cloned()
        .collect()
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(is_hidden_name)
        .unwrap_or(false)
}

/// Case-insensitive substring search over every note in the workspace.
///
/// Matches title, content and the space-joined tags. Encrypted notes that
/// cannot be opened with the store's key are matched on title and tags.
pub fn search(store: &Store, query: &str) -> Result<Vec<NoteItem>> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Ok(Vec::new());
    }

    let walker = WalkDir::new(store.root())
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e));

    let mut results = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!("Search skipped an entry: {}", err);
                continue;
            }
        };
        if !entry.file_type().is_file() || !is_note_file(entry.path()) {
            continue;
        }
        let Ok(note) = NoteRepository::read_document(entry.path()) else {
            continue;
        };

        let content = if note.encrypted {
            store.key().and_then(|key| key.decrypt(&note.content)).ok()
        } else {
            Some(note.content.clone())
        };

        let matched = note.title.to_lowercase().contains(&needle)
            || note.tags.join(" ").to_lowercase().contains(&needle)
            || content.is_some_and(|c| c.to_lowercase().contains(&needle));
        if matched {
            results.push(NoteItem::from(&note));
        }
    }

    debug!("Search for '{}' matched {} notes", query, results.len());
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::EncryptionKey;
    use crate::models::Note;
    use chrono::TimeZone;
    use std::path::PathBuf;
    use tempfile::{tempdir, TempDir};

    fn setup_store() -> (TempDir, Store) {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();
        (dir, store)
    }

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, d, 12, 0, 0).unwrap()
    }

    /// Write a note document directly so timestamps are under test control
    fn write_note(dir: &Path, file: &str, title: &str, created: u32, updated: u32, tags: &[&str]) -> PathBuf {
        let path = dir.join(file);
        let mut note = Note::new(title.to_string(), path.clone());
        note.created_at = day(created);
        note.updated_at = day(updated);
        note.tags = tags.iter().map(|t| t.to_string()).collect();
        fs::write(&path, serde_json::to_vec_pretty(&note).unwrap()).unwrap();
        path
    }

    fn titles(items: &[NoteItem]) -> Vec<&str> {
        items.iter().map(|i| i.title.as_str()).collect()
    }

    fn sample(store: &Store) -> Vec<NoteItem> {
        let root = store.root();
        write_note(root, "a.json", "banana", 1, 5, &["fruit"]);
        write_note(root, "b.json", "Apple", 3, 4, &["fruit", "red"]);
        write_note(root, "c.json", "cherry", 2, 6, &["Red"]);
        enumerate(root).unwrap()
    }

    #[test]
    fn test_sort_mode_cycle() {
        let mut mode = SortMode::default();
        let mut seen = vec![mode];
        for _ in 0..4 {
            mode = mode.next();
            seen.push(mode);
        }
        assert_eq!(
            seen,
            vec![
                SortMode::Modified,
                SortMode::CreatedNewest,
                SortMode::CreatedOldest,
                SortMode::TitleAsc,
                SortMode::TitleDesc
            ]
        );
        assert_eq!(mode.next(), SortMode::Modified);
    }

    #[test]
    fn test_enumerate_skips_hidden_and_broken() {
        let (_dir, store) = setup_store();
        let root = store.root();
        write_note(root, "n.json", "Note", 1, 1, &[]);
        fs::create_dir(root.join("projects")).unwrap();
        fs::create_dir(root.join(".versions")).unwrap();
        fs::write(root.join("broken.json"), b"{").unwrap();
        fs::write(root.join("readme.txt"), b"hi").unwrap();
        fs::write(root.join(".hidden.json"), b"{}").unwrap();

        let items = enumerate(root).unwrap();
        assert_eq!(items.len(), 2);
        assert!(items.iter().any(|i| i.is_folder && i.title == "projects"));
        assert!(items.iter().any(|i| !i.is_folder && i.title == "Note"));
    }

    #[test]
    fn test_enumerate_does_not_recurse() {
        let (_dir, store) = setup_store();
        let sub = store.root().join("sub");
        fs::create_dir(&sub).unwrap();
        write_note(&sub, "deep.json", "Deep", 1, 1, &[]);

        let items = enumerate(store.root()).unwrap();
        assert_eq!(titles(&items), vec!["sub"]);
        assert_eq!(titles(&enumerate(&sub).unwrap()), vec!["Deep"]);
    }

    #[test]
    fn test_sort_by_dates() {
        let (_dir, store) = setup_store();
        let mut items = sample(&store);

        sort(&mut items, SortMode::Modified);
        assert_eq!(titles(&items), vec!["cherry", "banana", "Apple"]);

        sort(&mut items, SortMode::CreatedNewest);
        assert_eq!(titles(&items), vec!["Apple", "cherry", "banana"]);

        sort(&mut items, SortMode::CreatedOldest);
        assert_eq!(titles(&items), vec!["banana", "cherry", "Apple"]);
    }

    #[test]
    fn test_unreadable_sorts_last() {
        let (_dir, store) = setup_store();
        let mut items = sample(&store);
        items.insert(
            0,
            NoteItem {
                title: "gone".to_string(),
                path: store.root().join("gone.json"),
                tags: Vec::new(),
                is_folder: false,
            },
        );

        sort(&mut items, SortMode::CreatedOldest);
        assert_eq!(items.last().unwrap().title, "gone");
        sort(&mut items, SortMode::Modified);
        assert_eq!(items.last().unwrap().title, "gone");
    }

    #[test]
    fn test_title_sort_reverses() {
        let (_dir, store) = setup_store();
        let mut asc = sample(&store);
        let mut desc = asc.clone();

        sort(&mut asc, SortMode::TitleAsc);
        sort(&mut desc, SortMode::TitleDesc);
        assert_eq!(titles(&asc), vec!["Apple", "banana", "cherry"]);

        let mut reversed = asc.clone();
        reversed.reverse();
        assert_eq!(desc, reversed);
    }

    #[test]
    fn test_title_sort_is_stable() {
        let items = vec![
            NoteItem::folder("same".to_string(), PathBuf::from("/w/1")),
            NoteItem::folder("SAME".to_string(), PathBuf::from("/w/2")),
            NoteItem::folder("Same".to_string(), PathBuf::from("/w/3")),
        ];
        let mut sorted = items.clone();
        sort(&mut sorted, SortMode::TitleAsc);
        assert_eq!(sorted, items);
        sort(&mut sorted, SortMode::TitleDesc);
        assert_eq!(sorted, items);
    }

    #[test]
    fn test_filter_by_tag() {
        let (_dir, store) = setup_store();
        let mut items = sample(&store);
        items.push(NoteItem::folder("folder".to_string(), store.root().join("folder")));

        let red = filter_by_tag(&items, "RED");
        assert_eq!(red.len(), 2);
        assert!(red.iter().all(|i| i.has_tag("red")));

        assert_eq!(filter_by_tag(&red, "red"), red);
        assert_eq!(filter_by_tag(&items, ""), items);
        assert!(filter_by_tag(&items, "missing").is_empty());
    }

    #[test]
    fn test_search_scenario() {
        let (_dir, store) = setup_store();
        let mut groceries = NoteRepository::create(&store, store.root()).unwrap();
        groceries.title = "Groceries".to_string();
        groceries.content = "milk\neggs".to_string();
        NoteRepository::save(&store, &mut groceries).unwrap();

        let sub = store.root().join("finance");
        fs::create_dir(&sub).unwrap();
        let mut taxes = NoteRepository::create(&store, &sub).unwrap();
        taxes.title = "Taxes".to_string();
        taxes.tags = vec!["money".to_string()];
        NoteRepository::save(&store, &mut taxes).unwrap();

        assert_eq!(titles(&search(&store, "MILK").unwrap()), vec!["Groceries"]);
        assert_eq!(titles(&search(&store, "tax").unwrap()), vec!["Taxes"]);
        assert_eq!(titles(&search(&store, "money").unwrap()), vec!["Taxes"]);
        assert!(search(&store, "").unwrap().is_empty());
        assert!(search(&store, "   ").unwrap().is_empty());
    }

    #[test]
    fn test_search_grocery_scenario() {
        let (_dir, store) = setup_store();
        let mut groceries = NoteRepository::create(&store, store.root()).unwrap();
        groceries.title = "Groceries".to_string();
        groceries.tags = vec!["home".to_string()];
        NoteRepository::save(&store, &mut groceries).unwrap();

        let mut taxes = NoteRepository::create(&store, store.root()).unwrap();
        taxes.title = "Taxes".to_string();
        taxes.content = "Receipts from the grocery run".to_string();
        NoteRepository::save(&store, &mut taxes).unwrap();

        // "Groceries" does not contain "grocery", so only the content hit matches.
        assert_eq!(titles(&search(&store, "grocery").unwrap()), vec!["Taxes"]);

        let mut both = titles(&search(&store, "GROCER").unwrap())
            .into_iter()
            .map(String::from)
            .collect::<Vec<_>>();
        both.sort();
        assert_eq!(both, vec!["Groceries", "Taxes"]);
        assert_eq!(titles(&search(&store, "home").unwrap()), vec!["Groceries"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_enumerate_tolerates_dangling_symlink() {
        let (_dir, store) = setup_store();
        write_note(store.root(), "a.json", "Alpha", 1, 1, &[]);
        std::os::unix::fs::symlink(store.root().join("missing"), store.root().join("broken.json"))
            .unwrap();

        let items = enumerate(store.root()).unwrap();
        assert_eq!(titles(&items), vec!["Alpha"]);
    }

    #[test]
    fn test_enumerate_missing_dir_fails() {
        let (dir, _store) = setup_store();
        assert!(enumerate(&dir.path().join("nope")).is_err());
    }

    #[test]
    fn test_search_skips_hidden_dirs() {
        let (_dir, store) = setup_store();
        let mut note = NoteRepository::create(&store, store.root()).unwrap();
        note.content = "needle".to_string();
        NoteRepository::save(&store, &mut note).unwrap();
        note.content = "moved on".to_string();
        NoteRepository::save(&store, &mut note).unwrap();

        // The old "needle" revision only lives under .versions now.
        assert!(search(&store, "needle").unwrap().is_empty());
    }

    #[test]
    fn test_search_encrypted_without_key() {
        let (dir, store) = setup_store();
        let keyed = store.clone().with_key(EncryptionKey::from_passphrase("alice", "pw"));
        let mut note = NoteRepository::create(&keyed, keyed.root()).unwrap();
        note.title = "Vault".to_string();
        note.content = "combination".to_string();
        note.encrypted = true;
        NoteRepository::save(&keyed, &mut note).unwrap();

        assert_eq!(search(&keyed, "combination").unwrap().len(), 1);

        let locked = Store::open(dir.path()).unwrap();
        assert!(search(&locked, "combination").unwrap().is_empty());
        assert_eq!(search(&locked, "vault").unwrap().len(), 1);
    }
}
