use crate::crypto::EncryptionKey;
use crate::models::Note;
use crate::validation;
use crate::{Error, Result};
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub const VERSIONS_DIR: &str = ".versions";
pub const TEMPLATES_DIR: &str = ".templates";
pub const NOTE_EXTENSION: &str = "json";

/// Handle on one user's workspace directory.
///
/// Every storage call goes through a `Store`, which also carries the
/// session's encryption key when one was supplied.
#[derive(Debug, Clone)]
pub struct Store {
    root: PathBuf,
    key: Option<EncryptionKey>,
}

impl Store {
    /// Create a store handle without touching the filesystem
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            key: None,
        }
    }

    /// Create the workspace directory if needed and return a handle on it
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self> {
        std::fs::create_dir_all(root.as_ref())?;
        Ok(Self::new(std::fs::canonicalize(root)?))
    }

    pub fn with_key(mut self, key: EncryptionKey) -> Self {
        self.key = Some(key);
        self
    }

    /// Check if the workspace directory exists
    pub fn exists(&self) -> bool {
        self.root.is_dir()
    }

    /// Get the workspace root
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn has_key(&self) -> bool {
        self.key.is_some()
    }

    /// The session key, or `EncryptionUnavailable`
    pub fn key(&self) -> Result<&EncryptionKey> {
        self.key.as_ref().ok_or(Error::EncryptionUnavailable)
    }

    pub fn versions_dir(&self) -> PathBuf {
        self.root.join(VERSIONS_DIR)
    }

    pub fn templates_dir(&self) -> PathBuf {
        self.root.join(TEMPLATES_DIR)
    }

    /// Resolve a caller-supplied path, refusing anything outside the workspace
    pub fn resolve(&self, path: &Path) -> Result<PathBuf> {
        validation::ensure_within(&self.root, path)
    }

    /// A new, unused note path inside `dir`
    pub fn fresh_note_path(&self, dir: &Path) -> Result<PathBuf> {
        let dir = self.resolve(dir)?;
        loop {
            let filename = format!("note_{}.{}", Uuid::new_v4().simple(), NOTE_EXTENSION);
            validation::validate_filename(&filename)?;
            let candidate = dir.join(filename);
            if !candidate.exists() {
                return Ok(candidate);
            }
        }
    }

    /// A blank note at a fresh path inside `dir`. New notes are encrypted
    /// exactly when the session carries a key.
    pub fn new_note(&self, title: String, dir: &Path) -> Result<Note> {
        let mut note = Note::new(title, self.fresh_note_path(dir)?);
        note.encrypted = self.has_key();
        Ok(note)
    }

    /// Path of `path` relative to the workspace root
    pub fn relative<'a>(&self, path: &'a Path) -> &'a Path {
        path.strip_prefix(&self.root).unwrap_or(path)
    }
}

/// Hidden entries (`.versions`, `.templates`, dotfiles) are never notes.
pub fn is_hidden_name(name: &str) -> bool {
    name.starts_with('.')
}

pub fn is_note_file(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(NOTE_EXTENSION)
}
