use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::validation;

/// Title given to notes that the user has not named yet.
pub const DEFAULT_TITLE: &str = "Untitled Note";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Note {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub path: PathBuf,
    #[serde(default)]
    pub encrypted: bool,
}

impl Note {
    /// Create an empty note that will live at `path`
    pub fn new(title: String, path: PathBuf) -> Self {
        let now = Utc::now();
        Self {
            title,
            content: String::new(),
            tags: Vec::new(),
            created_at: now,
            updated_at: now,
            path,
            encrypted: false,
        }
    }

    /// Update the modified timestamp
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// File name of the backing document, the key used by the version store
    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name().and_then(|n| n.to_str())
    }

    pub fn has_default_title(&self) -> bool {
        self.title == DEFAULT_TITLE || self.title.trim().is_empty()
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    /// Replace the tag list, keeping first occurrences and dropping blanks
    /// and case-insensitive duplicates.
    pub fn set_tags<I, S>(&mut self, tags: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut unique: Vec<String> = Vec::new();
        for tag in tags {
            let tag = tag.as_ref().trim();
            if tag.is_empty() || unique.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
                continue;
            }
            unique.push(tag.to_string());
        }
        self.tags = unique;
    }

    /// Adopt a `# Heading` first line as the title while the note is still
    /// unnamed. Returns whether the title changed.
    pub fn infer_title(&mut self) -> bool {
        if !self.has_default_title() {
            return false;
        }
        match heading_title(&self.content) {
            Some(candidate) if validation::validate_title(candidate).is_ok() => {
                self.title = candidate.to_string();
                true
            }
            _ => false,
        }
    }
}

fn heading_title(content: &str) -> Option<&str> {
    let first = content.lines().find(|l| !l.trim().is_empty())?;
    let rest = first.trim_start().strip_prefix("# ")?;
    Some(rest.trim())
}

/// Listing projection of a note or folder
#[derive(Debug, Clone, PartialEq)]
pub struct NoteItem {
    pub title: String,
    pub path: PathBuf,
    pub tags: Vec<String>,
    pub is_folder: bool,
}

impl NoteItem {
    pub fn folder(name: String, path: PathBuf) -> Self {
        Self {
            title: name,
            path,
            tags: Vec::new(),
            is_folder: true,
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}

impl From<&Note> for NoteItem {
    fn from(note: &Note) -> Self {
        Self {
            title: note.title.clone(),
            path: note.path.clone(),
            tags: note.tags.clone(),
            is_folder: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(content: &str) -> Note {
        let mut n = Note::new(DEFAULT_TITLE.to_string(), PathBuf::from("/w/note_1.json"));
        n.content = content.to_string();
        n
    }

    #[test]
    fn test_note_creation() {
        let note = Note::new("Test Note".to_string(), PathBuf::from("/w/a.json"));
        assert_eq!(note.title, "Test Note");
        assert_eq!(note.created_at, note.updated_at);
        assert_eq!(note.file_name(), Some("a.json"));
        assert!(!note.encrypted);
    }

    #[test]
    fn test_note_touch() {
        let mut note = Note::new("Test".to_string(), PathBuf::new());
        let original = note.updated_at;

        std::thread::sleep(std::time::Duration::from_millis(10));
        note.touch();

        assert!(note.updated_at > original);
        assert_eq!(note.created_at, original);
    }

    #[test]
    fn test_infer_title_from_heading() {
        let mut n = note("\n  \n# My Title\nBody text");
        assert!(n.infer_title());
        assert_eq!(n.title, "My Title");
    }

    #[test]
    fn test_infer_title_requires_single_hash() {
        let mut n = note("## Sub heading\nBody");
        assert!(!n.infer_title());
        assert_eq!(n.title, DEFAULT_TITLE);
    }

    #[test]
    fn test_infer_title_keeps_invalid_candidate_out() {
        let mut n = note("# a/b\nBody");
        assert!(!n.infer_title());
        assert_eq!(n.title, DEFAULT_TITLE);
    }

    #[test]
    fn test_infer_title_respects_manual_title() {
        let mut n = note("# Heading");
        n.title = "Chosen".to_string();
        assert!(!n.infer_title());
        assert_eq!(n.title, "Chosen");
    }

    #[test]
    fn test_set_tags_dedupes() {
        let mut n = note("");
        n.set_tags(["home", " Home ", "", "work"]);
        assert_eq!(n.tags, vec!["home".to_string(), "work".to_string()]);
        assert!(n.has_tag("WORK"));
    }

    #[test]
    fn test_document_field_names() {
        let n = note("x");
        let json = serde_json::to_value(&n).unwrap();
        for field in ["title", "content", "tags", "created_at", "updated_at", "path", "encrypted"] {
            assert!(json.get(field).is_some(), "missing {}", field);
        }
    }
}
