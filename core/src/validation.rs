//! Pure input checks shared by storage and the session layer.

use crate::{Error, Result};
use std::path::{Component, Path, PathBuf};

pub const MAX_TITLE_LENGTH: usize = 200;
pub const MAX_CONTENT_LENGTH: usize = 10 * 1024 * 1024;
pub const MAX_TAG_LENGTH: usize = 50;
pub const MAX_TAGS_PER_NOTE: usize = 20;
pub const MAX_FILENAME_LENGTH: usize = 255;
pub const MAX_USERNAME_LENGTH: usize = 50;

const INVALID_FILENAME_PATTERNS: [&str; 10] = ["..", "/", "\\", ":", "*", "?", "\"", "<", ">", "|"];

pub fn validate_username(username: &str) -> Result<()> {
    if username.is_empty() {
        return Err(Error::Validation("username cannot be empty".to_string()));
    }
    if username.len() > MAX_USERNAME_LENGTH {
        return Err(Error::Validation(format!(
            "username too long (max {} characters)",
            MAX_USERNAME_LENGTH
        )));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(Error::Validation("username contains invalid characters".to_string()));
    }
    Ok(())
}

pub fn validate_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(Error::Validation("title cannot be empty".to_string()));
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(Error::Validation(format!(
            "title too long (max {} characters)",
            MAX_TITLE_LENGTH
        )));
    }
    if title.contains("..") || title.contains('/') || title.contains('\\') {
        return Err(Error::Validation("title contains invalid characters".to_string()));
    }
    Ok(())
}

pub fn validate_content(content: &str) -> Result<()> {
    if content.len() > MAX_CONTENT_LENGTH {
        return Err(Error::Validation(format!(
            "content too long (max {} bytes)",
            MAX_CONTENT_LENGTH
        )));
    }
    Ok(())
}

pub fn validate_tag(tag: &str) -> Result<()> {
    let tag = tag.trim();
    if tag.is_empty() {
        return Err(Error::Validation("tag cannot be empty".to_string()));
    }
    if tag.chars().count() > MAX_TAG_LENGTH {
        return Err(Error::Validation(format!(
            "tag too long (max {} characters): {}",
            MAX_TAG_LENGTH, tag
        )));
    }
    if !tag
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == ' ')
    {
        return Err(Error::Validation(format!("tag contains invalid characters: {}", tag)));
    }
    Ok(())
}

pub fn validate_tags(tags: &[String]) -> Result<()> {
    if tags.len() > MAX_TAGS_PER_NOTE {
        return Err(Error::Validation(format!(
            "too many tags (max {})",
            MAX_TAGS_PER_NOTE
        )));
    }
    tags.iter().try_for_each(|t| validate_tag(t))
}

/// Filenames generated for notes must be a single plain path component.
pub fn validate_filename(filename: &str) -> Result<()> {
    if filename.is_empty() {
        return Err(Error::PathSafety("filename cannot be empty".to_string()));
    }
    if let Some(bad) = INVALID_FILENAME_PATTERNS.iter().find(|p| filename.contains(**p)) {
        return Err(Error::PathSafety(format!(
            "filename contains invalid character: {}",
            bad
        )));
    }
    if filename.len() > MAX_FILENAME_LENGTH {
        return Err(Error::PathSafety(format!(
            "filename too long (max {} characters)",
            MAX_FILENAME_LENGTH
        )));
    }
    Ok(())
}

/// Resolve `path` against `root` and refuse anything that escapes it.
///
/// Purely lexical: `..` components are rejected outright rather than
/// normalised. `root` is expected to be canonical already.
pub fn ensure_within(root: &Path, path: &Path) -> Result<PathBuf> {
    let root = lexical_clean(root)?;
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    };

    let clean = lexical_clean(&joined)?;
    if !clean.starts_with(&root) {
        return Err(Error::PathSafety(format!(
            "path outside workspace: {}",
            path.display()
        )));
    }
    Ok(clean)
}

fn lexical_clean(path: &Path) -> Result<PathBuf> {
    let mut clean = PathBuf::new();
    for component in path.components() {
        match component {
            Component::ParentDir => {
                return Err(Error::PathSafety(format!(
                    "path traversal detected: {}",
                    path.display()
                )))
            }
            Component::CurDir => {}
            other => clean.push(other.as_os_str()),
        }
    }
    Ok(clean)
}
