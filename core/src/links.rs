//! `[[Title]]` wiki links between notes.

use crate::models::NoteItem;
use crate::storage::{NoteRepository, Store};
use log::debug;
use regex::Regex;
use std::sync::OnceLock;

fn link_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[\[([^\]]+)\]\]").expect("link pattern is valid"))
}

/// Every link target in `content`, trimmed, in order of appearance
pub fn extract_links(content: &str) -> Vec<String> {
    link_regex()
        .captures_iter(content)
        .map(|caps| caps[1].trim().to_string())
        .collect()
}

/// Find the note a link points at: exact title first, then the first
/// title containing it. Folders never match.
pub fn resolve<'a>(items: &'a [NoteItem], title: &str) -> Option<&'a NoteItem> {
    let wanted = title.trim().to_lowercase();
    if wanted.is_empty() {
        return None;
    }
    let notes = || items.iter().filter(|i| !i.is_folder);
    notes()
        .find(|i| i.title.to_lowercase() == wanted)
        .or_else(|| notes().find(|i| i.title.to_lowercase().contains(&wanted)))
}

/// Notes among `items` that link to `title`
pub fn find_backlinks(store: &Store, items: &[NoteItem], title: &str) -> Vec<NoteItem> {
    let wanted = title.trim().to_lowercase();
    items
        .iter()
        .filter(|item| !item.is_folder)
        .filter(|item| {
            let content = match NoteRepository::load(store, &item.path) {
                Ok(note) => note.content,
                Err(err) => {
                    debug!("Backlink scan skipped {}: {}", item.path.display(), err);
                    return false;
                }
            };
            extract_links(&content)
                .iter()
                .any(|link| link.to_lowercase() == wanted)
        })
        .cloned()
        .collect()
}
