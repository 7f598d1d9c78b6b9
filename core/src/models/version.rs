use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Note;

/// Snapshot of a note taken right before it was overwritten.
///
/// `content` is copied verbatim from the stored document, so for an
/// encrypted note it is ciphertext and `encrypted` is set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Version {
    pub id: String,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub encrypted: bool,
}

impl Version {
    /// Snapshot `note` as it was stored, stamped with `created_at`
    pub fn snapshot(note: &Note, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Self::id_for(&created_at),
            title: note.title.clone(),
            content: note.content.clone(),
            created_at,
            encrypted: note.encrypted,
        }
    }

    /// Ids are the creation time in microseconds; they sort like the timestamps.
    pub fn id_for(created_at: &DateTime<Utc>) -> String {
        format!("{:020}", created_at.timestamp_micros())
    }

    /// Single-line excerpt for list views
    pub fn preview(&self, max_chars: usize) -> String {
        if self.encrypted {
            return "(encrypted)".to_string();
        }
        let flat: String = self
            .content
            .chars()
            .map(|c| if c == '\n' { ' ' } else { c })
            .collect();
        if flat.chars().count() > max_chars {
            let cut: String = flat.chars().take(max_chars).collect();
            format!("{}...", cut)
        } else {
            flat
        }
    }
}
