mod note;
mod template;
mod todo;
mod version;

pub use note::{Note, NoteItem, DEFAULT_TITLE};
pub use template::{Template, DATE_FORMAT, FALLBACK_TITLE};
pub use todo::{count_todos, extract_todos, toggle_todo, TodoItem};
pub use version::Version;

use chrono::{DateTime, Utc};
use std::time::SystemTime;

/// Convert a filesystem timestamp to DateTime<Utc>
pub fn system_time_to_datetime(time: SystemTime) -> DateTime<Utc> {
    DateTime::<Utc>::from(time)
}
