mod files;
mod note_repository;
mod store;
mod template_repository;
mod version_repository;

pub use files::{backup_file, temp_path_for, write_atomic, write_atomic_with};
pub use note_repository::NoteRepository;
pub use store::{is_hidden_name, is_note_file, Store, NOTE_EXTENSION, TEMPLATES_DIR, VERSIONS_DIR};
pub use template_repository::TemplateRepository;
pub use version_repository::VersionRepository;
