use crate::models::{Note, Template};
use crate::storage::{files, is_note_file, NoteRepository, Store};
use crate::{Error, Result};
use chrono::NaiveDate;
use log::{info, warn};
use std::fs;
use std::path::Path;

pub struct TemplateRepository;

impl TemplateRepository {
    /// All templates in the workspace, sorted by name. The built-in set is
    /// written first when the templates directory is missing or empty.
    pub fn load_all(store: &Store) -> Result<Vec<Template>> {
        let dir = store.templates_dir();
        if !Self::has_templates(&dir)? {
            Self::write_builtins(store)?;
        }

        let mut templates = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if !is_note_file(&path) {
                continue;
            }
            let decoded = fs::read(&path)
                .map_err(Error::from)
                .and_then(|data| serde_json::from_slice::<Template>(&data).map_err(Error::from));
            match decoded {
                Ok(template) => templates.push(template),
                Err(err) => warn!("Skipping unreadable template {}: {}", path.display(), err),
            }
        }
        templates.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(templates)
    }

    fn has_templates(dir: &Path) -> Result<bool> {
        if !dir.is_dir() {
            return Ok(false);
        }
        for entry in fs::read_dir(dir)? {
            if is_note_file(&entry?.path()) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn write_builtins(store: &Store) -> Result<()> {
        let dir = store.templates_dir();
        fs::create_dir_all(&dir)?;
        for template in Template::builtins() {
            let path = dir.join(format!("{}.json", template.name));
            files::write_atomic(&path, &serde_json::to_vec_pretty(&template)?)?;
        }
        info!("Wrote default templates to {}", dir.display());
        Ok(())
    }

    /// Render `template` into a new note inside `dir` and save it
    pub fn instantiate(
        store: &Store,
        template: &Template,
        dir: &Path,
        title: Option<&str>,
        date: NaiveDate,
    ) -> Result<Note> {
        let (title, content) = template.render(title, date);
        let mut note = store.new_note(title, dir)?;
        note.content = content;
        note.set_tags(&template.tags);
        NoteRepository::save(store, &mut note)?;
        Ok(note)
    }
}
