use anyhow::{anyhow, Result};
use chrono::Local;
use log::{error, info, warn};
use notedeck_core::{
    index::{self, SortMode},
    links,
    models::{toggle_todo, Note, NoteItem, Template, Version},
    storage::{NoteRepository, Store, TemplateRepository, VersionRepository},
};
use std::path::{Path, PathBuf};

/// Entries kept by the recent-notes view
const RECENT_LIMIT: usize = 10;

/// Sub-mode of the note editor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    Insert,
    Normal,
    VimCommand,
}

impl EditMode {
    pub fn label(self) -> &'static str {
        match self {
            EditMode::Insert => "INSERT",
            EditMode::Normal => "NORMAL",
            EditMode::VimCommand => "COMMAND",
        }
    }
}

/// Where a prompt goes back to once it is committed or dismissed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnTo {
    Browsing,
    Editing(EditMode),
}

/// The active view; exactly one at a time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Browsing,
    Editing(EditMode),
    EditingTitle(ReturnTo),
    Previewing,
    Searching,
    TaggingNote(ReturnTo),
    SelectingTemplate,
    ViewingVersions,
}

impl From<ReturnTo> for View {
    fn from(target: ReturnTo) -> Self {
        match target {
            ReturnTo::Browsing => View::Browsing,
            ReturnTo::Editing(mode) => View::Editing(mode),
        }
    }
}

/// Application state for one user session
pub struct App {
    pub should_quit: bool,
    pub view: View,
    pub username: String,
    pub store: Store,
    /// Folder being browsed, always inside the workspace
    pub current_dir: PathBuf,
    /// Listing of `current_dir` after filtering and sorting
    pub items: Vec<NoteItem>,
    pub cursor_position: usize,
    pub current_note: Option<Note>,
    pub sort_mode: SortMode,
    /// Remembered tag; only applied while `filter_active`
    pub tag_filter: Option<String>,
    pub filter_active: bool,
    pub edit_buffer: String,
    /// Cursor in the edit buffer, in chars
    pub edit_cursor_position: usize,
    /// Prompt text for title and tag editing
    pub input_buffer: String,
    pub search_query: String,
    pub search_results: Vec<NoteItem>,
    pub search_selection: usize,
    pub templates: Vec<Template>,
    pub template_selection: usize,
    pub versions: Vec<Version>,
    pub version_selection: usize,
    pub preview_scroll: u16,
    pub preview_links: Vec<String>,
    pub link_selection: Option<usize>,
    pub backlinks: Vec<NoteItem>,
    pub status_message: Option<String>,
    pub show_sidebar: bool,
    pub terminal_size: (u16, u16),
}

impl App {
    /// Create a session for `username` on an opened workspace
    pub fn new(store: Store, username: &str) -> Result<Self> {
        let current_dir = store.root().to_path_buf();
        let mut app = Self {
            should_quit: false,
            view: View::Browsing,
            username: username.to_string(),
            store,
            current_dir,
            items: Vec::new(),
            cursor_position: 0,
            current_note: None,
            sort_mode: SortMode::default(),
            tag_filter: None,
            filter_active: false,
            edit_buffer: String::new(),
            edit_cursor_position: 0,
            input_buffer: String::new(),
            search_query: String::new(),
            search_results: Vec::new(),
            search_selection: 0,
            templates: Vec::new(),
            template_selection: 0,
            versions: Vec::new(),
            version_selection: 0,
            preview_scroll: 0,
            preview_links: Vec::new(),
            link_selection: None,
            backlinks: Vec::new(),
            status_message: None,
            show_sidebar: true,
            terminal_size: (0, 0),
        };
        app.refresh_items()?;
        app.run("select", App::select_current);
        info!("user={} action=open_session root={}", app.username, app.store.root().display());
        Ok(app)
    }

    /// Run a fallible operation; a failure becomes the status message and a
    /// log line, and the view stays where it was.
    pub fn run<F>(&mut self, action: &str, f: F)
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        if let Err(err) = f(self) {
            self.report(action, &err);
        }
    }

    fn report(&mut self, action: &str, err: &anyhow::Error) {
        let user_facing = err
            .downcast_ref::<notedeck_core::Error>()
            .map(|e| e.is_user_facing())
            .unwrap_or(false);
        if user_facing {
            warn!("user={} action={} error={}", self.username, action, err);
        } else {
            error!("user={} action={} error={:#}", self.username, action, err);
        }
        self.status_message = Some(format!("Error: {}", err));
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    /// Handle tick events
    pub fn tick(&mut self) {}

    pub fn resize(&mut self, width: u16, height: u16) {
        self.terminal_size = (width, height);
    }

    pub fn quit(&mut self) {
        info!("user={} action=quit", self.username);
        self.should_quit = true;
    }

    fn require_note(&self) -> Result<Note> {
        self.current_note
            .clone()
            .ok_or_else(|| anyhow!("No note selected"))
    }

    /// Current folder relative to the workspace, as `/sub/dir`
    pub fn location(&self) -> String {
        let dir = self.store.relative(&self.current_dir);
        if dir.as_os_str().is_empty() {
            "/".to_string()
        } else {
            format!("/{}", dir.display())
        }
    }

    // =========================
    // Listing
    // =========================

    /// Re-read the current folder, keeping the cursor on the same entry
    pub fn refresh_items(&mut self) -> Result<()> {
        let keep = self
            .current_note
            .as_ref()
            .map(|n| n.path.clone())
            .or_else(|| self.selected_item().map(|i| i.path.clone()));

        let mut items = index::enumerate(&self.current_dir)?;
        if self.filter_active {
            if let Some(tag) = &self.tag_filter {
                items = index::filter_by_tag(&items, tag);
            }
        }
        index::sort(&mut items, self.sort_mode);
        self.items = items;

        if let Some(pos) = keep.and_then(|path| self.items.iter().position(|i| i.path == path)) {
            self.cursor_position = pos;
        }
        self.cursor_position = self.cursor_position.min(self.items.len().saturating_sub(1));
        Ok(())
    }

    pub fn selected_item(&self) -> Option<&NoteItem> {
        self.items.get(self.cursor_position)
    }

    /// Make the note under the cursor the current note
    pub fn select_current(&mut self) -> Result<()> {
        let Some(item) = self.selected_item().cloned() else {
            self.current_note = None;
            return Ok(());
        };
        if item.is_folder {
            self.current_note = None;
            return Ok(());
        }
        if self.current_note.as_ref().map(|n| &n.path) != Some(&item.path) {
            self.current_note = None;
            self.current_note = Some(NoteRepository::load(&self.store, &item.path)?);
        }
        Ok(())
    }

    pub fn move_cursor_up(&mut self) -> Result<()> {
        self.cursor_position = self.cursor_position.saturating_sub(1);
        self.select_current()
    }

    pub fn move_cursor_down(&mut self) -> Result<()> {
        let last = self.items.len().saturating_sub(1);
        if self.cursor_position < last {
            self.cursor_position += 1;
        }
        self.select_current()
    }

    /// Enter a folder, or open a note in the editor
    pub fn open_selected(&mut self) -> Result<()> {
        let item = self
            .selected_item()
            .cloned()
            .ok_or_else(|| anyhow!("Nothing selected"))?;
        if item.is_folder {
            self.current_dir = self.store.resolve(&item.path)?;
            self.current_note = None;
            self.cursor_position = 0;
            self.refresh_items()?;
            return self.select_current();
        }
        let note = NoteRepository::load(&self.store, &item.path)?;
        self.begin_editing(note);
        Ok(())
    }

    /// Go up one folder; never above the workspace root
    pub fn go_to_parent(&mut self) -> Result<()> {
        let root = self.store.root().to_path_buf();
        if self.current_dir == root || !self.current_dir.starts_with(&root) {
            return Ok(());
        }
        let child = self.current_dir.clone();
        self.current_dir = child.parent().map(Path::to_path_buf).unwrap_or(root);
        self.current_note = None;
        self.refresh_items()?;
        if let Some(pos) = self.items.iter().position(|i| i.path == child) {
            self.cursor_position = pos;
        }
        self.select_current()
    }

    pub fn create_note(&mut self) -> Result<()> {
        let note = NoteRepository::create(&self.store, &self.current_dir)?;
        info!("user={} action=create path={}", self.username, note.path.display());
        self.begin_editing(note);
        self.refresh_items()
    }

    pub fn duplicate_selected(&mut self) -> Result<()> {
        let note = self.require_note()?;
        let copy = NoteRepository::duplicate(&self.store, &note)?;
        info!("user={} action=duplicate path={}", self.username, copy.path.display());
        self.set_status(format!("Duplicated as '{}'", copy.title));
        self.current_note = Some(copy);
        self.refresh_items()
    }

    pub fn delete_selected(&mut self) -> Result<()> {
        let item = self
            .selected_item()
            .cloned()
            .ok_or_else(|| anyhow!("Nothing selected"))?;
        NoteRepository::delete(&self.store, &item.path)?;
        info!("user={} action=delete path={}", self.username, item.path.display());
        if self.current_note.as_ref().map(|n| &n.path) == Some(&item.path) {
            self.current_note = None;
        }
        self.set_status(format!("Deleted '{}'", item.title));
        self.refresh_items()?;
        self.select_current()
    }

    pub fn cycle_sort(&mut self) -> Result<()> {
        self.sort_mode = self.sort_mode.next();
        self.refresh_items()?;
        self.set_status(format!("Sort: {}", self.sort_mode.label()));
        Ok(())
    }

    /// Turn the tag filter off, or on with the remembered tag or else the
    /// first tag of the current note
    pub fn toggle_tag_filter(&mut self) -> Result<()> {
        if self.filter_active {
            self.filter_active = false;
            self.refresh_items()?;
            self.set_status("Tag filter off");
            return Ok(());
        }
        let tag = self
            .tag_filter
            .clone()
            .or_else(|| self.current_note.as_ref().and_then(|n| n.tags.first().cloned()));
        match tag {
            Some(tag) => self.apply_tag_filter(tag),
            None => {
                self.set_status("No tag to filter by");
                Ok(())
            }
        }
    }

    pub fn apply_tag_filter(&mut self, tag: String) -> Result<()> {
        self.set_status(format!("Filtering by #{}", tag));
        self.tag_filter = Some(tag);
        self.filter_active = true;
        self.cursor_position = 0;
        self.refresh_items()
    }

    pub fn clear_tag_filter(&mut self) -> Result<()> {
        self.tag_filter = None;
        self.filter_active = false;
        self.set_status("Tag filter cleared");
        self.refresh_items()
    }

    /// Keep only the most recently modified entries in the listing
    pub fn show_recent(&mut self) -> Result<()> {
        self.sort_mode = SortMode::Modified;
        self.refresh_items()?;
        self.items.truncate(RECENT_LIMIT);
        self.cursor_position = self.cursor_position.min(self.items.len().saturating_sub(1));
        self.set_status(format!("{} most recent notes", self.items.len()));
        self.select_current()
    }

    /// Append a `[[title]]` link for the current note to its own content
    pub fn insert_link_to_current(&mut self) -> Result<()> {
        let mut note = self.require_note()?;
        let link = format!("[[{}]]", note.title);
        if !note.content.is_empty() {
            note.content.push_str("\n\n");
        }
        note.content.push_str(&link);
        NoteRepository::save(&self.store, &mut note)?;
        info!("user={} action=link path={}", self.username, note.path.display());
        self.set_status(format!("Added {}", link));
        self.current_note = Some(note);
        self.refresh_items()
    }

    pub fn toggle_sidebar(&mut self) {
        self.show_sidebar = !self.show_sidebar;
    }

    // =========================
    // Editor
    // =========================

    fn begin_editing(&mut self, note: Note) {
        self.edit_buffer = note.content.clone();
        self.edit_cursor_position = self.edit_buffer.chars().count();
        self.current_note = Some(note);
        self.view = View::Editing(EditMode::Insert);
    }

    fn exit_editor(&mut self) {
        self.edit_buffer.clear();
        self.edit_cursor_position = 0;
        self.view = View::Browsing;
    }

    pub fn set_edit_mode(&mut self, mode: EditMode) {
        self.view = View::Editing(mode);
    }

    fn byte_index(&self, char_pos: usize) -> usize {
        self.edit_buffer
            .char_indices()
            .nth(char_pos)
            .map(|(i, _)| i)
            .unwrap_or(self.edit_buffer.len())
    }

    pub fn insert_char(&mut self, c: char) {
        let at = self.byte_index(self.edit_cursor_position);
        self.edit_buffer.insert(at, c);
        self.edit_cursor_position += 1;
    }

    pub fn backspace(&mut self) {
        if self.edit_cursor_position == 0 {
            return;
        }
        let at = self.byte_index(self.edit_cursor_position - 1);
        self.edit_buffer.remove(at);
        self.edit_cursor_position -= 1;
    }

    pub fn cursor_left(&mut self) {
        self.edit_cursor_position = self.edit_cursor_position.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        if self.edit_cursor_position < self.edit_buffer.chars().count() {
            self.edit_cursor_position += 1;
        }
    }

    pub fn cursor_line_start(&mut self) {
        let chars: Vec<char> = self.edit_buffer.chars().collect();
        let mut pos = self.edit_cursor_position.min(chars.len());
        while pos > 0 && chars[pos - 1] != '\n' {
            pos -= 1;
        }
        self.edit_cursor_position = pos;
    }

    pub fn cursor_line_end(&mut self) {
        let chars: Vec<char> = self.edit_buffer.chars().collect();
        let mut pos = self.edit_cursor_position.min(chars.len());
        while pos < chars.len() && chars[pos] != '\n' {
            pos += 1;
        }
        self.edit_cursor_position = pos;
    }

    /// Zero-based (line, column) of the edit cursor
    pub fn cursor_line_col(&self) -> (usize, usize) {
        let before: String = self.edit_buffer.chars().take(self.edit_cursor_position).collect();
        let line = before.matches('\n').count();
        let col = before.rsplit('\n').next().map(|l| l.chars().count()).unwrap_or(0);
        (line, col)
    }

    /// Flip the `- [ ]` checkbox on the cursor line
    pub fn toggle_todo_at_cursor(&mut self) {
        let (line, _) = self.cursor_line_col();
        match toggle_todo(&self.edit_buffer, line) {
            Some(updated) => self.edit_buffer = updated,
            None => self.set_status("No todo on this line"),
        }
    }

    /// Write the edit buffer to disk, adopting a `# Heading` as the title of
    /// an unnamed note
    pub fn save_current(&mut self) -> Result<()> {
        let mut note = self.require_note()?;
        note.content = self.edit_buffer.clone();
        note.infer_title();
        NoteRepository::save(&self.store, &mut note)?;
        info!("user={} action=save path={}", self.username, note.path.display());
        self.set_status(format!("Saved '{}'", note.title));
        self.current_note = Some(note);
        self.refresh_items()
    }

    pub fn save_and_exit(&mut self) -> Result<()> {
        self.save_current()?;
        self.exit_editor();
        Ok(())
    }

    // =========================
    // Title and tag prompts
    // =========================

    fn return_target(&self) -> ReturnTo {
        match self.view {
            View::Editing(mode) => ReturnTo::Editing(mode),
            _ => ReturnTo::Browsing,
        }
    }

    pub fn start_title_edit(&mut self) -> Result<()> {
        let note = self.require_note()?;
        self.input_buffer = note.title;
        self.view = View::EditingTitle(self.return_target());
        Ok(())
    }

    pub fn start_tag_edit(&mut self) -> Result<()> {
        let note = self.require_note()?;
        self.input_buffer = note.tags.join(", ");
        self.view = View::TaggingNote(self.return_target());
        Ok(())
    }

    pub fn input_push(&mut self, c: char) {
        self.input_buffer.push(c);
    }

    pub fn input_backspace(&mut self) {
        self.input_buffer.pop();
    }

    pub fn cancel_input(&mut self) {
        let target = match self.view {
            View::EditingTitle(target) | View::TaggingNote(target) => target,
            _ => ReturnTo::Browsing,
        };
        self.input_buffer.clear();
        self.view = target.into();
    }

    pub fn commit_title(&mut self) -> Result<()> {
        let View::EditingTitle(target) = self.view else {
            return Ok(());
        };
        let mut note = self.require_note()?;
        note.title = self.input_buffer.trim().to_string();
        NoteRepository::save(&self.store, &mut note)?;
        info!("user={} action=retitle path={}", self.username, note.path.display());
        self.current_note = Some(note);
        self.input_buffer.clear();
        self.view = target.into();
        self.refresh_items()
    }

    /// Replace the tag list with the comma-separated prompt text
    pub fn commit_tags(&mut self) -> Result<()> {
        let View::TaggingNote(target) = self.view else {
            return Ok(());
        };
        let mut note = self.require_note()?;
        note.set_tags(self.input_buffer.split(','));
        NoteRepository::save(&self.store, &mut note)?;
        info!("user={} action=tag path={} tags={:?}", self.username, note.path.display(), note.tags);
        self.current_note = Some(note);
        self.input_buffer.clear();
        self.view = target.into();
        self.refresh_items()
    }

    // =========================
    // Preview
    // =========================

    pub fn open_preview(&mut self) -> Result<()> {
        let note = self.require_note()?;
        self.show_preview(&note)
    }

    fn show_preview(&mut self, note: &Note) -> Result<()> {
        let items = index::enumerate(&self.current_dir)?;
        self.backlinks = links::find_backlinks(&self.store, &items, &note.title);
        self.preview_links = links::extract_links(&note.content);
        self.link_selection = None;
        self.preview_scroll = 0;
        self.view = View::Previewing;
        Ok(())
    }

    /// Preview the unsaved edit buffer. The note only takes the buffer once
    /// the preview is ready.
    pub fn preview_from_editor(&mut self) -> Result<()> {
        let mut note = self.require_note()?;
        note.content = self.edit_buffer.clone();
        self.show_preview(&note)?;
        self.current_note = Some(note);
        Ok(())
    }

    pub fn edit_from_preview(&mut self) -> Result<()> {
        let note = self.require_note()?;
        self.begin_editing(note);
        Ok(())
    }

    pub fn close_preview(&mut self) {
        self.preview_links.clear();
        self.link_selection = None;
        self.backlinks.clear();
        self.view = View::Browsing;
    }

    pub fn next_link(&mut self) {
        if self.preview_links.is_empty() {
            self.set_status("No links in this note");
            return;
        }
        let next = match self.link_selection {
            Some(i) => (i + 1) % self.preview_links.len(),
            None => 0,
        };
        self.link_selection = Some(next);
    }

    /// Follow the selected `[[link]]` and preview its target
    pub fn open_selected_link(&mut self) -> Result<()> {
        let Some(title) = self.link_selection.and_then(|i| self.preview_links.get(i)).cloned() else {
            self.set_status("Press Tab to choose a link");
            return Ok(());
        };
        let items = index::enumerate(&self.current_dir)?;
        let target = links::resolve(&items, &title)
            .ok_or_else(|| notedeck_core::Error::NotFound(format!("No note matches [[{}]]", title)))?;
        self.save_if_changed()?;
        let note = NoteRepository::load(&self.store, &target.path)?;
        self.current_note = Some(note);
        self.refresh_items()?;
        self.open_preview()
    }

    /// Write the current note if it differs from its file, so leaving a
    /// preview of the edit buffer never drops text
    fn save_if_changed(&mut self) -> Result<()> {
        let Some(note) = self.current_note.as_mut() else {
            return Ok(());
        };
        let on_disk = NoteRepository::load(&self.store, &note.path)?;
        if on_disk.content == note.content {
            return Ok(());
        }
        note.infer_title();
        NoteRepository::save(&self.store, note)?;
        info!("user={} action=save path={}", self.username, note.path.display());
        let status = format!("Saved '{}'", note.title);
        self.set_status(status);
        Ok(())
    }

    pub fn scroll_preview_down(&mut self) {
        self.preview_scroll = self.preview_scroll.saturating_add(1);
    }

    pub fn scroll_preview_up(&mut self) {
        self.preview_scroll = self.preview_scroll.saturating_sub(1);
    }

    // =========================
    // Search
    // =========================

    pub fn open_search(&mut self) {
        self.search_query.clear();
        self.search_results.clear();
        self.search_selection = 0;
        self.view = View::Searching;
    }

    pub fn close_search(&mut self) {
        self.search_query.clear();
        self.search_results.clear();
        self.search_selection = 0;
        self.view = View::Browsing;
    }

    pub fn search_push(&mut self, c: char) -> Result<()> {
        self.search_query.push(c);
        self.run_search()
    }

    pub fn search_backspace(&mut self) -> Result<()> {
        self.search_query.pop();
        self.run_search()
    }

    /// Live search; a `#tag` query lists tagged notes in the current folder
    pub fn run_search(&mut self) -> Result<()> {
        self.search_selection = 0;
        self.search_results = match self.search_query.strip_prefix('#') {
            Some(tag) if tag.trim().is_empty() => Vec::new(),
            Some(tag) => index::filter_by_tag(&index::enumerate(&self.current_dir)?, tag),
            None => index::search(&self.store, &self.search_query)?,
        };
        Ok(())
    }

    pub fn search_up(&mut self) {
        self.search_selection = self.search_selection.saturating_sub(1);
    }

    pub fn search_down(&mut self) {
        if self.search_selection + 1 < self.search_results.len() {
            self.search_selection += 1;
        }
    }

    pub fn commit_search(&mut self) -> Result<()> {
        if let Some(tag) = self.search_query.strip_prefix('#') {
            let tag = tag.trim().to_string();
            if tag.is_empty() {
                self.set_status("Type a tag after #");
                return Ok(());
            }
            self.apply_tag_filter(tag)?;
            self.close_search();
            return Ok(());
        }

        let item = self
            .search_results
            .get(self.search_selection)
            .cloned()
            .ok_or_else(|| notedeck_core::Error::NotFound("No matching notes".to_string()))?;
        let note = NoteRepository::load(&self.store, &item.path)?;
        if let Some(parent) = note.path.parent() {
            self.current_dir = parent.to_path_buf();
        }
        self.search_query.clear();
        self.search_results.clear();
        self.begin_editing(note);
        self.refresh_items()
    }

    // =========================
    // Templates
    // =========================

    pub fn open_template_picker(&mut self) -> Result<()> {
        self.templates = TemplateRepository::load_all(&self.store)?;
        self.template_selection = 0;
        self.view = View::SelectingTemplate;
        Ok(())
    }

    pub fn template_up(&mut self) {
        self.template_selection = self.template_selection.saturating_sub(1);
    }

    pub fn template_down(&mut self) {
        if self.template_selection + 1 < self.templates.len() {
            self.template_selection += 1;
        }
    }

    pub fn instantiate_selected_template(&mut self) -> Result<()> {
        let template = self
            .templates
            .get(self.template_selection)
            .cloned()
            .ok_or_else(|| anyhow!("No template selected"))?;
        let today = Local::now().date_naive();
        let note = TemplateRepository::instantiate(&self.store, &template, &self.current_dir, None, today)?;
        info!(
            "user={} action=instantiate template={} path={}",
            self.username,
            template.name,
            note.path.display()
        );
        self.begin_editing(note);
        self.refresh_items()
    }

    /// Leave a picker or list view without acting
    pub fn close_to_browsing(&mut self) {
        self.view = View::Browsing;
    }

    // =========================
    // Versions
    // =========================

    pub fn open_versions(&mut self) -> Result<()> {
        let note = self.require_note()?;
        self.versions = VersionRepository::list(&self.store, &note.path)?;
        self.version_selection = 0;
        self.view = View::ViewingVersions;
        Ok(())
    }

    pub fn version_up(&mut self) {
        self.version_selection = self.version_selection.saturating_sub(1);
    }

    pub fn version_down(&mut self) {
        if self.version_selection + 1 < self.versions.len() {
            self.version_selection += 1;
        }
    }

    pub fn restore_selected_version(&mut self) -> Result<()> {
        let version = self
            .versions
            .get(self.version_selection)
            .cloned()
            .ok_or_else(|| anyhow!("No version selected"))?;
        let mut note = self.require_note()?;
        VersionRepository::restore(&self.store, &mut note, &version.id)?;
        info!(
            "user={} action=restore path={} version={}",
            self.username,
            note.path.display(),
            version.id
        );
        self.set_status(format!(
            "Restored version from {}",
            version.created_at.format("%Y-%m-%d %H:%M:%S")
        ));
        self.current_note = Some(note);
        self.view = View::Browsing;
        self.refresh_items()
    }
}
