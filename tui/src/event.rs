use crate::app::{App, EditMode, View};
use anyhow::Result;
use crossterm::event::{self, Event as CEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

/// Terminal events
#[derive(Debug, Clone, Copy)]
pub enum Event {
    /// Key press event
    Key(KeyEvent),
    /// Terminal resized to (width, height)
    Resize(u16, u16),
    /// Terminal tick event
    Tick,
}

/// Event handler for the terminal
pub struct EventHandler {
    /// Tick rate in milliseconds
    tick_rate: Duration,
}

impl EventHandler {
    /// Create a new event handler
    pub fn new(tick_rate_ms: u64) -> Self {
        Self {
            tick_rate: Duration::from_millis(tick_rate_ms),
        }
    }

    /// Poll for the next event
    pub fn next(&self) -> Result<Event> {
        if event::poll(self.tick_rate)? {
            match event::read()? {
                CEvent::Key(key) => return Ok(Event::Key(key)),
                CEvent::Resize(w, h) => return Ok(Event::Resize(w, h)),
                _ => {}
            }
        }
        Ok(Event::Tick)
    }
}

/// Route one key to the handler of the active view
pub fn handle_key_event(key: KeyEvent, app: &mut App) {
    // On Windows, crossterm reports both key press and release events.
    // We only want to handle press events to avoid duplicates.
    if key.kind != KeyEventKind::Press {
        return;
    }

    match app.view {
        View::Browsing => handle_browsing(key, app),
        View::Editing(EditMode::Insert) => handle_insert(key, app),
        View::Editing(EditMode::Normal) => handle_normal(key, app),
        View::Editing(EditMode::VimCommand) => handle_vim_command(key, app),
        View::EditingTitle(_) => handle_prompt(key, app, App::commit_title),
        View::TaggingNote(_) => handle_prompt(key, app, App::commit_tags),
        View::Previewing => handle_preview(key, app),
        View::Searching => handle_search(key, app),
        View::SelectingTemplate => handle_templates(key, app),
        View::ViewingVersions => handle_versions(key, app),
    }
}

/// Plain characters, plus AltGr (CONTROL+ALT) combinations for special characters
fn is_text_input(key: &KeyEvent) -> bool {
    !key.modifiers.contains(KeyModifiers::CONTROL) || key.modifiers.contains(KeyModifiers::ALT)
}

fn handle_browsing(key: KeyEvent, app: &mut App) {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('n') => app.run("template_picker", App::open_template_picker),
            KeyCode::Char('f') => app.run("clear_filter", App::clear_tag_filter),
            KeyCode::Char('h') => app.run("versions", App::open_versions),
            KeyCode::Char('d') => app.run("duplicate", App::duplicate_selected),
            KeyCode::Char('l') => app.run("link", App::insert_link_to_current),
            _ => {}
        }
        return;
    }

    app.clear_status();
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => app.run("select", App::move_cursor_up),
        KeyCode::Down | KeyCode::Char('j') => app.run("select", App::move_cursor_down),
        KeyCode::Enter | KeyCode::Char('e') => app.run("open", App::open_selected),
        KeyCode::Char('-') | KeyCode::Backspace => app.run("parent", App::go_to_parent),
        KeyCode::Char('n') => app.run("create", App::create_note),
        KeyCode::Char('t') => app.run("title", App::start_title_edit),
        KeyCode::Char('/') => app.open_search(),
        KeyCode::Char('#') => app.run("tags", App::start_tag_edit),
        KeyCode::Char('s') => app.run("sort", App::cycle_sort),
        KeyCode::Char('f') => app.run("filter", App::toggle_tag_filter),
        KeyCode::Char('p') => app.run("preview", App::open_preview),
        KeyCode::Char('r') => app.run("recent", App::show_recent),
        KeyCode::Tab => app.toggle_sidebar(),
        KeyCode::Char('d') | KeyCode::Delete => app.run("delete", App::delete_selected),
        KeyCode::Char('q') => app.quit(),
        _ => {}
    }
}

fn handle_insert(key: KeyEvent, app: &mut App) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && !key.modifiers.contains(KeyModifiers::ALT) {
        match key.code {
            KeyCode::Char('s') => app.run("save", App::save_current),
            KeyCode::Char('p') => app.run("preview", App::preview_from_editor),
            KeyCode::Char('t') => app.run("title", App::start_title_edit),
            KeyCode::Char('c') => app.run("save", App::save_and_exit),
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Esc => app.set_edit_mode(EditMode::Normal),
        KeyCode::Enter => app.insert_char('\n'),
        KeyCode::Backspace => app.backspace(),
        KeyCode::Left => app.cursor_left(),
        KeyCode::Right => app.cursor_right(),
        KeyCode::Home => app.cursor_line_start(),
        KeyCode::End => app.cursor_line_end(),
        KeyCode::Tab => {
            for _ in 0..4 {
                app.insert_char(' ');
            }
        }
        KeyCode::Char(c) if is_text_input(&key) => app.insert_char(c),
        _ => {}
    }
}

fn handle_normal(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Char('i') => app.set_edit_mode(EditMode::Insert),
        KeyCode::Char('v') => app.set_edit_mode(EditMode::VimCommand),
        KeyCode::Esc | KeyCode::Char('q') => app.run("save", App::save_and_exit),
        KeyCode::Char('h') | KeyCode::Left => app.cursor_left(),
        KeyCode::Char('l') | KeyCode::Right => app.cursor_right(),
        KeyCode::Char('0') | KeyCode::Home => app.cursor_line_start(),
        KeyCode::Char('$') | KeyCode::End => app.cursor_line_end(),
        KeyCode::Char('x') => app.toggle_todo_at_cursor(),
        _ => {}
    }
}

fn handle_vim_command(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Char('i') => app.set_edit_mode(EditMode::Insert),
        KeyCode::Esc => app.set_edit_mode(EditMode::Normal),
        KeyCode::Char('w') => app.run("save", App::save_current),
        KeyCode::Char('q') => app.run("save", App::save_and_exit),
        KeyCode::Char('h') | KeyCode::Left => app.cursor_left(),
        KeyCode::Char('l') | KeyCode::Right => app.cursor_right(),
        _ => {}
    }
}

fn handle_prompt(key: KeyEvent, app: &mut App, commit: fn(&mut App) -> Result<()>) {
    match key.code {
        KeyCode::Esc => app.cancel_input(),
        KeyCode::Enter => app.run("commit", commit),
        KeyCode::Backspace => app.input_backspace(),
        KeyCode::Char(c) if is_text_input(&key) => app.input_push(c),
        _ => {}
    }
}

fn handle_preview(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Char('e') => app.run("edit", App::edit_from_preview),
        KeyCode::Char('q') | KeyCode::Esc => app.close_preview(),
        KeyCode::Tab => app.next_link(),
        KeyCode::Enter => app.run("follow_link", App::open_selected_link),
        KeyCode::Up | KeyCode::Char('k') | KeyCode::PageUp => app.scroll_preview_up(),
        _ => app.scroll_preview_down(),
    }
}

fn handle_search(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Esc => app.close_search(),
        KeyCode::Enter => app.run("open_result", App::commit_search),
        KeyCode::Up => app.search_up(),
        KeyCode::Down => app.search_down(),
        KeyCode::Backspace => app.run("search", App::search_backspace),
        KeyCode::Char(c) if is_text_input(&key) => app.run("search", |app| app.search_push(c)),
        _ => {}
    }
}

fn handle_templates(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => app.template_up(),
        KeyCode::Down | KeyCode::Char('j') => app.template_down(),
        KeyCode::Enter => app.run("instantiate", App::instantiate_selected_template),
        KeyCode::Esc | KeyCode::Char('q') => app.close_to_browsing(),
        _ => {}
    }
}

fn handle_versions(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => app.version_up(),
        KeyCode::Down | KeyCode::Char('j') => app.version_down(),
        KeyCode::Enter | KeyCode::Char('r') => app.run("restore", App::restore_selected_version),
        KeyCode::Esc | KeyCode::Char('q') => app.close_to_browsing(),
        _ => {}
    }
}
