use crate::app::{App, View};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    Frame,
};

use super::{
    render_editor, render_header, render_input_overlay, render_note_list, render_note_summary,
    render_preview, render_search_overlay, render_status_bar, render_template_picker,
    render_versions_overlay,
};

/// Render the complete UI
pub fn render(frame: &mut Frame, app: &App) {
    let size = frame.size();

    // Create main layout: header, content, status bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(size);

    render_header(frame, app, chunks[0]);
    render_content(frame, app, chunks[1]);
    render_status_bar(frame, app, chunks[2]);

    // Overlays (drawn last)
    match app.view {
        View::Searching => render_search_overlay(frame, app, size),
        View::SelectingTemplate => render_template_picker(frame, app, size),
        View::ViewingVersions => render_versions_overlay(frame, app, size),
        View::EditingTitle(_) => render_input_overlay(frame, app, size, "Title"),
        View::TaggingNote(_) => render_input_overlay(frame, app, size, "Tags, comma separated"),
        _ => {}
    }
}

/// Prompts keep the view they return to visible underneath
fn base_view(view: View) -> View {
    match view {
        View::EditingTitle(target) | View::TaggingNote(target) => target.into(),
        other => other,
    }
}

fn render_content(frame: &mut Frame, app: &App, area: Rect) {
    match base_view(app.view) {
        View::Editing(_) => render_editor(frame, app, area),
        View::Previewing => render_preview(frame, app, area),
        _ if app.show_sidebar => {
            let main_chunks = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([
                    Constraint::Percentage(40), // Listing
                    Constraint::Percentage(60), // Note preview
                ])
                .split(area);
            render_note_list(frame, app, main_chunks[0]);
            render_note_summary(frame, app, main_chunks[1]);
        }
        _ => render_note_list(frame, app, area),
    }
}
