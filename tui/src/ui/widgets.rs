use crate::app::{App, EditMode, View};
use notedeck_core::{markdown, models::count_todos};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

/// Render the header with title and key hints
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let title = match &app.current_note {
        Some(note) if app.view != View::Browsing => format!(" 📝 {} ", note.title),
        _ => format!(" NoteDeck {} ", app.location()),
    };

    let key_hints = match app.view {
        View::Browsing => " [q:Quit] [↑/↓:Move] [Enter:Open] [-:Up] [n:New] [Ctrl+N:Template] [t:Title] [#:Tags] [/:Search] [s:Sort] [f:Filter] [p:Preview] [r:Recent] [Tab:Sidebar] [Ctrl+L:Link] [Ctrl+H:History] [Ctrl+D:Copy] [d:Del] ",
        View::Editing(EditMode::Insert) => " [Esc:Normal] [Ctrl+S:Save] [Ctrl+C:Save & Close] [Ctrl+P:Preview] [Ctrl+T:Title] ",
        View::Editing(EditMode::Normal) => " [i:Insert] [v:Command] [h/l/0/$:Move] [x:Toggle Todo] [q/Esc:Save & Close] ",
        View::Editing(EditMode::VimCommand) => " [i:Insert] [w:Save] [q:Save & Close] [Esc:Normal] ",
        View::EditingTitle(_) | View::TaggingNote(_) => " [Enter:Save] [Esc:Cancel] ",
        View::Previewing => " [e:Edit] [Tab:Next Link] [Enter:Follow] [↑/↓:Scroll] [q/Esc:Back] ",
        View::Searching => " [Esc:Close] [↑/↓:Select] [Enter:Open] [#tag:Filter] ",
        View::SelectingTemplate => " [↑/↓:Select] [Enter:Create] [Esc:Cancel] ",
        View::ViewingVersions => " [↑/↓:Select] [Enter/r:Restore] [Esc:Back] ",
    };

    let header_spans = vec![
        Span::styled(
            title,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" | "),
        Span::styled(key_hints, Style::default().fg(Color::DarkGray)),
    ];

    let header = Paragraph::new(Line::from(header_spans))
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Left);

    frame.render_widget(header, area);
}

/// Render the status bar at the bottom
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let mut status_text = format!(" {} items | Sort: {}", app.items.len(), app.sort_mode.label());
    if let (true, Some(tag)) = (app.filter_active, &app.tag_filter) {
        status_text.push_str(&format!(" | Tag Filter: #{}", tag));
    }
    if let View::Editing(mode) = app.view {
        let (line, col) = app.cursor_line_col();
        status_text.push_str(&format!(" | {} | Ln {}, Col {}", mode.label(), line + 1, col + 1));
    }
    if let Some(message) = &app.status_message {
        status_text.push_str(&format!(" | {}", message));
    }
    status_text.push(' ');

    let style = if app.status_message.as_deref().is_some_and(|m| m.starts_with("Error")) {
        Style::default().bg(Color::Red).fg(Color::White)
    } else {
        Style::default().bg(Color::DarkGray).fg(Color::White)
    };
    let status_bar = Paragraph::new(status_text)
        .style(style)
        .alignment(Alignment::Center);

    frame.render_widget(status_bar, area);
}

/// Render the folder listing
pub fn render_note_list(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Notes {} ", app.location()))
        .title_alignment(Alignment::Left);

    if app.items.is_empty() {
        let empty_message = Paragraph::new("No notes here. Press 'n' for a new note or Ctrl+N for a template.")
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty_message, area);
        return;
    }

    let items: Vec<ListItem> = app
        .items
        .iter()
        .map(|item| {
            if item.is_folder {
                return ListItem::new(Line::from(Span::styled(
                    format!("📁 {}/", item.title),
                    Style::default().fg(Color::Yellow),
                )));
            }
            let mut spans = vec![Span::raw(format!("   {}", item.title))];
            if !item.tags.is_empty() {
                let tags: Vec<String> = item.tags.iter().map(|t| format!("#{}", t)).collect();
                spans.push(Span::styled(
                    format!("  {}", tags.join(" ")),
                    Style::default().fg(Color::Magenta),
                ));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let mut state = ListState::default();
    state.select(Some(app.cursor_position));

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::Blue).fg(Color::White));

    frame.render_stateful_widget(list, area, &mut state);
}

/// Render the selected note next to the listing
pub fn render_note_summary(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Preview ");
    let Some(note) = &app.current_note else {
        let hint = Paragraph::new("Select a note to preview it")
            .block(block)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(hint, area);
        return;
    };

    let mut lines = vec![
        Line::from(Span::styled(
            note.title.clone(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("Updated {}", note.updated_at.format("%Y-%m-%d %H:%M")),
            Style::default().fg(Color::DarkGray),
        )),
    ];
    if note.encrypted {
        lines.push(Line::from(Span::styled("🔒 encrypted", Style::default().fg(Color::DarkGray))));
    }
    lines.push(Line::from(""));
    lines.extend(markdown::render(&note.content).lines().map(|l| Line::from(l.to_string())));

    let summary = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    frame.render_widget(summary, area);
}

/// Render the editor and place the terminal cursor in it
pub fn render_editor(frame: &mut Frame, app: &App, area: Rect) {
    let mode = match app.view {
        View::Editing(mode) => mode,
        _ => EditMode::Insert,
    };
    let title = app
        .current_note
        .as_ref()
        .map(|n| format!(" {} [{}] ", n.title, mode.label()))
        .unwrap_or_default();
    let border = match mode {
        EditMode::Insert => Color::Green,
        EditMode::Normal => Color::Blue,
        EditMode::VimCommand => Color::Yellow,
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(border));

    let inner_h = area.height.saturating_sub(2) as usize;
    let (line, col) = app.cursor_line_col();
    let offset = (line + 1).saturating_sub(inner_h);

    let editor = Paragraph::new(app.edit_buffer.as_str())
        .block(block)
        .scroll((offset as u16, 0));
    frame.render_widget(editor, area);

    if matches!(app.view, View::Editing(_)) {
        let current_line = app.edit_buffer.split('\n').nth(line).unwrap_or("");
        let before: String = current_line.chars().take(col).collect();
        let x = area.x + 1 + before.width() as u16;
        let y = area.y + 1 + (line - offset) as u16;
        if x < area.x + area.width.saturating_sub(1) && y < area.y + area.height.saturating_sub(1) {
            frame.set_cursor(x, y);
        }
    }
}

/// Render the markdown preview with links and backlinks beside it
pub fn render_preview(frame: &mut Frame, app: &App, area: Rect) {
    let Some(note) = &app.current_note else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(30)])
        .split(area);

    let (done, total) = count_todos(&note.content);
    let title = if total > 0 {
        format!(" {} ({}/{} done) ", note.title, done, total)
    } else {
        format!(" {} ", note.title)
    };
    let rendered = markdown::render(&note.content);
    let body = Paragraph::new(Text::from(rendered))
        .block(Block::default().borders(Borders::ALL).title(title))
        .wrap(Wrap { trim: false })
        .scroll((app.preview_scroll, 0));
    frame.render_widget(body, chunks[0]);

    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);

    let links: Vec<ListItem> = app
        .preview_links
        .iter()
        .map(|l| ListItem::new(format!("[[{}]]", l)))
        .collect();
    let mut state = ListState::default();
    state.select(app.link_selection);
    let links = List::new(links)
        .block(Block::default().borders(Borders::ALL).title(" Links "))
        .highlight_style(Style::default().bg(Color::Blue).fg(Color::White));
    frame.render_stateful_widget(links, side[0], &mut state);

    let backlinks: Vec<ListItem> = app
        .backlinks
        .iter()
        .map(|b| ListItem::new(format!("← {}", b.title)))
        .collect();
    let backlinks = List::new(backlinks)
        .block(Block::default().borders(Borders::ALL).title(" Backlinks "))
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(backlinks, side[1]);
}

/// Centered popup covering `percent_x` by `percent_y` of `area`
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Bordered popup with an input line above a selectable list
fn render_picker(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    input: Option<String>,
    items: Vec<ListItem>,
    selected: usize,
) {
    let popup = centered_rect(60, 50, area);
    let block = Block::default().borders(Borders::ALL).title(title.to_string());
    let inner = block.inner(popup);
    frame.render_widget(Clear, popup);
    frame.render_widget(block, popup);

    let list_area = match input {
        Some(input) => {
            let inner_chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(1), Constraint::Min(0)])
                .split(inner);
            let input = Paragraph::new(input).style(Style::default().fg(Color::White));
            frame.render_widget(input, inner_chunks[0]);
            inner_chunks[1]
        }
        None => inner,
    };

    let mut state = ListState::default();
    if !items.is_empty() {
        state.select(Some(selected));
    }
    let list = List::new(items)
        .block(Block::default())
        .highlight_style(Style::default().bg(Color::Blue).fg(Color::Black));
    frame.render_stateful_widget(list, list_area, &mut state);
}

pub fn render_search_overlay(frame: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .search_results
        .iter()
        .map(|n| {
            let relative = app.store.relative(&n.path);
            let folder = relative
                .parent()
                .map(|p| p.display().to_string())
                .unwrap_or_default();
            let mut spans = vec![Span::raw(n.title.clone())];
            if !folder.is_empty() {
                spans.push(Span::styled(format!("  in {}/", folder), Style::default().fg(Color::DarkGray)));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();
    render_picker(
        frame,
        area,
        " Search ",
        Some(format!("/ {}▊", app.search_query)),
        items,
        app.search_selection,
    );
}

pub fn render_template_picker(frame: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .templates
        .iter()
        .map(|t| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:<10}", t.name), Style::default().add_modifier(Modifier::BOLD)),
                Span::styled(t.description.clone(), Style::default().fg(Color::DarkGray)),
            ]))
        })
        .collect();
    render_picker(frame, area, " New From Template ", None, items, app.template_selection);
}

pub fn render_versions_overlay(frame: &mut Frame, app: &App, area: Rect) {
    if app.versions.is_empty() {
        let popup = centered_rect(50, 20, area);
        let message = Paragraph::new("No earlier versions of this note")
            .block(Block::default().borders(Borders::ALL).title(" History "))
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(Clear, popup);
        frame.render_widget(message, popup);
        return;
    }

    let items: Vec<ListItem> = app
        .versions
        .iter()
        .map(|v| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    v.created_at.format("%Y-%m-%d %H:%M:%S ").to_string(),
                    Style::default().fg(Color::Cyan),
                ),
                Span::raw(v.title.clone()),
                Span::styled(format!("  {}", v.preview(40)), Style::default().fg(Color::DarkGray)),
            ]))
        })
        .collect();
    render_picker(frame, area, " History ", None, items, app.version_selection);
}

/// Single-line prompt used for title and tag editing
pub fn render_input_overlay(frame: &mut Frame, app: &App, area: Rect, title: &str) {
    let popup_width = 80.min(area.width);
    let popup_height = 5;
    let x = area.x + (area.width.saturating_sub(popup_width)) / 2;
    let y = area.y + (area.height.saturating_sub(popup_height)) / 2;
    let popup_area = Rect::new(x, y, popup_width, popup_height.min(area.height));

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} (Enter:Save | Esc:Cancel) ", title))
        .style(Style::default().fg(Color::Cyan));

    frame.render_widget(Clear, popup_area);
    frame.render_widget(block, popup_area);

    let inner = Rect {
        x: popup_area.x + 1,
        y: popup_area.y + 2,
        width: popup_area.width.saturating_sub(2),
        height: 1,
    };

    let text = format!("{}▊", app.input_buffer);
    let paragraph = Paragraph::new(text).style(Style::default().fg(Color::Yellow));

    frame.render_widget(paragraph, inner);
}
