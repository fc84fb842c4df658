//! Mappings view: collection list, name field and JSON editor

use crate::app::{App, Focus};
use crate::workflow::EditorMode;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

pub fn draw(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(area);

    draw_list(frame, app, chunks[0]);

    let form = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Name
            Constraint::Min(5),    // Editor
            Constraint::Length(1), // Validity
        ])
        .split(chunks[1]);

    draw_name(frame, app, form[0]);
    draw_editor(frame, app, form[1]);
    draw_validity(frame, app, form[2]);
}

fn border_style(app: &App, focus: Focus) -> Style {
    if app.focus == focus {
        Style::default().fg(app.theme.focus)
    } else {
        Style::default().fg(app.theme.border)
    }
}

fn draw_list(frame: &mut Frame, app: &App, area: Rect) {
    let editing = app.workflow.editor().editing_id();
    let selected = app.mapping_list_state.selected();

    let items: Vec<ListItem> = app
        .workflow
        .mappings()
        .iter()
        .enumerate()
        .map(|(i, mapping)| {
            let is_editing = editing.is_some() && mapping.id.as_deref() == editing;
            let marker = if is_editing { "● " } else { "  " };
            let style = if is_editing {
                Style::default()
                    .fg(app.theme.fg)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(app.theme.fg)
            };

            ListItem::new(Line::from(vec![
                Span::styled(
                    if selected == Some(i) { " ▶ " } else { "   " },
                    Style::default().fg(app.theme.highlight_bg),
                ),
                Span::styled(marker, Style::default().fg(app.theme.success)),
                Span::styled(mapping.label(), style),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .title(format!(" Mappings ({}) ", app.workflow.mappings().len()))
                .borders(Borders::ALL)
                .border_style(border_style(app, Focus::List)),
        )
        .highlight_style(
            Style::default()
                .bg(app.theme.highlight_bg)
                .fg(app.theme.highlight_fg),
        );

    frame.render_stateful_widget(list, area, &mut app.mapping_list_state.clone());

    if app.workflow.mappings().is_empty() {
        let msg = if app.is_connected {
            "No mappings. Press 'n' to create one."
        } else {
            "Not connected."
        };
        super::draw_empty_message(frame, app, area, msg);
    }
}

fn draw_name(frame: &mut Frame, app: &App, area: Rect) {
    let name = &app.workflow.editor().name;
    let focused = app.focus == Focus::Name;

    let block = Block::default()
        .title(" Name ")
        .borders(Borders::ALL)
        .border_style(border_style(app, Focus::Name));

    let line = if focused {
        let cursor = app.name_input.cursor().min(name.chars().count());
        let before: String = name.chars().take(cursor).collect();
        let at: String = name.chars().skip(cursor).take(1).collect();
        let after: String = name.chars().skip(cursor + 1).collect();
        Line::from(vec![
            Span::styled(before, Style::default().fg(app.theme.fg)),
            Span::styled(
                if at.is_empty() { " ".to_string() } else { at },
                Style::default()
                    .fg(app.theme.highlight_fg)
                    .bg(app.theme.highlight_bg),
            ),
            Span::styled(after, Style::default().fg(app.theme.fg)),
        ])
    } else if name.is_empty() {
        Line::from(Span::styled("(unnamed)", Style::default().fg(app.theme.muted)))
    } else {
        Line::from(Span::styled(name.clone(), Style::default().fg(app.theme.fg)))
    };

    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn draw_editor(frame: &mut Frame, app: &App, area: Rect) {
    let title = match app.workflow.editor().mode() {
        EditorMode::Editing(id) => format!(" Edit {} ", id),
        EditorMode::New => " New mapping ".to_string(),
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style(app, Focus::Editor));

    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(&app.editor, inner);
}

fn draw_validity(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = match app.editor.validate() {
        None => vec![Span::styled(
            " ✓ Valid JSON",
            Style::default().fg(app.theme.success),
        )],
        Some(err) => vec![Span::styled(
            format!(" ✗ {}", err),
            Style::default().fg(app.theme.error),
        )],
    };

    if let Some(label) = app.workflow.draft_source() {
        spans.push(Span::styled(" │ ", Style::default().fg(app.theme.border)));
        spans.push(Span::styled(
            format!("Draft from {}", label),
            Style::default().fg(app.theme.muted),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
