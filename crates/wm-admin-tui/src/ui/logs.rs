//! Request log view: journal list and detail pane

use crate::app::App;
use crate::components::highlight::highlight;
use crate::entry::LogEntry;
use crate::timestamp::display_time;
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
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    draw_list(frame, app, chunks[0]);
    draw_detail(frame, app, chunks[1]);
}

fn draw_list(frame: &mut Frame, app: &App, area: Rect) {
    let visible = app.visible_logs();
    let selected = app.log_list_state.selected();

    let items: Vec<ListItem> = visible
        .iter()
        .enumerate()
        .map(|(i, entry)| ListItem::new(entry_line(app, entry, selected == Some(i))))
        .collect();

    let title = if app.logs.query.is_empty() {
        format!(" Requests ({}) ", visible.len())
    } else {
        format!(" Requests ({}/{}) ", visible.len(), app.logs.entries().len())
    };

    let list = List::new(items)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .highlight_style(
            Style::default()
                .bg(app.theme.highlight_bg)
                .fg(app.theme.highlight_fg),
        );

    frame.render_stateful_widget(list, area, &mut app.log_list_state.clone());

    if visible.is_empty() {
        let msg = if !app.is_connected {
            "Not connected. Check the admin URL."
        } else if app.logs.entries().is_empty() {
            "No requests captured yet."
        } else {
            "No requests match the filter."
        };
        super::draw_empty_message(frame, app, area, msg);
    }
}

fn entry_line(app: &App, entry: &LogEntry, is_selected: bool) -> Line<'static> {
    let (method, url) = entry.summary();
    let time = display_time(entry);

    let status = match entry.response_status {
        Some(code) => Span::styled(
            format!("{:>3}", code),
            Style::default().fg(app.theme.status_color(code)),
        ),
        None => Span::styled("  -", Style::default().fg(app.theme.muted)),
    };

    Line::from(vec![
        Span::styled(
            if is_selected { " ▶ " } else { "   " },
            Style::default().fg(app.theme.highlight_bg),
        ),
        Span::styled(
            format!("{:<19}", super::truncate(&time, 19)),
            Style::default().fg(app.theme.muted),
        ),
        Span::raw(" "),
        Span::styled(
            format!("{:<6}", super::truncate(method, 6)),
            Style::default()
                .fg(app.theme.method_color(method))
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        status,
        Span::styled(" │ ", Style::default().fg(app.theme.border)),
        Span::styled(url.to_string(), Style::default().fg(app.theme.fg)),
    ])
}

fn draw_detail(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Detail ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border));

    let Some(entry) = app.logs.selected() else {
        frame.render_widget(block, area);
        super::draw_empty_message(frame, app, area, "Select a request");
        return;
    };

    let (method, url) = entry.summary();
    let mut lines = vec![
        Line::from(vec![
            Span::styled(
                format!("{} ", method),
                Style::default()
                    .fg(app.theme.method_color(method))
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(url.to_string(), Style::default().fg(app.theme.fg)),
        ]),
        Line::from(vec![
            Span::styled("Time     ", Style::default().fg(app.theme.muted)),
            Span::raw(display_time(entry)),
        ]),
        Line::from(vec![
            Span::styled("Mapping  ", Style::default().fg(app.theme.muted)),
            match &entry.stub_mapping_id {
                Some(id) => Span::styled(id.clone(), Style::default().fg(app.theme.key)),
                None => Span::styled("(unmatched)", Style::default().fg(app.theme.warning)),
            },
        ]),
        Line::from(""),
    ];
    lines.extend(highlight(&entry.pretty(), &app.theme));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
