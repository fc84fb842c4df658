//! UI rendering for the TUI

mod dialogs;
pub(crate) mod help;
mod logs;
mod mappings;

use crate::app::{App, Focus, Overlay, StatusLevel, Tab};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(10),   // Main content
            Constraint::Length(4), // Status bar (2 lines + borders)
        ])
        .split(frame.area());

    draw_header(frame, app, chunks[0]);

    match app.tab {
        Tab::Logs => logs::draw(frame, app, chunks[1]),
        Tab::Mappings => mappings::draw(frame, app, chunks[1]),
    }

    draw_status_bar(frame, app, chunks[2]);

    // Draw overlays on top
    match &app.overlay {
        Overlay::Help => help::draw_overlay(frame, app.help_scroll),
        Overlay::Confirm { message, .. } => dialogs::draw_confirm(frame, message),
        Overlay::Error { message } => dialogs::draw_error(frame, message),
        Overlay::None => {}
    }
}

/// Draw the header bar
fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    let connection_status = if app.is_connected {
        Span::styled("● Connected", Style::default().fg(app.theme.success))
    } else {
        Span::styled("○ Disconnected", Style::default().fg(app.theme.error))
    };

    let loading = if app.is_loading {
        Span::styled(" ⟳", Style::default().fg(app.theme.warning))
    } else {
        Span::raw("")
    };

    let mut spans = vec![
        Span::styled(
            " WM Admin ",
            Style::default()
                .fg(app.theme.header_fg)
                .bg(app.theme.header_bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
    ];
    spans.extend(tab_spans(app));
    spans.extend([
        Span::raw(" │ "),
        connection_status,
        loading,
        Span::raw(" │ "),
        Span::styled(&app.endpoint, Style::default().fg(app.theme.muted)),
        Span::styled(
            format!(
                " Requests: {}  Mappings: {}",
                app.logs.entries().len(),
                app.workflow.mappings().len()
            ),
            Style::default().fg(app.theme.muted),
        ),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border));

    let paragraph = Paragraph::new(Line::from(spans)).block(block);
    frame.render_widget(paragraph, area);
}

fn tab_spans<'a>(app: &App) -> Vec<Span<'a>> {
    [(Tab::Logs, "1", "Logs"), (Tab::Mappings, "2", "Mappings")]
        .into_iter()
        .map(|(tab, key, label)| {
            let style = if app.tab == tab {
                Style::default()
                    .fg(app.theme.highlight_fg)
                    .bg(app.theme.highlight_bg)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(app.theme.muted)
            };
            Span::styled(format!(" {} {} ", key, label), style)
        })
        .collect()
}

/// Draw the status bar (or search bar when active)
fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    if app.tab == Tab::Logs && (app.search_active || !app.logs.query.is_empty()) {
        draw_search_bar(frame, app, area);
        return;
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border));

    if let Some((msg, level, _)) = &app.status_message {
        let color = match level {
            StatusLevel::Info => app.theme.fg,
            StatusLevel::Success => app.theme.success,
            StatusLevel::Warning => app.theme.warning,
            StatusLevel::Error => app.theme.error,
        };
        let paragraph = Paragraph::new(Span::styled(
            format!(" {}", msg),
            Style::default().fg(color),
        ))
        .block(block)
        .alignment(Alignment::Left);
        frame.render_widget(paragraph, area);
    } else {
        let lines: Vec<Line> = get_commands(app.tab, app.focus)
            .iter()
            .map(|commands| build_command_line(commands, app))
            .collect();
        let paragraph = Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Left);
        frame.render_widget(paragraph, area);
    }
}

/// Command definition (key, label)
type Command = (&'static str, &'static str);

/// Build a command line with [key] notation and separators
fn build_command_line(commands: &[Command], app: &App) -> Line<'static> {
    let mut spans = vec![Span::raw(" ")];
    for (i, (key, label)) in commands.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" │ ", Style::default().fg(app.theme.border)));
        }
        spans.push(Span::styled(
            format!("[{}]", key),
            Style::default()
                .fg(app.theme.key)
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(
            format!(" {}", label),
            Style::default().fg(app.theme.muted),
        ));
    }
    Line::from(spans)
}

/// Context-sensitive commands, one inner vec per line
fn get_commands(tab: Tab, focus: Focus) -> Vec<Vec<Command>> {
    match (tab, focus) {
        (Tab::Logs, _) => vec![
            vec![
                ("m", "Make mapping"),
                ("o", "Open mapping"),
                ("y", "Copy"),
                ("c", "Clear"),
                ("/", "Search"),
            ],
            vec![("2", "Mappings"), ("r", "Refresh"), ("?", "Help"), ("q", "Quit")],
        ],
        (Tab::Mappings, Focus::List) => vec![
            vec![
                ("Enter", "Edit"),
                ("n", "New"),
                ("d", "Del"),
                ("e", "Editor"),
                ("N", "Name"),
                ("^S", "Save"),
            ],
            vec![("1", "Logs"), ("r", "Refresh"), ("?", "Help"), ("q", "Quit")],
        ],
        (Tab::Mappings, Focus::Name) => vec![vec![
            ("Enter", "Editor"),
            ("^S", "Save"),
            ("^U", "Clear"),
            ("Esc", "List"),
        ]],
        (Tab::Mappings, Focus::Editor) => vec![vec![
            ("^S", "Save"),
            ("^F", "Format"),
            ("^C", "Copy"),
            ("^V", "Paste"),
            ("^K", "DelLine"),
            ("S-Tab", "Name"),
            ("Esc", "List"),
        ]],
    }
}

/// Draw the search bar
fn draw_search_bar(frame: &mut Frame, app: &App, area: Rect) {
    let border_color = if app.search_active {
        app.theme.highlight_bg
    } else {
        app.theme.border
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let cursor = if app.search_active { "█" } else { "" };
    let match_count = format!(
        " ({}/{})",
        app.visible_logs().len(),
        app.logs.entries().len()
    );

    let line = Line::from(vec![
        Span::styled(
            " /",
            Style::default()
                .fg(app.theme.highlight_bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(&app.logs.query, Style::default().fg(app.theme.fg)),
        Span::styled(cursor, Style::default().fg(app.theme.highlight_bg)),
        Span::styled(match_count, Style::default().fg(app.theme.muted)),
        Span::styled(
            if app.search_active {
                "  [Enter] keep  [Esc] cancel  [Ctrl+U] clear"
            } else {
                "  [/] edit  [Esc] clear"
            },
            Style::default().fg(app.theme.muted),
        ),
    ]);

    frame.render_widget(Paragraph::new(line), inner);
}

/// Calculate a centered rect for modals
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
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

/// Truncate to `max` chars with an ellipsis
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", kept)
    }
}

/// Centered one-line message inside a bordered area
fn draw_empty_message(frame: &mut Frame, app: &App, area: Rect, msg: &str) {
    let inner = Block::default().borders(Borders::ALL).inner(area);
    let centered = Rect {
        x: inner.x,
        y: inner.y + inner.height / 2,
        width: inner.width,
        height: 1.min(inner.height),
    };

    let paragraph = Paragraph::new(msg.to_string())
        .style(Style::default().fg(app.theme.muted))
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, centered);
}
