//! Help overlay with scroll support

use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};

/// Number of help lines, the upper bound for scrolling
pub fn line_count() -> u16 {
    build_help_text().len() as u16
}

/// Draw the help overlay
pub fn draw_overlay(frame: &mut Frame, scroll: u16) {
    let area = super::centered_rect(75, 85, frame.area());

    frame.render_widget(Clear, area);

    let help_text = build_help_text();
    let total_lines = help_text.len() as u16;
    let visible_height = area.height.saturating_sub(2);
    let max_scroll = total_lines.saturating_sub(visible_height);
    let scroll = scroll.min(max_scroll);

    let block = Block::default()
        .title(" Help ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .style(Style::default());

    let paragraph = Paragraph::new(help_text).block(block).scroll((scroll, 0));
    frame.render_widget(paragraph, area);

    if max_scroll > 0 {
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("▲"))
            .end_symbol(Some("▼"));

        let mut scrollbar_state =
            ScrollbarState::new(max_scroll as usize).position(scroll as usize);

        let scrollbar_area = Rect {
            x: area.x + area.width.saturating_sub(1),
            y: area.y + 1,
            width: 1,
            height: area.height.saturating_sub(2),
        };

        frame.render_stateful_widget(scrollbar, scrollbar_area, &mut scrollbar_state);
    }
}

fn build_help_text() -> Vec<Line<'static>> {
    vec![
        Line::from(""),
        section_header("GLOBAL"),
        Line::from(""),
        help_line("1 / 2", "Show request log / mappings"),
        help_line("Tab", "Next tab (or editor on mappings)"),
        help_line("r", "Refresh the current tab"),
        help_line("?", "Toggle this help"),
        help_line("q / Ctrl+C", "Quit"),
        Line::from(""),
        section_header("REQUEST LOG"),
        Line::from(""),
        help_line("j / ↓", "Next request"),
        help_line("k / ↑", "Previous request"),
        help_line("/", "Filter requests by text"),
        help_line("Esc", "Clear the filter"),
        help_line("m", "Make a mapping from the request"),
        help_line("o", "Open the mapping that served it"),
        help_line("y", "Copy request JSON"),
        help_line("c", "Clear the request journal"),
        Line::from(""),
        section_header("MAPPINGS"),
        Line::from(""),
        help_line("j / k", "Move in list"),
        help_line("Enter", "Edit highlighted mapping"),
        help_line("n", "New mapping"),
        help_line("d", "Delete highlighted mapping"),
        help_line("e / Tab", "Focus the JSON editor"),
        help_line("N (Shift+n)", "Focus the name field"),
        help_line("Ctrl+S", "Save, persist and reload"),
        Line::from(""),
        section_header("EDITOR"),
        Line::from(""),
        help_line("Ctrl+S", "Save"),
        help_line("Ctrl+F", "Format JSON"),
        help_line("Ctrl+C", "Copy whole document"),
        help_line("Ctrl+V", "Paste from clipboard"),
        help_line("Ctrl+K", "Delete line"),
        help_line("Ctrl+Home/End", "Start / end of document"),
        help_line("Shift+Tab", "Focus the name field"),
        help_line("Esc", "Back to the list"),
        Line::from(""),
        section_header("SEARCH MODE"),
        Line::from(""),
        help_line("Enter", "Keep filter"),
        help_line("Esc", "Cancel and clear"),
        help_line("Ctrl+U", "Clear query"),
        help_line("Ctrl+V", "Paste into search"),
        Line::from(""),
        Line::from(Span::styled(
            "  [↑/↓] scroll  [PgUp/PgDn] page  [Esc/?] close",
            Style::default().add_modifier(Modifier::ITALIC),
        )),
        Line::from(""),
    ]
}

fn section_header(title: &'static str) -> Line<'static> {
    Line::from(Span::styled(
        format!("  {}", title),
        Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
    ))
}

fn help_line(key: &'static str, desc: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("  {:<16}", key),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(desc),
    ])
}
