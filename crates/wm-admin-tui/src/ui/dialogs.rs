//! Modal dialogs

use crate::components::Popup;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Draw a confirmation dialog sized to its message
pub fn draw_confirm(frame: &mut Frame, message: &str) {
    let lines: Vec<&str> = message.lines().collect();
    let max_line_len = lines.iter().map(|l| l.chars().count()).max().unwrap_or(30);
    let width = (max_line_len + 10).clamp(40, 70) as u16;
    let height = (lines.len() + 6).min(15) as u16;

    let screen = frame.area();
    let area = super::centered_rect(
        (width * 100 / screen.width.max(1)).min(80),
        (height * 100 / screen.height.max(1)).min(50),
        screen,
    );

    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Confirm ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .style(Style::default().bg(Color::Black));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Top padding
            Constraint::Min(2),    // Message
            Constraint::Length(1), // Spacing
            Constraint::Length(1), // Buttons
            Constraint::Length(1), // Bottom padding
        ])
        .split(inner);

    let message_paragraph = Paragraph::new(message)
        .style(Style::default().fg(Color::White))
        .wrap(Wrap { trim: false })
        .alignment(Alignment::Center);
    frame.render_widget(message_paragraph, chunks[1]);

    let buttons = Line::from(vec![
        Span::styled(
            "[Enter]",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" Confirm   "),
        Span::styled(
            "[Esc]",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" Cancel"),
    ]);
    frame.render_widget(
        Paragraph::new(buttons).alignment(Alignment::Center),
        chunks[3],
    );
}

/// Draw an error dialog
pub fn draw_error(frame: &mut Frame, message: &str) {
    let content = format!("\n{}\n\nPress Esc to close", message);

    let popup = Popup::new(content)
        .title(" Error ")
        .style(Style::default().bg(Color::Black).fg(Color::Red))
        .border_style(Style::default().fg(Color::Red));

    frame.render_widget(popup, frame.area());
}
