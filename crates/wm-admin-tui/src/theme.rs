//! Theme and color scheme for the TUI

use ratatui::style::Color;

/// Color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub fg: Color,
    pub highlight_bg: Color,
    pub highlight_fg: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub muted: Color,
    pub border: Color,
    pub header_bg: Color,
    pub header_fg: Color,
    pub focus: Color,
    pub key: Color,
    pub json_key: Color,
    pub json_string: Color,
    pub json_number: Color,
    pub json_literal: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            fg: Color::White,
            highlight_bg: Color::Blue,
            highlight_fg: Color::White,
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
            muted: Color::DarkGray,
            border: Color::Gray,
            header_bg: Color::Cyan,
            header_fg: Color::Black,
            focus: Color::Yellow,
            key: Color::Cyan,
            json_key: Color::Cyan,
            json_string: Color::Green,
            json_number: Color::Yellow,
            json_literal: Color::Magenta,
        }
    }
}

impl Theme {
    /// Color for an HTTP method label
    pub fn method_color(&self, method: &str) -> Color {
        match method.to_ascii_uppercase().as_str() {
            "GET" => Color::Green,
            "POST" => Color::Yellow,
            "PUT" | "PATCH" => Color::Blue,
            "DELETE" => Color::Red,
            _ => self.muted,
        }
    }

    /// Color for a response status code
    pub fn status_color(&self, status: u16) -> Color {
        match status {
            200..=299 => self.success,
            300..=399 => Color::Cyan,
            400..=499 => self.warning,
            500..=599 => self.error,
            _ => self.muted,
        }
    }
}
