//! Multi-line JSON editor widget
//!
//! Plain text editing with line numbers, syntax colors and auto-indent. The
//! editor never parses on its own; [`JsonEditor::validate`] and
//! [`JsonEditor::format`] are called by the owner.

use super::highlight::classify;
use crate::theme::Theme;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::Widget,
};
use serde_json::Value;
use std::cell::Cell;

const INDENT: &str = "  ";
const PAGE: usize = 10;

/// Cursor position, in chars
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    pub row: usize,
    pub col: usize,
}

/// Requests the editor cannot fulfil by itself
#[derive(Debug, Clone, PartialEq)]
pub enum EditorAction {
    /// Put this text on the system clipboard
    Copy(String),
    /// Insert the system clipboard at the cursor
    PasteRequest,
}

#[derive(Debug, Clone)]
pub struct JsonEditor {
    lines: Vec<String>,
    cursor: Cursor,
    /// First visible line; follows the cursor at render time
    scroll: Cell<usize>,
    focused: bool,
    theme: Theme,
}

impl Default for JsonEditor {
    fn default() -> Self {
        Self {
            lines: vec![String::new()],
            cursor: Cursor::default(),
            scroll: Cell::new(0),
            focused: false,
            theme: Theme::default(),
        }
    }
}

impl JsonEditor {
    pub fn new(content: &str) -> Self {
        let mut editor = Self::default();
        editor.set_content(content);
        editor
    }

    pub fn content(&self) -> String {
        self.lines.join("\n")
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Replace the text and move the cursor to the top
    pub fn set_content(&mut self, content: &str) {
        self.lines = split_lines(content);
        self.cursor = Cursor::default();
        self.scroll.set(0);
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    /// Parse error for the current text, `None` when it is valid JSON.
    /// Blank text counts as valid.
    pub fn validate(&self) -> Option<String> {
        let content = self.content();
        if content.trim().is_empty() {
            return None;
        }
        serde_json::from_str::<Value>(&content)
            .err()
            .map(|e| e.to_string())
    }

    /// Pretty-print the text. Leaves it untouched and returns the parse
    /// error when it is not valid JSON.
    pub fn format(&mut self) -> Result<(), String> {
        let value: Value = serde_json::from_str(&self.content()).map_err(|e| e.to_string())?;
        let pretty = serde_json::to_string_pretty(&value).map_err(|e| e.to_string())?;
        self.set_content(&pretty);
        Ok(())
    }

    /// Insert `text` at the cursor; line breaks split lines
    pub fn paste(&mut self, text: &str) {
        let text = text.replace("\r\n", "\n").replace('\r', "\n");
        let mut pieces = text.split('\n');

        if let Some(first) = pieces.next() {
            self.insert_str(first);
        }
        for piece in pieces {
            self.split_line();
            self.insert_str(piece);
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<EditorAction> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match (key.code, ctrl) {
            (KeyCode::Char('c'), true) => return Some(EditorAction::Copy(self.content())),
            (KeyCode::Char('v'), true) => return Some(EditorAction::PasteRequest),
            (KeyCode::Char('k'), true) => self.delete_line(),
            (KeyCode::Home, true) => self.cursor = Cursor::default(),
            (KeyCode::End, true) => {
                let row = self.lines.len() - 1;
                self.cursor = Cursor {
                    row,
                    col: char_len(&self.lines[row]),
                };
            }

            (KeyCode::Left, _) => self.move_left(),
            (KeyCode::Right, _) => self.move_right(),
            (KeyCode::Up, _) => self.move_vertical(-1),
            (KeyCode::Down, _) => self.move_vertical(1),
            (KeyCode::PageUp, _) => self.move_vertical(-(PAGE as isize)),
            (KeyCode::PageDown, _) => self.move_vertical(PAGE as isize),
            (KeyCode::Home, false) => self.cursor.col = 0,
            (KeyCode::End, false) => self.cursor.col = self.line_len(),

            (KeyCode::Char(c), false) => self.insert_char(c),
            (KeyCode::Enter, _) => self.newline_with_indent(),
            (KeyCode::Tab, _) => self.insert_str(INDENT),
            (KeyCode::Backspace, _) => self.backspace(),
            (KeyCode::Delete, _) => self.delete(),
            _ => {}
        }

        None
    }

    fn line_len(&self) -> usize {
        char_len(&self.lines[self.cursor.row])
    }

    fn byte_at(&self, row: usize, col: usize) -> usize {
        let line = &self.lines[row];
        line.char_indices()
            .nth(col)
            .map(|(i, _)| i)
            .unwrap_or(line.len())
    }

    fn move_left(&mut self) {
        if self.cursor.col > 0 {
            self.cursor.col -= 1;
        } else if self.cursor.row > 0 {
            self.cursor.row -= 1;
            self.cursor.col = self.line_len();
        }
    }

    fn move_right(&mut self) {
        if self.cursor.col < self.line_len() {
            self.cursor.col += 1;
        } else if self.cursor.row + 1 < self.lines.len() {
            self.cursor.row += 1;
            self.cursor.col = 0;
        }
    }

    fn move_vertical(&mut self, delta: isize) {
        let last = self.lines.len() - 1;
        let row = self.cursor.row.saturating_add_signed(delta).min(last);
        self.cursor.row = row;
        self.cursor.col = self.cursor.col.min(self.line_len());
    }

    fn insert_char(&mut self, c: char) {
        let at = self.byte_at(self.cursor.row, self.cursor.col);
        self.lines[self.cursor.row].insert(at, c);
        self.cursor.col += 1;
    }

    fn insert_str(&mut self, s: &str) {
        let at = self.byte_at(self.cursor.row, self.cursor.col);
        self.lines[self.cursor.row].insert_str(at, s);
        self.cursor.col += char_len(s);
    }

    fn split_line(&mut self) {
        let at = self.byte_at(self.cursor.row, self.cursor.col);
        let rest = self.lines[self.cursor.row].split_off(at);
        self.lines.insert(self.cursor.row + 1, rest);
        self.cursor.row += 1;
        self.cursor.col = 0;
    }

    /// New line carrying the current indentation, one level deeper after
    /// an opening bracket
    fn newline_with_indent(&mut self) {
        let line = &self.lines[self.cursor.row];
        let before: String = line.chars().take(self.cursor.col).collect();
        let mut indent: String = line.chars().take_while(|c| *c == ' ').collect();
        if before.trim_end().ends_with(['{', '[']) {
            indent.push_str(INDENT);
        }

        self.split_line();
        let rest = &mut self.lines[self.cursor.row];
        let trimmed = rest.trim_start().to_string();
        *rest = trimmed;
        self.insert_str(&indent);
    }

    fn backspace(&mut self) {
        if self.cursor.col > 0 {
            let start = self.byte_at(self.cursor.row, self.cursor.col - 1);
            let end = self.byte_at(self.cursor.row, self.cursor.col);
            self.lines[self.cursor.row].replace_range(start..end, "");
            self.cursor.col -= 1;
        } else if self.cursor.row > 0 {
            let line = self.lines.remove(self.cursor.row);
            self.cursor.row -= 1;
            self.cursor.col = self.line_len();
            self.lines[self.cursor.row].push_str(&line);
        }
    }

    fn delete(&mut self) {
        if self.cursor.col < self.line_len() {
            let start = self.byte_at(self.cursor.row, self.cursor.col);
            let end = self.byte_at(self.cursor.row, self.cursor.col + 1);
            self.lines[self.cursor.row].replace_range(start..end, "");
        } else if self.cursor.row + 1 < self.lines.len() {
            let next = self.lines.remove(self.cursor.row + 1);
            self.lines[self.cursor.row].push_str(&next);
        }
    }

    fn delete_line(&mut self) {
        if self.lines.len() == 1 {
            self.lines[0].clear();
        } else {
            self.lines.remove(self.cursor.row);
            self.cursor.row = self.cursor.row.min(self.lines.len() - 1);
        }
        self.cursor.col = self.cursor.col.min(self.line_len());
    }

    /// First visible line for a viewport of `height` rows
    fn visible_from(&self, height: usize) -> usize {
        let scroll = self.scroll.get();
        let scroll = if self.cursor.row < scroll {
            self.cursor.row
        } else if height > 0 && self.cursor.row >= scroll + height {
            self.cursor.row + 1 - height
        } else {
            scroll
        };
        self.scroll.set(scroll);
        scroll
    }
}

fn split_lines(content: &str) -> Vec<String> {
    let lines: Vec<String> = content.lines().map(str::to_string).collect();
    if lines.is_empty() {
        vec![String::new()]
    } else {
        lines
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

impl Widget for &JsonEditor {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let gutter = self.lines.len().to_string().len() as u16 + 1;
        let text_x = area.x + gutter;
        let right = area.x + area.width;
        let first = self.visible_from(area.height as usize);

        let number_style = Style::default().fg(self.theme.muted);
        let cursor_style = Style::default()
            .fg(Color::Black)
            .bg(Color::White)
            .add_modifier(Modifier::BOLD);

        for (offset, line) in self
            .lines
            .iter()
            .skip(first)
            .take(area.height as usize)
            .enumerate()
        {
            let row = first + offset;
            let y = area.y + offset as u16;

            let number = format!("{:>width$}", row + 1, width = gutter as usize - 1);
            buf.set_string(area.x, y, &number, number_style);

            let classes = classify(line);
            let mut col = 0usize;
            for (c, class) in line.chars().zip(classes) {
                let x = text_x + col as u16;
                if x >= right {
                    break;
                }
                let style = if self.focused && row == self.cursor.row && col == self.cursor.col {
                    cursor_style
                } else {
                    class.style(&self.theme)
                };
                buf[(x, y)].set_char(c).set_style(style);
                col += 1;
            }

            if self.focused && row == self.cursor.row && self.cursor.col >= col {
                let x = text_x + self.cursor.col as u16;
                if x < right {
                    buf[(x, y)].set_char(' ').set_style(cursor_style);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn type_str(editor: &mut JsonEditor, s: &str) {
        for c in s.chars() {
            editor.handle_key(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_empty_content_has_one_line() {
        let editor = JsonEditor::new("");
        assert_eq!(editor.lines(), [""]);
        assert_eq!(editor.content(), "");
    }

    #[test]
    fn test_typing_and_backspace() {
        let mut editor = JsonEditor::new("");
        type_str(&mut editor, "{}é");
        editor.handle_key(key(KeyCode::Backspace));
        assert_eq!(editor.content(), "{}");
        assert_eq!(editor.cursor(), Cursor { row: 0, col: 2 });
    }

    #[test]
    fn test_enter_after_brace_indents() {
        let mut editor = JsonEditor::new("{}");
        editor.handle_key(key(KeyCode::Right));
        editor.handle_key(key(KeyCode::Enter));
        assert_eq!(editor.content(), "{\n  }");
        assert_eq!(editor.cursor(), Cursor { row: 1, col: 2 });

        type_str(&mut editor, "\"a\": 1");
        assert_eq!(editor.content(), "{\n  \"a\": 1}");
    }

    #[test]
    fn test_enter_keeps_indentation() {
        let mut editor = JsonEditor::new("    \"a\": 1,");
        editor.handle_key(key(KeyCode::End));
        editor.handle_key(key(KeyCode::Enter));
        assert_eq!(editor.lines()[1], "    ");
    }

    #[test]
    fn test_backspace_and_delete_merge_lines() {
        let mut editor = JsonEditor::new("ab\ncd");
        editor.handle_key(key(KeyCode::Down));
        editor.handle_key(key(KeyCode::Home));
        editor.handle_key(key(KeyCode::Backspace));
        assert_eq!(editor.content(), "abcd");
        assert_eq!(editor.cursor(), Cursor { row: 0, col: 2 });

        editor.paste("\n");
        editor.handle_key(key(KeyCode::Up));
        editor.handle_key(key(KeyCode::End));
        editor.handle_key(key(KeyCode::Delete));
        assert_eq!(editor.content(), "abcd");
    }

    #[test]
    fn test_vertical_moves_clamp_column() {
        let mut editor = JsonEditor::new("long line\nab");
        editor.handle_key(key(KeyCode::End));
        editor.handle_key(key(KeyCode::Down));
        assert_eq!(editor.cursor(), Cursor { row: 1, col: 2 });
        editor.handle_key(key(KeyCode::PageUp));
        assert_eq!(editor.cursor(), Cursor { row: 0, col: 2 });
    }

    #[test]
    fn test_multiline_paste() {
        let mut editor = JsonEditor::new("[]");
        editor.handle_key(key(KeyCode::Right));
        editor.paste("1,\r\n2");
        assert_eq!(editor.content(), "[1,\n2]");
        assert_eq!(editor.cursor(), Cursor { row: 1, col: 1 });
    }

    #[test]
    fn test_ctrl_keys() {
        let mut editor = JsonEditor::new("a\nb");
        assert_eq!(
            editor.handle_key(ctrl('c')),
            Some(EditorAction::Copy("a\nb".to_string()))
        );
        assert_eq!(editor.handle_key(ctrl('v')), Some(EditorAction::PasteRequest));

        editor.handle_key(ctrl('k'));
        assert_eq!(editor.content(), "b");
        editor.handle_key(ctrl('k'));
        assert_eq!(editor.content(), "");
    }

    #[test]
    fn test_format_and_validate() {
        let mut editor = JsonEditor::new(r#"{"a":1}"#);
        assert!(editor.validate().is_none());
        editor.format().unwrap();
        assert_eq!(editor.content(), "{\n  \"a\": 1\n}");

        let mut broken = JsonEditor::new("{ nope");
        assert!(broken.validate().is_some());
        assert!(broken.format().is_err());
        assert_eq!(broken.content(), "{ nope");

        assert!(JsonEditor::new("  ").validate().is_none());
    }

    #[test]
    fn test_render_shows_numbers_and_text() {
        let mut editor = JsonEditor::new("{\n  \"a\": 1\n}");
        editor.set_focused(true);
        let area = Rect::new(0, 0, 20, 3);
        let mut buf = Buffer::empty(area);
        (&editor).render(area, &mut buf);

        let row: String = (0..12).map(|x| buf[(x, 1)].symbol().to_string()).collect();
        assert_eq!(row, "2   \"a\": 1  ");
    }

    #[test]
    fn test_render_scrolls_to_cursor() {
        let content: Vec<String> = (1..=20).map(|n| n.to_string()).collect();
        let mut editor = JsonEditor::new(&content.join("\n"));
        editor.handle_key(ctrl_end());
        let area = Rect::new(0, 0, 10, 5);
        let mut buf = Buffer::empty(area);
        (&editor).render(area, &mut buf);

        let last: String = (0..2).map(|x| buf[(x, 4)].symbol().to_string()).collect();
        assert_eq!(last, "20");
    }

    fn ctrl_end() -> KeyEvent {
        KeyEvent::new(KeyCode::End, KeyModifiers::CONTROL)
    }
}
